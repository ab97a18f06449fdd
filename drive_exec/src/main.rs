//! Main drive executable entry point.
//!
//! # Architecture
//!
//! The executable starts one thread per wheel plus a heartbeat thread, then acts as the command
//! source and telemetry sink:
//!
//!     - Initialise session, logging and parameters
//!     - Build the wheel controllers and their equipment
//!     - Spawn the heartbeat and the four wheel tasks
//!     - Main loop:
//!         - Command processing (timed script or console radio link)
//!         - Telemetry snapshot, logging and archiving
//!     - Stop and join all tasks at the end of the script or console input
//!
//! # Usage
//!
//! `drive_exec [script]`: with a script path the commands in the script are replayed at their
//! scripted times. Without one, each line of stdin is treated as a radio frame.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::{
    env,
    io::{self, BufRead},
    sync::{
        atomic::AtomicBool,
        mpsc::{self, Receiver, TryRecvError},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

// Internal
use drive_lib::{
    duty_map::VelDutyCurve,
    eqpt::bench::BenchWheel,
    heartbeat::Heartbeat,
    motion_cmd::TargetStore,
    params::DriveExecParams,
    tm_store::{TmArchive, TmStore},
    wheel_ctrl::{request_stop, spawn_wheel_task, WheelCtrl, WheelTaskCtx},
};
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    script_interpreter::{PendingCmds, ScriptInterpreter},
    session::{self, Session},
    time::MonotonicClock,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Period of the command processing loop.
const CYCLE_PERIOD: Duration = Duration::from_millis(10);

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Where motion commands come from.
enum CmdSource {
    /// Timed script, along with the instant it was started.
    Script(ScriptInterpreter, Instant),

    /// Radio frames read from the console.
    Console(Receiver<Vec<u8>>),
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("drive_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    info!("Skid-Steer Drive Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: DriveExecParams =
        util::params::load("drive_exec.toml").wrap_err("Could not load drive exec params")?;
    params
        .validate()
        .wrap_err("Drive exec parameters are invalid")?;

    let saved = session
        .save("drive_exec.toml", &params)
        .wrap_err("Could not save the parameters to the session")?;

    info!("Exec parameters loaded, copy saved to {:?}", saved);

    // ---- INITIALISE COMMAND SOURCE ----

    let args: Vec<String> = env::args().collect();
    debug!("CLI arguments: {:?}", args);

    let mut cmd_source = match args.len() {
        2 => {
            info!("Loading script from \"{}\"", &args[1]);

            let si = ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} commands\n",
                si.get_duration(),
                si.get_num_cmds()
            );

            CmdSource::Script(si, Instant::now())
        }
        1 => {
            info!("No script provided, reading radio frames from the console\n");
            CmdSource::Console(spawn_console_reader().wrap_err("Failed to start the console")?)
        }
        n => {
            return Err(eyre!(
                "Expected either zero or one argument, found {}",
                n - 1
            ))
        }
    };

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let curve = Arc::new(
        VelDutyCurve::from_params(&params.duty_map).wrap_err("Failed to build the duty curve")?,
    );
    let targets = Arc::new(TargetStore::new(params.base_speed_rpm));
    let tm_store = Arc::new(TmStore::new());
    let stop = Arc::new(AtomicBool::new(false));
    let heartbeat = Arc::new(Heartbeat::new(Duration::from_micros(
        params.heartbeat_period_us,
    )));

    let mut tm_archive =
        TmArchive::new(&session, "drive/tm.csv").wrap_err("Failed to create the tm archive")?;

    info!("Module initialisation complete\n");

    // ---- START TASKS ----

    let clock = MonotonicClock::new();
    let mut wheel_handles = Vec::with_capacity(params.wheels.len());

    for wheel_params in params.wheels.iter() {
        let ctrl = WheelCtrl::new(wheel_params, &params.encoder, curve.clone())
            .wrap_err_with(|| format!("Failed to initialise wheel {}", wheel_params.id))?;

        let (encoder, actuator) = BenchWheel::pair(&params.bench, &params.encoder, clock);

        let ctx = WheelTaskCtx {
            flag: heartbeat.flag(wheel_params.id),
            targets: targets.clone(),
            tm: tm_store.clone(),
            stop: stop.clone(),
            flag_poll: Duration::from_micros(params.flag_poll_us),
        };

        wheel_handles.push((
            wheel_params.id,
            spawn_wheel_task(ctrl, encoder, actuator, ctx)?,
        ));
    }

    let heartbeat_handle = heartbeat
        .clone()
        .spawn(stop.clone())
        .wrap_err("Failed to start the heartbeat")?;

    info!("Wheel tasks started\n");

    // ---- MAIN LOOP ----

    let tm_period = Duration::from_millis(params.tm_period_ms);
    let mut last_tm = Instant::now();

    loop {
        let cycle_start = Instant::now();

        // ---- COMMAND PROCESSING ----

        let source_ended = match cmd_source {
            CmdSource::Script(ref mut si, start) => {
                match si.get_pending_cmds(start.elapsed().as_secs_f64()) {
                    PendingCmds::None => false,
                    PendingCmds::Some(cmds) => {
                        for cmd in cmds {
                            info!("Executing scripted command {}", cmd);
                            targets.on_command(cmd);
                        }
                        false
                    }
                    PendingCmds::EndOfScript => {
                        info!("End of script reached, stopping");
                        true
                    }
                }
            }
            CmdSource::Console(ref rx) => loop {
                match rx.try_recv() {
                    Ok(frame) => targets.on_radio_frame(&frame),
                    Err(TryRecvError::Empty) => break false,
                    Err(TryRecvError::Disconnected) => {
                        info!("Console input closed, stopping");
                        break true;
                    }
                }
            },
        };

        if source_ended {
            break;
        }

        // ---- TELEMETRY ----

        if last_tm.elapsed() >= tm_period {
            last_tm = Instant::now();

            let tm = tm_store.snapshot(session::get_elapsed_seconds(), targets.drive_enabled());
            match serde_json::to_string(&tm) {
                Ok(s) => debug!("Drive TM: {}", s),
                Err(e) => warn!("Could not serialise telemetry: {}", e),
            }

            tm_archive.record(tm);
            if let Err(e) = tm_archive.write() {
                warn!("Could not archive telemetry: {}", e);
            }
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start;
        if let Some(remaining) = CYCLE_PERIOD.checked_sub(cycle_dur) {
            thread::sleep(remaining);
        }
    }

    // ---- SHUTDOWN ----

    request_stop(&stop);

    if heartbeat_handle.join().is_err() {
        warn!("Heartbeat thread panicked");
    }

    for (id, handle) in wheel_handles {
        match handle.join() {
            Ok(passes) => info!("Wheel {} completed {} passes", id, passes),
            Err(_) => warn!("Wheel {} task panicked", id),
        }
    }

    info!(
        "Heartbeat ticked {} times, drive stopped",
        heartbeat.num_ticks()
    );

    Ok(())
}

/// Start a thread forwarding each line of stdin as a radio frame.
///
/// The returned channel disconnects when stdin closes.
fn spawn_console_reader() -> io::Result<Receiver<Vec<u8>>> {
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name("console".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(l) => l,
                    Err(e) => {
                        warn!("Could not read from the console: {}", e);
                        break;
                    }
                };

                if tx.send(line.trim().as_bytes().to_vec()).is_err() {
                    break;
                }
            }
        })?;

    Ok(rx)
}
