//! The wheel control task
//!
//! Each wheel runs on its own thread: wait for the ready flag, run one pass against the
//! equipment, publish telemetry, idle for the wheel's cadence and repeat.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

// Internal
use super::{InputData, WheelCtrl, WheelCtrlError};
use crate::{
    eqpt::{Actuator, ActuatorDemand, EncoderSource},
    heartbeat::ReadyFlag,
    motion_cmd::TargetStore,
    tm_store::TmStore,
    vel_est::EncoderSample,
};
use util::module::State;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Shared handles a wheel task needs besides its own controller and equipment.
#[derive(Clone)]
pub struct WheelTaskCtx {
    /// The wheel's ready flag, armed by the heartbeat.
    pub flag: Arc<ReadyFlag>,

    pub targets: Arc<TargetStore>,

    pub tm: Arc<TmStore>,

    /// Raised to stop the task.
    pub stop: Arc<AtomicBool>,

    /// Interval between checks of the ready flag.
    pub flag_poll: Duration,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Run a wheel's control loop until `ctx.stop` is raised, returning the number of passes.
///
/// Equipment failures never stop the loop. A failed counter read gives a zero duty pass and a
/// failed actuator write is logged and retried on the next pass. On exit the actuator is brought
/// to zero duty and disabled.
pub fn run_wheel_task<E, A>(
    mut ctrl: WheelCtrl,
    mut encoder: E,
    mut actuator: A,
    ctx: WheelTaskCtx,
) -> u64
where
    E: EncoderSource,
    A: Actuator,
{
    let id = ctrl.id();
    let cadence = Duration::from_millis(ctrl.cadence_ms());

    // Drivers start disabled
    let mut applied_enable: Option<bool> = None;
    let mut sensor_fault = false;
    let mut actuator_fault = false;

    info!("Wheel {} control task started", id);

    while ctx.flag.wait(ctx.flag_poll, &ctx.stop) {
        // ---- DRIVER ENABLE ----

        let enable = ctx.targets.drive_enabled();
        if applied_enable != Some(enable) {
            match actuator.set_enabled(enable) {
                Ok(()) => {
                    debug!("Wheel {} driver enable set to {}", id, enable);
                    applied_enable = Some(enable);
                }
                Err(e) => warn!("Wheel {} could not set driver enable: {}", id, e),
            }
        }

        // ---- CONTROL PASS ----

        let sample = match encoder.read_counter() {
            Ok(counter) => {
                if sensor_fault {
                    info!("Wheel {} encoder recovered", id);
                    sensor_fault = false;
                }
                Some(EncoderSample {
                    counter,
                    time_ms: encoder.now_ms(),
                })
            }
            Err(e) => {
                if !sensor_fault {
                    warn!("Wheel {} encoder read failed, demanding zero duty: {}", id, e);
                    sensor_fault = true;
                }
                None
            }
        };

        let input = InputData {
            target_rpm: ctx.targets.target(id),
            sample,
        };

        let (output, report) = match ctrl.proc(&input) {
            Ok(o) => o,
            Err(e) => match e {},
        };

        match actuator.set_duty(output.demand) {
            Ok(()) => actuator_fault = false,
            Err(e) => {
                if !actuator_fault {
                    warn!("Wheel {} actuator write failed: {}", id, e);
                    actuator_fault = true;
                }
            }
        }

        ctx.tm.publish(id, &output.tm);

        trace!(
            "Wheel {} pass {}: target {:.2} RPM, measured {:.2} RPM, duty {:.1} % ({:?})",
            id,
            output.tm.num_passes,
            output.tm.target_rpm,
            output.tm.velocity_rpm,
            output.tm.duty_pct,
            report
        );

        // ---- IDLE ----

        if cadence > Duration::from_secs(0) {
            thread::sleep(cadence);
        }
    }

    if let Err(e) = actuator
        .set_duty(ActuatorDemand::stopped())
        .and_then(|_| actuator.set_enabled(false))
    {
        warn!("Wheel {} could not be stopped on exit: {}", id, e);
    }

    info!(
        "Wheel {} control task stopped after {} passes",
        id,
        ctrl.num_passes()
    );

    ctrl.num_passes()
}

/// Spawn a wheel's control loop on a dedicated, named thread.
pub fn spawn_wheel_task<E, A>(
    ctrl: WheelCtrl,
    encoder: E,
    actuator: A,
    ctx: WheelTaskCtx,
) -> Result<JoinHandle<u64>, WheelCtrlError>
where
    E: EncoderSource + Send + 'static,
    A: Actuator + Send + 'static,
{
    let id = ctrl.id();
    thread::Builder::new()
        .name(format!("wheel_{}", id))
        .spawn(move || run_wheel_task(ctrl, encoder, actuator, ctx))
        .map_err(|e: io::Error| WheelCtrlError::SpawnFailed(id, e))
}

/// Raise a stop signal.
pub fn request_stop(stop: &AtomicBool) {
    stop.store(true, Ordering::Release);
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        duty_map::VelDutyCurve,
        eqpt::{DutyRange, EqptError},
        pid_ctrl, vel_est,
        wheel_ctrl::{ErrorSign, WheelParams},
    };
    use comms_if::{eqpt::WheelId, tc::MotionCommand};
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Mutex,
    };

    /// Encoder which fails every read after `fail_after` reads.
    struct MockEncoder {
        reads: u32,
        fail_after: u32,
        clock_ms: Arc<AtomicU32>,
    }

    impl EncoderSource for MockEncoder {
        fn read_counter(&mut self) -> Result<u32, EqptError> {
            self.reads += 1;
            self.clock_ms.fetch_add(10, Ordering::Relaxed);
            if self.reads > self.fail_after {
                Err(EqptError::ReadFailed("mock".into()))
            } else {
                Ok(0)
            }
        }

        fn now_ms(&self) -> u32 {
            self.clock_ms.load(Ordering::Relaxed)
        }
    }

    /// Actuator recording every demand it receives.
    #[derive(Clone, Default)]
    struct MockActuator {
        demands: Arc<Mutex<Vec<ActuatorDemand>>>,
        enables: Arc<Mutex<Vec<bool>>>,
    }

    impl Actuator for MockActuator {
        fn set_enabled(&mut self, enabled: bool) -> Result<(), EqptError> {
            self.enables.lock().unwrap().push(enabled);
            Ok(())
        }

        fn set_duty(&mut self, demand: ActuatorDemand) -> Result<(), EqptError> {
            self.demands.lock().unwrap().push(demand);
            Ok(())
        }
    }

    fn ctrl() -> WheelCtrl {
        WheelCtrl::new(
            &WheelParams {
                id: WheelId::B,
                cadence_ms: 0,
                error_sign: ErrorSign::TargetMinusMeasured,
                apply_curve: false,
                duty_range: DutyRange::Bidirectional,
                pid: pid_ctrl::Params {
                    p_gain: 1.0,
                    i_gain: 0.0,
                    d_gain: 0.0,
                    integral_max: 500.0,
                    output_max: 68.0,
                    sample_rate: 100,
                },
            },
            &vel_est::Params::default(),
            Arc::new(VelDutyCurve::reference()),
        )
        .unwrap()
    }

    fn ctx() -> WheelTaskCtx {
        WheelTaskCtx {
            flag: Arc::new(ReadyFlag::new()),
            targets: Arc::new(TargetStore::new(15.0)),
            tm: Arc::new(TmStore::new()),
            stop: Arc::new(AtomicBool::new(false)),
            flag_poll: Duration::from_micros(100),
        }
    }

    #[test]
    fn test_passes_follow_flag() {
        let ctx = ctx();
        ctx.targets.on_command(MotionCommand::Right);

        let actuator = MockActuator::default();
        let encoder = MockEncoder {
            reads: 0,
            fail_after: 2,
            clock_ms: Arc::new(AtomicU32::new(0)),
        };

        let handle = spawn_wheel_task(ctrl(), encoder, actuator.clone(), ctx.clone()).unwrap();

        // Three passes, each requested once the previous one has been published
        for pass in 1..=3u64 {
            ctx.flag.set();
            while ctx.tm.wheel(WheelId::B).num_passes < pass {
                thread::sleep(Duration::from_millis(1));
            }
        }

        request_stop(&ctx.stop);
        assert_eq!(handle.join().unwrap(), 3);

        let demands = actuator.demands.lock().unwrap();

        // Right turn gives wheel B a positive target
        assert_eq!(demands[0].signed_duty(), 15.0);
        assert_eq!(demands[1].signed_duty(), 15.0);

        // Third read failed, so zero duty, then the stop on exit
        assert_eq!(demands[2], ActuatorDemand::stopped());
        assert_eq!(demands[3], ActuatorDemand::stopped());
        assert_eq!(demands.len(), 4);

        let enables = actuator.enables.lock().unwrap();
        assert_eq!(*enables, vec![true, false]);

        assert_eq!(ctx.tm.wheel(WheelId::B).target_rpm, 15.0);
    }

    #[test]
    fn test_stops_without_passes() {
        let ctx = ctx();
        request_stop(&ctx.stop);

        let actuator = MockActuator::default();
        let encoder = MockEncoder {
            reads: 0,
            fail_after: 0,
            clock_ms: Arc::new(AtomicU32::new(0)),
        };

        assert_eq!(run_wheel_task(ctrl(), encoder, actuator.clone(), ctx), 0);
        assert_eq!(*actuator.demands.lock().unwrap(), vec![ActuatorDemand::stopped()]);
    }
}
