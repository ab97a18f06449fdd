//! # Heartbeat
//!
//! A periodic trigger which arms a ready flag for each wheel loop. Each flag holds at most one
//! pending tick: ticks which arrive while a loop is still busy coalesce into one, so a slow loop
//! never builds up a backlog of passes.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use std::{
    io,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

// Internal
use comms_if::eqpt::{WheelId, NUM_WHEELS};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Single slot "pass requested" flag shared between the heartbeat and one wheel loop.
#[derive(Debug, Default)]
pub struct ReadyFlag {
    pending: AtomicBool,
}

/// The periodic trigger.
#[derive(Debug)]
pub struct Heartbeat {
    period: Duration,
    flags: [Arc<ReadyFlag>; NUM_WHEELS],
    num_ticks: AtomicU64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ReadyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a pass. Overwrites any pending request.
    pub fn set(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Consume the pending request, returning whether there was one.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    pub fn is_set(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Block until a request is taken or `stop` is raised.
    ///
    /// Returns `true` if a request was taken. A zero `poll` interval yields between checks
    /// instead of sleeping.
    pub fn wait(&self, poll: Duration, stop: &AtomicBool) -> bool {
        loop {
            if self.take() {
                return true;
            }
            if stop.load(Ordering::Acquire) {
                return false;
            }
            if poll == Duration::from_secs(0) {
                thread::yield_now();
            } else {
                thread::sleep(poll);
            }
        }
    }
}

impl Heartbeat {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            flags: Default::default(),
            num_ticks: AtomicU64::new(0),
        }
    }

    /// The ready flag of the given wheel.
    pub fn flag(&self, id: WheelId) -> Arc<ReadyFlag> {
        self.flags[id.index()].clone()
    }

    pub fn flags(&self) -> &[Arc<ReadyFlag>; NUM_WHEELS] {
        &self.flags
    }

    /// Arm every wheel's flag.
    pub fn tick(&self) {
        for flag in self.flags.iter() {
            flag.set();
        }
        self.num_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn num_ticks(&self) -> u64 {
        self.num_ticks.load(Ordering::Relaxed)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start ticking on a dedicated thread until `stop` is raised.
    ///
    /// Ticks are scheduled against absolute deadlines. If the thread falls behind, missed ticks
    /// are dropped rather than fired in a burst.
    pub fn spawn(self: Arc<Self>, stop: Arc<AtomicBool>) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("heartbeat".into())
            .spawn(move || {
                debug!("Heartbeat started with period {:?}", self.period);

                let mut next = Instant::now() + self.period;

                while !stop.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if next > now {
                        thread::sleep(next - now);
                    }

                    self.tick();

                    next += self.period;
                    let now = Instant::now();
                    if next < now {
                        trace!("Heartbeat overran, skipping missed ticks");
                        next = now + self.period;
                    }
                }

                debug!("Heartbeat stopped after {} ticks", self.num_ticks());
            })
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
