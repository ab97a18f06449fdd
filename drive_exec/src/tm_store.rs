//! # Telemetry store
//!
//! The wheel loops publish their latest telemetry here after every pass. Readers take snapshots
//! for logging and archiving; nothing read from the store is ever fed back into the loops.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use std::{
    path::Path,
    sync::atomic::{AtomicU64, Ordering},
};

// Internal
use crate::atomic::{AtomicF32, AtomicF64};
use comms_if::{
    eqpt::{WheelId, NUM_WHEELS},
    tm::{DriveTm, WheelTm},
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Latest telemetry of every wheel.
///
/// Fields are published independently, a snapshot may mix values from two consecutive passes
/// of the same wheel.
#[derive(Debug, Default)]
pub struct TmStore {
    wheels: [WheelTmCell; NUM_WHEELS],
}

#[derive(Debug, Default)]
struct WheelTmCell {
    target_rpm: AtomicF32,
    velocity_rpm: AtomicF32,
    position: AtomicF64,
    regulator_output: AtomicF32,
    duty_pct: AtomicF32,
    num_passes: AtomicU64,
}

/// One archived row, a single wheel at a single time.
#[derive(Debug, Clone, Copy, Serialize)]
struct WheelTmRecord {
    time_s: f64,
    wheel: WheelId,
    drive_enabled: bool,
    target_rpm: f32,
    velocity_rpm: f32,
    position: f64,
    regulator_output: f32,
    duty_pct: f32,
    num_passes: u64,
}

/// Writes drive telemetry snapshots to a csv archive.
pub struct TmArchive {
    latest: Option<DriveTm>,
    arch: Archiver,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the telemetry of a wheel's latest pass.
    pub fn publish(&self, id: WheelId, tm: &WheelTm) {
        let cell = &self.wheels[id.index()];
        cell.target_rpm.store(tm.target_rpm, Ordering::Relaxed);
        cell.velocity_rpm.store(tm.velocity_rpm, Ordering::Relaxed);
        cell.position.store(tm.position, Ordering::Relaxed);
        cell.regulator_output
            .store(tm.regulator_output, Ordering::Relaxed);
        cell.duty_pct.store(tm.duty_pct, Ordering::Relaxed);
        cell.num_passes.store(tm.num_passes, Ordering::Release);
    }

    /// Latest telemetry of one wheel.
    pub fn wheel(&self, id: WheelId) -> WheelTm {
        let cell = &self.wheels[id.index()];
        WheelTm {
            num_passes: cell.num_passes.load(Ordering::Acquire),
            target_rpm: cell.target_rpm.load(Ordering::Relaxed),
            velocity_rpm: cell.velocity_rpm.load(Ordering::Relaxed),
            position: cell.position.load(Ordering::Relaxed),
            regulator_output: cell.regulator_output.load(Ordering::Relaxed),
            duty_pct: cell.duty_pct.load(Ordering::Relaxed),
        }
    }

    /// Snapshot the whole drive.
    pub fn snapshot(&self, time_s: f64, drive_enabled: bool) -> DriveTm {
        let mut wheels = [WheelTm::default(); NUM_WHEELS];
        for id in WheelId::ALL.iter() {
            wheels[id.index()] = self.wheel(*id);
        }

        DriveTm {
            time_s,
            drive_enabled,
            wheels,
        }
    }
}

impl TmArchive {
    /// Create an archive at `rel_path` inside the session's archive directory.
    pub fn new<P: AsRef<Path>>(session: &Session, rel_path: P) -> Result<Self, ArchiveError> {
        Ok(Self {
            latest: None,
            arch: Archiver::from_path(session, rel_path)?,
        })
    }

    /// Set the snapshot written by the next call to `write`.
    pub fn record(&mut self, tm: DriveTm) {
        self.latest = Some(tm);
    }
}

impl Archived for TmArchive {
    fn write(&mut self) -> Result<(), ArchiveError> {
        let tm = match self.latest.take() {
            Some(t) => t,
            None => return Ok(()),
        };

        for id in WheelId::ALL.iter() {
            let w = &tm.wheels[id.index()];
            self.arch.serialise(WheelTmRecord {
                time_s: tm.time_s,
                wheel: *id,
                drive_enabled: tm.drive_enabled,
                target_rpm: w.target_rpm,
                velocity_rpm: w.velocity_rpm,
                position: w.position,
                regulator_output: w.regulator_output,
                duty_pct: w.duty_pct,
                num_passes: w.num_passes,
            })?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
