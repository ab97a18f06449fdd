//! Velocity estimation module
//!
//! Turns successive readings of a wrapping hardware counter into a signed velocity and an
//! accumulated position for one wheel.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Seconds per minute, used to convert counts per second into RPM.
pub const SECONDS_PER_MINUTE: f32 = 60.0;

/// Milliseconds per second.
pub const MS_PER_S: f32 = 1000.0;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors in the estimator's parameters.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum VelEstParamsError {
    #[error("Counts per revolution must be finite and positive, got {0}")]
    InvalidCountsPerRev(f32),

    #[error("The counter auto-reload value must be at least 2, got {0}")]
    InvalidAutoReload(u32),
}
