//! Duty mapping module
//!
//! Maps a desired wheel velocity onto an actuation duty using a calibration curve of
//! breakpoints with linear interpolation between them.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod curve;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use curve::*;
pub use params::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised when building a curve.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CurveError {
    #[error("A curve needs at least 2 breakpoints, got {0}")]
    TooFewPoints(usize),

    #[error("Breakpoint {0} is not finite")]
    NonFinitePoint(usize),

    #[error("Breakpoint velocities must be strictly increasing (breakpoint {0})")]
    NotIncreasing(usize),
}
