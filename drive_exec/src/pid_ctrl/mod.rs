//! PID regulator module
//!
//! A discrete PID regulator with a clamped error integral, a clamped output and conditional
//! integration anti-windup.

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
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Invalid regulator parameters.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PidParamsError {
    #[error("The sample rate must be non-zero")]
    ZeroSampleRate,

    #[error("The integral limit must be finite and positive, got {0}")]
    InvalidIntegralMax(f32),

    #[error("The output limit must be finite and positive, got {0}")]
    InvalidOutputMax(f32),

    #[error("Gains must be finite, got p = {0}, i = {1}, d = {2}")]
    NonFiniteGain(f32, f32, f32),
}
