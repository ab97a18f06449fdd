//! Parameters structure for the PID regulator

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::PidParamsError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Regulator parameters.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct Params {
    // ---- GAINS ----
    pub p_gain: f32,
    pub i_gain: f32,
    pub d_gain: f32,

    // ---- LIMITS ----
    /// Symmetric limit on the accumulated error integral.
    pub integral_max: f32,

    /// Symmetric limit on the regulator output.
    pub output_max: f32,

    /// Divisor applied to the integral and derivative terms.
    ///
    /// Units: samples/second
    pub sample_rate: u16,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    pub fn validate(&self) -> Result<(), PidParamsError> {
        if self.sample_rate == 0 {
            return Err(PidParamsError::ZeroSampleRate);
        }
        if !self.integral_max.is_finite() || self.integral_max <= 0.0 {
            return Err(PidParamsError::InvalidIntegralMax(self.integral_max));
        }
        if !self.output_max.is_finite() || self.output_max <= 0.0 {
            return Err(PidParamsError::InvalidOutputMax(self.output_max));
        }
        if !(self.p_gain.is_finite() && self.i_gain.is_finite() && self.d_gain.is_finite()) {
            return Err(PidParamsError::NonFiniteGain(
                self.p_gain,
                self.i_gain,
                self.d_gain,
            ));
        }
        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            p_gain: 1.0,
            i_gain: 10.0,
            d_gain: 0.0,
            integral_max: 500.0,
            output_max: 68.0,
            sample_rate: 100,
        }
    }
}
