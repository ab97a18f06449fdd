//! Parameters structure for the velocity estimator

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::{VelEstParamsError, SECONDS_PER_MINUTE};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Encoder parameters, shared by all four wheels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct Params {
    /// Counter counts produced by one revolution of the wheel.
    pub counts_per_rev: f32,

    /// Auto-reload value of the hardware counter. The counter wraps after reaching this value,
    /// and it is also the span used when unwrapping counter deltas.
    pub counter_auto_reload: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    pub fn validate(&self) -> Result<(), VelEstParamsError> {
        if !self.counts_per_rev.is_finite() || self.counts_per_rev <= 0.0 {
            return Err(VelEstParamsError::InvalidCountsPerRev(self.counts_per_rev));
        }
        if self.counter_auto_reload < 2 {
            return Err(VelEstParamsError::InvalidAutoReload(self.counter_auto_reload));
        }
        Ok(())
    }

    /// Factor converting counts per second into RPM.
    pub fn rpm_scale(&self) -> f32 {
        SECONDS_PER_MINUTE / self.counts_per_rev
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            counts_per_rev: 1320.0,
            counter_auto_reload: 65535,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Params::default().validate().is_ok());

        let mut p = Params::default();
        p.counts_per_rev = 0.0;
        assert_eq!(p.validate(), Err(VelEstParamsError::InvalidCountsPerRev(0.0)));

        let mut p = Params::default();
        p.counter_auto_reload = 1;
        assert_eq!(p.validate(), Err(VelEstParamsError::InvalidAutoReload(1)));
    }

    #[test]
    fn test_rpm_scale() {
        let p = Params {
            counts_per_rev: 60.0,
            counter_auto_reload: 100,
        };
        assert_eq!(p.rpm_scale(), 1.0);
    }
}
