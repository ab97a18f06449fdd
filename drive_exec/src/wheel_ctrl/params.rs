//! Parameters structure for a wheel controller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::{eqpt::DutyRange, pid_ctrl};
use comms_if::eqpt::WheelId;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Per-wheel loop configuration.
///
/// The wheels were calibrated individually, so the sign convention, use of the duty curve and
/// duty range may differ between them.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WheelParams {
    pub id: WheelId,

    /// Idle time after each pass. Zero gives a tight poll on the ready flag.
    ///
    /// Units: milliseconds
    pub cadence_ms: u64,

    pub error_sign: ErrorSign,

    /// Map the regulator output through the duty curve. Otherwise the output is used as the duty
    /// directly.
    pub apply_curve: bool,

    pub duty_range: DutyRange,

    pub pid: pid_ctrl::Params,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Sign convention of the regulation error.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSign {
    TargetMinusMeasured,
    MeasuredMinusTarget,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ErrorSign {
    pub fn error(&self, target: f32, measured: f32) -> f32 {
        match self {
            ErrorSign::TargetMinusMeasured => target - measured,
            ErrorSign::MeasuredMinusTarget => measured - target,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_sign() {
        assert_eq!(ErrorSign::TargetMinusMeasured.error(15.0, 10.0), 5.0);
        assert_eq!(ErrorSign::MeasuredMinusTarget.error(15.0, 10.0), -5.0);
    }
}
