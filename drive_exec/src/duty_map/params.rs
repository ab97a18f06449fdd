//! Parameters for the duty mapping

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Reference calibration of the drive motors, as `(velocity_rpm, duty_pct)` pairs.
pub const REFERENCE_CURVE: [(f32, f32); 23] = [
    (-68.0, -100.0),
    (-60.0, -90.0),
    (-52.0, -80.0),
    (-45.0, -70.0),
    (-37.0, -60.0),
    (-23.0, -40.0),
    (-16.3, -30.0),
    (-9.5, -20.0),
    (-3.772727, -11.81818),
    (-3.136364, -10.90909),
    (-2.5, -10.0),
    (0.0, 0.0),
    (2.5, 10.0),
    (3.136364, 10.90909),
    (3.772727, 11.81818),
    (9.5, 20.0),
    (16.3, 30.0),
    (23.0, 40.0),
    (37.0, 60.0),
    (45.0, 70.0),
    (52.0, 80.0),
    (60.0, 90.0),
    (68.0, 100.0),
];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Curve parameters. When omitted from the parameter file the reference curve is used.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Params {
    /// `(velocity_rpm, duty_pct)` breakpoints with strictly increasing velocity.
    pub points: Vec<(f32, f32)>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            points: REFERENCE_CURVE.to_vec(),
        }
    }
}
