//! # Drive telemetry
//!
//! Read-only snapshots of the wheel control loops, published for observability. Nothing in
//! these packets is ever fed back into the control loops.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::eqpt::NUM_WHEELS;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of floats per wheel in the bus array form of the telemetry.
pub const WHEEL_TM_ARRAY_LEN: usize = 3;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Telemetry for a single wheel, taken after its latest control pass.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct WheelTm {
    /// Target velocity the loop was regulating towards.
    ///
    /// Units: RPM
    pub target_rpm: f32,

    /// Estimated velocity.
    ///
    /// Units: RPM
    pub velocity_rpm: f32,

    /// Accumulated position (velocity integrated over the sample intervals).
    ///
    /// Units: RPM * seconds
    pub position: f64,

    /// Output of the wheel's regulator.
    pub regulator_output: f32,

    /// Signed duty sent to the actuator.
    ///
    /// Units: percent
    pub duty_pct: f32,

    /// Number of control passes executed so far.
    pub num_passes: u64,
}

/// Telemetry for the whole drive.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct DriveTm {
    /// Session time at which the snapshot was taken.
    pub time_s: f64,

    /// Whether the motor drivers are enabled.
    pub drive_enabled: bool,

    /// Per-wheel telemetry in `WheelId` index order.
    pub wheels: [WheelTm; NUM_WHEELS],
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl WheelTm {
    /// The `[velocity, position, regulator_output]` array forwarded to an external bus.
    ///
    /// Position is narrowed to `f32` here and loses precision once it grows large. Use the
    /// `position` field for the full `f64` value.
    pub fn as_array(&self) -> [f32; WHEEL_TM_ARRAY_LEN] {
        [self.velocity_rpm, self.position as f32, self.regulator_output]
    }
}

impl DriveTm {
    /// Flatten all wheels into a single array, wheel A first.
    pub fn as_array(&self) -> Vec<f32> {
        self.wheels.iter().flat_map(|w| w.as_array()).collect()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_as_array_layout() {
        let mut tm = DriveTm::default();
        tm.wheels[1] = WheelTm {
            velocity_rpm: 12.5,
            position: 3.0,
            regulator_output: -4.0,
            ..Default::default()
        };

        let arr = tm.as_array();
        assert_eq!(arr.len(), NUM_WHEELS * WHEEL_TM_ARRAY_LEN);
        assert_eq!(&arr[3..6], &[12.5, 3.0, -4.0]);
        assert_eq!(&arr[0..3], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_as_array_narrows_position() {
        let tm = WheelTm {
            position: 16_777_217.0,
            ..Default::default()
        };

        // 2^24 + 1 has no exact f32 representation
        assert_eq!(tm.as_array()[1], 16_777_216.0);
        assert_eq!(tm.position, 16_777_217.0);
    }
}
