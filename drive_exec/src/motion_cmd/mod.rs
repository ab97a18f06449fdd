//! Motion command module
//!
//! Decodes discrete motion commands into per-wheel velocity targets and holds the latest targets
//! for the wheel loops to read.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod target_store;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use target_store::*;

use comms_if::{eqpt::NUM_WHEELS, tc::MotionCommand};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Per-wheel velocity targets for a command, in `WheelId` index order.
///
/// Wheels A and C spin against B and D when turning on the spot. Commands which don't move the
/// robot give zero targets.
pub fn decode(cmd: MotionCommand, base_speed_rpm: f32) -> [f32; NUM_WHEELS] {
    let v = base_speed_rpm;
    match cmd {
        MotionCommand::Forward => [v, v, v, v],
        MotionCommand::Backward => [-v, -v, -v, -v],
        MotionCommand::Left => [v, -v, v, -v],
        MotionCommand::Right => [-v, v, -v, v],
        MotionCommand::Stop | MotionCommand::Idle | MotionCommand::Unknown => [0.0; NUM_WHEELS],
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode_table() {
        assert_eq!(decode(MotionCommand::Forward, 15.0), [15.0, 15.0, 15.0, 15.0]);
        assert_eq!(decode(MotionCommand::Backward, 15.0), [-15.0, -15.0, -15.0, -15.0]);
        assert_eq!(decode(MotionCommand::Left, 15.0), [15.0, -15.0, 15.0, -15.0]);
        assert_eq!(decode(MotionCommand::Right, 15.0), [-15.0, 15.0, -15.0, 15.0]);
        assert_eq!(decode(MotionCommand::Stop, 15.0), [0.0; 4]);
        assert_eq!(decode(MotionCommand::Idle, 15.0), [0.0; 4]);
    }

    #[test]
    fn test_unknown_codes_decode_to_zero() {
        for code in [4, 6, 7, 9, -1, 1000].iter() {
            assert_eq!(decode(MotionCommand::from_code(*code), 15.0), [0.0; 4]);
        }
    }
}
