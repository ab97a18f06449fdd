//! # Drive equipment identifiers

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// The number of independently driven wheels on the robot.
pub const NUM_WHEELS: usize = 4;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// IDs of the driven wheels.
///
/// The skid-steer pattern pairs A with C and B with D, so A and C turn together during a left
/// turn while B and D turn the other way.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone, PartialOrd, Ord)]
pub enum WheelId {
    A,
    B,
    C,
    D,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl WheelId {
    /// All wheels in index order.
    pub const ALL: [WheelId; NUM_WHEELS] = [WheelId::A, WheelId::B, WheelId::C, WheelId::D];

    /// Index of this wheel into per-wheel arrays.
    pub fn index(&self) -> usize {
        match self {
            WheelId::A => 0,
            WheelId::B => 1,
            WheelId::C => 2,
            WheelId::D => 3,
        }
    }
}

impl fmt::Display for WheelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WheelId::A => "A",
            WheelId::B => "B",
            WheelId::C => "C",
            WheelId::D => "D",
        };
        write!(f, "{}", s)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wheel_index_matches_order() {
        for (i, id) in WheelId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_wheel_id_serde_name() {
        let id: WheelId = serde_json::from_str("\"C\"").unwrap();
        assert_eq!(id, WheelId::C);
        assert_eq!(format!("{}", id), "C");
    }
}
