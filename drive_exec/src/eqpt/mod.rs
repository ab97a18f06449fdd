//! Equipment interfaces
//!
//! The control loops only see the hardware through the [`EncoderSource`] and [`Actuator`]
//! traits, so the same loops drive real motors, bench stand-ins and test doubles.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod bench;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use util::maths::clamp;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Largest duty magnitude an actuator accepts.
///
/// Units: percent
pub const MAX_DUTY_PCT: f32 = 100.0;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A wrapping quadrature counter together with the clock it is sampled against.
pub trait EncoderSource {
    /// Read the raw counter value.
    fn read_counter(&mut self) -> Result<u32, EqptError>;

    /// Current time on a wrapping millisecond clock.
    fn now_ms(&self) -> u32;
}

/// A motor driver accepting a duty and a direction.
pub trait Actuator {
    /// Enable or disable the motor driver.
    fn set_enabled(&mut self, enabled: bool) -> Result<(), EqptError>;

    /// Apply a duty demand.
    fn set_duty(&mut self, demand: ActuatorDemand) -> Result<(), EqptError>;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Demand sent to an actuator on each control pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActuatorDemand {
    /// Duty magnitude in `[0, 100]`.
    ///
    /// Units: percent
    pub duty_pct: f32,

    pub direction: Direction,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Rotation direction of a motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Forward,
    Reverse,
}

/// How a wheel's signed duty is turned into an actuator demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyRange {
    /// Duty is clamped to `[-100, 100]` and its sign selects the direction.
    Bidirectional,

    /// Duty is clamped to `[0, 100]` and the motor always runs forwards.
    Unidirectional,
}

/// Errors raised by equipment.
#[derive(Debug, thiserror::Error)]
pub enum EqptError {
    #[error("Failed to read the encoder counter: {0}")]
    ReadFailed(String),

    #[error("Failed to write to the actuator: {0}")]
    WriteFailed(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ActuatorDemand {
    /// Zero duty.
    pub fn stopped() -> Self {
        Self {
            duty_pct: 0.0,
            direction: Direction::Forward,
        }
    }

    /// The demand as a signed duty, negative for reverse.
    pub fn signed_duty(&self) -> f32 {
        match self.direction {
            Direction::Forward => self.duty_pct,
            Direction::Reverse => -self.duty_pct,
        }
    }
}

impl DutyRange {
    /// Build the actuator demand for a signed duty.
    ///
    /// Returns the demand and whether the duty had to be limited. Non-finite duties give zero
    /// duty.
    pub fn demand(&self, duty_pct: f32) -> (ActuatorDemand, bool) {
        if duty_pct.is_nan() {
            return (ActuatorDemand::stopped(), true);
        }

        let (min, direction_of) = match self {
            DutyRange::Bidirectional => (-MAX_DUTY_PCT, true),
            DutyRange::Unidirectional => (0.0, false),
        };

        let clamped = clamp(duty_pct, min, MAX_DUTY_PCT);
        let limited = clamped != duty_pct;

        let direction = if direction_of && clamped < 0.0 {
            Direction::Reverse
        } else {
            Direction::Forward
        };

        (
            ActuatorDemand {
                duty_pct: clamped.abs(),
                direction,
            },
            limited,
        )
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bidirectional() {
        let (d, limited) = DutyRange::Bidirectional.demand(-42.0);
        assert_eq!(d.duty_pct, 42.0);
        assert_eq!(d.direction, Direction::Reverse);
        assert_eq!(d.signed_duty(), -42.0);
        assert!(!limited);

        let (d, limited) = DutyRange::Bidirectional.demand(150.0);
        assert_eq!(d.duty_pct, 100.0);
        assert_eq!(d.direction, Direction::Forward);
        assert!(limited);

        let (d, _) = DutyRange::Bidirectional.demand(-150.0);
        assert_eq!(d.signed_duty(), -100.0);
    }

    #[test]
    fn test_unidirectional() {
        let (d, limited) = DutyRange::Unidirectional.demand(-42.0);
        assert_eq!(d.duty_pct, 0.0);
        assert_eq!(d.direction, Direction::Forward);
        assert!(limited);

        let (d, limited) = DutyRange::Unidirectional.demand(30.0);
        assert_eq!(d.signed_duty(), 30.0);
        assert!(!limited);
    }

    #[test]
    fn test_nan_duty_is_stopped() {
        let (d, limited) = DutyRange::Bidirectional.demand(f32::NAN);
        assert_eq!(d, ActuatorDemand::stopped());
        assert!(limited);
    }
}
