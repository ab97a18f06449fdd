//! Bench equipment
//!
//! Stand-ins for the wheel hardware so the drive can run on a host. Each bench wheel is a
//! wrapping counter which advances in proportion to the duty applied to its actuator. This is a
//! loopback for exercising the control loops, not a model of the motor dynamics.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

// Internal
use super::{Actuator, ActuatorDemand, EncoderSource, EqptError, MAX_DUTY_PCT};
use crate::vel_est;
use util::time::MonotonicClock;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the bench wheels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
pub struct Params {
    /// Wheel speed reached at full duty.
    ///
    /// Units: RPM
    pub full_duty_rpm: f32,
}

/// State shared between a bench wheel's encoder and actuator.
#[derive(Debug)]
struct Motor {
    /// Unwrapped counter position.
    counts: f64,
    last_update_ms: u32,
    signed_duty_pct: f32,
    enabled: bool,
}

/// A bench wheel, from which the encoder and actuator halves are taken.
#[derive(Debug)]
pub struct BenchWheel {
    motor: Mutex<Motor>,
    clock: MonotonicClock,
    counts_per_ms_at_full_duty: f64,
    counter_modulus: i64,
}

/// Encoder half of a bench wheel.
#[derive(Debug)]
pub struct BenchEncoder {
    wheel: Arc<BenchWheel>,
}

/// Actuator half of a bench wheel.
#[derive(Debug)]
pub struct BenchActuator {
    wheel: Arc<BenchWheel>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            full_duty_rpm: 68.0,
        }
    }
}

impl BenchWheel {
    /// Create a bench wheel sharing `clock` with the rest of the bench, returning its encoder
    /// and actuator halves.
    pub fn pair(
        params: &Params,
        encoder: &vel_est::Params,
        clock: MonotonicClock,
    ) -> (BenchEncoder, BenchActuator) {
        let counts_per_ms_at_full_duty =
            params.full_duty_rpm as f64 * encoder.counts_per_rev as f64 / 60_000.0;

        let wheel = Arc::new(Self {
            motor: Mutex::new(Motor {
                counts: 0.0,
                last_update_ms: clock.now_ms(),
                signed_duty_pct: 0.0,
                enabled: false,
            }),
            clock,
            counts_per_ms_at_full_duty,
            counter_modulus: encoder.counter_auto_reload as i64 + 1,
        });

        (
            BenchEncoder {
                wheel: wheel.clone(),
            },
            BenchActuator { wheel },
        )
    }

    /// Advance the motor to the current time and apply `f` to it.
    fn with_motor<T, F>(&self, f: F) -> Result<T, EqptError>
    where
        F: FnOnce(&mut Motor) -> T,
    {
        let now_ms = self.clock.now_ms();
        let mut motor = self
            .motor
            .lock()
            .map_err(|_| EqptError::ReadFailed("bench motor state poisoned".into()))?;

        let dt_ms = now_ms.wrapping_sub(motor.last_update_ms) as f64;
        if motor.enabled {
            motor.counts += motor.signed_duty_pct as f64 / MAX_DUTY_PCT as f64
                * self.counts_per_ms_at_full_duty
                * dt_ms;
        }
        motor.last_update_ms = now_ms;

        Ok(f(&mut motor))
    }
}

impl EncoderSource for BenchEncoder {
    fn read_counter(&mut self) -> Result<u32, EqptError> {
        let modulus = self.wheel.counter_modulus;
        self.wheel
            .with_motor(|m| (m.counts.floor() as i64).rem_euclid(modulus) as u32)
    }

    fn now_ms(&self) -> u32 {
        self.wheel.clock.now_ms()
    }
}

impl Actuator for BenchActuator {
    fn set_enabled(&mut self, enabled: bool) -> Result<(), EqptError> {
        self.wheel
            .with_motor(|m| m.enabled = enabled)
            .map_err(|e| EqptError::WriteFailed(e.to_string()))
    }

    fn set_duty(&mut self, demand: ActuatorDemand) -> Result<(), EqptError> {
        self.wheel
            .with_motor(|m| m.signed_duty_pct = demand.signed_duty())
            .map_err(|e| EqptError::WriteFailed(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::eqpt::Direction;
    use std::{thread, time::Duration};

    fn wheel() -> (BenchEncoder, BenchActuator) {
        BenchWheel::pair(
            &Params::default(),
            &vel_est::Params::default(),
            MonotonicClock::new(),
        )
    }

    #[test]
    fn test_disabled_wheel_does_not_move() {
        let (mut enc, mut act) = wheel();
        act.set_duty(ActuatorDemand {
            duty_pct: 100.0,
            direction: Direction::Forward,
        })
        .unwrap();

        thread::sleep(Duration::from_millis(20));
        assert_eq!(enc.read_counter().unwrap(), 0);
    }

    #[test]
    fn test_counter_follows_duty() {
        let (mut enc, mut act) = wheel();
        act.set_enabled(true).unwrap();
        act.set_duty(ActuatorDemand {
            duty_pct: 100.0,
            direction: Direction::Reverse,
        })
        .unwrap();

        thread::sleep(Duration::from_millis(50));

        // Reverse from zero wraps below the auto-reload value
        let counter = enc.read_counter().unwrap();
        assert!(counter > 60000, "counter = {}", counter);
    }
}
