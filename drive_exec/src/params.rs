//! # Drive Executable Parameters
//!
//! This module provides parameters for the drive executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::{
    duty_map::{self, CurveError, VelDutyCurve},
    eqpt::bench,
    pid_ctrl::PidParamsError,
    vel_est::{self, VelEstParamsError},
    wheel_ctrl::WheelParams,
};
use comms_if::eqpt::{WheelId, NUM_WHEELS};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveExecParams {
    /// Period of the heartbeat which triggers the wheel loops.
    ///
    /// Units: microseconds
    pub heartbeat_period_us: u64,

    /// Interval at which a waiting wheel loop checks its ready flag. Zero yields instead of
    /// sleeping.
    ///
    /// Units: microseconds
    pub flag_poll_us: u64,

    /// Period at which telemetry is snapshotted, logged and archived.
    ///
    /// Units: milliseconds
    pub tm_period_ms: u64,

    /// Wheel speed commanded by the driving commands.
    ///
    /// Units: RPM
    pub base_speed_rpm: f32,

    pub encoder: vel_est::Params,

    #[serde(default)]
    pub duty_map: duty_map::Params,

    #[serde(default)]
    pub bench: bench::Params,

    /// One entry per wheel.
    pub wheels: Vec<WheelParams>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors found when validating the parameters.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("The heartbeat period must be non-zero")]
    ZeroHeartbeatPeriod,

    #[error("The telemetry period must be non-zero")]
    ZeroTmPeriod,

    #[error("The base speed must be finite and non-negative, got {0}")]
    InvalidBaseSpeed(f32),

    #[error("Expected parameters for {} wheels, found {0}", NUM_WHEELS)]
    WrongNumWheels(usize),

    #[error("Wheel {0} is configured more than once")]
    DuplicateWheel(WheelId),

    #[error("Invalid encoder parameters: {0}")]
    Encoder(#[from] VelEstParamsError),

    #[error("Invalid duty curve: {0}")]
    Curve(#[from] CurveError),

    #[error("Invalid regulator parameters for wheel {0}: {1}")]
    Pid(WheelId, PidParamsError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DriveExecParams {
    /// Check the parameters are usable, building nothing.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.heartbeat_period_us == 0 {
            return Err(ParamsError::ZeroHeartbeatPeriod);
        }
        if self.tm_period_ms == 0 {
            return Err(ParamsError::ZeroTmPeriod);
        }
        if !self.base_speed_rpm.is_finite() || self.base_speed_rpm < 0.0 {
            return Err(ParamsError::InvalidBaseSpeed(self.base_speed_rpm));
        }

        self.encoder.validate()?;
        VelDutyCurve::from_params(&self.duty_map)?;

        if self.wheels.len() != NUM_WHEELS {
            return Err(ParamsError::WrongNumWheels(self.wheels.len()));
        }

        let mut seen = HashSet::new();
        for wheel in self.wheels.iter() {
            if !seen.insert(wheel.id) {
                return Err(ParamsError::DuplicateWheel(wheel.id));
            }
            wheel
                .pid
                .validate()
                .map_err(|e| ParamsError::Pid(wheel.id, e))?;
        }

        Ok(())
    }

    /// The parameters of one wheel.
    pub fn wheel(&self, id: WheelId) -> Option<&WheelParams> {
        self.wheels.iter().find(|w| w.id == id)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
