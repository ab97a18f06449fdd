//! # Motion command module
//!
//! The radio link delivers single-byte motion commands. Each byte is an ASCII digit whose value
//! selects one of a small set of manouvres. This module maps the whole byte domain onto
//! [`MotionCommand`], so that any byte has a defined meaning.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Offset between a radio command byte and its numeric code (the link sends ASCII digits).
pub const RADIO_CODE_OFFSET: u8 = b'0';

pub const CODE_IDLE: i32 = 0;
pub const CODE_FORWARD: i32 = 1;
pub const CODE_BACKWARD: i32 = 2;
pub const CODE_LEFT: i32 = 3;
pub const CODE_STOP: i32 = 5;
pub const CODE_RIGHT: i32 = 8;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A discrete motion command.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum MotionCommand {
    /// All wheels forwards at the baseline speed.
    Forward,

    /// All wheels backwards at the baseline speed.
    Backward,

    /// Turn on the spot to the left.
    Left,

    /// Turn on the spot to the right.
    Right,

    /// Bring all wheels to zero speed and disable the motor drivers.
    Stop,

    /// Zero all wheel targets without touching the motor drivers.
    Idle,

    /// Any code outside the known set. Treated as `Idle`.
    Unknown,
}

/// Possible errors when parsing a command from text.
#[derive(Debug, Error, PartialEq)]
pub enum CmdParseError {
    #[error("The command string is empty")]
    Empty,

    #[error("\"{0}\" is not a recognised motion command")]
    Unrecognised(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl MotionCommand {
    /// Get the command for a numeric code.
    ///
    /// This is total: codes outside the known set give `MotionCommand::Unknown`.
    pub fn from_code(code: i32) -> Self {
        match code {
            CODE_IDLE => MotionCommand::Idle,
            CODE_FORWARD => MotionCommand::Forward,
            CODE_BACKWARD => MotionCommand::Backward,
            CODE_LEFT => MotionCommand::Left,
            CODE_STOP => MotionCommand::Stop,
            CODE_RIGHT => MotionCommand::Right,
            _ => MotionCommand::Unknown,
        }
    }

    /// Get the command for a raw byte received over the radio link.
    pub fn from_radio_byte(byte: u8) -> Self {
        Self::from_code(byte as i32 - RADIO_CODE_OFFSET as i32)
    }

    /// The numeric code of this command, or `None` for `Unknown`.
    pub fn code(&self) -> Option<i32> {
        match self {
            MotionCommand::Idle => Some(CODE_IDLE),
            MotionCommand::Forward => Some(CODE_FORWARD),
            MotionCommand::Backward => Some(CODE_BACKWARD),
            MotionCommand::Left => Some(CODE_LEFT),
            MotionCommand::Stop => Some(CODE_STOP),
            MotionCommand::Right => Some(CODE_RIGHT),
            MotionCommand::Unknown => None,
        }
    }

    /// The motor driver enable state demanded by this command.
    ///
    /// Driving commands enable the drivers, `Stop` disables them, and `Idle`/`Unknown` leave them
    /// as they are (`None`).
    pub fn drive_enable(&self) -> Option<bool> {
        match self {
            MotionCommand::Forward
            | MotionCommand::Backward
            | MotionCommand::Left
            | MotionCommand::Right => Some(true),
            MotionCommand::Stop => Some(false),
            MotionCommand::Idle | MotionCommand::Unknown => None,
        }
    }
}

impl FromStr for MotionCommand {
    type Err = CmdParseError;

    /// Parse a command from either its name or its numeric code.
    ///
    /// Numeric codes are total (unknown numbers give `Unknown`), names are not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(CmdParseError::Empty);
        }

        if let Ok(code) = s.parse::<i32>() {
            return Ok(Self::from_code(code));
        }

        match s.to_lowercase().as_str() {
            "forward" | "fwd" | "f" => Ok(MotionCommand::Forward),
            "backward" | "back" | "b" => Ok(MotionCommand::Backward),
            "left" | "l" => Ok(MotionCommand::Left),
            "right" | "r" => Ok(MotionCommand::Right),
            "stop" | "s" => Ok(MotionCommand::Stop),
            "idle" | "i" => Ok(MotionCommand::Idle),
            _ => Err(CmdParseError::Unrecognised(s.to_string())),
        }
    }
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MotionCommand::Forward => "FORWARD",
            MotionCommand::Backward => "BACKWARD",
            MotionCommand::Left => "LEFT",
            MotionCommand::Right => "RIGHT",
            MotionCommand::Stop => "STOP",
            MotionCommand::Idle => "IDLE",
            MotionCommand::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
