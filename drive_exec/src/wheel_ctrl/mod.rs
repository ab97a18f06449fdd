//! Wheel control module
//!
//! One closed velocity loop per wheel: sample the encoder, regulate towards the target, map the
//! regulator output onto a duty and drive the actuator.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;
mod task;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::*;
pub use state::*;
pub use task::*;

use crate::pid_ctrl::PidParamsError;
use comms_if::eqpt::WheelId;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors in building a wheel controller.
#[derive(Debug, thiserror::Error)]
pub enum WheelCtrlError {
    #[error("Invalid regulator parameters for wheel {0}: {1}")]
    InvalidPid(WheelId, PidParamsError),

    #[error("Could not spawn the task for wheel {0}: {1}")]
    SpawnFailed(WheelId, std::io::Error),
}
