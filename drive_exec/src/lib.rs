//! # Drive library.
//!
//! Closed-loop wheel velocity control for a four-wheel skid-steer robot. This library allows the
//! drive executable, benchmarks and tests to access the items defined inside the drive crate.
//!
//! Data flows through the modules as:
//!
//! ```text
//! heartbeat -> ready flag -> wheel_ctrl -> vel_est -> pid_ctrl -> duty_map -> eqpt (actuator)
//!                                ^
//!              motion_cmd (targets, written by the command source)
//! ```

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Lock-free floating point cells shared between tasks
pub mod atomic;

/// Velocity to actuation duty mapping - piecewise linear calibration curve
pub mod duty_map;

/// Equipment interfaces - encoder counters and motor actuators, plus bench stand-ins
pub mod eqpt;

/// Heartbeat trigger - periodically arms every wheel's ready flag
pub mod heartbeat;

/// Motion command decoding - converts discrete commands into per-wheel targets
pub mod motion_cmd;

/// Executable parameters
pub mod params;

/// PID regulator with anti-windup
pub mod pid_ctrl;

/// Telemetry store - read-only snapshots of the wheel loops
pub mod tm_store;

/// Velocity estimation from quadrature encoder counters
pub mod vel_est;

/// Per-wheel control loop
pub mod wheel_ctrl;
