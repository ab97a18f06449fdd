//! # Communications interface crate.
//!
//! Provides the wire-level types shared by the drive executable, its command sources and any
//! telemetry consumer.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Equipment identifiers (the four driven wheels)
pub mod eqpt;

/// Motion commands received over the radio link
pub mod tc;

/// Telemetry packets published by the drive executable
pub mod tm;
