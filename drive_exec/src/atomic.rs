//! # Atomic floats
//!
//! The standard library has no atomic float types, so these store the IEEE-754 bit pattern in
//! an atomic integer. Each load or store is atomic on its own; there is no atomicity across
//! several cells.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Atomic wrapper for `f32`.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

/// Atomic wrapper for `f64`.
#[derive(Debug)]
pub struct AtomicF64(AtomicU64);

impl AtomicF32 {
    pub fn new(val: f32) -> Self {
        Self(AtomicU32::new(val.to_bits()))
    }

    pub fn load(&self, order: Ordering) -> f32 {
        f32::from_bits(self.0.load(order))
    }

    pub fn store(&self, val: f32, order: Ordering) {
        self.0.store(val.to_bits(), order);
    }
}

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl AtomicF64 {
    pub fn new(val: f64) -> Self {
        Self(AtomicU64::new(val.to_bits()))
    }

    pub fn load(&self, order: Ordering) -> f64 {
        f64::from_bits(self.0.load(order))
    }

    pub fn store(&self, val: f64, order: Ordering) {
        self.0.store(val.to_bits(), order);
    }
}

impl Default for AtomicF64 {
    fn default() -> Self {
        Self::new(0.0)
    }
}
