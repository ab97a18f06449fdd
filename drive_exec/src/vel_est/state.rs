//! Implementation of the per-wheel encoder state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use super::{Params, MS_PER_S};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single reading of the encoder counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncoderSample {
    /// Raw counter value.
    pub counter: u32,

    /// Time of the reading on a wrapping millisecond clock.
    pub time_ms: u32,
}

/// Velocity and position estimate for one wheel.
///
/// The estimate is exclusively owned by the wheel's control loop.
#[derive(Debug, Clone)]
pub struct EncoderState {
    /// Accumulated position.
    ///
    /// Units: RPM * seconds
    position: f64,

    /// Latest velocity estimate.
    ///
    /// Units: RPM
    velocity_rpm: f32,

    last_counter: u32,
    last_time_ms: u32,

    /// True until the first sample with a non-zero interval has been taken.
    first_sample: bool,

    rpm_scale: f32,
    auto_reload: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl EncoderState {
    pub fn new(params: &Params) -> Self {
        Self {
            position: 0.0,
            velocity_rpm: 0.0,
            last_counter: 0,
            last_time_ms: 0,
            first_sample: true,
            rpm_scale: params.rpm_scale(),
            auto_reload: params.counter_auto_reload,
        }
    }

    /// Update the estimate with a new counter reading, returning the velocity and position.
    ///
    /// If no time has passed since the previous sample the velocity is reported as zero and the
    /// state is left untouched, so the next sample measures against the same baseline. The first
    /// sample only establishes the baseline.
    pub fn sample(&mut self, sample: EncoderSample) -> (f32, f64) {
        let dt_s = sample.time_ms.wrapping_sub(self.last_time_ms) as f32 / MS_PER_S;

        if dt_s == 0.0 {
            self.velocity_rpm = 0.0;
            return (self.velocity_rpm, self.position);
        }

        let integration_dt_s = if self.first_sample {
            self.first_sample = false;
            self.velocity_rpm = 0.0;
            0.0
        } else {
            let delta = unwrap_delta(sample.counter, self.last_counter, self.auto_reload);
            self.velocity_rpm = self.rpm_scale * delta as f32 / dt_s;
            dt_s
        };

        self.position += self.velocity_rpm as f64 * integration_dt_s as f64;
        self.last_counter = sample.counter;
        self.last_time_ms = sample.time_ms;

        (self.velocity_rpm, self.position)
    }

    /// Zero the estimate and forget the counter baseline.
    ///
    /// The last sample time is kept, the next sample re-establishes the counter baseline.
    pub fn reset(&mut self) {
        self.position = 0.0;
        self.velocity_rpm = 0.0;
        self.last_counter = 0;
        self.first_sample = true;
    }

    pub fn velocity_rpm(&self) -> f32 {
        self.velocity_rpm
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_first_sample(&self) -> bool {
        self.first_sample
    }
}

/// Signed counter movement between two readings of a counter wrapping over `span`.
///
/// Assumes the true movement between samples is less than half the span in magnitude. Faster
/// movement aliases to the wrong direction.
pub fn unwrap_delta(raw: u32, last: u32, span: u32) -> i64 {
    let raw = raw as i64;
    let last = last as i64;
    let span = span as i64;
    let half_span = span / 2;

    if raw == last {
        0
    } else if raw > last {
        if raw - last > half_span {
            raw - last - span
        } else {
            raw - last
        }
    } else if last - raw < half_span {
        raw - last
    } else {
        raw - last + span
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const SPAN: u32 = 65535;

    fn params() -> Params {
        Params {
            counts_per_rev: 1320.0,
            counter_auto_reload: SPAN,
        }
    }

    fn sample(counter: u32, time_ms: u32) -> EncoderSample {
        EncoderSample { counter, time_ms }
    }

    /// Estimator which has already taken its baseline sample.
    fn primed(counter: u32, time_ms: u32) -> EncoderState {
        let mut e = EncoderState::new(&params());
        e.sample(sample(counter, time_ms));
        e
    }

    #[test]
    fn test_first_sample_is_baseline() {
        let mut e = EncoderState::new(&params());
        assert!(e.is_first_sample());

        let (v, p) = e.sample(sample(1234, 10));
        assert_eq!(v, 0.0);
        assert_eq!(p, 0.0);
        assert!(!e.is_first_sample());
    }

    #[test]
    fn test_velocity_no_wrap() {
        let mut e = primed(1000, 10);

        // 132 counts in 100 ms = 1320 counts/s = 60 RPM
        let (v, p) = e.sample(sample(1132, 110));
        assert!((v - 60.0).abs() < 1e-3);
        assert!((p - 6.0).abs() < 1e-3);

        let (v, _) = e.sample(sample(1000, 210));
        assert!((v + 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_forward_wrap() {
        let mut wrapped = primed(65530, 10);
        let mut plain = primed(100, 10);

        let (v_wrapped, _) = wrapped.sample(sample(4, 11));
        let (v_plain, _) = plain.sample(sample(109, 11));

        assert!(v_wrapped > 0.0);
        assert!((v_wrapped - v_plain).abs() < 1e-3);
        assert_eq!(unwrap_delta(4, 65530, SPAN), 9);
    }

    #[test]
    fn test_reverse_wrap() {
        assert_eq!(unwrap_delta(65530, 4, SPAN), -9);

        let mut e = primed(4, 10);
        let (v, _) = e.sample(sample(65530, 11));
        assert!(v < 0.0);
    }

    #[test]
    fn test_unchanged_counter() {
        let mut e = primed(500, 10);
        let (v, _) = e.sample(sample(500, 20));
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_zero_interval() {
        let mut e = primed(1000, 10);
        e.sample(sample(1132, 110));
        let p_before = e.position();

        // Same timestamp: zero velocity and no change of baseline
        let (v, p) = e.sample(sample(2000, 110));
        assert_eq!(v, 0.0);
        assert_eq!(p, p_before);

        // The next sample is measured from the retained baseline (1132 @ 110 ms)
        let (v, _) = e.sample(sample(1264, 210));
        assert!((v - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_clock_wrap() {
        let mut e = primed(1000, u32::MAX - 49);
        let (v, _) = e.sample(sample(1132, 50));
        assert!((v - 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_aliasing_beyond_half_span() {
        // True forward movement of more than half the span reads as reverse
        assert!(unwrap_delta(40000, 0, SPAN) < 0);
        assert!(unwrap_delta(0, 40000, SPAN) > 0);
    }

    #[test]
    fn test_reset() {
        let mut e = primed(1000, 10);
        e.sample(sample(1132, 110));
        e.reset();

        assert_eq!(e.velocity_rpm(), 0.0);
        assert_eq!(e.position(), 0.0);
        assert!(e.is_first_sample());

        // First sample after reset is a baseline again
        let (v, p) = e.sample(sample(40000, 210));
        assert_eq!(v, 0.0);
        assert_eq!(p, 0.0);
    }
}
