//! Implementation of the PID regulator

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::num::NonZeroU16;

use util::maths::clamp_sym;

use super::{Params, PidParamsError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// PID regulator state, exclusively owned by one wheel's control loop.
#[derive(Debug, Clone)]
pub struct PidCtrl {
    p_gain: f32,
    i_gain: f32,
    d_gain: f32,

    integral_max: f32,
    output_max: f32,
    sample_rate: NonZeroU16,

    error_integral: f32,
    last_error: f32,
    output: f32,
    saturated: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidCtrl {
    /// Create a new regulator from validated parameters.
    pub fn new(params: &Params) -> Result<Self, PidParamsError> {
        params.validate()?;

        let sample_rate =
            NonZeroU16::new(params.sample_rate).ok_or(PidParamsError::ZeroSampleRate)?;

        Ok(Self {
            p_gain: params.p_gain,
            i_gain: params.i_gain,
            d_gain: params.d_gain,
            integral_max: params.integral_max,
            output_max: params.output_max,
            sample_rate,
            error_integral: 0.0,
            last_error: 0.0,
            output: 0.0,
            saturated: false,
        })
    }

    /// Run one regulator step on `error`, returning the clamped output.
    ///
    /// When the output saturates `error` is taken back out of the clamped integral, so the
    /// integral does not keep growing in the direction that caused the saturation. The result is
    /// clamped again so the integral limit always holds.
    pub fn update(&mut self, error: f32) -> f32 {
        let (integral, _) = clamp_sym(self.error_integral + error, self.integral_max);
        self.error_integral = integral;

        let rate = self.sample_rate.get() as f32;
        let raw_output = self.p_gain * error
            + self.i_gain * self.error_integral / rate
            + self.d_gain * (error - self.last_error) / rate;

        let (output, saturated) = clamp_sym(raw_output, self.output_max);
        if saturated {
            self.error_integral = clamp_sym(self.error_integral - error, self.integral_max).0;
        }

        self.last_error = error;
        self.output = output;
        self.saturated = saturated;

        output
    }

    /// Clear the integral and derivative history.
    pub fn reset(&mut self) {
        self.error_integral = 0.0;
        self.last_error = 0.0;
        self.output = 0.0;
        self.saturated = false;
    }

    /// Change the gains. The integral and derivative history is cleared.
    pub fn set_gains(&mut self, p_gain: f32, i_gain: f32, d_gain: f32) {
        self.p_gain = p_gain;
        self.i_gain = i_gain;
        self.d_gain = d_gain;
        self.reset();
    }

    /// Output of the latest update.
    pub fn output(&self) -> f32 {
        self.output
    }

    pub fn integral(&self) -> f32 {
        self.error_integral
    }

    pub fn last_error(&self) -> f32 {
        self.last_error
    }

    /// Whether the output was clamped in the latest update.
    pub fn is_saturated(&self) -> bool {
        self.saturated
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> Params {
        Params {
            p_gain: 1.0,
            i_gain: 10.0,
            d_gain: 0.5,
            integral_max: 500.0,
            output_max: 68.0,
            sample_rate: 100,
        }
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let mut p = params();
        p.sample_rate = 0;
        assert_eq!(PidCtrl::new(&p).err(), Some(PidParamsError::ZeroSampleRate));
    }

    #[test]
    fn test_formula() {
        let mut pid = PidCtrl::new(&params()).unwrap();

        // integral = 2, last = 0
        let out = pid.update(2.0);
        let expected = 1.0 * 2.0 + 10.0 * 2.0 / 100.0 + 0.5 * 2.0 / 100.0;
        assert!((out - expected).abs() < 1e-6);
        assert_eq!(pid.integral(), 2.0);
        assert_eq!(pid.last_error(), 2.0);

        // integral = 5, last = 2
        let out = pid.update(3.0);
        let expected = 1.0 * 3.0 + 10.0 * 5.0 / 100.0 + 0.5 * 1.0 / 100.0;
        assert!((out - expected).abs() < 1e-6);
        assert_eq!(pid.output(), out);
    }

    #[test]
    fn test_bounds_hold_under_constant_error() {
        for &error in [10.0f32, 1000.0, -1000.0, 5000.0, -7.5].iter() {
            let mut pid = PidCtrl::new(&params()).unwrap();
            for _ in 0..10_000 {
                let out = pid.update(error);
                assert!(out.abs() <= 68.0);
                assert!(pid.integral().abs() <= 500.0);
            }
        }
    }

    #[test]
    fn test_anti_windup_stops_integration() {
        let mut pid = PidCtrl::new(&params()).unwrap();

        // Proportional term alone saturates, so the integral never grows
        for _ in 0..100 {
            pid.update(100.0);
            assert!(pid.is_saturated());
        }
        assert_eq!(pid.integral(), 0.0);
    }

    #[test]
    fn test_zero_error_output() {
        let mut pid = PidCtrl::new(&Params {
            d_gain: 0.0,
            ..params()
        })
        .unwrap();

        for _ in 0..5 {
            pid.update(3.0);
        }
        let integral = pid.integral();
        assert!(integral != 0.0);

        let out = pid.update(0.0);
        assert_eq!(out, 10.0 * integral / 100.0);
        assert_eq!(pid.integral(), integral);
    }

    #[test]
    fn test_back_off_from_clamped_integral() {
        let mut pid = PidCtrl::new(&Params {
            d_gain: 0.0,
            ..params()
        })
        .unwrap();

        // Drive the integral up to its limit without saturating the output
        for _ in 0..50 {
            pid.update(10.0);
            assert!(!pid.is_saturated());
        }
        assert_eq!(pid.integral(), 500.0);

        // Both clamps engage: the integral is clamped to 500 then backed off by the error
        let out = pid.update(100.0);
        assert_eq!(out, 68.0);
        assert!(pid.is_saturated());
        assert_eq!(pid.integral(), 500.0 - 100.0);

        let out = pid.update(0.0);
        assert!(!pid.is_saturated());
        assert_eq!(out, 10.0 * pid.integral() / 100.0);
        assert_eq!(out, 40.0);
    }

    #[test]
    fn test_reset_and_set_gains() {
        let mut pid = PidCtrl::new(&params()).unwrap();
        pid.update(4.0);
        pid.reset();
        assert_eq!(pid.integral(), 0.0);
        assert_eq!(pid.last_error(), 0.0);
        assert_eq!(pid.output(), 0.0);

        pid.update(4.0);
        pid.set_gains(2.0, 0.0, 0.0);
        assert_eq!(pid.integral(), 0.0);
        assert_eq!(pid.last_error(), 0.0);
        assert_eq!(pid.update(4.0), 8.0);
    }
}
