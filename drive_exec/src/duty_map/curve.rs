//! Velocity to duty calibration curve

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths::lin_map;

use super::{CurveError, Params, REFERENCE_CURVE};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A validated piecewise linear curve, immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct VelDutyCurve {
    points: Vec<(f32, f32)>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VelDutyCurve {
    /// Build a curve from `(velocity, duty)` breakpoints.
    pub fn new(points: Vec<(f32, f32)>) -> Result<Self, CurveError> {
        if points.len() < 2 {
            return Err(CurveError::TooFewPoints(points.len()));
        }

        for (i, (v, d)) in points.iter().enumerate() {
            if !v.is_finite() || !d.is_finite() {
                return Err(CurveError::NonFinitePoint(i));
            }
        }

        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].0 <= pair[0].0 {
                return Err(CurveError::NotIncreasing(i + 1));
            }
        }

        Ok(Self { points })
    }

    pub fn from_params(params: &Params) -> Result<Self, CurveError> {
        Self::new(params.points.clone())
    }

    /// The reference motor calibration.
    pub fn reference() -> Self {
        Self {
            points: REFERENCE_CURVE.to_vec(),
        }
    }

    /// Map a velocity onto a duty.
    ///
    /// Velocities on a shared breakpoint use the first bracket containing them. Velocities
    /// outside the curve saturate at the end duties, and NaN maps to zero duty.
    pub fn map(&self, velocity: f32) -> f32 {
        for pair in self.points.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if velocity >= lo.0 && velocity <= hi.0 {
                return lin_map((lo.0, hi.0), (lo.1, hi.1), velocity);
            }
        }

        // Points are validated non-empty
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];

        if velocity < first.0 {
            first.1
        } else if velocity > last.0 {
            last.1
        } else {
            0.0
        }
    }

    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }
}

impl Default for VelDutyCurve {
    fn default() -> Self {
        Self::reference()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_reference_points() {
        let c = VelDutyCurve::reference();
        assert_eq!(c.map(0.0), 0.0);
        assert_eq!(c.map(-68.0), -100.0);
        assert_eq!(c.map(68.0), 100.0);
        assert!((c.map(9.5) - 20.0).abs() < 1e-4);
        assert!((c.map(-1.25) + 5.0).abs() < 1e-5);
        assert!((c.map(56.0) - 85.0).abs() < 1e-4);
    }

    #[test]
    fn test_saturation() {
        let c = VelDutyCurve::reference();
        assert_eq!(c.map(100000.0), 100.0);
        assert_eq!(c.map(-100000.0), -100.0);
        assert_eq!(c.map(f32::INFINITY), 100.0);
        assert_eq!(c.map(f32::NEG_INFINITY), -100.0);
    }

    #[test]
    fn test_nan_is_zero() {
        assert_eq!(VelDutyCurve::reference().map(f32::NAN), 0.0);
    }

    #[test]
    fn test_monotonic() {
        let c = VelDutyCurve::reference();
        let mut last = c.map(-80.0);
        let mut v = -80.0f32;
        while v <= 80.0 {
            let d = c.map(v);
            assert!(d >= last - 1e-4, "map({}) = {} < {}", v, d, last);
            last = d;
            v += 0.05;
        }
    }

    #[test]
    fn test_reference_matches_default_params() {
        assert_eq!(
            VelDutyCurve::from_params(&Params::default()).unwrap(),
            VelDutyCurve::reference()
        );
    }

    #[test]
    fn test_invalid_curves() {
        assert_eq!(
            VelDutyCurve::new(vec![(0.0, 0.0)]),
            Err(CurveError::TooFewPoints(1))
        );
        assert_eq!(
            VelDutyCurve::new(vec![(0.0, 0.0), (1.0, 5.0), (1.0, 6.0)]),
            Err(CurveError::NotIncreasing(2))
        );
        assert_eq!(
            VelDutyCurve::new(vec![(0.0, 0.0), (f32::NAN, 5.0)]),
            Err(CurveError::NonFinitePoint(1))
        );
    }
}
