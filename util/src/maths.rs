//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
///
/// The source range must not be degenerate (`source_range.0 != source_range.1`).
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float,
{
    target_range.0
        + ((value - source_range.0) * (target_range.1 - target_range.0)
            / (source_range.1 - source_range.0))
}

/// Clamp a value into `[min, max]`.
///
/// NaN values are passed through unchanged.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float,
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Clamp a value into `[-limit, limit]`, returning the clamped value and whether clamping
/// occured.
pub fn clamp_sym<T>(value: T, limit: T) -> (T, bool)
where
    T: Float,
{
    let ret = clamp(value, -limit, limit);
    (ret, ret != value)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0f64, 10f64), (0f64, 100f64), 5f64), 50f64);
        assert_eq!(lin_map((-2.5f32, 0f32), (-10f32, 0f32), -1.25f32), -5f32);
        assert_eq!(lin_map((1f64, 2f64), (10f64, 30f64), 1f64), 10f64);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5f32, 0f32, 100f32), 5f32);
        assert_eq!(clamp(-5f32, 0f32, 100f32), 0f32);
        assert_eq!(clamp(500f32, 0f32, 100f32), 100f32);
        assert!(clamp(f32::NAN, 0f32, 1f32).is_nan());
    }

    #[test]
    fn test_clamp_sym() {
        assert_eq!(clamp_sym(70f32, 68f32), (68f32, true));
        assert_eq!(clamp_sym(-70f32, 68f32), (-68f32, true));
        assert_eq!(clamp_sym(12f32, 68f32), (12f32, false));
        assert_eq!(clamp_sym(-68f32, 68f32), (-68f32, false));
    }
}
