//! Floating-point comparison policy and angle helpers
//!
//! Clipping and projection accumulate rounding error, so the pipeline
//! never compares floats exactly. Comparisons go through a ULP-scaled
//! tolerance: the allowed difference grows with the exponent of the
//! smaller operand.

/// Default comparison precision in units-in-last-place.
pub const DEFAULT_ULPS: u32 = 9;

/// Exponent of the smaller magnitude, floored for subnormals and zero.
fn exponent(x: f32) -> i32 {
    if x < f32::MIN_POSITIVE {
        f32::MIN_EXP - 1
    } else {
        x.log2().floor() as i32
    }
}

/// Tolerance for values of this magnitude at the given ULP count.
fn tolerance(lhs: f32, rhs: f32, ulps: u32) -> f32 {
    let min = lhs.abs().min(rhs.abs());
    ulps as f32 * f32::EPSILON * 2.0_f32.powi(exponent(min))
}

/// Approximate equality at an explicit ULP precision.
pub fn almost_eq_ulps(lhs: f32, rhs: f32, ulps: u32) -> bool {
    (lhs - rhs).abs() <= tolerance(lhs, rhs, ulps)
}

/// Approximate equality at the default precision.
pub fn almost_eq(lhs: f32, rhs: f32) -> bool {
    almost_eq_ulps(lhs, rhs, DEFAULT_ULPS)
}

/// Approximate `lhs < rhs` at an explicit ULP precision.
pub fn almost_lt_ulps(lhs: f32, rhs: f32, ulps: u32) -> bool {
    lhs - rhs < -tolerance(lhs, rhs, ulps)
}

/// Approximate `lhs < rhs` at the default precision.
pub fn almost_lt(lhs: f32, rhs: f32) -> bool {
    almost_lt_ulps(lhs, rhs, DEFAULT_ULPS)
}

/// Convert degrees to radians.
pub fn radians(degrees: f32) -> f32 {
    std::f32::consts::PI * degrees / 180.0
}

/// Convert radians to degrees.
pub fn degrees(radians: f32) -> f32 {
    180.0 * radians / std::f32::consts::PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_almost_eq_accumulated_error() {
        let mut sum = 0.0_f32;
        for _ in 0..10 {
            sum += 0.1;
        }
        assert!(sum != 1.0); // exact comparison fails
        assert!(almost_eq(sum, 1.0));
    }

    #[test]
    fn test_almost_eq_scales_with_magnitude() {
        assert!(almost_eq(1_000_000.0, 1_000_000.06));
        assert!(!almost_eq(1.0, 1.06));
    }

    #[test]
    fn test_almost_eq_zero() {
        assert!(almost_eq(0.0, 0.0));
        assert!(!almost_eq(0.0, 0.1));
    }

    #[test]
    fn test_almost_lt() {
        assert!(almost_lt(1.0, 2.0));
        assert!(!almost_lt(2.0, 1.0));
        // equal within tolerance is not less-than
        assert!(!almost_lt(1.0, 1.0 + f32::EPSILON));
    }

    #[test]
    fn test_radians_degrees() {
        assert!(almost_eq(radians(180.0), std::f32::consts::PI));
        assert!(almost_eq(degrees(std::f32::consts::PI), 180.0));
    }
}
