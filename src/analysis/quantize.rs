//! Float ↔ fixed-point conversion for accelerometer axes.

/// Scale of zero would divide by zero; treat it as unity.
#[inline]
fn effective_scale(scale: i16) -> f32 {
    if scale == 0 {
        1.0
    } else {
        scale as f32
    }
}

/// `round(value * scale)`, saturated to the i16 range. NaN maps to 0.
#[inline]
pub fn quantize(value: f32, scale: i16) -> i16 {
    let scaled = (value * effective_scale(scale)).round();
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

#[inline]
pub fn dequantize(q: i16, scale: i16) -> f32 {
    q as f32 / effective_scale(scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn rounds_to_nearest() {
        assert_eq!(quantize(1.0, 1024), 1024);
        assert_eq!(quantize(9.81, 1024), 10045);
        assert_eq!(quantize(-0.0004, 1024), 0);
        assert_eq!(quantize(0.0006, 1024), 1);
    }

    #[test]
    fn saturates_at_i16_bounds() {
        assert_eq!(quantize(40.0, 1024), i16::MAX);
        assert_eq!(quantize(-40.0, 1024), i16::MIN);
        assert_eq!(quantize(f32::INFINITY, 1024), i16::MAX);
        assert_eq!(quantize(f32::NAN, 1024), 0);
    }

    #[test]
    fn zero_scale_is_unity() {
        assert_eq!(quantize(3.4, 0), 3);
        assert_abs_diff_eq!(dequantize(7, 0), 7.0);
    }

    proptest! {
        #[test]
        fn in_range_values_come_back_within_half_lsb(value in -31.0f32..31.0) {
            let q = quantize(value, 1024);
            prop_assert!((dequantize(q, 1024) - value).abs() <= 0.5 / 1024.0 + 1e-6);
        }
    }
}
