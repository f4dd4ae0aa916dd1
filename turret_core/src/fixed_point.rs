//! Quantization of floating-point native units to actuator integer ticks.
//!
//! Axis targets accumulate in `f64` so sub-tick rate drift is not lost; only
//! the value written to the actuator is rounded.

/// Round to the nearest tick and saturate to the `i32` range.
/// Non-finite values (NaN/±Inf) map to 0.
#[inline]
pub fn quantize_ticks_i32(x: f64) -> i32 {
    if !x.is_finite() {
        return 0;
    }
    let r = x.round();
    if r >= f64::from(i32::MAX) {
        i32::MAX
    } else if r <= f64::from(i32::MIN) {
        i32::MIN
    } else {
        r as i32
    }
}

#[cfg(test)]
mod tests {
    use super::quantize_ticks_i32;

    #[test]
    fn rounds_and_saturates() {
        assert_eq!(quantize_ticks_i32(2.5), 3);
        assert_eq!(quantize_ticks_i32(-2.5), -3);
        assert_eq!(quantize_ticks_i32(1e12), i32::MAX);
        assert_eq!(quantize_ticks_i32(-1e12), i32::MIN);
        assert_eq!(quantize_ticks_i32(f64::NAN), 0);
    }
}
