//! Software soft limits on commanded position.

use crate::fixed_point::quantize_ticks_i32;

/// Active clamp window in native units. Only exists when both bounds are set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftLimit {
    lower: f64,
    upper: f64,
}

impl SoftLimit {
    /// Both bounds are required; a partially configured pair yields `None`
    /// (no clamping). Reversed bounds are reordered.
    pub fn from_bounds(lower: Option<f64>, upper: Option<f64>) -> Option<Self> {
        let (a, b) = (lower?, upper?);
        if !(a.is_finite() && b.is_finite()) {
            return None;
        }
        Some(Self {
            lower: a.min(b),
            upper: a.max(b),
        })
    }

    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    #[inline]
    pub fn contains(&self, target: f64) -> bool {
        (self.lower..=self.upper).contains(&target)
    }

    /// Innermost whole ticks of the window as `(lower, upper)`: the lower
    /// bound rounds up, the upper bound rounds down. A window narrower than
    /// one tick collapses onto its midpoint.
    pub fn tick_bounds(&self) -> (i32, i32) {
        let lo = quantize_ticks_i32(self.lower.ceil());
        let hi = quantize_ticks_i32(self.upper.floor());
        if lo <= hi {
            (lo, hi)
        } else {
            let mid = quantize_ticks_i32((self.lower + self.upper) / 2.0);
            (mid, mid)
        }
    }
}

/// Whole-tick command for `target` that never leaves `limit`.
#[inline]
pub fn quantize_inside(target: f64, limit: Option<&SoftLimit>) -> i32 {
    let ticks = quantize_ticks_i32(target);
    match limit {
        Some(l) => {
            let (lo, hi) = l.tick_bounds();
            ticks.clamp(lo, hi)
        }
        None => ticks,
    }
}

/// Clamp `target` into `limit`; identity when the limit is disabled.
#[inline]
pub fn clamp(target: f64, limit: Option<&SoftLimit>) -> f64 {
    match limit {
        Some(l) => target.min(l.upper).max(l.lower),
        None => target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_configuration_disables() {
        assert!(SoftLimit::from_bounds(Some(-10.0), None).is_none());
        assert!(SoftLimit::from_bounds(None, Some(10.0)).is_none());
        assert_eq!(clamp(1e9, None), 1e9);
    }

    #[test]
    fn clamps_both_sides() {
        let l = SoftLimit::from_bounds(Some(-3000.0), Some(3000.0)).unwrap();
        assert_eq!(clamp(5000.0, Some(&l)), 3000.0);
        assert_eq!(clamp(-5000.0, Some(&l)), -3000.0);
        assert_eq!(clamp(12.5, Some(&l)), 12.5);
    }

    #[test]
    fn fractional_bounds_quantize_inward() {
        let l = SoftLimit::from_bounds(Some(-227.56), Some(2503.11)).unwrap();
        assert_eq!(l.tick_bounds(), (-227, 2503));
        assert_eq!(quantize_inside(-227.56, Some(&l)), -227);
        assert_eq!(quantize_inside(2503.11, Some(&l)), 2503);
        assert_eq!(quantize_inside(10.6, Some(&l)), 11);
        assert_eq!(quantize_inside(-227.56, None), -228);
    }

    #[test]
    fn sub_tick_window_collapses_to_midpoint() {
        let l = SoftLimit::from_bounds(Some(0.2), Some(0.8)).unwrap();
        assert_eq!(l.tick_bounds(), (1, 1));
    }
}
