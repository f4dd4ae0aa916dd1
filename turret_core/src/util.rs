//! Common time/period helpers for turret_core.

use std::time::Duration;

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Typical control period for the turret loop.
pub const DEFAULT_PERIOD_MS: u64 = 20;

/// Control period for `ms` milliseconds.
/// - Clamps `ms` to at least 1 so the loop never spins.
#[inline]
pub fn period_from_ms(ms: u64) -> Duration {
    Duration::from_millis(ms.max(1))
}

/// Loop rate in Hz for a given period. A zero period reports the 1 ms ceiling.
#[inline]
pub fn rate_hz(period: Duration) -> f64 {
    let secs = period.as_secs_f64();
    if secs > 0.0 {
        1.0 / secs
    } else {
        MILLIS_PER_SEC as f64
    }
}

/// `dt` in seconds as handed to `periodic`.
#[inline]
pub fn dt_seconds(period: Duration) -> f64 {
    period.as_secs_f64()
}
