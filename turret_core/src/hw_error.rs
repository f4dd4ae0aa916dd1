//! Maps `Box<dyn Error>` from trait boundaries to typed `TurretError`.
//!
//! The traits in `turret_traits` use `Box<dyn Error + Send + Sync>` so drivers
//! can report whatever they like; this module converts those to our typed
//! enum, with an optional feature-gated path for `turret_hardware::HwError`.

use crate::error::TurretError;

/// Map a trait-boundary error to a typed `TurretError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> TurretError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<turret_hardware::error::HwError>() {
            use turret_hardware::error::HwError;
            return match hw {
                HwError::Timeout => TurretError::Timeout,
                HwError::Io(io) => TurretError::Hardware(io.to_string()),
                other => TurretError::HardwareFault(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        TurretError::Timeout
    } else {
        TurretError::Hardware(s)
    }
}

/// Convert a boxed trait error into an `eyre::Report` carrying `TurretError`.
pub(crate) fn hw_report(e: Box<dyn std::error::Error + Send + Sync>) -> eyre::Report {
    eyre::Report::new(map_hw_error(&*e))
}
