//! Operator-adjustable values re-read by the control loop every tick.

use std::collections::HashMap;
use std::sync::RwLock;

use turret_traits::Tuning;

pub const SHOOTER_VELOCITY_RPM: &str = "Shooter/Shooter Velocity RPM";
pub const FEEDER_OUTPUT_PERCENT: &str = "Shooter/Feeder Output Percent";
pub const AZIMUTH_TURN_RATE: &str = "Shooter/Azimuth Turn Rate";
pub const ELEVATION_TURN_RATE: &str = "Shooter/Elevation Turn Rate";
pub const TRANSFER_OUTPUT_PERCENT: &str = "Shooter/BallManagementSubsystem/Output Percent";

/// Every key the loop reads, in read order.
pub const KEYS: [&str; 5] = [
    SHOOTER_VELOCITY_RPM,
    FEEDER_OUTPUT_PERCENT,
    AZIMUTH_TURN_RATE,
    ELEVATION_TURN_RATE,
    TRANSFER_OUTPUT_PERCENT,
];

/// Store with nothing in it: every read yields the caller's default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultTuning;

impl Tuning for DefaultTuning {
    fn number(&self, _key: &str, default: f64) -> f64 {
        default
    }
}

/// In-memory store, writable from another thread while the loop reads it.
#[derive(Debug, Default)]
pub struct MapTuning {
    values: RwLock<HashMap<String, f64>>,
}

impl MapTuning {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: f64) {
        if let Ok(mut map) = self.values.write() {
            map.insert(key.into(), value);
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut map) = self.values.write() {
            map.remove(key);
        }
    }
}

impl Tuning for MapTuning {
    fn number(&self, key: &str, default: f64) -> f64 {
        // A poisoned lock or a NaN entry reads as absent.
        self.values
            .read()
            .ok()
            .and_then(|m| m.get(key).copied())
            .filter(|v| v.is_finite())
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_non_finite_fall_back() {
        let t = MapTuning::new();
        assert_eq!(t.number(SHOOTER_VELOCITY_RPM, 3000.0), 3000.0);
        t.set(SHOOTER_VELOCITY_RPM, f64::NAN);
        assert_eq!(t.number(SHOOTER_VELOCITY_RPM, 3000.0), 3000.0);
        t.set(SHOOTER_VELOCITY_RPM, 4200.0);
        assert_eq!(t.number(SHOOTER_VELOCITY_RPM, 3000.0), 4200.0);
        t.remove(SHOOTER_VELOCITY_RPM);
        assert_eq!(t.number(SHOOTER_VELOCITY_RPM, 3000.0), 3000.0);
    }

    #[test]
    fn default_tuning_is_transparent() {
        for key in KEYS {
            assert_eq!(DefaultTuning.number(key, 0.25), 0.25);
        }
    }
}
