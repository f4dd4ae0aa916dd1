//! Conversion between physical units and actuator native units.
//!
//! `convert` is the single primitive: it rescales a value expressed in
//! `from` units per cycle into `to` units per cycle. Degrees use 360 per
//! revolution, RPM uses 600 per "revolution per 100 ms", encoders use their
//! ticks-per-revolution.

use thiserror::Error;

/// Degrees in one revolution.
pub const DEG_PER_REV: f64 = 360.0;
/// RPM equivalent of one revolution per 100 ms sampling period.
pub const RPM_PER_REV_PER_100MS: f64 = 600.0;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UnitError {
    #[error("division by zero: source units per cycle must be non-zero")]
    DivisionByZero,
    #[error("non-finite conversion factor")]
    NonFinite,
}

/// `value * to_units_per_cycle / from_units_per_cycle`.
#[inline]
pub fn convert(
    value: f64,
    from_units_per_cycle: f64,
    to_units_per_cycle: f64,
) -> Result<f64, UnitError> {
    if from_units_per_cycle == 0.0 {
        return Err(UnitError::DivisionByZero);
    }
    Ok(value * to_units_per_cycle / from_units_per_cycle)
}

/// Validated degree/tick scale for a geared position axis.
///
/// `gear_ratio` is turret revolutions per motor revolution, so one turret
/// degree is `ticks_per_rev / 360 / gear_ratio` encoder ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearedScale {
    ticks_per_turret_deg: f64,
}

impl GearedScale {
    /// Fails for zero or non-finite gearing; checked once at build time so the
    /// per-tick conversions below are total.
    pub fn new(ticks_per_revolution: f64, gear_ratio: f64) -> Result<Self, UnitError> {
        let ticks_per_motor_deg = convert(1.0, DEG_PER_REV, ticks_per_revolution)?;
        let ticks_per_turret_deg = convert(ticks_per_motor_deg, gear_ratio, 1.0)?;
        if !ticks_per_turret_deg.is_finite() || ticks_per_turret_deg == 0.0 {
            return Err(UnitError::NonFinite);
        }
        Ok(Self {
            ticks_per_turret_deg,
        })
    }

    #[inline]
    pub fn deg_to_ticks(&self, turret_deg: f64) -> f64 {
        turret_deg * self.ticks_per_turret_deg
    }

    #[inline]
    pub fn ticks_to_deg(&self, ticks: f64) -> f64 {
        ticks / self.ticks_per_turret_deg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_rescales() {
        assert_eq!(convert(90.0, 360.0, 4096.0).unwrap(), 1024.0);
        assert_eq!(convert(600.0, 600.0, 2048.0).unwrap(), 2048.0);
    }

    #[test]
    fn convert_rejects_zero_base() {
        assert_eq!(convert(1.0, 0.0, 10.0), Err(UnitError::DivisionByZero));
    }

    #[test]
    fn geared_scale_matches_motor_then_gear_path() {
        // 4096 ticks/rev, turret turns 1/10 of the motor
        let s = GearedScale::new(4096.0, 0.1).unwrap();
        let expected = convert(30.0, 360.0, 4096.0).unwrap() / 0.1;
        assert!((s.deg_to_ticks(30.0) - expected).abs() < 1e-9);
        assert!((s.ticks_to_deg(expected) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn geared_scale_rejects_zero_gear_ratio() {
        assert_eq!(GearedScale::new(4096.0, 0.0), Err(UnitError::DivisionByZero));
        assert_eq!(GearedScale::new(0.0, 1.0), Err(UnitError::NonFinite));
        assert_eq!(GearedScale::new(4096.0, f64::NAN), Err(UnitError::NonFinite));
    }
}
