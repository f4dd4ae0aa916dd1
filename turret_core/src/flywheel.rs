//! Flywheel velocity control and the at-speed test.

use std::f64::consts::PI;

use eyre::WrapErr;
use turret_traits::VelocityActuator;

use crate::config::FlywheelCfg;
use crate::error::{BuildError, Result};
use crate::hw_error::hw_report;
use crate::units::{RPM_PER_REV_PER_100MS, convert};

const INCHES_PER_FOOT: f64 = 12.0;
/// Native velocity is counted per 100 ms.
const PERIODS_PER_SECOND: f64 = 10.0;

/// `setpoint <= measured <= setpoint + deadband`.
#[inline]
pub fn at_speed(setpoint: f64, measured: f64, deadband: f64) -> bool {
    measured >= setpoint && measured <= setpoint + deadband
}

/// Snapshot of the flywheel loop in native units per 100 ms.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlywheelState {
    /// `None` while stopped.
    pub setpoint_native: Option<f64>,
    pub measured_native: f64,
    pub deadband_native: f64,
    pub at_speed: bool,
}

pub struct FlywheelController<V: VelocityActuator> {
    actuator: V,
    ticks_per_revolution: f64,
    gear_ratio: f64,
    radius_in: f64,
    state: FlywheelState,
}

impl<V: VelocityActuator> core::fmt::Debug for FlywheelController<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlywheelController")
            .field("state", &self.state)
            .finish()
    }
}

impl<V: VelocityActuator> FlywheelController<V> {
    pub fn new(actuator: V, cfg: &FlywheelCfg) -> Result<Self> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(cfg.ticks_per_revolution) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "flywheel ticks_per_revolution must be > 0",
            )));
        }
        if !positive(cfg.gear_ratio) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "flywheel gear_ratio must be > 0",
            )));
        }
        if !positive(cfg.radius_in) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "flywheel radius_in must be > 0",
            )));
        }
        if !(cfg.deadband_native.is_finite() && cfg.deadband_native >= 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "flywheel deadband must be >= 0",
            )));
        }
        Ok(Self {
            actuator,
            ticks_per_revolution: cfg.ticks_per_revolution,
            gear_ratio: cfg.gear_ratio,
            radius_in: cfg.radius_in,
            state: FlywheelState {
                deadband_native: cfg.deadband_native,
                ..FlywheelState::default()
            },
        })
    }

    /// Flywheel RPM to motor native units per 100 ms.
    pub fn rpm_to_native(&self, rpm: f64) -> f64 {
        // Base is the RPM constant (600), validated non-zero.
        convert(rpm, RPM_PER_REV_PER_100MS, self.ticks_per_revolution).unwrap_or(0.0)
            * self.gear_ratio
    }

    pub fn native_to_rpm(&self, native: f64) -> f64 {
        convert(native / self.gear_ratio, self.ticks_per_revolution, RPM_PER_REV_PER_100MS)
            .unwrap_or(0.0)
    }

    /// Native setpoint for a ballistic exit velocity in feet per second:
    /// `fps * 12 * ticks_per_rev / (2π * radius_in * 10)`.
    pub fn ballistic_native(&self, velocity_fps: f64) -> f64 {
        velocity_fps * INCHES_PER_FOOT * self.ticks_per_revolution
            / (2.0 * PI * self.radius_in * PERIODS_PER_SECOND)
    }

    pub fn set_target_rpm(&mut self, rpm: f64) -> Result<()> {
        let native = self.rpm_to_native(rpm);
        self.set_target_native(native)
    }

    pub fn set_target_native(&mut self, native: f64) -> Result<()> {
        if !native.is_finite() {
            tracing::warn!(native, "non-finite flywheel setpoint; stopping");
            return self.stop();
        }
        self.actuator
            .set_velocity_target(native)
            .map_err(hw_report)
            .wrap_err("flywheel set_velocity_target")?;
        if self.state.setpoint_native.is_none() {
            tracing::info!(setpoint = native, "flywheel spinning up");
        }
        self.state.setpoint_native = Some(native);
        Ok(())
    }

    /// Command zero velocity. At-speed drops immediately.
    pub fn stop(&mut self) -> Result<()> {
        let was_running = self.state.setpoint_native.take().is_some();
        self.state.at_speed = false;
        self.actuator
            .set_velocity_target(0.0)
            .map_err(hw_report)
            .wrap_err("flywheel stop")?;
        if was_running {
            tracing::info!("flywheel stopped");
        }
        Ok(())
    }

    /// Read the measured velocity and recompute at-speed. Call after the
    /// setpoint for this tick has been issued. A stopped wheel is never at
    /// speed; a commanded setpoint of zero uses the same window as any other.
    pub fn update(&mut self) -> Result<bool> {
        let measured = self
            .actuator
            .measured_velocity()
            .map_err(hw_report)
            .wrap_err("flywheel measured_velocity")?;
        self.state.measured_native = measured;
        self.state.at_speed = match self.state.setpoint_native {
            Some(sp) => at_speed(sp, measured, self.state.deadband_native),
            None => false,
        };
        Ok(self.state.at_speed)
    }

    pub fn is_at_speed(&self) -> bool {
        self.state.at_speed
    }

    pub fn state(&self) -> FlywheelState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Wheel {
        setpoint: f64,
        measured: f64,
    }

    impl VelocityActuator for Wheel {
        fn set_velocity_target(
            &mut self,
            native_per_100ms: f64,
        ) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.setpoint = native_per_100ms;
            Ok(())
        }
        fn measured_velocity(
            &mut self,
        ) -> std::result::Result<f64, Box<dyn std::error::Error + Send + Sync>> {
            Ok(self.measured)
        }
    }

    fn cfg() -> FlywheelCfg {
        FlywheelCfg {
            ticks_per_revolution: 2048.0,
            gear_ratio: 1.0,
            radius_in: 2.0,
            default_rpm: 4000.0,
            deadband_native: 100.0,
        }
    }

    #[test]
    fn rpm_conversion_uses_gearing() {
        let mut c = cfg();
        c.gear_ratio = 2.0;
        let fw = FlywheelController::new(Wheel::default(), &c).unwrap();
        // 600 rpm is one rev per 100 ms; two motor revs with 2:1 gearing.
        assert_eq!(fw.rpm_to_native(600.0), 4096.0);
        assert_eq!(fw.native_to_rpm(4096.0), 600.0);
    }

    #[test]
    fn stop_clears_at_speed_immediately() {
        let mut fw = FlywheelController::new(Wheel::default(), &cfg()).unwrap();
        fw.set_target_native(1000.0).unwrap();
        fw.actuator.measured = 1050.0;
        assert!(fw.update().unwrap());
        fw.stop().unwrap();
        assert!(!fw.is_at_speed());
        assert_eq!(fw.actuator.setpoint, 0.0);
        assert!(!fw.update().unwrap());
    }

    #[test]
    fn zero_setpoint_uses_the_same_window() {
        let mut fw = FlywheelController::new(Wheel::default(), &cfg()).unwrap();
        fw.set_target_native(0.0).unwrap();
        fw.actuator.measured = 50.0;
        assert!(fw.update().unwrap());
        fw.actuator.measured = -1.0;
        assert!(!fw.update().unwrap());
    }

    #[test]
    fn rejects_zero_radius() {
        let mut c = cfg();
        c.radius_in = 0.0;
        assert!(FlywheelController::new(Wheel::default(), &c).is_err());
    }
}
