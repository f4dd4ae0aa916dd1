//! Position controller for one geared turret axis.
//!
//! Azimuth and elevation are two instances of the same type, distinguished
//! only by their `GearedAxisConfig` and name. The controller owns the
//! commanded target; the actuator closes the position loop on its own.

use eyre::WrapErr;
use turret_traits::PositionActuator;

use crate::config::GearedAxisConfig;
use crate::error::{BuildError, Result};
use crate::hw_error::hw_report;
use crate::soft_limit::{SoftLimit, clamp, quantize_inside};
use crate::units::GearedScale;

pub struct AxisController<A: PositionActuator> {
    name: &'static str,
    actuator: A,
    scale: GearedScale,
    soft_limit: Option<SoftLimit>,
    turn_rate_deg_per_s: f64,
    // Commanded target in native units; fractional so slow drift integrates.
    target_position: f64,
    // Native units per second added to the target on each tick.
    velocity_increment: f64,
    clamped: bool,
    // An absolute move since the last tick was clamped.
    pending_clamp: bool,
    last_commanded: Option<i32>,
    last_measured_deg: f64,
}

impl<A: PositionActuator> core::fmt::Debug for AxisController<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AxisController")
            .field("name", &self.name)
            .field("target_position", &self.target_position)
            .field("velocity_increment", &self.velocity_increment)
            .field("soft_limit", &self.soft_limit)
            .finish()
    }
}

impl<A: PositionActuator> AxisController<A> {
    /// Bind an actuator and validate the axis geometry.
    ///
    /// The initial target is the actuator's current position (clamped), so
    /// binding never produces a jump. When a soft limit is configured it is
    /// also forwarded to the actuator's own limit registers.
    pub fn new(name: &'static str, mut actuator: A, cfg: &GearedAxisConfig) -> Result<Self> {
        let scale = GearedScale::new(cfg.ticks_per_revolution, cfg.gear_ratio)
            .map_err(BuildError::from)
            .wrap_err_with(|| format!("{name} gearing"))?;
        if !cfg.default_turn_rate_deg_per_s.is_finite() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "axis turn rate must be finite",
            )));
        }
        let soft_limit = cfg.soft_limit_deg.and_then(|(lo, hi)| {
            SoftLimit::from_bounds(Some(scale.deg_to_ticks(lo)), Some(scale.deg_to_ticks(hi)))
        });

        if let Some(l) = &soft_limit {
            let (reverse, forward) = l.tick_bounds();
            actuator
                .configure_soft_limits(forward, reverse)
                .map_err(hw_report)
                .wrap_err_with(|| format!("{name} soft-limit setup"))?;
        }
        let measured = actuator
            .measured_position()
            .map_err(hw_report)
            .wrap_err_with(|| format!("{name} initial position"))?;
        let target_position = clamp(f64::from(measured), soft_limit.as_ref());
        let started_outside = target_position != f64::from(measured);
        if started_outside {
            tracing::warn!(
                axis = name,
                measured_ticks = measured,
                target_ticks = target_position,
                "axis starts outside its soft limit"
            );
        }

        tracing::info!(
            axis = name,
            lower_ticks = soft_limit.map(|l| l.lower()),
            upper_ticks = soft_limit.map(|l| l.upper()),
            initial_ticks = target_position,
            "axis bound"
        );

        Ok(Self {
            name,
            actuator,
            scale,
            soft_limit,
            turn_rate_deg_per_s: cfg.default_turn_rate_deg_per_s,
            target_position,
            velocity_increment: 0.0,
            clamped: false,
            pending_clamp: started_outside,
            last_commanded: None,
            last_measured_deg: scale.ticks_to_deg(f64::from(measured)),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Full-stick slew rate used by `set_rate`; refreshed from live tuning.
    pub fn set_turn_rate(&mut self, deg_per_s: f64) {
        if deg_per_s.is_finite() {
            self.turn_rate_deg_per_s = deg_per_s.abs();
        }
    }

    pub fn turn_rate_deg_per_s(&self) -> f64 {
        self.turn_rate_deg_per_s
    }

    /// Manual slewing: `fraction` of the full turn rate, clamped to `[-1, 1]`.
    pub fn set_rate(&mut self, fraction: f64) {
        let fraction = if fraction.is_finite() {
            fraction.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        self.velocity_increment = self.scale.deg_to_ticks(self.turn_rate_deg_per_s) * fraction;
    }

    /// Drive to an absolute turret angle. Cancels any rate-driven drift.
    pub fn set_absolute_target(&mut self, angle_deg: f64) {
        if !angle_deg.is_finite() {
            tracing::warn!(axis = self.name, angle_deg, "ignoring non-finite target");
            return;
        }
        self.velocity_increment = 0.0;
        let hit = self.apply_target(self.scale.deg_to_ticks(angle_deg));
        self.pending_clamp |= hit;
    }

    /// Integrate drift, clamp, and command the actuator. Exactly once per period.
    pub fn tick(&mut self, dt: f64) -> Result<()> {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let hit = self.apply_target(self.target_position + self.velocity_increment * dt);
        let was_clamped = self.clamped;
        self.clamped = hit || core::mem::take(&mut self.pending_clamp);
        if self.clamped && !was_clamped {
            tracing::debug!(
                axis = self.name,
                target = self.target_position,
                "target clamped to soft limit"
            );
        }

        let ticks = quantize_inside(self.target_position, self.soft_limit.as_ref());
        self.actuator
            .set_position_target(ticks)
            .map_err(hw_report)
            .wrap_err_with(|| format!("{} set_position_target", self.name))?;
        self.last_commanded = Some(ticks);
        Ok(())
    }

    /// Measured turret angle in degrees. Does not touch the target.
    pub fn current_angle_deg(&mut self) -> Result<f64> {
        let ticks = self
            .actuator
            .measured_position()
            .map_err(hw_report)
            .wrap_err_with(|| format!("{} measured_position", self.name))?;
        self.last_measured_deg = self.scale.ticks_to_deg(f64::from(ticks));
        Ok(self.last_measured_deg)
    }

    /// Zero the rate; the target stays where it is.
    pub fn reset(&mut self) {
        self.velocity_increment = 0.0;
    }

    pub fn target_position(&self) -> f64 {
        self.target_position
    }

    pub fn target_deg(&self) -> f64 {
        self.scale.ticks_to_deg(self.target_position)
    }

    pub fn velocity_increment(&self) -> f64 {
        self.velocity_increment
    }

    pub fn soft_limit(&self) -> Option<&SoftLimit> {
        self.soft_limit.as_ref()
    }

    /// Whether the target issued on the last tick had to be clamped.
    pub fn clamped(&self) -> bool {
        self.clamped
    }

    pub fn last_commanded(&self) -> Option<i32> {
        self.last_commanded
    }

    pub fn last_measured_deg(&self) -> f64 {
        self.last_measured_deg
    }

    /// Store the clamped target; true when the limit changed it.
    fn apply_target(&mut self, requested: f64) -> bool {
        let clamped = clamp(requested, self.soft_limit.as_ref());
        self.target_position = clamped;
        clamped != requested
    }
}
