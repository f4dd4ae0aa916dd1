//! The unified turret control loop (`TurretCore`).
//!
//! One `periodic(dt, cmd)` call runs the whole pipeline in a fixed order:
//! vision refresh, live tuning reads, aim or manual slewing, both axes,
//! flywheel, feed interlock, ball transfer, then the telemetry commit.

use std::sync::Arc;

use turret_traits::{PercentOutput, PositionActuator, Tuning, VelocityActuator, Vision};

use crate::aim::AimController;
use crate::axis::AxisController;
use crate::config::{FeederCfg, FlywheelCfg, GearedAxisConfig, TransferCfg};
use crate::error::Result;
use crate::feed::{FeedInterlock, FeederState};
use crate::flywheel::FlywheelController;
use crate::status::{AimMode, AxisTelemetry, FlywheelTelemetry, TurretCommand, TurretTelemetry};
use crate::transfer::{BallTransfer, TransferState};
use crate::tuning;

/// Unified core for both dynamic (boxed) and generic (static dispatch) variants.
pub struct TurretCore<P, V, O, Vi>
where
    P: PositionActuator,
    V: VelocityActuator,
    O: PercentOutput,
    Vi: Vision,
{
    pub(crate) azimuth: AxisController<P>,
    pub(crate) elevation: AxisController<P>,
    pub(crate) flywheel: FlywheelController<V>,
    pub(crate) feeder: FeedInterlock<O>,
    pub(crate) transfer: Option<BallTransfer<O>>,
    pub(crate) vision: Vi,
    pub(crate) aim: AimController,
    pub(crate) tuning: Arc<dyn Tuning + Send + Sync>,

    pub(crate) azimuth_cfg: GearedAxisConfig,
    pub(crate) elevation_cfg: GearedAxisConfig,
    pub(crate) flywheel_cfg: FlywheelCfg,
    pub(crate) feeder_cfg: FeederCfg,
    pub(crate) transfer_cfg: TransferCfg,

    pub(crate) last_mode: AimMode,
    pub(crate) ticks: u64,
    pub(crate) telemetry: TurretTelemetry,
}

impl<P, V, O, Vi> core::fmt::Debug for TurretCore<P, V, O, Vi>
where
    P: PositionActuator,
    V: VelocityActuator,
    O: PercentOutput,
    Vi: Vision,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TurretCore")
            .field("azimuth", &self.azimuth)
            .field("elevation", &self.elevation)
            .field("flywheel", &self.flywheel)
            .field("feeder", &self.feeder.state())
            .field("ticks", &self.ticks)
            .finish()
    }
}

impl<P, V, O, Vi> TurretCore<P, V, O, Vi>
where
    P: PositionActuator,
    V: VelocityActuator,
    O: PercentOutput,
    Vi: Vision,
{
    /// One control period. On a hardware error the feeder is zeroed
    /// (best-effort) before the error is returned.
    pub fn periodic(&mut self, dt: f64, cmd: &TurretCommand) -> Result<TurretTelemetry> {
        match self.step(dt, cmd) {
            Ok(t) => Ok(t),
            Err(e) => {
                if let Err(stop_err) = self.feeder.idle() {
                    tracing::warn!(error = %stop_err, "feeder stop failed after tick error");
                }
                Err(e)
            }
        }
    }

    fn step(&mut self, dt: f64, cmd: &TurretCommand) -> Result<TurretTelemetry> {
        self.vision.refresh();
        let sample = self.vision.sample();

        let tuned_rpm = self
            .tuning
            .number(tuning::SHOOTER_VELOCITY_RPM, self.flywheel_cfg.default_rpm);
        let feeder_pct = self
            .tuning
            .number(tuning::FEEDER_OUTPUT_PERCENT, self.feeder_cfg.output_percent);
        let transfer_pct = self.tuning.number(
            tuning::TRANSFER_OUTPUT_PERCENT,
            self.transfer_cfg.output_percent,
        );
        self.azimuth.set_turn_rate(self.tuning.number(
            tuning::AZIMUTH_TURN_RATE,
            self.azimuth_cfg.default_turn_rate_deg_per_s,
        ));
        self.elevation.set_turn_rate(self.tuning.number(
            tuning::ELEVATION_TURN_RATE,
            self.elevation_cfg.default_turn_rate_deg_per_s,
        ));

        if !cmd.aim.same_kind(&self.last_mode) {
            tracing::info!(from = self.last_mode.name(), to = cmd.aim.name(), "aim mode");
            self.aim.reset();
            self.azimuth.reset();
            self.elevation.reset();
        }
        self.last_mode = cmd.aim;

        let az_now = self.azimuth.current_angle_deg()?;
        let el_now = self.elevation.current_angle_deg()?;

        match cmd.aim {
            AimMode::Hold => {
                self.azimuth.reset();
                self.elevation.reset();
            }
            AimMode::Manual {
                azimuth_rate,
                elevation_rate,
            } => {
                self.azimuth.set_rate(azimuth_rate);
                self.elevation.set_rate(elevation_rate);
            }
            AimMode::Auto => match self.aim.update(&sample, az_now, el_now) {
                Some(solution) => {
                    self.azimuth.set_absolute_target(solution.azimuth_deg);
                    self.elevation.set_absolute_target(solution.elevation_deg);
                }
                None => {
                    self.azimuth.reset();
                    self.elevation.reset();
                }
            },
        }

        self.azimuth.tick(dt)?;
        self.elevation.tick(dt)?;

        // The ballistic setpoint follows every auto tick, even while the
        // position path is holding on a lost target.
        if matches!(cmd.aim, AimMode::Auto) {
            let native = self.flywheel.ballistic_native(sample.ballistic_velocity_fps);
            self.flywheel.set_target_native(native)?;
        } else if cmd.fire {
            self.flywheel.set_target_rpm(tuned_rpm)?;
        } else {
            self.flywheel.stop()?;
        }
        let at_speed = self.flywheel.update()?;

        let feeder_state = if cmd.fire {
            self.feeder.tick(at_speed, feeder_pct)?
        } else {
            self.feeder.idle()?
        };

        let transfer_state = match self.transfer.as_mut() {
            Some(t) if cmd.fire => t.fire(transfer_pct)?,
            Some(t) => t.do_not_fire()?,
            None => TransferState::Idle,
        };

        self.ticks = self.ticks.saturating_add(1);
        self.telemetry = TurretTelemetry {
            tick: self.ticks,
            mode: cmd.aim.name(),
            vision_valid: sample.valid,
            azimuth: axis_telemetry(&self.azimuth),
            elevation: axis_telemetry(&self.elevation),
            flywheel: self.flywheel_telemetry(),
            feeder: feeder_state,
            transfer: transfer_state,
            shooting: cmd.fire,
            feeding: feeder_state == FeederState::Feeding,
        };
        tracing::trace!(
            tick = self.ticks,
            az_target = self.telemetry.azimuth.target_ticks,
            el_target = self.telemetry.elevation.target_ticks,
            at_speed,
            feeder = %feeder_state,
            "tick"
        );
        Ok(self.telemetry)
    }

    /// Mode-transition reset: zero both rates, empty the smoothing window,
    /// drop the held aim solution and stop the flywheel. Axis targets keep
    /// their last clamped values.
    pub fn reinitialize(&mut self) -> Result<()> {
        self.azimuth.reset();
        self.elevation.reset();
        self.aim.reset();
        self.flywheel.stop()?;
        tracing::info!(
            az_target = self.azimuth.target_position(),
            el_target = self.elevation.target_position(),
            "turret reinitialized"
        );
        Ok(())
    }

    /// Zero every output and hold position. Tries all stages and reports the
    /// first failure.
    pub fn safe_stop(&mut self) -> Result<()> {
        self.azimuth.reset();
        self.elevation.reset();
        let feeder = self.feeder.idle().map(|_| ());
        let transfer = match self.transfer.as_mut() {
            Some(t) => t.do_not_fire().map(|_| ()),
            None => Ok(()),
        };
        let flywheel = self.flywheel.stop();
        feeder.and(transfer).and(flywheel)
    }

    /// Snapshot of the last completed tick.
    pub fn telemetry(&self) -> TurretTelemetry {
        self.telemetry
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn azimuth(&self) -> &AxisController<P> {
        &self.azimuth
    }

    pub fn elevation(&self) -> &AxisController<P> {
        &self.elevation
    }

    pub fn flywheel(&self) -> &FlywheelController<V> {
        &self.flywheel
    }

    pub fn aim(&self) -> &AimController {
        &self.aim
    }

    /// Drive an axis to an absolute angle outside of auto-aim (operator presets).
    pub fn set_absolute_targets(&mut self, azimuth_deg: f64, elevation_deg: f64) {
        self.azimuth.set_absolute_target(azimuth_deg);
        self.elevation.set_absolute_target(elevation_deg);
    }

    pub fn set_transfer_enabled(&mut self, enabled: bool) {
        if let Some(t) = self.transfer.as_mut() {
            t.set_enabled(enabled);
        }
    }

    fn flywheel_telemetry(&self) -> FlywheelTelemetry {
        let s = self.flywheel.state();
        let setpoint = s.setpoint_native.unwrap_or(0.0);
        FlywheelTelemetry {
            setpoint_native: setpoint,
            measured_native: s.measured_native,
            setpoint_rpm: self.flywheel.native_to_rpm(setpoint),
            measured_rpm: self.flywheel.native_to_rpm(s.measured_native),
            at_speed: s.at_speed,
        }
    }
}

fn axis_telemetry<P: PositionActuator>(axis: &AxisController<P>) -> AxisTelemetry {
    AxisTelemetry {
        target_ticks: axis.target_position(),
        target_deg: axis.target_deg(),
        commanded_ticks: axis.last_commanded(),
        measured_deg: axis.last_measured_deg(),
        clamped: axis.clamped(),
    }
}
