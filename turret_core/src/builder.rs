//! Type-state builder for `Turret` and generic `build_turret` constructor.
//!
//! The builder enforces at compile time that the axes, the launcher (flywheel
//! plus feeder) and the vision source are provided before `build()` is
//! available. `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;
use std::sync::Arc;

use turret_traits::{PercentOutput, PositionActuator, Tuning, VelocityActuator, Vision};

use crate::aim::AimController;
use crate::axis::AxisController;
use crate::config::*;
use crate::core::TurretCore;
use crate::error::{BuildError, Result};
use crate::feed::FeedInterlock;
use crate::flywheel::FlywheelController;
use crate::status::{AimMode, TurretCommand, TurretTelemetry};
use crate::transfer::BallTransfer;
use crate::tuning::DefaultTuning;

type BoxedCore = TurretCore<
    Box<dyn PositionActuator>,
    Box<dyn VelocityActuator>,
    Box<dyn PercentOutput>,
    Box<dyn Vision>,
>;

// ── Public dynamic-dispatch wrapper ──────────────────────────────────────────

/// Public dynamic (boxed) turret.
pub struct Turret {
    pub(crate) inner: BoxedCore,
}

impl core::fmt::Debug for Turret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Turret")
            .field("az_target_ticks", &self.inner.azimuth.target_position())
            .field("el_target_ticks", &self.inner.elevation.target_position())
            .field("at_speed", &self.inner.flywheel.is_at_speed())
            .field("ticks", &self.inner.ticks)
            .finish()
    }
}

impl Turret {
    /// Start building a Turret.
    pub fn builder() -> TurretBuilder<Missing, Missing, Missing> {
        TurretBuilder::default()
    }

    /// One control period of `dt` seconds.
    pub fn periodic(&mut self, dt: f64, cmd: &TurretCommand) -> Result<TurretTelemetry> {
        self.inner.periodic(dt, cmd)
    }

    /// Mode-transition reset; axis targets are preserved.
    pub fn reinitialize(&mut self) -> Result<()> {
        self.inner.reinitialize()
    }

    /// Zero every output (best-effort across all stages).
    pub fn safe_stop(&mut self) -> Result<()> {
        self.inner.safe_stop()
    }

    pub fn telemetry(&self) -> TurretTelemetry {
        self.inner.telemetry()
    }

    pub fn ticks(&self) -> u64 {
        self.inner.ticks()
    }

    pub fn set_absolute_targets(&mut self, azimuth_deg: f64, elevation_deg: f64) {
        self.inner.set_absolute_targets(azimuth_deg, elevation_deg);
    }

    pub fn set_transfer_enabled(&mut self, enabled: bool) {
        self.inner.set_transfer_enabled(enabled);
    }

    /// Current aim mode as of the last tick.
    pub fn mode(&self) -> AimMode {
        self.inner.last_mode
    }

    /// Commanded azimuth target in native units.
    pub fn azimuth_target_ticks(&self) -> f64 {
        self.inner.azimuth.target_position()
    }

    /// Commanded elevation target in native units.
    pub fn elevation_target_ticks(&self) -> f64 {
        self.inner.elevation.target_position()
    }

    pub fn is_at_speed(&self) -> bool {
        self.inner.flywheel.is_at_speed()
    }

    /// Ballistic flywheel setpoint for `velocity_fps`, in native units per 100 ms.
    pub fn ballistic_native(&self, velocity_fps: f64) -> f64 {
        self.inner.flywheel.ballistic_native(velocity_fps)
    }
}

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Turret`. All fields are validated on `build()`.
pub struct TurretBuilder<Ax, Fw, Vi> {
    azimuth: Option<Box<dyn PositionActuator>>,
    elevation: Option<Box<dyn PositionActuator>>,
    flywheel: Option<Box<dyn VelocityActuator>>,
    feeder: Option<Box<dyn PercentOutput>>,
    transfer: Option<Box<dyn PercentOutput>>,
    vision: Option<Box<dyn Vision>>,
    cfg: TurretCfg,
    tuning: Option<Arc<dyn Tuning + Send + Sync>>,
    _ax: PhantomData<Ax>,
    _fw: PhantomData<Fw>,
    _vi: PhantomData<Vi>,
}

impl Default for TurretBuilder<Missing, Missing, Missing> {
    fn default() -> Self {
        Self {
            azimuth: None,
            elevation: None,
            flywheel: None,
            feeder: None,
            transfer: None,
            vision: None,
            cfg: TurretCfg::default(),
            tuning: None,
            _ax: PhantomData,
            _fw: PhantomData,
            _vi: PhantomData,
        }
    }
}

impl<Ax, Fw, Vi> TurretBuilder<Ax, Fw, Vi> {
    fn retype<Ax2, Fw2, Vi2>(self) -> TurretBuilder<Ax2, Fw2, Vi2> {
        TurretBuilder {
            azimuth: self.azimuth,
            elevation: self.elevation,
            flywheel: self.flywheel,
            feeder: self.feeder,
            transfer: self.transfer,
            vision: self.vision,
            cfg: self.cfg,
            tuning: self.tuning,
            _ax: PhantomData,
            _fw: PhantomData,
            _vi: PhantomData,
        }
    }

    /// Provide the azimuth and elevation position actuators.
    pub fn with_axes(
        mut self,
        azimuth: impl PositionActuator + 'static,
        elevation: impl PositionActuator + 'static,
    ) -> TurretBuilder<Set, Fw, Vi> {
        self.azimuth = Some(Box::new(azimuth));
        self.elevation = Some(Box::new(elevation));
        self.retype()
    }

    /// Provide the flywheel velocity actuator and the interlocked feeder.
    pub fn with_launcher(
        mut self,
        flywheel: impl VelocityActuator + 'static,
        feeder: impl PercentOutput + 'static,
    ) -> TurretBuilder<Ax, Set, Vi> {
        self.flywheel = Some(Box::new(flywheel));
        self.feeder = Some(Box::new(feeder));
        self.retype()
    }

    /// Provide the vision target source.
    pub fn with_vision(mut self, vision: impl Vision + 'static) -> TurretBuilder<Ax, Fw, Set> {
        self.vision = Some(Box::new(vision));
        self.retype()
    }

    /// Optional ball-transfer stage.
    pub fn with_transfer(mut self, output: impl PercentOutput + 'static) -> Self {
        self.transfer = Some(Box::new(output));
        self
    }

    /// Replace the whole configuration bundle.
    pub fn with_config(mut self, cfg: TurretCfg) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn with_azimuth_cfg(mut self, cfg: GearedAxisConfig) -> Self {
        self.cfg.azimuth = cfg;
        self
    }

    pub fn with_elevation_cfg(mut self, cfg: GearedAxisConfig) -> Self {
        self.cfg.elevation = cfg;
        self
    }

    pub fn with_flywheel_cfg(mut self, cfg: FlywheelCfg) -> Self {
        self.cfg.flywheel = cfg;
        self
    }

    pub fn with_feeder_cfg(mut self, cfg: FeederCfg) -> Self {
        self.cfg.feeder = cfg;
        self
    }

    pub fn with_transfer_cfg(mut self, cfg: TransferCfg) -> Self {
        self.cfg.transfer = cfg;
        self
    }

    pub fn with_aim_cfg(mut self, cfg: AimCfg) -> Self {
        self.cfg.aim = cfg;
        self
    }

    /// Live tuning store; defaults to `DefaultTuning`.
    pub fn with_tuning(mut self, tuning: Arc<dyn Tuning + Send + Sync>) -> Self {
        self.tuning = Some(tuning);
        self
    }

    /// Validate and build without compile-time presence guarantees.
    pub fn try_build(self) -> Result<Turret> {
        let (azimuth, elevation) = match (self.azimuth, self.elevation) {
            (Some(a), Some(e)) => (a, e),
            _ => return Err(eyre::Report::new(BuildError::MissingAxes)),
        };
        let (flywheel, feeder) = match (self.flywheel, self.feeder) {
            (Some(f), Some(o)) => (f, o),
            _ => return Err(eyre::Report::new(BuildError::MissingLauncher)),
        };
        let vision = self
            .vision
            .ok_or_else(|| eyre::Report::new(BuildError::MissingVision))?;

        let inner = build_turret(
            azimuth,
            elevation,
            flywheel,
            feeder,
            self.transfer,
            vision,
            self.cfg,
            self.tuning,
        )?;
        Ok(Turret { inner })
    }
}

impl TurretBuilder<Set, Set, Set> {
    /// Build with every required device present.
    pub fn build(self) -> Result<Turret> {
        self.try_build()
    }
}

fn check_fraction(v: f64, msg: &'static str) -> Result<()> {
    if v.is_finite() && (-1.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(eyre::Report::new(BuildError::InvalidConfig(msg)))
    }
}

/// Validate configuration and construct a `TurretCore` with static dispatch.
///
/// This is the single source of truth for validation and construction,
/// used by both `TurretBuilder::try_build()` and direct callers.
#[allow(clippy::too_many_arguments)]
pub fn build_turret<P, V, O, Vi>(
    azimuth: P,
    elevation: P,
    flywheel: V,
    feeder: O,
    transfer: Option<O>,
    vision: Vi,
    cfg: TurretCfg,
    tuning: Option<Arc<dyn Tuning + Send + Sync>>,
) -> Result<TurretCore<P, V, O, Vi>>
where
    P: PositionActuator,
    V: VelocityActuator,
    O: PercentOutput,
    Vi: Vision,
{
    // ── Validation ───────────────────────────────────────────────────────────
    check_fraction(cfg.feeder.output_percent, "feeder output_percent must be in [-1, 1]")?;
    check_fraction(
        cfg.transfer.output_percent,
        "ball transfer output_percent must be in [-1, 1]",
    )?;
    if cfg.aim.use_filter && cfg.aim.filter_length == 0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "aim filter_length must be >= 1",
        )));
    }
    if !cfg.flywheel.default_rpm.is_finite() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "flywheel default_rpm must be finite",
        )));
    }

    // ── Construct ────────────────────────────────────────────────────────────
    let azimuth = AxisController::new("azimuth", azimuth, &cfg.azimuth)?;
    let elevation = AxisController::new("elevation", elevation, &cfg.elevation)?;
    let flywheel = FlywheelController::new(flywheel, &cfg.flywheel)?;
    let feeder = FeedInterlock::new(feeder);
    let transfer = transfer.map(|o| BallTransfer::new(o, &cfg.transfer));
    let aim = AimController::new(&cfg.aim);
    let tuning = tuning.unwrap_or_else(|| Arc::new(DefaultTuning));

    tracing::info!(
        filter = aim.filtering(),
        transfer = transfer.is_some(),
        deadband = cfg.flywheel.deadband_native,
        "turret built"
    );

    Ok(TurretCore {
        azimuth,
        elevation,
        flywheel,
        feeder,
        transfer,
        vision,
        aim,
        tuning,
        azimuth_cfg: cfg.azimuth,
        elevation_cfg: cfg.elevation,
        flywheel_cfg: cfg.flywheel,
        feeder_cfg: cfg.feeder,
        transfer_cfg: cfg.transfer,
        last_mode: AimMode::Hold,
        ticks: 0,
        telemetry: TurretTelemetry::default(),
    })
}
