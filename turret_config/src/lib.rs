#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and vision-trace parsing for the turret controller.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated once at
//!   load; the resulting snapshot is immutable for the life of the process.
//! - Vision trace CSV loader enforces headers and is used to replay recorded
//!   target frames through the simulated vision source.
use serde::Deserialize;

/// Soft-limit degree value meaning "no limit configured".
pub const SOFT_LIMIT_UNSET: f64 = -1.0;

fn unset_limit() -> f64 {
    SOFT_LIMIT_UNSET
}

/// Geared position axis (azimuth or elevation).
///
/// `gear_ratio` is turret revolutions per motor revolution, so
/// `turret_deg = motor_deg * gear_ratio`.
///
/// Soft limits are given as positive magnitudes in turret degrees: the forward
/// threshold is `+forward_soft_limit_deg`, the reverse threshold is
/// `-reverse_soft_limit_deg`. Either bound left at `-1` (or absent) disables
/// clamping on this axis.
#[derive(Debug, Deserialize, Clone)]
pub struct AxisCfg {
    pub ticks_per_revolution: f64,
    pub gear_ratio: f64,
    #[serde(default = "unset_limit")]
    pub forward_soft_limit_deg: f64,
    #[serde(default = "unset_limit")]
    pub reverse_soft_limit_deg: f64,
    /// Default slew rate at full stick, turret degrees per second.
    pub default_turn_rate_deg: f64,
}

impl AxisCfg {
    /// `(min, max)` in turret degrees, or `None` unless both bounds are set.
    pub fn soft_limit_deg(&self) -> Option<(f64, f64)> {
        if self.forward_soft_limit_deg == SOFT_LIMIT_UNSET
            || self.reverse_soft_limit_deg == SOFT_LIMIT_UNSET
        {
            return None;
        }
        Some((-self.reverse_soft_limit_deg, self.forward_soft_limit_deg))
    }

    fn validate(&self, axis: &str) -> eyre::Result<()> {
        if !self.ticks_per_revolution.is_finite() || self.ticks_per_revolution <= 0.0 {
            eyre::bail!("{axis}.ticks_per_revolution must be > 0");
        }
        if !self.gear_ratio.is_finite() || self.gear_ratio == 0.0 {
            eyre::bail!("{axis}.gear_ratio must be finite and non-zero");
        }
        for (key, v) in [
            ("forward_soft_limit_deg", self.forward_soft_limit_deg),
            ("reverse_soft_limit_deg", self.reverse_soft_limit_deg),
        ] {
            if v != SOFT_LIMIT_UNSET && !(v.is_finite() && v >= 0.0) {
                eyre::bail!("{axis}.{key} must be >= 0 or -1 (unset)");
            }
        }
        if !self.default_turn_rate_deg.is_finite() || self.default_turn_rate_deg < 0.0 {
            eyre::bail!("{axis}.default_turn_rate_deg must be >= 0");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FlywheelCfg {
    pub ticks_per_revolution: f64,
    /// Motor revolutions per flywheel revolution.
    #[serde(default = "one")]
    pub gear_ratio: f64,
    /// Flywheel radius in inches, used by the ballistic setpoint.
    pub radius_in: f64,
    /// Setpoint used when firing without auto-aim; overridable live.
    pub default_rpm: f64,
    /// Accept `setpoint <= measured <= setpoint + deadband` as at speed.
    pub spin_up_deadband_ticks: f64,
}

fn one() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeederCfg {
    pub output_percent: f64,
}

impl Default for FeederCfg {
    fn default() -> Self {
        Self {
            output_percent: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BallTransferCfg {
    pub enabled: bool,
    pub output_percent: f64,
}

impl Default for BallTransferCfg {
    fn default() -> Self {
        Self {
            enabled: true,
            output_percent: 0.5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AimCfg {
    /// Smooth the azimuth offset with a moving average before use.
    pub use_filter: bool,
    /// Moving-average window length (samples).
    pub filter_length: usize,
}

impl Default for AimCfg {
    fn default() -> Self {
        Self {
            use_filter: false,
            filter_length: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverrunPolicy {
    /// Count and log overruns, keep running.
    #[default]
    Warn,
    /// Stop the loop on the first overrun.
    Fatal,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RunnerCfg {
    /// Control period in milliseconds; also the `dt` handed to each tick.
    pub period_ms: u64,
    pub overrun: OverrunPolicy,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self {
            period_ms: 20,
            overrun: OverrunPolicy::Warn,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Parameters of the simulated backend used by the CLI.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimCfg {
    pub azimuth_slew_ticks: f64,
    pub elevation_slew_ticks: f64,
    /// Fraction of the remaining velocity error closed per command (0..=1].
    pub flywheel_response: f64,
}

impl Default for SimCfg {
    fn default() -> Self {
        Self {
            azimuth_slew_ticks: 400.0,
            elevation_slew_ticks: 400.0,
            flywheel_response: 0.3,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub azimuth: AxisCfg,
    pub elevation: AxisCfg,
    pub flywheel: FlywheelCfg,
    #[serde(default)]
    pub feeder: FeederCfg,
    #[serde(default)]
    pub ball_transfer: BallTransferCfg,
    #[serde(default)]
    pub aim: AimCfg,
    #[serde(default)]
    pub runner: RunnerCfg,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub sim: SimCfg,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Axes
        self.azimuth.validate("azimuth")?;
        self.elevation.validate("elevation")?;

        // Flywheel
        if !self.flywheel.ticks_per_revolution.is_finite()
            || self.flywheel.ticks_per_revolution <= 0.0
        {
            eyre::bail!("flywheel.ticks_per_revolution must be > 0");
        }
        if !self.flywheel.gear_ratio.is_finite() || self.flywheel.gear_ratio <= 0.0 {
            eyre::bail!("flywheel.gear_ratio must be > 0");
        }
        if !self.flywheel.radius_in.is_finite() || self.flywheel.radius_in <= 0.0 {
            eyre::bail!("flywheel.radius_in must be > 0");
        }
        if !self.flywheel.default_rpm.is_finite() {
            eyre::bail!("flywheel.default_rpm must be finite");
        }
        if !self.flywheel.spin_up_deadband_ticks.is_finite()
            || self.flywheel.spin_up_deadband_ticks < 0.0
        {
            eyre::bail!("flywheel.spin_up_deadband_ticks must be >= 0");
        }

        // Open-loop outputs
        if !(-1.0..=1.0).contains(&self.feeder.output_percent) {
            eyre::bail!("feeder.output_percent must be in [-1.0, 1.0]");
        }
        if !(-1.0..=1.0).contains(&self.ball_transfer.output_percent) {
            eyre::bail!("ball_transfer.output_percent must be in [-1.0, 1.0]");
        }

        // Aim
        if self.aim.filter_length == 0 {
            eyre::bail!("aim.filter_length must be >= 1");
        }

        // Runner
        if self.runner.period_ms == 0 {
            eyre::bail!("runner.period_ms must be >= 1");
        }
        if self.runner.period_ms > 1000 {
            eyre::bail!("runner.period_ms is unreasonably large (>1s)");
        }

        // Sim
        if self.sim.azimuth_slew_ticks < 0.0 || self.sim.elevation_slew_ticks < 0.0 {
            eyre::bail!("sim slew rates must be >= 0");
        }
        if !(self.sim.flywheel_response > 0.0 && self.sim.flywheel_response <= 1.0) {
            eyre::bail!("sim.flywheel_response must be in (0.0, 1.0]");
        }

        Ok(())
    }
}

/// Vision trace CSV schema.
///
/// Expected headers:
/// valid,tx,ty,velocity_fps
///
/// Example:
/// valid,tx,ty,velocity_fps
/// true,4.5,-1.0,38.0
/// false,0.0,0.0,0.0
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct VisionTraceRow {
    pub valid: bool,
    pub tx: f64,
    pub ty: f64,
    pub velocity_fps: f64,
}

pub fn load_vision_trace_csv(path: &std::path::Path) -> eyre::Result<Vec<VisionTraceRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open vision trace CSV {:?}: {}", path, e))?;

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["valid", "tx", "ty", "velocity_fps"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "vision trace CSV must have headers 'valid,tx,ty,velocity_fps', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<VisionTraceRow>().enumerate() {
        match rec {
            Ok(row) => {
                if !(row.tx.is_finite() && row.ty.is_finite() && row.velocity_fps.is_finite()) {
                    eyre::bail!("invalid CSV row {}: non-finite value", idx + 2);
                }
                rows.push(row);
            }
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    if rows.is_empty() {
        eyre::bail!("vision trace CSV {:?} has no rows", path);
    }
    Ok(rows)
}
