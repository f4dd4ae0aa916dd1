//! The `run` and `self-check` commands: wire simulated devices into a turret
//! and drive it with the fixed-period runner.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use eyre::WrapErr;
use serde_json::json;
use turret_config::Config;
use turret_core::error::TurretError;
use turret_core::mocks::NoVision;
use turret_core::runner::{self, RunParams, RunSummary};
use turret_core::tuning::{MapTuning, SHOOTER_VELOCITY_RPM};
use turret_core::{AxisTelemetry, Turret, TurretCfg, TurretCommand, TurretTelemetry};
use turret_hardware::{
    ScriptedVision, SimPercentOutput, SimPositionActuator, SimVelocityActuator,
};
use turret_traits::{MonotonicClock, Vision, VisionSample};

/// Options of one `run` invocation, already parsed from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOpts {
    pub ticks: Option<u64>,
    pub auto: bool,
    pub fire: bool,
    pub az_rate: Option<f64>,
    pub el_rate: Option<f64>,
    pub vision_trace: Option<PathBuf>,
    pub rpm: Option<f64>,
    pub period_ms: Option<u64>,
}

impl RunOpts {
    /// The operator command held for the whole run.
    pub fn command(&self) -> TurretCommand {
        let az = self.az_rate.unwrap_or(0.0);
        let el = self.el_rate.unwrap_or(0.0);
        let cmd = if self.auto {
            TurretCommand::auto()
        } else if az != 0.0 || el != 0.0 {
            TurretCommand::manual(az, el)
        } else {
            TurretCommand::hold()
        };
        cmd.firing(self.fire)
    }
}

/// Read, parse and validate the TOML config. Every failure is a config error.
pub fn load_config(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        eyre::Report::new(TurretError::Config(format!(
            "read config {}: {e}",
            path.display()
        )))
    })?;
    let cfg = turret_config::load_toml(&text)
        .map_err(|e| eyre::Report::new(TurretError::Config(format!("parse config: {e}"))))?;
    cfg.validate()
        .map_err(|e| eyre::Report::new(TurretError::Config(format!("{e}"))))?;
    Ok(cfg)
}

fn load_vision(trace: Option<&Path>) -> eyre::Result<Box<dyn Vision>> {
    let Some(path) = trace else {
        return Ok(Box::new(NoVision));
    };
    let rows = turret_config::load_vision_trace_csv(path)
        .map_err(|e| eyre::Report::new(TurretError::Config(format!("{e}"))))?;
    tracing::info!(frames = rows.len(), path = %path.display(), "vision trace loaded");
    let frames = rows
        .into_iter()
        .map(|r| VisionSample {
            valid: r.valid,
            azimuth_offset_deg: r.tx,
            elevation_offset_deg: r.ty,
            ballistic_velocity_fps: r.velocity_fps,
        })
        .collect();
    Ok(Box::new(ScriptedVision::new(frames)))
}

/// Build a turret from `cfg` with every device simulated.
pub fn build_sim_turret(
    cfg: &Config,
    vision: Box<dyn Vision>,
    tuning: Arc<MapTuning>,
) -> eyre::Result<Turret> {
    let mut builder = Turret::builder()
        .with_axes(
            SimPositionActuator::new("azimuth", cfg.sim.azimuth_slew_ticks),
            SimPositionActuator::new("elevation", cfg.sim.elevation_slew_ticks),
        )
        .with_launcher(
            SimVelocityActuator::new("flywheel", cfg.sim.flywheel_response),
            SimPercentOutput::new("feeder"),
        )
        .with_vision(vision)
        .with_config(TurretCfg::from(cfg))
        .with_tuning(tuning);
    if cfg.ball_transfer.enabled {
        builder = builder.with_transfer(SimPercentOutput::new("ball_transfer"));
    }
    builder.build()
}

pub fn run_turret(cfg: &Config, opts: &RunOpts, json_mode: bool) -> eyre::Result<()> {
    let tuning = Arc::new(MapTuning::new());
    if let Some(rpm) = opts.rpm {
        tuning.set(SHOOTER_VELOCITY_RPM, rpm);
    }
    let vision = load_vision(opts.vision_trace.as_deref())?;
    let mut turret = build_sim_turret(cfg, vision, tuning)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        ctrlc::set_handler(move || {
            tracing::info!("received shutdown signal");
            flag.store(true, Ordering::SeqCst);
        })
        .wrap_err("install Ctrl-C handler")?;
    }

    let params = RunParams::new(
        opts.period_ms.unwrap_or(cfg.runner.period_ms),
        opts.ticks,
        cfg.runner.overrun.into(),
    );
    let cmd = opts.command();
    tracing::info!(
        mode = cmd.aim.name(),
        fire = cmd.fire,
        ticks = opts.ticks,
        "starting run"
    );

    let clock = MonotonicClock::new();
    let summary = runner::run(
        &mut turret,
        &clock,
        &params,
        |_| cmd,
        |_, t| {
            if json_mode {
                println!("{}", telemetry_json(t));
            }
        },
        &shutdown,
    )?;

    if json_mode {
        println!("{}", summary_json(&summary));
    } else {
        println!("{}", summary_text(&summary));
    }
    Ok(())
}

/// Build the turret from config and run exactly one held tick.
pub fn self_check(cfg: &Config) -> eyre::Result<TurretTelemetry> {
    let mut turret = build_sim_turret(cfg, Box::new(NoVision), Arc::new(MapTuning::new()))?;
    let dt = turret_core::util::dt_seconds(turret_core::util::period_from_ms(cfg.runner.period_ms));
    let t = turret
        .periodic(dt, &TurretCommand::hold())
        .wrap_err("self-check tick")?;
    turret.safe_stop().wrap_err("self-check safe stop")?;
    Ok(t)
}

fn axis_json(a: &AxisTelemetry) -> serde_json::Value {
    json!({
        "target_ticks": a.target_ticks,
        "target_deg": a.target_deg,
        "commanded_ticks": a.commanded_ticks,
        "measured_deg": a.measured_deg,
        "clamped": a.clamped,
    })
}

/// One JSON line per committed tick.
pub fn telemetry_json(t: &TurretTelemetry) -> serde_json::Value {
    json!({
        "tick": t.tick,
        "mode": t.mode,
        "vision_valid": t.vision_valid,
        "azimuth": axis_json(&t.azimuth),
        "elevation": axis_json(&t.elevation),
        "flywheel": {
            "setpoint_native": t.flywheel.setpoint_native,
            "measured_native": t.flywheel.measured_native,
            "setpoint_rpm": t.flywheel.setpoint_rpm,
            "measured_rpm": t.flywheel.measured_rpm,
            "at_speed": t.flywheel.at_speed,
        },
        "feeder": t.feeder.as_str(),
        "transfer": t.transfer.as_str(),
        "shooting": t.shooting,
        "feeding": t.feeding,
    })
}

pub fn summary_json(s: &RunSummary) -> serde_json::Value {
    let last = s.last.unwrap_or_default();
    json!({
        "summary": {
            "ticks": s.ticks,
            "overruns": s.overruns,
            "worst_overrun_us": s.worst_overrun.as_micros() as u64,
            "stopped_by_shutdown": s.stopped_by_shutdown,
            "azimuth_target_deg": last.azimuth.target_deg,
            "elevation_target_deg": last.elevation.target_deg,
            "at_speed": last.flywheel.at_speed,
            "feeder": last.feeder.as_str(),
        }
    })
}

fn summary_text(s: &RunSummary) -> String {
    let last = s.last.unwrap_or_default();
    format!(
        "run complete: ticks={} overruns={} az={:.2}deg el={:.2}deg rpm={:.0} at_speed={} feeder={}",
        s.ticks,
        s.overruns,
        last.azimuth.target_deg,
        last.elevation.target_deg,
        last.flywheel.measured_rpm,
        last.flywheel.at_speed,
        last.feeder,
    )
}
