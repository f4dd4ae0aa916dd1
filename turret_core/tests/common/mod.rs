#![allow(dead_code)]

use std::sync::Arc;

use turret_core::{
    FeederCfg, FlywheelCfg, GearedAxisConfig, TransferCfg, Turret, TurretCfg, tuning::MapTuning,
};
use turret_hardware::{
    ScriptedVision, SimOutputProbe, SimPercentOutput, SimPositionActuator, SimPositionProbe,
    SimVelocityActuator, SimVelocityProbe,
};
use turret_traits::VisionSample;

/// 100 ticks per turret degree; full stick is 100 ticks per second.
pub fn axis_cfg(limit_deg: Option<(f64, f64)>) -> GearedAxisConfig {
    GearedAxisConfig {
        ticks_per_revolution: 36_000.0,
        gear_ratio: 1.0,
        soft_limit_deg: limit_deg,
        default_turn_rate_deg_per_s: 1.0,
    }
}

pub fn flywheel_cfg() -> FlywheelCfg {
    FlywheelCfg {
        ticks_per_revolution: 2048.0,
        gear_ratio: 1.0,
        radius_in: 2.0,
        default_rpm: 3000.0,
        deadband_native: 150.0,
    }
}

pub fn cfg(limit_deg: Option<(f64, f64)>) -> TurretCfg {
    TurretCfg {
        azimuth: axis_cfg(limit_deg),
        elevation: axis_cfg(None),
        flywheel: flywheel_cfg(),
        feeder: FeederCfg {
            output_percent: 0.6,
        },
        transfer: TransferCfg {
            enabled: true,
            output_percent: 0.4,
        },
        ..TurretCfg::default()
    }
}

pub fn frame(valid: bool, tx: f64, ty: f64, fps: f64) -> VisionSample {
    VisionSample {
        valid,
        azimuth_offset_deg: tx,
        elevation_offset_deg: ty,
        ballistic_velocity_fps: fps,
    }
}

pub struct Rig {
    pub turret: Turret,
    pub azimuth: SimPositionProbe,
    pub elevation: SimPositionProbe,
    pub flywheel: SimVelocityProbe,
    pub feeder: SimOutputProbe,
    pub transfer: SimOutputProbe,
    pub tuning: Arc<MapTuning>,
}

/// Axes follow instantly; the flywheel responds with `flywheel_response`.
pub fn rig(cfg: TurretCfg, frames: Vec<VisionSample>, flywheel_response: f64) -> Rig {
    let az = SimPositionActuator::new("azimuth", 1e9);
    let el = SimPositionActuator::new("elevation", 1e9);
    let fw = SimVelocityActuator::new("flywheel", flywheel_response);
    let feeder = SimPercentOutput::new("feeder");
    let transfer = SimPercentOutput::new("ball_transfer");
    let tuning = Arc::new(MapTuning::new());
    let probes = (
        az.probe(),
        el.probe(),
        fw.probe(),
        feeder.probe(),
        transfer.probe(),
    );
    let turret = Turret::builder()
        .with_axes(az, el)
        .with_launcher(fw, feeder)
        .with_vision(ScriptedVision::new(frames))
        .with_transfer(transfer)
        .with_config(cfg)
        .with_tuning(tuning.clone())
        .build()
        .expect("sim turret builds");
    Rig {
        turret,
        azimuth: probes.0,
        elevation: probes.1,
        flywheel: probes.2,
        feeder: probes.3,
        transfer: probes.4,
        tuning,
    }
}
