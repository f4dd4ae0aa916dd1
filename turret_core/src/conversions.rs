//! `From` implementations bridging `turret_config` types to `turret_core` types.

use crate::config::{AimCfg, FeederCfg, FlywheelCfg, GearedAxisConfig, TransferCfg, TurretCfg};
use crate::runner::OverrunPolicy;

// ── GearedAxisConfig ─────────────────────────────────────────────────────────

impl From<&turret_config::AxisCfg> for GearedAxisConfig {
    fn from(c: &turret_config::AxisCfg) -> Self {
        Self {
            ticks_per_revolution: c.ticks_per_revolution,
            gear_ratio: c.gear_ratio,
            soft_limit_deg: c.soft_limit_deg(),
            default_turn_rate_deg_per_s: c.default_turn_rate_deg,
        }
    }
}

// ── FlywheelCfg ──────────────────────────────────────────────────────────────

impl From<&turret_config::FlywheelCfg> for FlywheelCfg {
    fn from(c: &turret_config::FlywheelCfg) -> Self {
        Self {
            ticks_per_revolution: c.ticks_per_revolution,
            gear_ratio: c.gear_ratio,
            radius_in: c.radius_in,
            default_rpm: c.default_rpm,
            deadband_native: c.spin_up_deadband_ticks,
        }
    }
}

// ── Open-loop stages ─────────────────────────────────────────────────────────

impl From<&turret_config::FeederCfg> for FeederCfg {
    fn from(c: &turret_config::FeederCfg) -> Self {
        Self {
            output_percent: c.output_percent,
        }
    }
}

impl From<&turret_config::BallTransferCfg> for TransferCfg {
    fn from(c: &turret_config::BallTransferCfg) -> Self {
        Self {
            enabled: c.enabled,
            output_percent: c.output_percent,
        }
    }
}

// ── AimCfg ───────────────────────────────────────────────────────────────────

impl From<&turret_config::AimCfg> for AimCfg {
    fn from(c: &turret_config::AimCfg) -> Self {
        Self {
            use_filter: c.use_filter,
            filter_length: c.filter_length,
        }
    }
}

// ── Whole file ───────────────────────────────────────────────────────────────

impl From<&turret_config::Config> for TurretCfg {
    fn from(c: &turret_config::Config) -> Self {
        Self {
            azimuth: (&c.azimuth).into(),
            elevation: (&c.elevation).into(),
            flywheel: (&c.flywheel).into(),
            feeder: (&c.feeder).into(),
            transfer: (&c.ball_transfer).into(),
            aim: (&c.aim).into(),
        }
    }
}

// ── Runner ───────────────────────────────────────────────────────────────────

impl From<turret_config::OverrunPolicy> for OverrunPolicy {
    fn from(p: turret_config::OverrunPolicy) -> Self {
        match p {
            turret_config::OverrunPolicy::Warn => OverrunPolicy::Warn,
            turret_config::OverrunPolicy::Fatal => OverrunPolicy::Fatal,
        }
    }
}
