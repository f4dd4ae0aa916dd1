//! Configuration types for the turret engine.
//!
//! These are the runtime configuration structs used by `TurretCore`.
//! They are separate from the TOML-deserialized config in `turret_config`.

/// Geometry and limits of one geared position axis.
#[derive(Debug, Clone)]
pub struct GearedAxisConfig {
    /// Encoder ticks per motor revolution.
    pub ticks_per_revolution: f64,
    /// Turret revolutions per motor revolution.
    pub gear_ratio: f64,
    /// `(min, max)` turret degrees; `None` disables software clamping.
    pub soft_limit_deg: Option<(f64, f64)>,
    /// Slew rate at full stick (turret degrees per second) when no live value is tuned.
    pub default_turn_rate_deg_per_s: f64,
}

impl Default for GearedAxisConfig {
    fn default() -> Self {
        Self {
            ticks_per_revolution: 4096.0,
            gear_ratio: 1.0,
            soft_limit_deg: None,
            default_turn_rate_deg_per_s: 45.0,
        }
    }
}

/// Flywheel geometry and spin-up tolerance.
#[derive(Debug, Clone)]
pub struct FlywheelCfg {
    pub ticks_per_revolution: f64,
    /// Motor revolutions per flywheel revolution.
    pub gear_ratio: f64,
    pub radius_in: f64,
    pub default_rpm: f64,
    /// At-speed window above the setpoint, native units per 100 ms.
    pub deadband_native: f64,
}

impl Default for FlywheelCfg {
    fn default() -> Self {
        Self {
            ticks_per_revolution: 2048.0,
            gear_ratio: 1.0,
            radius_in: 2.0,
            default_rpm: 4000.0,
            deadband_native: 200.0,
        }
    }
}

#[derive(Debug, Clone)]
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

#[derive(Debug, Clone)]
pub struct TransferCfg {
    pub enabled: bool,
    pub output_percent: f64,
}

impl Default for TransferCfg {
    fn default() -> Self {
        Self {
            enabled: true,
            output_percent: 0.5,
        }
    }
}

/// Vision handling for auto-aim.
#[derive(Debug, Clone)]
pub struct AimCfg {
    /// Smooth the azimuth offset before use; elevation is never smoothed.
    pub use_filter: bool,
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

/// Everything the builder needs besides the devices.
#[derive(Debug, Clone, Default)]
pub struct TurretCfg {
    pub azimuth: GearedAxisConfig,
    pub elevation: GearedAxisConfig,
    pub flywheel: FlywheelCfg,
    pub feeder: FeederCfg,
    pub transfer: TransferCfg,
    pub aim: AimCfg,
}
