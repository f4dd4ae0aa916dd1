//! Per-tick commands and the telemetry snapshot committed after each tick.

use crate::feed::FeederState;
use crate::transfer::TransferState;

/// How the axes are driven this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AimMode {
    /// Keep the current targets; no drift.
    #[default]
    Hold,
    /// Operator slewing, each rate a fraction of the full turn rate.
    Manual {
        azimuth_rate: f64,
        elevation_rate: f64,
    },
    /// Track the vision target and spin the flywheel to the ballistic velocity.
    Auto,
}

impl AimMode {
    pub fn name(&self) -> &'static str {
        match self {
            AimMode::Hold => "hold",
            AimMode::Manual { .. } => "manual",
            AimMode::Auto => "auto",
        }
    }

    pub(crate) fn same_kind(&self, other: &AimMode) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }
}

/// Operator intent for one control period.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TurretCommand {
    pub aim: AimMode,
    /// Shooting intent: gates both the feed interlock and the ball transfer.
    pub fire: bool,
}

impl TurretCommand {
    pub fn hold() -> Self {
        Self::default()
    }

    pub fn manual(azimuth_rate: f64, elevation_rate: f64) -> Self {
        Self {
            aim: AimMode::Manual {
                azimuth_rate,
                elevation_rate,
            },
            fire: false,
        }
    }

    pub fn auto() -> Self {
        Self {
            aim: AimMode::Auto,
            fire: false,
        }
    }

    pub fn firing(mut self, fire: bool) -> Self {
        self.fire = fire;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisTelemetry {
    pub target_ticks: f64,
    pub target_deg: f64,
    pub commanded_ticks: Option<i32>,
    pub measured_deg: f64,
    /// The last target mutation hit a soft limit.
    pub clamped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlywheelTelemetry {
    pub setpoint_native: f64,
    pub measured_native: f64,
    pub setpoint_rpm: f64,
    pub measured_rpm: f64,
    pub at_speed: bool,
}

/// Values as of the last completed tick. Never reflects a tick in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TurretTelemetry {
    pub tick: u64,
    pub mode: &'static str,
    pub vision_valid: bool,
    pub azimuth: AxisTelemetry,
    pub elevation: AxisTelemetry,
    pub flywheel: FlywheelTelemetry,
    pub feeder: FeederState,
    pub transfer: TransferState,
    pub shooting: bool,
    pub feeding: bool,
}
