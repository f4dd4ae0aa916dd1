use std::time::Duration;

use thiserror::Error;

use crate::units::UnitError;

#[derive(Debug, Error, Clone)]
pub enum TurretError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("timeout waiting for actuator")]
    Timeout,
    #[error("control tick overran its period by {0:?}")]
    Overrun(Duration),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing azimuth/elevation actuators")]
    MissingAxes,
    #[error("missing flywheel/feeder actuators")]
    MissingLauncher,
    #[error("missing vision source")]
    MissingVision,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("unit conversion: {0}")]
    Units(#[from] UnitError),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
