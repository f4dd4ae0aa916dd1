use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("actuator fault: {0}")]
    Fault(String),
    #[error("actuator bus timeout")]
    Timeout,
    #[error("actuator not responding on {0}")]
    Disconnected(&'static str),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
