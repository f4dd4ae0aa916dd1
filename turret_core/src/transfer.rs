//! Ball-transfer stage feeding stored projectiles toward the feeder.
//!
//! It has no interlock of its own: the caller gates it with the same fire
//! intent as the feeder, and it never looks at the flywheel.

use core::fmt;

use eyre::WrapErr;
use turret_traits::PercentOutput;

use crate::config::TransferCfg;
use crate::error::Result;
use crate::hw_error::hw_report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferState {
    #[default]
    Idle,
    Firing,
    Disabled,
}

impl TransferState {
    pub fn as_str(self) -> &'static str {
        match self {
            TransferState::Idle => "Doing nothing",
            TransferState::Firing => "Firing",
            TransferState::Disabled => "Cannot fire: ball transfer is not enabled",
        }
    }
}

impl fmt::Display for TransferState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct BallTransfer<O: PercentOutput> {
    output: O,
    enabled: bool,
    state: TransferState,
}

impl<O: PercentOutput> fmt::Debug for BallTransfer<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BallTransfer")
            .field("enabled", &self.enabled)
            .field("state", &self.state)
            .finish()
    }
}

impl<O: PercentOutput> BallTransfer<O> {
    pub fn new(output: O, cfg: &TransferCfg) -> Self {
        Self {
            output,
            enabled: cfg.enabled,
            state: TransferState::Idle,
        }
    }

    /// Run the stage at `fraction`. A disabled stage stays at zero.
    pub fn fire(&mut self, fraction: f64) -> Result<TransferState> {
        if !self.enabled {
            self.write(0.0)?;
            if self.state != TransferState::Disabled {
                tracing::warn!("ball transfer is not enabled");
            }
            self.state = TransferState::Disabled;
            return Ok(self.state);
        }
        let pct = if fraction.is_finite() {
            fraction.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        self.write(pct)?;
        self.state = TransferState::Firing;
        Ok(self.state)
    }

    pub fn do_not_fire(&mut self) -> Result<TransferState> {
        self.write(0.0)?;
        self.state = TransferState::Idle;
        Ok(self.state)
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    fn write(&mut self, pct: f64) -> Result<()> {
        self.output
            .set_output(pct)
            .map_err(hw_report)
            .wrap_err("ball transfer set_output")
    }
}
