//! Feeder gate: projectiles only move while the flywheel is at speed.
//!
//! There is no latching. The gate follows the at-speed flag every tick, so a
//! measured velocity hovering on the deadband edge opens and closes the
//! feeder as often as the deadband lets it.

use core::fmt;

use eyre::WrapErr;
use turret_traits::PercentOutput;

use crate::error::Result;
use crate::hw_error::hw_report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeederState {
    #[default]
    Idle,
    Feeding,
    NotAtSpeed,
}

impl FeederState {
    pub fn as_str(self) -> &'static str {
        match self {
            FeederState::Idle => "Doing Nothing",
            FeederState::Feeding => "Feeding",
            FeederState::NotAtSpeed => "Cannot fire: not at speed",
        }
    }
}

impl fmt::Display for FeederState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct FeedInterlock<O: PercentOutput> {
    output: O,
    state: FeederState,
    last_output: f64,
}

impl<O: PercentOutput> fmt::Debug for FeedInterlock<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedInterlock")
            .field("state", &self.state)
            .field("last_output", &self.last_output)
            .finish()
    }
}

impl<O: PercentOutput> FeedInterlock<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            state: FeederState::Idle,
            last_output: 0.0,
        }
    }

    /// Feed at `percent` when `at_speed`, otherwise hold the feeder at zero.
    pub fn tick(&mut self, at_speed: bool, percent: f64) -> Result<FeederState> {
        if at_speed {
            let pct = if percent.is_finite() {
                percent.clamp(-1.0, 1.0)
            } else {
                0.0
            };
            self.write(pct)?;
            self.transition(FeederState::Feeding);
        } else {
            self.write(0.0)?;
            self.transition(FeederState::NotAtSpeed);
        }
        Ok(self.state)
    }

    /// Not shooting: zero output.
    pub fn idle(&mut self) -> Result<FeederState> {
        self.write(0.0)?;
        self.transition(FeederState::Idle);
        Ok(self.state)
    }

    pub fn state(&self) -> FeederState {
        self.state
    }

    pub fn last_output(&self) -> f64 {
        self.last_output
    }

    fn write(&mut self, pct: f64) -> Result<()> {
        self.output
            .set_output(pct)
            .map_err(hw_report)
            .wrap_err("feeder set_output")?;
        self.last_output = pct;
        Ok(())
    }

    fn transition(&mut self, next: FeederState) {
        if next == self.state {
            return;
        }
        match next {
            FeederState::NotAtSpeed => tracing::warn!(state = %next, "feeder held"),
            _ => tracing::info!(from = %self.state, to = %next, "feeder state"),
        }
        self.state = next;
    }
}
