//! Simulated turret hardware.
//!
//! Every simulated device shares its state with a cloneable probe so tests and
//! the CLI can observe what the control loop commanded, nudge measurements, or
//! inject faults without owning the device.

pub mod error;

use crate::error::HwError;
use std::cell::RefCell;
use std::rc::Rc;
use turret_traits::{PercentOutput, PositionActuator, VelocityActuator, Vision, VisionSample};

// ── Position actuator ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct PositionState {
    target: Option<i32>,
    measured: f64,
    slew_per_command: f64,
    hw_limits: Option<(i32, i32)>,
    commands: u64,
    fault: Option<String>,
}

/// Position-mode actuator whose measured position slews toward the last target
/// by at most `slew_per_command` ticks per command.
pub struct SimPositionActuator {
    name: &'static str,
    state: Rc<RefCell<PositionState>>,
}

impl SimPositionActuator {
    pub fn new(name: &'static str, slew_per_command: f64) -> Self {
        Self {
            name,
            state: Rc::new(RefCell::new(PositionState {
                slew_per_command: slew_per_command.abs(),
                ..PositionState::default()
            })),
        }
    }

    pub fn probe(&self) -> SimPositionProbe {
        SimPositionProbe {
            state: Rc::clone(&self.state),
        }
    }
}

impl PositionActuator for SimPositionActuator {
    fn set_position_target(
        &mut self,
        ticks: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut s = self.state.borrow_mut();
        if let Some(msg) = &s.fault {
            return Err(Box::new(HwError::Fault(format!("{}: {msg}", self.name))));
        }
        let target = match s.hw_limits {
            Some((reverse, forward)) => ticks.clamp(reverse, forward),
            None => ticks,
        };
        s.target = Some(target);
        s.commands += 1;
        let err = f64::from(target) - s.measured;
        let step = err.clamp(-s.slew_per_command, s.slew_per_command);
        s.measured += step;
        tracing::trace!(device = self.name, target, measured = s.measured, "sim position");
        Ok(())
    }

    fn measured_position(&mut self) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        let s = self.state.borrow();
        if s.fault.is_some() {
            return Err(Box::new(HwError::Disconnected(self.name)));
        }
        Ok(s.measured.round() as i32)
    }

    fn configure_soft_limits(
        &mut self,
        forward_ticks: i32,
        reverse_ticks: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut s = self.state.borrow_mut();
        s.hw_limits = Some((reverse_ticks.min(forward_ticks), forward_ticks.max(reverse_ticks)));
        tracing::debug!(
            device = self.name,
            forward_ticks,
            reverse_ticks,
            "sim hardware soft limits set"
        );
        Ok(())
    }
}

/// Shared view into a `SimPositionActuator`.
#[derive(Clone)]
pub struct SimPositionProbe {
    state: Rc<RefCell<PositionState>>,
}

impl SimPositionProbe {
    pub fn last_target(&self) -> Option<i32> {
        self.state.borrow().target
    }
    pub fn measured(&self) -> f64 {
        self.state.borrow().measured
    }
    pub fn set_measured(&self, ticks: f64) {
        self.state.borrow_mut().measured = ticks;
    }
    pub fn commands(&self) -> u64 {
        self.state.borrow().commands
    }
    pub fn hw_limits(&self) -> Option<(i32, i32)> {
        self.state.borrow().hw_limits
    }
    pub fn inject_fault(&self, msg: impl Into<String>) {
        self.state.borrow_mut().fault = Some(msg.into());
    }
    pub fn clear_fault(&self) {
        self.state.borrow_mut().fault = None;
    }
}

// ── Velocity actuator ────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct VelocityState {
    setpoint: f64,
    measured: f64,
    response: f64,
    commands: u64,
    fault: Option<String>,
}

/// Within this many native units the simulated wheel locks onto its setpoint.
const SETTLE_NATIVE: f64 = 1.0;

/// Velocity-mode actuator with a first-order lag: each command moves the
/// measured velocity `response` of the way toward the setpoint, settling
/// exactly once it is within one native unit.
pub struct SimVelocityActuator {
    name: &'static str,
    state: Rc<RefCell<VelocityState>>,
}

impl SimVelocityActuator {
    pub fn new(name: &'static str, response: f64) -> Self {
        Self {
            name,
            state: Rc::new(RefCell::new(VelocityState {
                response: response.clamp(0.0, 1.0),
                ..VelocityState::default()
            })),
        }
    }

    pub fn probe(&self) -> SimVelocityProbe {
        SimVelocityProbe {
            state: Rc::clone(&self.state),
        }
    }
}

impl VelocityActuator for SimVelocityActuator {
    fn set_velocity_target(
        &mut self,
        native_per_100ms: f64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut s = self.state.borrow_mut();
        if let Some(msg) = &s.fault {
            return Err(Box::new(HwError::Fault(format!("{}: {msg}", self.name))));
        }
        s.setpoint = native_per_100ms;
        s.commands += 1;
        let err = s.setpoint - s.measured;
        if err.abs() <= SETTLE_NATIVE {
            s.measured = s.setpoint;
        } else {
            s.measured += err * s.response;
        }
        tracing::trace!(
            device = self.name,
            setpoint = s.setpoint,
            measured = s.measured,
            "sim velocity"
        );
        Ok(())
    }

    fn measured_velocity(&mut self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        let s = self.state.borrow();
        if s.fault.is_some() {
            return Err(Box::new(HwError::Timeout));
        }
        Ok(s.measured)
    }
}

#[derive(Clone)]
pub struct SimVelocityProbe {
    state: Rc<RefCell<VelocityState>>,
}

impl SimVelocityProbe {
    pub fn setpoint(&self) -> f64 {
        self.state.borrow().setpoint
    }
    pub fn measured(&self) -> f64 {
        self.state.borrow().measured
    }
    pub fn set_measured(&self, native_per_100ms: f64) {
        self.state.borrow_mut().measured = native_per_100ms;
    }
    pub fn commands(&self) -> u64 {
        self.state.borrow().commands
    }
    pub fn inject_fault(&self, msg: impl Into<String>) {
        self.state.borrow_mut().fault = Some(msg.into());
    }
}

// ── Percent-output actuator ──────────────────────────────────────────────────

#[derive(Debug, Default)]
struct OutputState {
    output: f64,
    writes: u64,
    fault: Option<String>,
}

/// Open-loop actuator that records the last commanded duty fraction.
pub struct SimPercentOutput {
    name: &'static str,
    state: Rc<RefCell<OutputState>>,
}

impl SimPercentOutput {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Rc::new(RefCell::new(OutputState::default())),
        }
    }

    pub fn probe(&self) -> SimOutputProbe {
        SimOutputProbe {
            state: Rc::clone(&self.state),
        }
    }
}

impl PercentOutput for SimPercentOutput {
    fn set_output(&mut self, fraction: f64) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut s = self.state.borrow_mut();
        if let Some(msg) = &s.fault {
            return Err(Box::new(HwError::Fault(format!("{}: {msg}", self.name))));
        }
        s.output = fraction.clamp(-1.0, 1.0);
        s.writes += 1;
        Ok(())
    }
}

#[derive(Clone)]
pub struct SimOutputProbe {
    state: Rc<RefCell<OutputState>>,
}

impl SimOutputProbe {
    pub fn output(&self) -> f64 {
        self.state.borrow().output
    }
    pub fn writes(&self) -> u64 {
        self.state.borrow().writes
    }
    pub fn inject_fault(&self, msg: impl Into<String>) {
        self.state.borrow_mut().fault = Some(msg.into());
    }
}

// ── Vision ───────────────────────────────────────────────────────────────────

/// Vision source replaying a fixed list of frames, one per `refresh`. The
/// first refresh publishes the first frame and the last frame repeats once
/// the script is exhausted. An empty script reports no target.
#[derive(Debug, Clone, Default)]
pub struct ScriptedVision {
    frames: Vec<VisionSample>,
    // None until the first refresh; frame 0 is visible either way.
    idx: Option<usize>,
}

impl ScriptedVision {
    pub fn new(frames: Vec<VisionSample>) -> Self {
        Self { frames, idx: None }
    }

    pub fn constant(sample: VisionSample) -> Self {
        Self::new(vec![sample])
    }

    fn current(&self) -> VisionSample {
        self.frames
            .get(self.idx.unwrap_or(0))
            .or_else(|| self.frames.last())
            .copied()
            .unwrap_or_default()
    }
}

impl Vision for ScriptedVision {
    fn target_valid(&self) -> bool {
        self.current().valid
    }
    fn azimuth_offset_deg(&self) -> f64 {
        self.current().azimuth_offset_deg
    }
    fn elevation_offset_deg(&self) -> f64 {
        self.current().elevation_offset_deg
    }
    fn ballistic_velocity_fps(&self) -> f64 {
        self.current().ballistic_velocity_fps
    }

    fn refresh(&mut self) {
        let last = self.frames.len().saturating_sub(1);
        self.idx = Some(match self.idx {
            None => 0,
            Some(i) => (i + 1).min(last),
        });
    }
}
