pub mod clock;
pub mod tuning;

pub use clock::{Clock, MonotonicClock};
pub use tuning::Tuning;

/// Actuator driven in position-tracking (closed-loop position) mode.
///
/// Positions are in actuator native units (encoder ticks).
pub trait PositionActuator {
    fn set_position_target(
        &mut self,
        ticks: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    fn measured_position(&mut self) -> Result<i32, Box<dyn std::error::Error + Send + Sync>>;

    /// Forward soft limits to the device as a second line of defense.
    /// Drivers without hardware limits keep the default no-op.
    fn configure_soft_limits(
        &mut self,
        _forward_ticks: i32,
        _reverse_ticks: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }
}

/// Actuator driven in closed-loop velocity mode.
///
/// Velocities are in native units per 100 ms sampling period.
pub trait VelocityActuator {
    fn set_velocity_target(
        &mut self,
        native_per_100ms: f64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    fn measured_velocity(&mut self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>>;
}

/// Actuator driven open-loop by a duty fraction in `[-1, 1]`.
pub trait PercentOutput {
    fn set_output(&mut self, fraction: f64) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// One frame of target information published by the vision collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VisionSample {
    pub valid: bool,
    pub azimuth_offset_deg: f64,
    pub elevation_offset_deg: f64,
    pub ballistic_velocity_fps: f64,
}

/// Vision target detector, refreshed at least once per control period.
pub trait Vision {
    fn target_valid(&self) -> bool;
    fn azimuth_offset_deg(&self) -> f64;
    fn elevation_offset_deg(&self) -> f64;
    fn ballistic_velocity_fps(&self) -> f64;

    /// Advance to the next frame. Live detectors publish on their own and keep the default.
    fn refresh(&mut self) {}

    /// Snapshot of the current frame.
    fn sample(&self) -> VisionSample {
        VisionSample {
            valid: self.target_valid(),
            azimuth_offset_deg: self.azimuth_offset_deg(),
            elevation_offset_deg: self.elevation_offset_deg(),
            ballistic_velocity_fps: self.ballistic_velocity_fps(),
        }
    }
}

impl<T: PositionActuator + ?Sized> PositionActuator for Box<T> {
    fn set_position_target(
        &mut self,
        ticks: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).set_position_target(ticks)
    }
    fn measured_position(&mut self) -> Result<i32, Box<dyn std::error::Error + Send + Sync>> {
        (**self).measured_position()
    }
    fn configure_soft_limits(
        &mut self,
        forward_ticks: i32,
        reverse_ticks: i32,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).configure_soft_limits(forward_ticks, reverse_ticks)
    }
}

impl<T: VelocityActuator + ?Sized> VelocityActuator for Box<T> {
    fn set_velocity_target(
        &mut self,
        native_per_100ms: f64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).set_velocity_target(native_per_100ms)
    }
    fn measured_velocity(&mut self) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        (**self).measured_velocity()
    }
}

impl<T: PercentOutput + ?Sized> PercentOutput for Box<T> {
    fn set_output(&mut self, fraction: f64) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).set_output(fraction)
    }
}

impl<T: Vision + ?Sized> Vision for Box<T> {
    fn target_valid(&self) -> bool {
        (**self).target_valid()
    }
    fn azimuth_offset_deg(&self) -> f64 {
        (**self).azimuth_offset_deg()
    }
    fn elevation_offset_deg(&self) -> f64 {
        (**self).elevation_offset_deg()
    }
    fn ballistic_velocity_fps(&self) -> f64 {
        (**self).ballistic_velocity_fps()
    }
    fn refresh(&mut self) {
        (**self).refresh()
    }
    fn sample(&self) -> VisionSample {
        (**self).sample()
    }
}
