//! Test and helper mocks for turret_core

use turret_traits::Vision;

/// A vision source that never sees a target; useful for manual-only turrets
/// and for driving the loop without a detector.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoVision;

impl Vision for NoVision {
    fn target_valid(&self) -> bool {
        false
    }
    fn azimuth_offset_deg(&self) -> f64 {
        0.0
    }
    fn elevation_offset_deg(&self) -> f64 {
        0.0
    }
    fn ballistic_velocity_fps(&self) -> f64 {
        0.0
    }
}
