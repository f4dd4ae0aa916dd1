//! Vision-driven aim solution.
//!
//! Turns one `VisionSample` plus the axes' measured angles into absolute
//! turret targets. A lost target holds the last solution rather than
//! snapping back toward zero offset.

use turret_traits::VisionSample;

use crate::config::AimCfg;
use crate::filter::SmoothingWindow;

/// Absolute turret angles to drive toward, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimSolution {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
}

#[derive(Debug, Clone)]
pub struct AimController {
    filter: Option<SmoothingWindow>,
    held: Option<AimSolution>,
}

impl AimController {
    pub fn new(cfg: &AimCfg) -> Self {
        Self {
            filter: cfg
                .use_filter
                .then(|| SmoothingWindow::new(cfg.filter_length)),
            held: None,
        }
    }

    /// Compute this tick's solution.
    ///
    /// Only the azimuth offset passes through the smoothing window; elevation
    /// is used raw. Invalid or non-finite samples leave the window untouched
    /// and return the held solution, which is `None` until the first valid
    /// frame.
    pub fn update(
        &mut self,
        sample: &VisionSample,
        azimuth_now_deg: f64,
        elevation_now_deg: f64,
    ) -> Option<AimSolution> {
        let usable = sample.valid
            && sample.azimuth_offset_deg.is_finite()
            && sample.elevation_offset_deg.is_finite();
        if !usable {
            return self.held;
        }
        let az_offset = match self.filter.as_mut() {
            Some(w) => w.push(sample.azimuth_offset_deg),
            None => sample.azimuth_offset_deg,
        };
        let solution = AimSolution {
            azimuth_deg: azimuth_now_deg + az_offset,
            elevation_deg: elevation_now_deg + sample.elevation_offset_deg,
        };
        tracing::trace!(
            az = solution.azimuth_deg,
            el = solution.elevation_deg,
            "aim solution"
        );
        self.held = Some(solution);
        Some(solution)
    }

    pub fn held(&self) -> Option<AimSolution> {
        self.held
    }

    pub fn filtering(&self) -> bool {
        self.filter.is_some()
    }

    /// Empty the window and forget the held solution.
    pub fn reset(&mut self) {
        if let Some(w) = self.filter.as_mut() {
            w.clear();
        }
        self.held = None;
    }
}
