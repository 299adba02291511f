//! Renderer-facing trajectory overlay.

use serde::{Deserialize, Serialize};
use sportai_models::JointSample;

use super::smoother::{smooth_path, PathPoint};
use crate::config::TrajectoryConfig;

/// What the renderer draws for one joint.
///
/// `path` is stroked as one continuous line; `markers` are the sparse raw
/// samples drawn on top so real data stays distinguishable from
/// interpolation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectoryOverlay {
    pub path: Vec<PathPoint>,
    pub markers: Vec<PathPoint>,
}

impl TrajectoryOverlay {
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Smooth `samples` and pick every `marker_stride`-th one as a marker.
pub fn build_overlay(samples: &[JointSample], config: &TrajectoryConfig) -> TrajectoryOverlay {
    TrajectoryOverlay {
        path: smooth_path(samples, config),
        markers: samples
            .iter()
            .step_by(config.marker_stride.max(1))
            .map(PathPoint::from)
            .collect(),
    }
}
