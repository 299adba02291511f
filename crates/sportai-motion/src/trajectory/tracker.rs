//! Pose keypoint intake for joint trajectories.

use std::collections::BTreeMap;

use sportai_models::{Joint, JointSample, PoseFrame};
use tracing::{debug, trace};

use super::overlay::{build_overlay, TrajectoryOverlay};
use super::track::JointTrack;
use crate::config::TrajectoryConfig;
use crate::metrics;

/// Collects confident keypoints for the tracked joints.
///
/// Must be fed from a single tick source at a time; the animation loop and
/// seek handlers converge on [`JointTracker::record_frame`].
#[derive(Debug, Clone)]
pub struct JointTracker {
    config: TrajectoryConfig,
    tracks: BTreeMap<Joint, JointTrack>,
    active: bool,
}

impl JointTracker {
    /// Create an inactive tracker with no joints selected.
    pub fn new(config: TrajectoryConfig) -> Self {
        Self {
            config,
            tracks: BTreeMap::new(),
            active: false,
        }
    }

    /// Start following `joint`. Existing samples are kept.
    pub fn track_joint(&mut self, joint: Joint) {
        let capacity = self.config.max_samples;
        self.tracks
            .entry(joint)
            .or_insert_with(|| JointTrack::new(capacity));
    }

    /// Stop following `joint` and drop its samples.
    pub fn untrack_joint(&mut self, joint: Joint) -> bool {
        self.tracks.remove(&joint).is_some()
    }

    /// Joints currently followed.
    pub fn tracked_joints(&self) -> impl Iterator<Item = Joint> + '_ {
        self.tracks.keys().copied()
    }

    pub fn start(&mut self) {
        self.active = true;
    }

    /// Stop recording; collected samples remain drawable.
    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Drop every collected sample, keeping the joint selection.
    pub fn clear(&mut self) {
        self.tracks.values_mut().for_each(JointTrack::clear);
    }

    /// Record one pose frame. Returns the number of samples stored.
    ///
    /// Keypoints at or below the confidence floor are excluded, not
    /// interpolated.
    pub fn record_frame(&mut self, frame: &PoseFrame) -> usize {
        if !self.active {
            return 0;
        }

        let min_confidence = self.config.min_confidence;
        let mut stored = 0;
        let mut dropped = 0;

        for (joint, track) in self.tracks.iter_mut() {
            let Some(kp) = frame.keypoint(*joint) else {
                continue;
            };
            if !(kp.score > min_confidence) || !kp.x.is_finite() || !kp.y.is_finite() {
                trace!(?joint, score = kp.score, frame = frame.frame_index, "Keypoint dropped");
                dropped += 1;
                continue;
            }
            if track.push(JointSample::new(kp.x, kp.y, frame.frame_index)) {
                stored += 1;
            }
        }

        metrics::record_keypoints_dropped(dropped);
        stored
    }

    /// Samples collected for `joint`, oldest first.
    pub fn samples(&self, joint: Joint) -> Vec<JointSample> {
        self.tracks.get(&joint).map(JointTrack::to_vec).unwrap_or_default()
    }

    /// Overlay for `joint`, or `None` if it is not tracked.
    pub fn overlay(&self, joint: Joint) -> Option<TrajectoryOverlay> {
        let track = self.tracks.get(&joint)?;
        let overlay = build_overlay(&track.to_vec(), &self.config);
        debug!(
            ?joint,
            samples = track.len(),
            points = overlay.path.len(),
            "Built joint overlay"
        );
        Some(overlay)
    }
}
