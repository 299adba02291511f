//! Counters for the inference passes.
//!
//! Nothing is exported unless the host installs a `metrics` recorder.

use metrics::counter;
use sportai_models::BounceKind;

/// Metric names as constants for consistency.
pub mod names {
    pub const BOUNCES_INFERRED_TOTAL: &str = "sportai_bounces_inferred_total";
    pub const BOUNCES_RECLASSIFIED_TOTAL: &str = "sportai_bounces_reclassified_total";
    pub const RALLY_SEEKS_TOTAL: &str = "sportai_rally_seeks_total";
    pub const POSE_KEYPOINTS_DROPPED_TOTAL: &str = "sportai_pose_keypoints_dropped_total";
}

/// Record synthetic bounces accepted by one inference step.
pub fn record_bounces_inferred(kind: BounceKind, count: usize) {
    if count == 0 {
        return;
    }
    let labels = [("kind", kind.as_str().to_string())];
    counter!(names::BOUNCES_INFERRED_TOTAL, &labels).increment(count as u64);
}

/// Record events relabeled by the reclassifier.
pub fn record_reclassified(count: usize) {
    if count > 0 {
        counter!(names::BOUNCES_RECLASSIFIED_TOTAL).increment(count as u64);
    }
}

/// Record a seek issued by the rally navigator.
pub fn record_rally_seek(reason: &'static str) {
    counter!(names::RALLY_SEEKS_TOTAL, "reason" => reason).increment(1);
}

/// Record keypoints dropped below the confidence floor.
pub fn record_keypoints_dropped(count: usize) {
    if count > 0 {
        counter!(names::POSE_KEYPOINTS_DROPPED_TOTAL).increment(count as u64);
    }
}
