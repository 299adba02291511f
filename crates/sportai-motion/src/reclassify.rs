//! Event reclassification.
//!
//! A passive floor/wall bounce followed by a bounce on the other side of the
//! net means the ball crossed the net. Without a shot in between that is
//! impossible, so the first event was really a shot the swing detector
//! missed and gets relabeled [`BounceKind::SwingInferred`].

use serde::{Deserialize, Serialize};
use sportai_models::{BounceEvent, BounceKind, CourtPos, SwingEvent};
use tracing::debug;

use crate::bounce::sort_by_time;
use crate::config::BounceInferenceConfig;
use crate::metrics;

/// Side of the net a court position lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourtHalf {
    /// `y < net_y`, away from the camera
    Far,
    /// `y >= net_y`, toward the camera
    Near,
}

impl CourtHalf {
    /// Half containing `pos` for a net at `net_y`.
    pub fn of(pos: CourtPos, net_y: f64) -> Self {
        if pos.y < net_y {
            CourtHalf::Far
        } else {
            CourtHalf::Near
        }
    }
}

/// Whether any swing hit lies strictly between `start` and `end`.
fn swing_between(swings: &[SwingEvent], start: f64, end: f64) -> bool {
    swings
        .iter()
        .any(|s| s.hit_timestamp > start && s.hit_timestamp < end)
}

/// Relabel impossible passive bounces as inferred swings.
///
/// Works on a time-sorted copy in a single left-to-right pass over adjacent
/// pairs; the input slice is left untouched and each event is judged once
/// against its original successor.
pub fn reclassify(
    events: &[BounceEvent],
    swings: &[SwingEvent],
    config: &BounceInferenceConfig,
) -> Vec<BounceEvent> {
    let mut sorted = events.to_vec();
    sort_by_time(&mut sorted);

    let relabeled: Vec<BounceEvent> = sorted
        .iter()
        .enumerate()
        .map(|(i, curr)| {
            let Some(next) = sorted.get(i + 1) else {
                return *curr;
            };
            if !curr.kind.is_trajectory_inferred() {
                return *curr;
            }
            if CourtHalf::of(curr.court_pos, config.net_y) == CourtHalf::of(next.court_pos, config.net_y) {
                return *curr;
            }
            if swing_between(swings, curr.timestamp, next.timestamp) {
                return *curr;
            }
            curr.with_kind(BounceKind::SwingInferred)
        })
        .collect();

    let changed = relabeled
        .iter()
        .zip(sorted.iter())
        .filter(|(after, before)| after.kind != before.kind)
        .count();
    metrics::record_reclassified(changed);
    debug!(events = relabeled.len(), reclassified = changed, "Reclassification complete");

    relabeled
}
