//! Swing-derived bounces: a shot implies ball contact at the hit time.

use sportai_models::{BallPositionSample, BounceEvent, BounceKind, SwingEvent};
use tracing::trace;

use super::has_event_near;
use crate::config::BounceInferenceConfig;

/// Ball sample closest in time to `time`.
///
/// Scans forward and stops once samples pass `time + horizon`.
pub fn nearest_sample(
    positions: &[BallPositionSample],
    time: f64,
    horizon: f64,
) -> Option<&BallPositionSample> {
    let mut best: Option<(&BallPositionSample, f64)> = None;

    for sample in positions {
        if sample.timestamp > time + horizon {
            break;
        }
        let diff = (sample.timestamp - time).abs();
        if best.map_or(diff.is_finite(), |(_, best_diff)| diff < best_diff) {
            best = Some((sample, diff));
        }
    }

    best.map(|(sample, _)| sample)
}

/// Synthesize one bounce per fast-enough swing at the nearest ball sample.
///
/// A swing is skipped when no sample lies within `swing_match_window` of the
/// hit, or when a detector or swing-derived event already sits within that
/// window. Returned events carry the hit time and the swinging player.
pub fn infer_swing_bounces(
    positions: &[BallPositionSample],
    swings: &[SwingEvent],
    existing: &[BounceEvent],
    config: &BounceInferenceConfig,
) -> Vec<BounceEvent> {
    let window = config.swing_match_window;
    let mut derived: Vec<BounceEvent> = Vec::new();

    for swing in swings.iter().filter(|s| s.ball_speed > 0.0) {
        let hit = swing.hit_timestamp;

        let Some(sample) = nearest_sample(positions, hit, config.swing_scan_horizon) else {
            continue;
        };
        if (sample.timestamp - hit).abs() > window {
            trace!(hit, nearest = sample.timestamp, "No ball sample near swing");
            continue;
        }

        let duplicate = has_event_near(existing.iter().chain(derived.iter()), hit, window, |e| {
            matches!(e.kind, BounceKind::OriginalDetected | BounceKind::SwingDerived)
        });
        if duplicate {
            trace!(hit, "Swing already covered by a bounce event");
            continue;
        }

        derived.push(BounceEvent::new(
            hit,
            sample.pos(),
            swing.player_id,
            BounceKind::SwingDerived,
        ));
    }

    derived
}
