//! Bounce inference.
//!
//! Extends the detector's sparse bounce list with synthetic events:
//!
//! ```text
//! ┌───────────────┐   ┌──────────────────┐   ┌────────────────────┐
//! │ Detector      │──►│ Swing-derived    │──►│ Trajectory-derived │──► time sort
//! │ bounces       │   │ (hit + nearest   │   │ (velocity reversal │
//! │ (original)    │   │  ball sample)    │   │  / sharp angle)    │
//! └───────────────┘   └──────────────────┘   └────────────────────┘
//! ```
//!
//! Both steps are pure functions of their inputs; each can be switched off
//! in [`BounceInferenceConfig`] without side effects on the other.

mod swing;
mod trajectory;

pub use swing::{infer_swing_bounces, nearest_sample};
pub use trajectory::{classify_window, infer_trajectory_bounces, WindowKinematics};

use sportai_models::{BallPositionSample, BounceEvent, BounceKind, SwingEvent};
use tracing::debug;

use crate::config::BounceInferenceConfig;
use crate::metrics;

/// Merge detector bounces with every enabled synthetic source, sorted by time.
pub fn infer_bounces(
    positions: &[BallPositionSample],
    swings: &[SwingEvent],
    detected: &[BounceEvent],
    config: &BounceInferenceConfig,
) -> Vec<BounceEvent> {
    let mut events = detected.to_vec();

    if config.swing_derived_enabled {
        let derived = infer_swing_bounces(positions, swings, &events, config);
        metrics::record_bounces_inferred(BounceKind::SwingDerived, derived.len());
        events.extend(derived);
    }

    if config.trajectory_derived_enabled {
        let inferred = infer_trajectory_bounces(positions, &events, config);
        for kind in [BounceKind::FloorInferred, BounceKind::WallInferred] {
            metrics::record_bounces_inferred(kind, inferred.iter().filter(|e| e.kind == kind).count());
        }
        events.extend(inferred);
    }

    sort_by_time(&mut events);

    debug!(
        detected = detected.len(),
        total = events.len(),
        "Bounce inference complete"
    );
    events
}

/// Stable sort by timestamp; equal times keep insertion order.
pub fn sort_by_time(events: &mut [BounceEvent]) {
    events.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
}

/// Whether any event passing `filter` lies closer than `window` to `time`.
pub(crate) fn has_event_near<'a>(
    events: impl IntoIterator<Item = &'a BounceEvent>,
    time: f64,
    window: f64,
    filter: impl Fn(&BounceEvent) -> bool,
) -> bool {
    events
        .into_iter()
        .any(|e| filter(e) && (e.timestamp - time).abs() < window)
}
