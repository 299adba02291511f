//! Trajectory-derived bounces from the dense ball track.
//!
//! Each candidate sample is judged from its neighbours: a vertical velocity
//! flip inside the court is a floor bounce, a horizontal flip next to a side
//! edge is a wall bounce, and any remaining sharp direction change falls
//! back to a position-based guess.

use sportai_models::{BallPositionSample, BounceEvent, BounceKind};
use tracing::{debug, trace};

use super::has_event_near;
use crate::config::BounceInferenceConfig;

/// Velocities and turn angle around one candidate sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowKinematics {
    /// Horizontal velocity into the sample (units/s)
    pub vel_x_before: f64,
    /// Horizontal velocity out of the sample
    pub vel_x_after: f64,
    /// Vertical velocity into the sample, positive = falling
    pub vel_y_before: f64,
    /// Vertical velocity out of the sample
    pub vel_y_after: f64,
    /// Angle between incoming and outgoing displacement, degrees
    pub angle_degrees: f64,
}

impl WindowKinematics {
    /// Compute kinematics for `curr` given its neighbours.
    ///
    /// Returns `None` for non-finite samples or non-increasing timestamps,
    /// so malformed data skips the candidate instead of classifying it.
    pub fn from_samples(
        prev: &BallPositionSample,
        curr: &BallPositionSample,
        next: &BallPositionSample,
    ) -> Option<Self> {
        if !(prev.is_finite() && curr.is_finite() && next.is_finite()) {
            return None;
        }
        let dt_before = curr.timestamp - prev.timestamp;
        let dt_after = next.timestamp - curr.timestamp;
        if dt_before <= 0.0 || dt_after <= 0.0 {
            return None;
        }

        let (in_x, in_y) = (curr.x - prev.x, curr.y - prev.y);
        let (out_x, out_y) = (next.x - curr.x, next.y - curr.y);

        Some(Self {
            vel_x_before: in_x / dt_before,
            vel_x_after: out_x / dt_after,
            vel_y_before: in_y / dt_before,
            vel_y_after: out_y / dt_after,
            angle_degrees: angle_between(in_x, in_y, out_x, out_y),
        })
    }
}

/// Angle between two vectors in degrees; 0 when either has no length.
fn angle_between(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let norm = (ax * ax + ay * ay).sqrt() * (bx * bx + by * by).sqrt();
    if norm <= f64::EPSILON {
        return 0.0;
    }
    let cos = ((ax * bx + ay * by) / norm).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Classify the middle sample of a three-sample window, if it is a bounce.
pub fn classify_window(
    prev: &BallPositionSample,
    curr: &BallPositionSample,
    next: &BallPositionSample,
    config: &BounceInferenceConfig,
) -> Option<BounceKind> {
    let k = WindowKinematics::from_samples(prev, curr, next)?;

    let falling = k.vel_y_before > config.vertical_velocity_threshold;
    let rising = k.vel_y_after < -config.vertical_velocity_threshold * config.rebound_ratio;
    if falling && rising && config.inside_court(curr.y) {
        return Some(BounceKind::FloorInferred);
    }

    let h = config.horizontal_velocity_threshold;
    let reversal = h * config.horizontal_reversal_ratio;
    let reversed = (k.vel_x_before > h && k.vel_x_after < -reversal)
        || (k.vel_x_before < -h && k.vel_x_after > reversal);
    if reversed && config.near_side_wall(curr.x) {
        return Some(BounceKind::WallInferred);
    }

    // Any sharp turn gets a classification; mid-court defaults to floor.
    if k.angle_degrees > config.sharp_angle_degrees {
        return Some(if config.near_side_wall(curr.x) {
            BounceKind::WallInferred
        } else {
            BounceKind::FloorInferred
        });
    }

    None
}

/// Scan the ball track for floor/wall bounces.
///
/// `accepted` holds events that already exist (detector and swing-derived);
/// candidates closer than `trajectory_dedup_window` to any of them, or to a
/// bounce accepted earlier in this scan, are skipped.
pub fn infer_trajectory_bounces(
    positions: &[BallPositionSample],
    accepted: &[BounceEvent],
    config: &BounceInferenceConfig,
) -> Vec<BounceEvent> {
    let margin = config.window_margin.max(1);
    let n = positions.len();
    if n < margin.saturating_mul(2).saturating_add(1) {
        return Vec::new();
    }

    let window = config.trajectory_dedup_window;
    let mut inferred: Vec<BounceEvent> = Vec::new();
    let mut i = margin;

    while i < n - margin {
        let curr = &positions[i];

        if has_event_near(accepted.iter().chain(inferred.iter()), curr.timestamp, window, |_| true) {
            i += 1;
            continue;
        }

        if let Some(kind) = classify_window(&positions[i - 1], curr, &positions[i + 1], config) {
            trace!(t = curr.timestamp, x = curr.x, y = curr.y, %kind, "Trajectory bounce");
            inferred.push(BounceEvent::unattributed(curr.timestamp, curr.pos(), kind));
            i = i.saturating_add(config.skip_after_accept);
        }
        i = i.saturating_add(1);
    }

    debug!(
        samples = n,
        inferred = inferred.len(),
        "Trajectory bounce scan complete"
    );
    inferred
}

#[cfg(test)]
mod tests {
    use super::*;
    use sportai_models::CourtPos;

    fn s(t: f64, x: f64, y: f64) -> BallPositionSample {
        BallPositionSample::new(t, x, y)
    }

    fn config() -> BounceInferenceConfig {
        BounceInferenceConfig::default()
    }

    #[test]
    fn test_fall_then_rise_is_floor_bounce() {
        let (a, b, c) = (s(0.0, 0.5, 0.3), s(0.1, 0.5, 0.6), s(0.2, 0.5, 0.4));

        let k = WindowKinematics::from_samples(&a, &b, &c).unwrap();
        assert!((k.vel_y_before - 3.0).abs() < 1e-9);
        assert!((k.vel_y_after + 2.0).abs() < 1e-9);

        assert_eq!(classify_window(&a, &b, &c, &config()), Some(BounceKind::FloorInferred));
    }

    #[test]
    fn test_floor_bounce_outside_court_falls_back_to_angle() {
        // Vertical flip at y = 0.97 is outside the court span, but the
        // reversal is a 180 degree turn so the fallback still fires.
        let (a, b, c) = (s(0.0, 0.5, 0.7), s(0.1, 0.5, 0.97), s(0.2, 0.5, 0.8));
        assert_eq!(classify_window(&a, &b, &c, &config()), Some(BounceKind::FloorInferred));
    }

    #[test]
    fn test_side_wall_reversal() {
        let (a, b, c) = (s(0.0, 0.8, 0.5), s(0.1, 0.9, 0.5), s(0.2, 0.85, 0.5));
        assert_eq!(classify_window(&a, &b, &c, &config()), Some(BounceKind::WallInferred));

        let (a, b, c) = (s(0.0, 0.2, 0.5), s(0.1, 0.1, 0.5), s(0.2, 0.14, 0.5));
        assert_eq!(classify_window(&a, &b, &c, &config()), Some(BounceKind::WallInferred));
    }

    #[test]
    fn test_sharp_turn_mid_court_defaults_to_floor() {
        // 90 degree turn, no qualifying velocity flip.
        let (a, b, c) = (s(0.0, 0.4, 0.5), s(0.1, 0.5, 0.5), s(0.2, 0.5, 0.45));
        assert_eq!(classify_window(&a, &b, &c, &config()), Some(BounceKind::FloorInferred));
    }

    #[test]
    fn test_gentle_curve_is_not_a_bounce() {
        let (a, b, c) = (s(0.0, 0.40, 0.40), s(0.1, 0.45, 0.43), s(0.2, 0.50, 0.47));
        assert_eq!(classify_window(&a, &b, &c, &config()), None);
    }

    #[test]
    fn test_nan_sample_is_skipped() {
        let (a, b, c) = (s(0.0, 0.5, 0.3), s(0.1, f64::NAN, 0.6), s(0.2, 0.5, 0.4));
        assert_eq!(classify_window(&a, &b, &c, &config()), None);
    }

    #[test]
    fn test_non_increasing_time_is_skipped() {
        let (a, b, c) = (s(0.1, 0.5, 0.3), s(0.1, 0.5, 0.6), s(0.2, 0.5, 0.4));
        assert!(WindowKinematics::from_samples(&a, &b, &c).is_none());
    }

    #[test]
    fn test_scan_respects_margins() {
        // The bounce sits at index 1: inside the leading margin.
        let positions = vec![
            s(0.0, 0.5, 0.3),
            s(0.1, 0.5, 0.6),
            s(0.2, 0.5, 0.4),
            s(0.3, 0.5, 0.2),
            s(0.4, 0.5, 0.1),
        ];
        assert!(infer_trajectory_bounces(&positions, &[], &config()).is_empty());

        let short = vec![s(0.0, 0.5, 0.3), s(0.1, 0.5, 0.6), s(0.2, 0.5, 0.4)];
        assert!(infer_trajectory_bounces(&short, &[], &config()).is_empty());
    }

    #[test]
    fn test_scan_finds_bounce_inside_window() {
        let positions = vec![
            s(0.0, 0.5, 0.1),
            s(0.1, 0.5, 0.3),
            s(0.2, 0.5, 0.6),
            s(0.3, 0.5, 0.4),
            s(0.4, 0.5, 0.2),
        ];
        let inferred = infer_trajectory_bounces(&positions, &[], &config());
        assert_eq!(inferred.len(), 1);
        assert_eq!(inferred[0].kind, BounceKind::FloorInferred);
        assert_eq!(inferred[0].court_pos, CourtPos::new(0.5, 0.6));
        assert!(!inferred[0].is_attributed());
    }

    #[test]
    fn test_scan_skips_near_existing_event() {
        let positions = vec![
            s(0.0, 0.5, 0.1),
            s(0.1, 0.5, 0.3),
            s(0.2, 0.5, 0.6),
            s(0.3, 0.5, 0.4),
            s(0.4, 0.5, 0.2),
        ];
        let existing = vec![BounceEvent::unattributed(
            0.25,
            CourtPos::new(0.5, 0.5),
            BounceKind::SwingDerived,
        )];
        assert!(infer_trajectory_bounces(&positions, &existing, &config()).is_empty());
    }

    #[test]
    fn test_accepted_bounces_respect_dedup_window() {
        // Zig-zag: every interior sample is a sharp turn.
        let positions: Vec<_> = (0..40)
            .map(|i| s(i as f64 * 0.04, 0.5, if i % 2 == 0 { 0.3 } else { 0.7 }))
            .collect();

        let inferred = infer_trajectory_bounces(&positions, &[], &config());
        assert!(inferred.len() > 1);
        for pair in inferred.windows(2) {
            assert!(pair[1].timestamp - pair[0].timestamp >= config().trajectory_dedup_window - 1e-9);
        }
    }

    #[test]
    fn test_oversized_scan_steps_do_not_overflow() {
        let positions = vec![
            s(0.0, 0.5, 0.1),
            s(0.1, 0.5, 0.3),
            s(0.2, 0.5, 0.6),
            s(0.3, 0.5, 0.4),
            s(0.4, 0.5, 0.2),
        ];

        let wide_margin = BounceInferenceConfig {
            window_margin: usize::MAX,
            ..config()
        };
        assert!(infer_trajectory_bounces(&positions, &[], &wide_margin).is_empty());

        let huge_skip = BounceInferenceConfig {
            skip_after_accept: usize::MAX,
            ..config()
        };
        assert_eq!(infer_trajectory_bounces(&positions, &[], &huge_skip).len(), 1);
    }
}
