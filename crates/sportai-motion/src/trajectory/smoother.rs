//! Velocity-adaptive spline smoothing of joint samples.
//!
//! - 0 or 1 samples are returned as-is.
//! - 2 samples become a cubic Bezier with control points at 30% of the
//!   displacement from each end.
//! - 3+ samples become a uniform Catmull-Rom spline through every sample,
//!   with more segments on gaps where the joint moved faster.

use serde::{Deserialize, Serialize};
use sportai_models::JointSample;

use crate::config::TrajectoryConfig;

/// A point on the smoothed polyline, canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

impl PathPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn lerp_offset(self, to: PathPoint, ratio: f64) -> PathPoint {
        PathPoint::new(self.x + (to.x - self.x) * ratio, self.y + (to.y - self.y) * ratio)
    }
}

impl From<&JointSample> for PathPoint {
    fn from(sample: &JointSample) -> Self {
        PathPoint::new(sample.x, sample.y)
    }
}

/// Segments to draw across one gap moving at `velocity` px/frame.
///
/// `base * (1 + gain * min(velocity / avg, cap))`, rounded, floored at
/// `min_segments`. A zero average (joint never moved) yields the base.
pub fn segment_count(velocity: f64, avg_velocity: f64, config: &TrajectoryConfig) -> usize {
    let ratio = if avg_velocity > 0.0 && velocity.is_finite() {
        (velocity / avg_velocity).min(config.max_velocity_ratio).max(0.0)
    } else {
        0.0
    };
    let scaled = (config.base_segments as f64 * (1.0 + config.velocity_gain * ratio)).round() as usize;
    scaled.max(config.min_segments)
}

/// Smooth a joint's samples into a dense polyline.
pub fn smooth_path(samples: &[JointSample], config: &TrajectoryConfig) -> Vec<PathPoint> {
    match samples.len() {
        0 | 1 => samples.iter().map(PathPoint::from).collect(),
        2 => bezier_path(&samples[0], &samples[1], config),
        _ => catmull_rom_path(samples, config),
    }
}

fn bezier_path(a: &JointSample, b: &JointSample, config: &TrajectoryConfig) -> Vec<PathPoint> {
    let start = PathPoint::from(a);
    let end = PathPoint::from(b);
    let c1 = start.lerp_offset(end, config.bezier_control_ratio);
    let c2 = end.lerp_offset(start, config.bezier_control_ratio);

    let segments = config.bezier_segments.max(1);
    (0..=segments)
        .map(|i| cubic_bezier(start, c1, c2, end, i as f64 / segments as f64))
        .collect()
}

fn cubic_bezier(p0: PathPoint, p1: PathPoint, p2: PathPoint, p3: PathPoint, t: f64) -> PathPoint {
    let u = 1.0 - t;
    let (b0, b1, b2, b3) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    PathPoint::new(
        b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
        b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
    )
}

/// Pixel speed across each gap; frame deltas below one count as one.
fn gap_velocities(samples: &[JointSample]) -> Vec<f64> {
    samples
        .windows(2)
        .map(|w| {
            let frames = w[1].frame_index.abs_diff(w[0].frame_index).max(1) as f64;
            w[0].distance_to(&w[1]) / frames
        })
        .collect()
}

fn catmull_rom_path(samples: &[JointSample], config: &TrajectoryConfig) -> Vec<PathPoint> {
    let points: Vec<PathPoint> = samples.iter().map(PathPoint::from).collect();
    let velocities = gap_velocities(samples);
    let avg_velocity = velocities.iter().sum::<f64>() / velocities.len() as f64;
    let last = points.len() - 1;

    let mut path = Vec::with_capacity(points.len() * config.base_segments);
    path.push(points[0]);

    for (i, velocity) in velocities.iter().enumerate() {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];

        let segments = segment_count(*velocity, avg_velocity, config);
        for step in 1..=segments {
            path.push(catmull_rom(p0, p1, p2, p3, step as f64 / segments as f64));
        }
    }

    path
}

fn catmull_rom(p0: PathPoint, p1: PathPoint, p2: PathPoint, p3: PathPoint, t: f64) -> PathPoint {
    let t2 = t * t;
    let t3 = t2 * t;
    let axis = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * (2.0 * b
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    PathPoint::new(axis(p0.x, p1.x, p2.x, p3.x), axis(p0.y, p1.y, p2.y, p3.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TrajectoryConfig {
        TrajectoryConfig::default()
    }

    fn close(a: PathPoint, b: PathPoint) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_segment_count_scaling() {
        let config = config();
        assert_eq!(segment_count(30.0, 10.0, &config), 20);
        assert_eq!(segment_count(90.0, 10.0, &config), 20);
        assert_eq!(segment_count(0.0, 10.0, &config), 8);
        assert_eq!(segment_count(10.0, 10.0, &config), 12);
        assert_eq!(segment_count(5.0, 0.0, &config), 8);
    }

    #[test]
    fn test_segment_count_floor() {
        let config = TrajectoryConfig {
            base_segments: 2,
            ..config()
        };
        assert_eq!(segment_count(0.0, 1.0, &config), 5);
    }

    #[test]
    fn test_negative_velocity_cap_falls_back_to_base() {
        let config = TrajectoryConfig {
            max_velocity_ratio: -1.0,
            ..config()
        };
        assert_eq!(segment_count(30.0, 10.0, &config), 8);

        let samples = [
            JointSample::new(0.0, 0.0, 0),
            JointSample::new(10.0, 0.0, 1),
            JointSample::new(30.0, 0.0, 2),
        ];
        assert_eq!(smooth_path(&samples, &config).len(), 1 + 2 * 8);
    }

    #[test]
    fn test_empty_and_single_sample() {
        assert!(smooth_path(&[], &config()).is_empty());

        let single = [JointSample::new(12.5, 40.0, 3)];
        assert_eq!(smooth_path(&single, &config()), vec![PathPoint::new(12.5, 40.0)]);
    }

    #[test]
    fn test_two_samples_bezier() {
        let samples = [JointSample::new(0.0, 0.0, 0), JointSample::new(100.0, 50.0, 4)];
        let path = smooth_path(&samples, &config());

        assert_eq!(path.len(), 11);
        assert!(close(path[0], PathPoint::new(0.0, 0.0)));
        assert!(close(path[10], PathPoint::new(100.0, 50.0)));
        // Symmetric control points put the midpoint on the chord.
        assert!(close(path[5], PathPoint::new(50.0, 25.0)));
    }

    #[test]
    fn test_catmull_rom_passes_through_samples() {
        let samples = [
            JointSample::new(0.0, 0.0, 0),
            JointSample::new(10.0, 0.0, 1),
            JointSample::new(20.0, 10.0, 2),
            JointSample::new(30.0, 10.0, 3),
        ];
        let path = smooth_path(&samples, &config());

        assert!(close(path[0], PathPoint::from(&samples[0])));
        assert!(close(*path.last().unwrap(), PathPoint::from(&samples[3])));

        let velocities = gap_velocities(&samples);
        let avg = velocities.iter().sum::<f64>() / 3.0;
        let first_gap = segment_count(velocities[0], avg, &config());
        assert!(close(path[first_gap], PathPoint::from(&samples[1])));
    }

    #[test]
    fn test_point_count_follows_velocity() {
        // Equal gaps: every gap runs at ratio 1 -> 12 segments each.
        let samples = [
            JointSample::new(0.0, 0.0, 0),
            JointSample::new(10.0, 0.0, 1),
            JointSample::new(20.0, 0.0, 2),
        ];
        assert_eq!(smooth_path(&samples, &config()).len(), 1 + 12 + 12);

        // Stationary joint: ratio 0 everywhere -> base count.
        let still = [
            JointSample::new(5.0, 5.0, 0),
            JointSample::new(5.0, 5.0, 1),
            JointSample::new(5.0, 5.0, 2),
        ];
        assert_eq!(smooth_path(&still, &config()).len(), 1 + 8 + 8);
    }

    #[test]
    fn test_timing_from_frame_index() {
        // Same pixel distance, but the second gap spans 4 frames.
        let samples = [
            JointSample::new(0.0, 0.0, 0),
            JointSample::new(10.0, 0.0, 1),
            JointSample::new(20.0, 0.0, 5),
        ];
        let velocities = gap_velocities(&samples);
        assert!((velocities[0] - 10.0).abs() < 1e-9);
        assert!((velocities[1] - 2.5).abs() < 1e-9);

        // Repeated frame index counts as a one-frame gap.
        let repeated = [JointSample::new(0.0, 0.0, 3), JointSample::new(6.0, 8.0, 3)];
        assert!((gap_velocities(&repeated)[0] - 10.0).abs() < 1e-9);
    }
}
