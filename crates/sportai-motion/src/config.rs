//! Configuration for the motion engine.
//!
//! Every threshold the bounce heuristics, the rally navigator and the joint
//! smoother use lives here with its tuned default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{MotionError, MotionResult};

/// Upper bound on scan margins and skip counts.
pub const MAX_SCAN_STEP: usize = 100;

/// Thresholds for bounce inference and reclassification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BounceInferenceConfig {
    // ============================================
    // Toggles
    // ============================================
    /// Synthesize bounces from swing hit times.
    pub swing_derived_enabled: bool,

    /// Infer floor/wall bounces from the ball trajectory.
    pub trajectory_derived_enabled: bool,

    /// Relabel impossible passive bounces as inferred swings.
    pub reclassify_enabled: bool,

    // ============================================
    // Swing-derived bounces
    // ============================================
    /// Max distance (s) between a hit and its nearest ball sample, and the
    /// dedup window against detector/swing-derived events.
    pub swing_match_window: f64,

    /// Stop scanning ball samples once they pass the hit by this much (s).
    pub swing_scan_horizon: f64,

    // ============================================
    // Trajectory-derived bounces
    // ============================================
    /// Candidates closer than this (s) to an accepted event are skipped.
    pub trajectory_dedup_window: f64,

    /// Samples left unscanned at each end of the series.
    pub window_margin: usize,

    /// Extra samples skipped after accepting a candidate.
    pub skip_after_accept: usize,

    /// Downward vertical speed (units/s) that counts as "falling".
    pub vertical_velocity_threshold: f64,

    /// Fraction of the vertical threshold the rebound must exceed.
    pub rebound_ratio: f64,

    /// Horizontal speed (units/s) that counts as moving toward a wall.
    pub horizontal_velocity_threshold: f64,

    /// Fraction of the horizontal threshold the reversal must exceed.
    pub horizontal_reversal_ratio: f64,

    /// Floor bounces must lie strictly between these `y` values.
    pub court_min_y: f64,
    pub court_max_y: f64,

    /// Distance from either side edge that counts as "near a wall".
    pub side_wall_margin: f64,

    /// Direction change (degrees) that triggers the sharp-angle fallback.
    pub sharp_angle_degrees: f64,

    // ============================================
    // Reclassification
    // ============================================
    /// Court center line separating the two halves.
    pub net_y: f64,
}

impl Default for BounceInferenceConfig {
    fn default() -> Self {
        Self {
            swing_derived_enabled: true,
            trajectory_derived_enabled: true,
            reclassify_enabled: true,
            swing_match_window: 0.15,
            swing_scan_horizon: 0.2,
            trajectory_dedup_window: 0.2,
            window_margin: 2,
            skip_after_accept: 3,
            vertical_velocity_threshold: 0.5,
            rebound_ratio: 0.3,
            horizontal_velocity_threshold: 0.3,
            horizontal_reversal_ratio: 0.5,
            court_min_y: 0.1,
            court_max_y: 0.95,
            side_wall_margin: 0.15,
            sharp_angle_degrees: 55.0,
            net_y: 0.5,
        }
    }
}

impl BounceInferenceConfig {
    /// Only keep what the detectors reported; no synthetic events.
    pub fn detector_only() -> Self {
        Self {
            swing_derived_enabled: false,
            trajectory_derived_enabled: false,
            reclassify_enabled: false,
            ..Default::default()
        }
    }

    /// Builder: toggle swing-derived bounces.
    pub fn with_swing_derived(mut self, enabled: bool) -> Self {
        self.swing_derived_enabled = enabled;
        self
    }

    /// Builder: toggle trajectory-derived bounces.
    pub fn with_trajectory_derived(mut self, enabled: bool) -> Self {
        self.trajectory_derived_enabled = enabled;
        self
    }

    /// Builder: toggle reclassification.
    pub fn with_reclassify(mut self, enabled: bool) -> Self {
        self.reclassify_enabled = enabled;
        self
    }

    /// Builder: set the sharp-angle fallback threshold.
    pub fn with_sharp_angle(mut self, degrees: f64) -> Self {
        self.sharp_angle_degrees = degrees;
        self
    }

    /// Whether `x` lies close to either side wall.
    #[inline]
    pub fn near_side_wall(&self, x: f64) -> bool {
        x < self.side_wall_margin || x > 1.0 - self.side_wall_margin
    }

    /// Whether `y` lies strictly inside the court span.
    #[inline]
    pub fn inside_court(&self, y: f64) -> bool {
        y > self.court_min_y && y < self.court_max_y
    }

    fn validate(&self) -> MotionResult<()> {
        for (name, value) in [
            ("swing_match_window", self.swing_match_window),
            ("swing_scan_horizon", self.swing_scan_horizon),
            ("trajectory_dedup_window", self.trajectory_dedup_window),
        ] {
            if !(value > 0.0) {
                return Err(MotionError::invalid_config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.window_margin == 0 || self.window_margin > MAX_SCAN_STEP {
            return Err(MotionError::invalid_config(format!(
                "window_margin must be within 1..={MAX_SCAN_STEP}"
            )));
        }
        if self.skip_after_accept > MAX_SCAN_STEP {
            return Err(MotionError::invalid_config(format!(
                "skip_after_accept must be at most {MAX_SCAN_STEP}"
            )));
        }
        if self.court_min_y >= self.court_max_y {
            return Err(MotionError::invalid_config("court_min_y must be below court_max_y"));
        }
        Ok(())
    }
}

/// Rally auto-selection and dead-time skipping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RallyNavigatorConfig {
    /// Skip the dead time between rallies during playback.
    pub rallies_only: bool,

    /// Seconds shown before each rally starts.
    pub lead_in: f64,

    /// Distance (s) from a rally's end at which playback jumps to the next one.
    pub end_tolerance: f64,
}

impl Default for RallyNavigatorConfig {
    fn default() -> Self {
        Self {
            rallies_only: false,
            lead_in: 1.0,
            end_tolerance: 0.1,
        }
    }
}

impl RallyNavigatorConfig {
    /// Builder: toggle rallies-only playback.
    pub fn with_rallies_only(mut self, enabled: bool) -> Self {
        self.rallies_only = enabled;
        self
    }

    /// Builder: set the lead-in buffer, clamped to be non-negative.
    pub fn with_lead_in(mut self, seconds: f64) -> Self {
        self.lead_in = seconds.max(0.0);
        self
    }

    fn validate(&self) -> MotionResult<()> {
        if !(self.lead_in >= 0.0) {
            return Err(MotionError::invalid_config("lead_in must be non-negative"));
        }
        if !(self.end_tolerance >= 0.0) {
            return Err(MotionError::invalid_config("end_tolerance must be non-negative"));
        }
        Ok(())
    }
}

/// Joint trajectory capture and smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryConfig {
    /// Ring buffer capacity per joint.
    pub max_samples: usize,

    /// Keypoints at or below this confidence are dropped.
    pub min_confidence: f64,

    /// Catmull-Rom segments per gap at average velocity ratio 0.
    pub base_segments: usize,

    /// Lower bound on segments per gap.
    pub min_segments: usize,

    /// Extra segments per unit of velocity ratio, as a fraction of the base.
    pub velocity_gain: f64,

    /// Cap on the velocity ratio so outliers cannot explode the point count.
    pub max_velocity_ratio: f64,

    /// Segments for the two-sample Bezier case.
    pub bezier_segments: usize,

    /// Control point offset as a fraction of the displacement.
    pub bezier_control_ratio: f64,

    /// Every n-th raw sample is drawn as a marker.
    pub marker_stride: usize,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            max_samples: 300,
            min_confidence: 0.3,
            base_segments: 8,
            min_segments: 5,
            velocity_gain: 0.5,
            max_velocity_ratio: 3.0,
            bezier_segments: 10,
            bezier_control_ratio: 0.3,
            marker_stride: 5,
        }
    }
}

impl TrajectoryConfig {
    /// Builder: set ring buffer capacity.
    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    /// Builder: set confidence floor, clamped to `[0, 1]`.
    pub fn with_min_confidence(mut self, confidence: f64) -> Self {
        self.min_confidence = confidence.clamp(0.0, 1.0);
        self
    }

    fn validate(&self) -> MotionResult<()> {
        if self.max_samples == 0 {
            return Err(MotionError::invalid_config("max_samples must be at least 1"));
        }
        if self.bezier_segments == 0 || self.base_segments == 0 {
            return Err(MotionError::invalid_config("segment counts must be at least 1"));
        }
        if self.marker_stride == 0 {
            return Err(MotionError::invalid_config("marker_stride must be at least 1"));
        }
        for (name, value) in [
            ("velocity_gain", self.velocity_gain),
            ("max_velocity_ratio", self.max_velocity_ratio),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MotionError::invalid_config(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Top-level motion engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub bounce: BounceInferenceConfig,
    pub rally: RallyNavigatorConfig,
    pub trajectory: TrajectoryConfig,
}

impl MotionConfig {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> MotionResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MotionError::FileNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let config: MotionConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Create config from defaults overlaid with `SPORTAI_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Overlay `SPORTAI_*` environment variables onto this config.
    pub fn with_env_overrides(mut self) -> Self {
        let b = &mut self.bounce;
        b.swing_derived_enabled = env_flag("SPORTAI_SWING_DERIVED", b.swing_derived_enabled);
        b.trajectory_derived_enabled =
            env_flag("SPORTAI_TRAJECTORY_DERIVED", b.trajectory_derived_enabled);
        b.reclassify_enabled = env_flag("SPORTAI_RECLASSIFY", b.reclassify_enabled);
        b.sharp_angle_degrees = env_or("SPORTAI_SHARP_ANGLE_DEG", b.sharp_angle_degrees);

        let r = &mut self.rally;
        r.rallies_only = env_flag("SPORTAI_RALLIES_ONLY", r.rallies_only);
        r.lead_in = env_or("SPORTAI_RALLY_LEAD_IN", r.lead_in);

        let t = &mut self.trajectory;
        t.max_samples = env_or("SPORTAI_TRAJECTORY_MAX_SAMPLES", t.max_samples);
        t.min_confidence = env_or("SPORTAI_POSE_MIN_CONFIDENCE", t.min_confidence);

        self
    }

    /// Check that every window, cap and threshold is usable.
    pub fn validate(&self) -> MotionResult<()> {
        self.bounce.validate()?;
        self.rally.validate()?;
        self.trajectory.validate()
    }
}

fn env_or<T: std::str::FromStr + Copy>(key: &str, fallback: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Ignoring unparseable environment override");
            fallback
        }),
        Err(_) => fallback,
    }
}

/// Boolean switch: `1`/`true`/`yes`/`on` or `0`/`false`/`no`/`off`.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_flag(key: &str, fallback: bool) -> bool {
    match std::env::var(key) {
        Ok(raw) => parse_flag(&raw).unwrap_or_else(|| {
            warn!(key, value = %raw, "Ignoring unparseable environment flag");
            fallback
        }),
        Err(_) => fallback,
    }
}
