#![deny(unreachable_patterns)]
//! Motion and event inference for match video analysis.
//!
//! This crate provides:
//! - Ingestion of upstream ball, bounce, swing and rally data
//! - Swing- and trajectory-derived bounce inference
//! - Reclassification of physically impossible bounce sequences
//! - Rally auto-selection and dead-time skipping during playback
//! - Velocity-adaptive spline smoothing of pose joint trajectories
//! - Top-3 player rankings per metric
//!
//! All passes run synchronously on the caller's thread. Bounce inference and
//! reclassification are pure; [`RallyNavigator`] and [`JointTracker`] hold
//! state across ticks and must be driven from one tick source at a time.

pub mod bounce;
pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod rally;
pub mod ranking;
pub mod reclassify;
pub mod trajectory;

pub use bounce::{classify_window, infer_bounces, infer_swing_bounces, infer_trajectory_bounces};
pub use config::{BounceInferenceConfig, MotionConfig, RallyNavigatorConfig, TrajectoryConfig};
pub use error::{MotionError, MotionResult};
pub use ingest::{ingest, load_result, IngestedStreams};
pub use pipeline::{EventTimeline, MotionPipeline};
pub use rally::{NavigationUpdate, PlaybackClock, RallyNavigator, SeekReason, SeekRequest};
pub use ranking::{metric_sets, rank_all_metrics, rank_by_metric, rank_players, Metric, RankMap};
pub use reclassify::{reclassify, CourtHalf};
pub use trajectory::{
    build_overlay, segment_count, smooth_path, JointTrack, JointTracker, PathPoint,
    TrajectoryOverlay,
};
