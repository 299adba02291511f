//! Shared data models for SportAI match analysis.
//!
//! This crate provides Serde-serializable types for:
//! - The upstream analysis result document (ball track, bounces, swings, rallies)
//! - Ball position samples and bounce/swing events
//! - Rally intervals
//! - Pose keypoints and joint trajectory samples
//! - Per-player aggregate metrics

pub mod ball;
pub mod error;
pub mod events;
pub mod player;
pub mod pose;
pub mod rally;
pub mod result;

// Re-export common types
pub use ball::{BallPositionSample, CourtPos};
pub use error::{ModelError, ModelResult};
pub use events::{BounceEvent, BounceKind, PlayerId, SwingEvent, SwingType, UNATTRIBUTED_PLAYER};
pub use player::PlayerMetricSet;
pub use pose::{Joint, JointSample, PoseFrame, PoseKeypoint};
pub use rally::RallyInterval;
pub use result::{AnalysisResult, BallHit, PlayerResult, PlayerStep, RawBounce, RawSwing};
