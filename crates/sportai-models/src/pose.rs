//! Pose keypoints and joint trajectory samples.
//!
//! Keypoints come from an external pose estimator in canvas pixel space,
//! one [`PoseFrame`] per analysed video frame.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The 17 COCO body joints emitted by the pose estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    /// All joints in COCO keypoint order.
    pub const ALL: [Joint; 17] = [
        Joint::Nose,
        Joint::LeftEye,
        Joint::RightEye,
        Joint::LeftEar,
        Joint::RightEar,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];

    /// Joint at a COCO keypoint index.
    pub fn from_index(index: usize) -> Option<Joint> {
        Self::ALL.get(index).copied()
    }
}

/// One keypoint with the estimator's confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PoseKeypoint {
    pub joint: Joint,
    /// Canvas x in pixels
    pub x: f64,
    /// Canvas y in pixels
    pub y: f64,
    /// Confidence in `[0, 1]`
    pub score: f64,
}

impl PoseKeypoint {
    /// Create a new keypoint.
    pub fn new(joint: Joint, x: f64, y: f64, score: f64) -> Self {
        Self { joint, x, y, score }
    }
}

/// Keypoints of one detected person in one frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct PoseFrame {
    pub frame_index: u64,
    #[serde(default)]
    pub keypoints: Vec<PoseKeypoint>,
}

impl PoseFrame {
    /// Create a new pose frame.
    pub fn new(frame_index: u64, keypoints: Vec<PoseKeypoint>) -> Self {
        Self {
            frame_index,
            keypoints,
        }
    }

    /// Keypoint for a given joint, if the estimator reported one.
    pub fn keypoint(&self, joint: Joint) -> Option<&PoseKeypoint> {
        self.keypoints.iter().find(|kp| kp.joint == joint)
    }
}

/// A recorded position of one joint, tagged with its video frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JointSample {
    pub x: f64,
    pub y: f64,
    pub frame_index: u64,
}

impl JointSample {
    /// Create a new joint sample.
    pub fn new(x: f64, y: f64, frame_index: u64) -> Self {
        Self { x, y, frame_index }
    }

    /// Euclidean distance to another sample in pixels.
    #[inline]
    pub fn distance_to(&self, other: &JointSample) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}
