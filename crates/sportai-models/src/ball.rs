//! Ball tracking samples.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Normalized court position, both axes in `[0, 1]`.
///
/// `y` grows toward the camera; the net sits on `y = 0.5`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CourtPos {
    pub x: f64,
    pub y: f64,
}

impl CourtPos {
    /// Create a new court position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for CourtPos {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

/// One ball observation from the ball-tracking model.
///
/// The upstream service writes the coordinates as `X`/`Y`; both spellings
/// are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BallPositionSample {
    /// Time in seconds from the start of the video
    pub timestamp: f64,
    /// Normalized horizontal position
    #[serde(alias = "X")]
    pub x: f64,
    /// Normalized vertical position
    #[serde(alias = "Y")]
    pub y: f64,
}

impl BallPositionSample {
    /// Create a new sample.
    pub fn new(timestamp: f64, x: f64, y: f64) -> Self {
        Self { timestamp, x, y }
    }

    /// Position of this sample on the court.
    #[inline]
    pub fn pos(&self) -> CourtPos {
        CourtPos::new(self.x, self.y)
    }

    /// Whether timestamp and coordinates are all finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.timestamp.is_finite() && self.x.is_finite() && self.y.is_finite()
    }
}
