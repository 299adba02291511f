//! Upstream analysis result document.
//!
//! The schema is owned by the external analysis service; these types only
//! mirror the parts the motion engine consumes. Every array defaults to
//! empty so partial documents still load.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ball::{BallPositionSample, CourtPos};
use crate::error::{ModelError, ModelResult};
use crate::events::{PlayerId, SwingType};
use crate::rally::RallyInterval;

/// Full analysis result for one match video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    /// Dense, per-frame ball track
    #[serde(default)]
    pub ball_positions: Vec<BallPositionSample>,

    /// Sparse bounces from the bounce detector
    #[serde(default)]
    pub ball_bounces: Vec<RawBounce>,

    /// Per-player swing and movement logs
    #[serde(default)]
    pub players: Vec<PlayerResult>,

    /// Rally intervals as `[start, end]` pairs
    #[serde(default)]
    #[schemars(with = "Vec<[f64; 2]>")]
    pub rallies: Vec<RallyInterval>,
}

impl AnalysisResult {
    /// Parse a result document from JSON.
    pub fn from_json(json: &str) -> ModelResult<Self> {
        let result: AnalysisResult = serde_json::from_str(json)?;
        Ok(result)
    }

    /// Parse a result document from a JSON value.
    pub fn from_value(value: serde_json::Value) -> ModelResult<Self> {
        serde_json::from_value(value).map_err(ModelError::from)
    }

    /// Total number of swings across all players.
    pub fn swing_count(&self) -> usize {
        self.players.iter().map(|p| p.swings.len()).sum()
    }

    /// Whether the document carries no usable data at all.
    pub fn is_empty(&self) -> bool {
        self.ball_positions.is_empty()
            && self.ball_bounces.is_empty()
            && self.swing_count() == 0
            && self.rallies.is_empty()
    }
}

/// A bounce as reported by the bounce detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawBounce {
    pub timestamp: f64,
    /// Normalized `[x, y]` court position
    pub court_pos: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    /// Detector's own label (`floor`, `swing`, ...), informational only
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub bounce_type: Option<String>,
}

impl RawBounce {
    /// Court position as a typed point.
    pub fn court_pos(&self) -> CourtPos {
        CourtPos::from(self.court_pos)
    }
}

/// One player's detected activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerResult {
    pub player_id: PlayerId,

    #[serde(default)]
    pub swings: Vec<RawSwing>,

    /// Distance covered in meters, when the service computed it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covered_distance: Option<f64>,

    /// Fastest sprint in m/s, when the service computed it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fastest_sprint: Option<f64>,

    /// Court-space position log in meters
    #[serde(default)]
    pub positions: Vec<PlayerStep>,
}

/// A swing as reported by the technique-analysis model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawSwing {
    pub ball_hit: BallHit,
    #[serde(default)]
    pub ball_speed: f64,
    #[serde(rename = "type", default)]
    pub swing_type: SwingType,
}

/// Contact moment of a swing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BallHit {
    pub timestamp: f64,
}

/// One entry of a player's court-space position log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerStep {
    pub timestamp: f64,
    pub x: f64,
    pub y: f64,
}

impl PlayerStep {
    /// Create a new position log entry.
    pub fn new(timestamp: f64, x: f64, y: f64) -> Self {
        Self { timestamp, x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let result = AnalysisResult::from_json("{}").unwrap();
        assert!(result.is_empty());
        assert_eq!(result.swing_count(), 0);
    }

    #[test]
    fn test_parse_full_document() {
        let json = r#"{
            "ball_positions": [{"timestamp": 0.0, "X": 0.5, "Y": 0.3}],
            "ball_bounces": [{"timestamp": 1.0, "court_pos": [0.2, 0.8], "type": "floor"}],
            "players": [{
                "player_id": 3,
                "swings": [{"ball_hit": {"timestamp": 0.9}, "ball_speed": 42.0, "type": "smash"}],
                "covered_distance": 120.5
            }],
            "rallies": [[0.0, 4.5]]
        }"#;

        let result = AnalysisResult::from_json(json).unwrap();
        assert_eq!(result.ball_positions.len(), 1);
        assert_eq!(result.ball_bounces[0].court_pos(), CourtPos::new(0.2, 0.8));
        assert_eq!(result.ball_bounces[0].player_id, None);
        assert_eq!(result.players[0].swings[0].swing_type, SwingType::Smash);
        assert_eq!(result.players[0].covered_distance, Some(120.5));
        assert_eq!(result.rallies, vec![RallyInterval::new(0.0, 4.5)]);
        assert_eq!(result.swing_count(), 1);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let err = AnalysisResult::from_json(r#"{"ball_positions": 3}"#).unwrap_err();
        assert!(matches!(err, ModelError::JsonParse(_)));
    }
}
