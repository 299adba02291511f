//! Position/event stream ingestion.
//!
//! Flattens the upstream analysis document into the time series the
//! inference passes consume. Ball positions keep their upstream order: the
//! caller guarantees they are monotonically increasing.

use std::path::Path;

use sportai_models::{
    AnalysisResult, BallPositionSample, BounceEvent, BounceKind, RallyInterval, SwingEvent,
    UNATTRIBUTED_PLAYER,
};
use tracing::debug;

use crate::error::{MotionError, MotionResult};

/// Time series extracted from one analysis document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestedStreams {
    /// Dense ball track, upstream order
    pub ball_positions: Vec<BallPositionSample>,
    /// All players' swings, stably ordered by hit time
    pub swings: Vec<SwingEvent>,
    /// Detector bounces, tagged [`BounceKind::OriginalDetected`]
    pub bounces: Vec<BounceEvent>,
    /// Rally intervals, as supplied
    pub rallies: Vec<RallyInterval>,
}

/// Read an analysis document from a JSON file.
pub fn load_result(path: impl AsRef<Path>) -> MotionResult<AnalysisResult> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(MotionError::FileNotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path)?;
    let result = AnalysisResult::from_json(&raw)?;
    debug!(path = %path.display(), "Loaded analysis result");
    Ok(result)
}

/// Normalize an analysis document into time series.
///
/// Missing arrays yield empty series; nothing is validated.
pub fn ingest(result: &AnalysisResult) -> IngestedStreams {
    let mut swings: Vec<SwingEvent> = result
        .players
        .iter()
        .flat_map(|player| {
            player.swings.iter().map(move |swing| {
                SwingEvent::new(
                    swing.ball_hit.timestamp,
                    player.player_id,
                    swing.ball_speed,
                    swing.swing_type,
                )
            })
        })
        .collect();
    // Per-player logs are each ordered, the concatenation is not.
    swings.sort_by(|a, b| a.hit_timestamp.total_cmp(&b.hit_timestamp));

    let bounces: Vec<BounceEvent> = result
        .ball_bounces
        .iter()
        .map(|raw| {
            BounceEvent::new(
                raw.timestamp,
                raw.court_pos(),
                raw.player_id.unwrap_or(UNATTRIBUTED_PLAYER),
                BounceKind::OriginalDetected,
            )
        })
        .collect();

    debug!(
        positions = result.ball_positions.len(),
        swings = swings.len(),
        bounces = bounces.len(),
        rallies = result.rallies.len(),
        "Ingested analysis result"
    );

    IngestedStreams {
        ball_positions: result.ball_positions.clone(),
        swings,
        bounces,
        rallies: result.rallies.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use sportai_models::{BallHit, CourtPos, PlayerResult, RawBounce, RawSwing, SwingType};

    fn raw_swing(t: f64, speed: f64) -> RawSwing {
        RawSwing {
            ball_hit: BallHit { timestamp: t },
            ball_speed: speed,
            swing_type: SwingType::Forehand,
        }
    }

    #[test]
    fn test_empty_document() {
        let streams = ingest(&AnalysisResult::default());
        assert_eq!(streams, IngestedStreams::default());
    }

    #[test]
    fn test_swings_merged_in_time_order() {
        let result = AnalysisResult {
            players: vec![
                PlayerResult {
                    player_id: 1,
                    swings: vec![raw_swing(1.0, 10.0), raw_swing(5.0, 12.0)],
                    ..Default::default()
                },
                PlayerResult {
                    player_id: 2,
                    swings: vec![raw_swing(3.0, 20.0)],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let streams = ingest(&result);
        let order: Vec<(f64, i64)> = streams
            .swings
            .iter()
            .map(|s| (s.hit_timestamp, s.player_id))
            .collect();
        assert_eq!(order, vec![(1.0, 1), (3.0, 2), (5.0, 1)]);
    }

    #[test]
    fn test_bounces_tagged_original() {
        let result = AnalysisResult {
            ball_bounces: vec![
                RawBounce {
                    timestamp: 2.0,
                    court_pos: [0.3, 0.7],
                    player_id: Some(4),
                    bounce_type: Some("floor".into()),
                },
                RawBounce {
                    timestamp: 3.0,
                    court_pos: [0.6, 0.2],
                    player_id: None,
                    bounce_type: None,
                },
            ],
            ..Default::default()
        };

        let streams = ingest(&result);
        assert_eq!(streams.bounces.len(), 2);
        assert!(streams.bounces.iter().all(|b| b.kind == BounceKind::OriginalDetected));
        assert_eq!(streams.bounces[0].player_id, 4);
        assert_eq!(streams.bounces[1].player_id, UNATTRIBUTED_PLAYER);
        assert_eq!(streams.bounces[1].court_pos, CourtPos::new(0.6, 0.2));
    }

    #[test]
    fn test_positions_not_resorted() {
        let result = AnalysisResult {
            ball_positions: vec![
                BallPositionSample::new(1.0, 0.1, 0.1),
                BallPositionSample::new(0.5, 0.2, 0.2),
            ],
            ..Default::default()
        };
        let streams = ingest(&result);
        assert_eq!(streams.ball_positions[0].timestamp, 1.0);
    }

    #[test]
    fn test_load_result_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"ball_positions": [{{"timestamp": 0.5, "X": 0.2, "Y": 0.4}}]}}"#).unwrap();

        let result = load_result(file.path()).unwrap();
        assert_eq!(result.ball_positions, vec![BallPositionSample::new(0.5, 0.2, 0.4)]);
    }

    #[test]
    fn test_load_result_errors() {
        let missing = load_result("/definitely/not/here.json").unwrap_err();
        assert!(matches!(missing, MotionError::FileNotFound(_)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"players": "nope"}}"#).unwrap();
        let malformed = load_result(file.path()).unwrap_err();
        assert!(matches!(malformed, MotionError::Model(_)));
    }
}
