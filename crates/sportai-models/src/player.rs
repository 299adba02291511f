//! Per-player aggregate metrics.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::events::PlayerId;
use crate::result::{PlayerResult, PlayerStep};

/// Aggregated scalar stats for one player.
///
/// Derived read-only from the upstream player record; nothing here writes
/// back into the source document.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct PlayerMetricSet {
    pub player_id: PlayerId,
    /// Distance covered in meters
    pub distance_covered: f64,
    /// Fastest sprint in m/s
    pub max_sprint_speed: f64,
    /// Fastest shot's ball speed
    pub max_ball_speed: f64,
    /// Number of detected swings
    pub shot_count: usize,
}

impl PlayerMetricSet {
    /// Derive metrics from a player's swing and position logs.
    ///
    /// Upstream `covered_distance`/`fastest_sprint` win when present; otherwise
    /// both are computed from the position log.
    pub fn from_player(player: &PlayerResult) -> Self {
        let max_ball_speed = player
            .swings
            .iter()
            .map(|s| s.ball_speed)
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);

        let distance_covered = player
            .covered_distance
            .unwrap_or_else(|| path_length(&player.positions));
        let max_sprint_speed = player
            .fastest_sprint
            .unwrap_or_else(|| peak_step_speed(&player.positions));

        Self {
            player_id: player.player_id,
            distance_covered,
            max_sprint_speed,
            max_ball_speed,
            shot_count: player.swings.len(),
        }
    }
}

fn step_distance(a: &PlayerStep, b: &PlayerStep) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Total length of a position log.
fn path_length(steps: &[PlayerStep]) -> f64 {
    steps.windows(2).map(|w| step_distance(&w[0], &w[1])).sum()
}

/// Fastest speed between consecutive log entries; zero-length gaps are skipped.
fn peak_step_speed(steps: &[PlayerStep]) -> f64 {
    steps
        .windows(2)
        .filter_map(|w| {
            let dt = w[1].timestamp - w[0].timestamp;
            (dt > 0.0).then(|| step_distance(&w[0], &w[1]) / dt)
        })
        .fold(0.0_f64, f64::max)
}
