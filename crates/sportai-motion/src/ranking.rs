//! Top-3 player rankings per metric, feeding the medal UI.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sportai_models::{AnalysisResult, PlayerId, PlayerMetricSet};

/// Number of ranked places.
pub const PODIUM_SIZE: usize = 3;

/// Player id to rank (1..=3). Absence means unranked.
pub type RankMap = BTreeMap<PlayerId, u8>;

/// Rankable player metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Distance,
    SprintSpeed,
    BallSpeed,
    ShotVolume,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Distance,
        Metric::SprintSpeed,
        Metric::BallSpeed,
        Metric::ShotVolume,
    ];

    /// Scalar value of this metric for a player.
    pub fn value(self, metrics: &PlayerMetricSet) -> f64 {
        match self {
            Metric::Distance => metrics.distance_covered,
            Metric::SprintSpeed => metrics.max_sprint_speed,
            Metric::BallSpeed => metrics.max_ball_speed,
            Metric::ShotVolume => metrics.shot_count as f64,
        }
    }
}

/// Derive metric sets for every player in a result document.
pub fn metric_sets(result: &AnalysisResult) -> Vec<PlayerMetricSet> {
    result.players.iter().map(PlayerMetricSet::from_player).collect()
}

/// Rank players by `accessor`, highest first.
///
/// Only strictly positive values are eligible. Ties keep input order. A
/// player id seen twice is ranked by its first entry only.
pub fn rank_players<F>(players: &[PlayerMetricSet], accessor: F) -> RankMap
where
    F: Fn(&PlayerMetricSet) -> f64,
{
    let mut eligible: Vec<(PlayerId, f64)> = players
        .iter()
        .map(|p| (p.player_id, accessor(p)))
        .filter(|(_, value)| *value > 0.0)
        .collect();
    eligible.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut ranks = RankMap::new();
    for (player_id, _) in eligible {
        if ranks.len() == PODIUM_SIZE {
            break;
        }
        let next_rank = ranks.len() as u8 + 1;
        ranks.entry(player_id).or_insert(next_rank);
    }
    ranks
}

/// Rank players by one of the built-in metrics.
pub fn rank_by_metric(players: &[PlayerMetricSet], metric: Metric) -> RankMap {
    rank_players(players, |p| metric.value(p))
}

/// Rank maps for every built-in metric.
pub fn rank_all_metrics(players: &[PlayerMetricSet]) -> BTreeMap<Metric, RankMap> {
    Metric::ALL
        .iter()
        .map(|metric| (*metric, rank_by_metric(players, *metric)))
        .collect()
}
