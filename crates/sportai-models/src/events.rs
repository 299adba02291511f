//! Swing and bounce events.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ball::CourtPos;

/// Player identifier assigned by the upstream tracker.
pub type PlayerId = i64;

/// Player id used for events nobody could be attributed to.
pub const UNATTRIBUTED_PLAYER: PlayerId = -1;

/// Stroke type reported by the technique-analysis model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SwingType {
    Forehand,
    Backhand,
    Serve,
    Volley,
    Smash,
    Lob,
    Bandeja,
    Vibora,
    #[default]
    #[serde(other)]
    Other,
}

/// A detected shot. Immutable once ingested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SwingEvent {
    /// Time the racket met the ball (seconds)
    pub hit_timestamp: f64,
    /// Player who played the shot
    pub player_id: PlayerId,
    /// Ball speed right after the hit, `>= 0`
    pub ball_speed: f64,
    /// Stroke classification
    pub swing_type: SwingType,
}

impl SwingEvent {
    /// Create a new swing event.
    pub fn new(hit_timestamp: f64, player_id: PlayerId, ball_speed: f64, swing_type: SwingType) -> Self {
        Self {
            hit_timestamp,
            player_id,
            ball_speed,
            swing_type,
        }
    }
}

/// Provenance/category of a bounce event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BounceKind {
    /// Reported directly by the bounce detector.
    OriginalDetected,
    /// Synthesized from a swing's hit time and the nearest ball sample.
    SwingDerived,
    /// Inferred floor contact from the ball trajectory.
    FloorInferred,
    /// Inferred wall contact from the ball trajectory.
    WallInferred,
    /// A passive floor/wall event relabeled as a shot by the reclassifier.
    SwingInferred,
}

impl BounceKind {
    /// All kinds, in declaration order.
    pub const ALL: [BounceKind; 5] = [
        BounceKind::OriginalDetected,
        BounceKind::SwingDerived,
        BounceKind::FloorInferred,
        BounceKind::WallInferred,
        BounceKind::SwingInferred,
    ];

    /// Kinds produced by trajectory analysis (the reclassifier's candidates).
    #[inline]
    pub fn is_trajectory_inferred(self) -> bool {
        matches!(self, BounceKind::FloorInferred | BounceKind::WallInferred)
    }

    /// Whether the event was synthesized rather than observed.
    #[inline]
    pub fn is_synthetic(self) -> bool {
        !matches!(self, BounceKind::OriginalDetected)
    }

    /// Stable snake_case label, used for log fields and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            BounceKind::OriginalDetected => "original_detected",
            BounceKind::SwingDerived => "swing_derived",
            BounceKind::FloorInferred => "floor_inferred",
            BounceKind::WallInferred => "wall_inferred",
            BounceKind::SwingInferred => "swing_inferred",
        }
    }
}

impl std::fmt::Display for BounceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected or inferred ball contact.
///
/// Identity is `(timestamp, court_pos)`; only `kind` is ever rewritten, and
/// only by producing a new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BounceEvent {
    /// Time of contact (seconds)
    pub timestamp: f64,
    /// Normalized court position of the contact
    pub court_pos: CourtPos,
    /// Attributed player, or [`UNATTRIBUTED_PLAYER`]
    pub player_id: PlayerId,
    /// Provenance/category
    pub kind: BounceKind,
}

impl BounceEvent {
    /// Create a new bounce event.
    pub fn new(timestamp: f64, court_pos: CourtPos, player_id: PlayerId, kind: BounceKind) -> Self {
        Self {
            timestamp,
            court_pos,
            player_id,
            kind,
        }
    }

    /// Create an unattributed bounce event.
    pub fn unattributed(timestamp: f64, court_pos: CourtPos, kind: BounceKind) -> Self {
        Self::new(timestamp, court_pos, UNATTRIBUTED_PLAYER, kind)
    }

    /// Copy of this event with a different classification.
    pub fn with_kind(self, kind: BounceKind) -> Self {
        Self { kind, ..self }
    }

    /// Whether this event has an attributed player.
    #[inline]
    pub fn is_attributed(&self) -> bool {
        self.player_id != UNATTRIBUTED_PLAYER
    }
}
