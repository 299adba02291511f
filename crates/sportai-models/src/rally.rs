//! Rally intervals.

use serde::{Deserialize, Serialize};

/// A stretch of live play, `[start_time, end_time]`.
///
/// The upstream document encodes a rally as a `[start, end]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct RallyInterval {
    pub start_time: f64,
    pub end_time: f64,
}

impl RallyInterval {
    /// Create a new rally interval.
    pub fn new(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Rally duration in seconds.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Whether `time` lies inside the closed interval `[start, end]`.
    #[inline]
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time <= self.end_time
    }

    /// Start of the rally's visible window given a lead-in buffer.
    #[inline]
    pub fn buffered_start(&self, lead_in: f64) -> f64 {
        (self.start_time - lead_in).max(0.0)
    }
}

impl From<[f64; 2]> for RallyInterval {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<RallyInterval> for [f64; 2] {
    fn from(value: RallyInterval) -> Self {
        [value.start_time, value.end_time]
    }
}
