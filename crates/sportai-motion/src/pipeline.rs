//! End-to-end event pipeline.
//!
//! ```text
//! AnalysisResult ──► ingest ──► infer_bounces ──► reclassify ──► EventTimeline
//! ```
//!
//! Every stage is a pure function of its inputs, so a rerun with identical
//! inputs yields an identical timeline. Callers rerun the pipeline when the
//! result document or the inference toggles change.

use std::collections::BTreeMap;

use serde::Serialize;
use sportai_models::{AnalysisResult, BounceEvent, BounceKind, RallyInterval, SwingEvent};
use tracing::info;

use crate::bounce::infer_bounces;
use crate::config::BounceInferenceConfig;
use crate::ingest::{ingest, IngestedStreams};
use crate::reclassify::reclassify;

/// Enriched event stream handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventTimeline {
    /// All bounce events, time-sorted, with final classification
    pub bounces: Vec<BounceEvent>,
    /// All swings, time-sorted
    pub swings: Vec<SwingEvent>,
    /// Rally intervals as supplied
    pub rallies: Vec<RallyInterval>,
}

impl EventTimeline {
    /// Number of bounces of each kind. Every kind is present, possibly as 0.
    pub fn kind_counts(&self) -> BTreeMap<BounceKind, usize> {
        let mut counts: BTreeMap<BounceKind, usize> =
            BounceKind::ALL.iter().map(|kind| (*kind, 0)).collect();
        for event in &self.bounces {
            *counts.entry(event.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Bounces falling inside `rally`.
    pub fn bounces_in<'a>(&'a self, rally: &'a RallyInterval) -> impl Iterator<Item = &'a BounceEvent> + 'a {
        self.bounces.iter().filter(move |b| rally.contains(b.timestamp))
    }
}

/// Runs ingestion, bounce inference and reclassification.
#[derive(Debug, Clone, Default)]
pub struct MotionPipeline {
    config: BounceInferenceConfig,
}

impl MotionPipeline {
    pub fn new(config: BounceInferenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BounceInferenceConfig {
        &self.config
    }

    /// Build the event timeline for a result document.
    pub fn run(&self, result: &AnalysisResult) -> EventTimeline {
        self.run_streams(ingest(result))
    }

    /// Build the event timeline from already-ingested streams.
    pub fn run_streams(&self, streams: IngestedStreams) -> EventTimeline {
        let IngestedStreams {
            ball_positions,
            swings,
            bounces,
            rallies,
        } = streams;

        let merged = infer_bounces(&ball_positions, &swings, &bounces, &self.config);
        let bounces = if self.config.reclassify_enabled {
            reclassify(&merged, &swings, &self.config)
        } else {
            merged
        };

        let timeline = EventTimeline {
            bounces,
            swings,
            rallies,
        };
        info!(
            bounces = timeline.bounces.len(),
            swings = timeline.swings.len(),
            rallies = timeline.rallies.len(),
            "Event timeline built"
        );
        timeline
    }
}
