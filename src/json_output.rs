//! JSON output format for transition graphs
//!
//! Same graph description as the DOT writer, for consumers that render
//! with something other than Graphviz.

use crate::encoder::{EncodeOutcome, VisualGraph};
use crate::transition::{SignificancePolicy, TransitionStats};
use serde::Serialize;

/// Counts describing the input and the filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonSummary {
    /// Number of parsed events
    pub events: u64,
    /// Number of distinct commands
    pub commands: usize,
    /// Total unit-distance transitions
    pub transition_volume: u64,
    /// Distinct (from, to) pairs
    pub distinct_transitions: usize,
    /// Transitions drawn after the significance policy
    pub drawn_transitions: usize,
    /// "dense" or "sparse"
    pub policy: String,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    pub summary: JsonSummary,
    /// `null` when nothing survived filtering
    pub graph: Option<&'a VisualGraph>,
}

impl<'a> JsonOutput<'a> {
    pub fn new(
        stats: &TransitionStats,
        policy: &SignificancePolicy,
        outcome: &'a EncodeOutcome,
    ) -> Self {
        let graph = outcome.graph();
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "cmdflow-json-v1".to_string(),
            summary: JsonSummary {
                events: stats.node_totals.total(),
                commands: stats.node_totals.len(),
                transition_volume: stats.pair_counts.total(),
                distinct_transitions: stats.pair_counts.len(),
                drawn_transitions: graph.map_or(0, |g| g.edges().len()),
                policy: policy.mode.as_str().to_string(),
            },
            graph,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
