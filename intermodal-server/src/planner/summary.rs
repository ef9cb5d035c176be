//! Summaries of graph paths and refined itineraries.

use serde::Serialize;

use crate::domain::{Itinerary, TransportMode};
use crate::graph::GraphEdge;

/// Headline figures for a graph path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathSummary {
    /// Edge durations plus the penalty for every mode left along the way.
    ///
    /// Excludes the walk from the query origin to the first node.
    pub duration_secs: u64,

    /// Number of mode switches.
    pub transfer_count: usize,

    /// Modes in travel order, one entry per same-mode run.
    pub modes: Vec<TransportMode>,
}

impl PathSummary {
    pub fn of_path(edges: &[GraphEdge]) -> Self {
        let mut duration_secs: u64 = 0;
        let mut modes: Vec<TransportMode> = Vec::new();

        for edge in edges {
            match modes.last() {
                Some(&prev) if prev != edge.mode => {
                    duration_secs = duration_secs.saturating_add(prev.transfer_penalty());
                    modes.push(edge.mode);
                }
                Some(_) => {}
                None => modes.push(edge.mode),
            }
            duration_secs = duration_secs.saturating_add(edge.duration_secs);
        }

        Self {
            duration_secs,
            transfer_count: modes.len().saturating_sub(1),
            modes,
        }
    }
}

/// Headline figures for a refined itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItinerarySummary {
    pub duration_secs: u64,
    /// Top-level legs.
    pub leg_count: usize,
    /// Atomic hops across all legs.
    pub segment_count: usize,
}

impl ItinerarySummary {
    pub fn of(itinerary: &Itinerary) -> Self {
        Self {
            duration_secs: itinerary.duration_secs(),
            leg_count: itinerary.legs.len(),
            segment_count: itinerary.leaves().count(),
        }
    }
}
