//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{InvalidMode, Leg, Location, ModeSet, TransportMode};
use crate::network::{NetworkStats, OdPair};
use crate::planner::{ExpandSummary, PlannedJourney};

/// Request to plan a journey.
#[derive(Debug, Deserialize)]
pub struct PlanJourneyRequest {
    /// Where the traveller starts
    pub origin: Location,

    /// Where the traveller wants to go
    pub destination: Location,

    /// Optional mode names to restrict the journey to (e.g. ["WALK", "TRANSIT"])
    pub modes: Option<Vec<String>>,
}

/// A planned journey.
#[derive(Debug, Serialize)]
pub struct PlanJourneyResponse {
    /// Search cost in seconds, including the walk onto the graph
    pub cost_secs: u64,

    /// Itinerary duration in seconds
    pub duration_secs: u64,

    /// Number of mode switches
    pub transfers: usize,

    /// Modes in travel order, one per same-mode stretch
    pub modes: Vec<TransportMode>,

    /// Concrete legs from the route planner
    pub legs: Vec<Leg>,

    /// Number of graph nodes explored
    pub nodes_settled: usize,
}

/// Request to grow the network.
#[derive(Debug, Deserialize)]
pub struct ExpandNetworkRequest {
    /// Origin-destination pairs to query in both directions
    pub pairs: Vec<OdPair>,

    /// Optional mode names to query (defaults to every mode)
    pub modes: Option<Vec<String>>,
}

/// Result of growing the network.
#[derive(Debug, Serialize)]
pub struct ExpandNetworkResponse {
    /// Itineraries returned by the route planner
    pub itineraries_added: usize,

    /// New edges in the graph
    pub edges_added: usize,

    /// Requests that failed
    pub failures: usize,

    /// Network size after the expansion
    pub network: NetworkStats,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl PlanJourneyResponse {
    /// Create from a planned journey.
    pub fn from_journey(journey: PlannedJourney) -> Self {
        Self {
            cost_secs: journey.cost_secs,
            duration_secs: journey.itinerary_summary.duration_secs,
            transfers: journey.path_summary.transfer_count,
            modes: journey.path_summary.modes,
            legs: journey.itinerary.legs,
            nodes_settled: journey.nodes_settled,
        }
    }
}

impl ExpandNetworkResponse {
    pub fn new(summary: ExpandSummary, network: NetworkStats) -> Self {
        Self {
            itineraries_added: summary.itineraries_added,
            edges_added: summary.edges_added,
            failures: summary.failures,
            network,
        }
    }
}

/// Parse optional mode names into a mode set.
///
/// `None` stays `None`. An empty list yields an empty set, which the
/// planner rejects.
pub fn parse_modes(modes: Option<&[String]>) -> Result<Option<ModeSet>, InvalidMode> {
    modes
        .map(|names| {
            names
                .iter()
                .map(|name| name.parse::<TransportMode>())
                .collect::<Result<ModeSet, _>>()
        })
        .transpose()
}
