//! Journey planning facade.
//!
//! Ties the pieces together for one query: take a network snapshot, search
//! it, then refine the winning path through the provider.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::{Itinerary, ModeSet};
use crate::network::{Expander, NetworkHandle, OdPair};
use crate::provider::ItineraryProvider;

use super::config::SearchConfig;
use super::refine::{RefineError, Refiner};
use super::search::{GraphPath, PathSearch, SearchError, SearchRequest};
use super::summary::{ItinerarySummary, PathSummary};

/// Error from journey planning.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Refine(#[from] RefineError),
}

/// A planned journey: the abstract path and its concrete itinerary.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedJourney {
    pub itinerary: Itinerary,
    pub itinerary_summary: ItinerarySummary,
    pub path_summary: PathSummary,
    /// Search cost, including the walk onto the graph.
    pub cost_secs: u64,
    pub nodes_settled: usize,
    #[serde(skip)]
    pub path: GraphPath,
}

/// Result of growing the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpandSummary {
    pub itineraries_added: usize,
    pub edges_added: usize,
    pub failures: usize,
}

/// Plans journeys over a shared network using one provider.
pub struct JourneyPlanner<P> {
    network: NetworkHandle,
    provider: Arc<P>,
    config: SearchConfig,
}

impl<P: ItineraryProvider> JourneyPlanner<P> {
    pub fn new(network: NetworkHandle, provider: Arc<P>, config: SearchConfig) -> Self {
        Self {
            network,
            provider,
            config,
        }
    }

    pub fn network(&self) -> &NetworkHandle {
        &self.network
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Plan a journey.
    ///
    /// Returns `Ok(None)` when the graph holds no route between the request's
    /// coordinates.
    pub async fn plan(&self, request: &SearchRequest) -> Result<Option<PlannedJourney>, PlanError> {
        let network = self.network.snapshot().await;

        let result =
            PathSearch::new(network.graph(), network.index(), &self.config).search(request)?;
        let nodes_settled = result.nodes_settled;
        let Some(path) = result.path else {
            info!(
                origin = %request.origin,
                destination = %request.destination,
                nodes_settled,
                "No route found"
            );
            return Ok(None);
        };

        let itinerary = Refiner::new(network.graph(), self.provider.as_ref())
            .refine(&path.edges)
            .await?;

        let journey = PlannedJourney {
            itinerary_summary: ItinerarySummary::of(&itinerary),
            path_summary: PathSummary::of_path(&path.edges),
            cost_secs: path.cost_secs,
            nodes_settled,
            itinerary,
            path,
        };

        info!(
            origin = %request.origin,
            destination = %request.destination,
            cost_secs = journey.cost_secs,
            transfers = journey.path_summary.transfer_count,
            "Planned journey"
        );

        Ok(Some(journey))
    }

    /// Query the provider for the given pairs and add the answers to the
    /// network.
    pub async fn expand(&self, pairs: &[OdPair], modes: ModeSet) -> ExpandSummary {
        let expansion = Expander::new(self.provider.as_ref())
            .expand(pairs, modes)
            .await;
        let edges_added = self.network.expand(&expansion.itineraries).await;

        ExpandSummary {
            itineraries_added: expansion.itineraries.len(),
            edges_added,
            failures: expansion.failures,
        }
    }
}
