//! Multimodal uniform-cost search.
//!
//! Dijkstra over the fused graph with many sources and many sinks. The
//! sources are the nodes nearest the query origin, each starting at the
//! time needed to walk to it; the search stops as soon as any node near the
//! destination is settled. Relaxation honours the allowed-mode set, the
//! rule that a car or bicycle cannot be picked up mid-journey, and the
//! penalty for leaving a car or bicycle.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::domain::{Location, ModeSet, TransportMode};
use crate::graph::{Graph, GraphEdge, GraphError, NodeId};
use crate::index::{Direction, SpatialIndex};

use super::config::SearchConfig;
use super::frontier::Frontier;

/// Error from path search.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The graph and the ids used against it disagree
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),
}

/// Request for path search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Where the traveller starts.
    pub origin: Location,

    /// Where the traveller wants to go.
    pub destination: Location,

    /// Modes the path may use. `None` allows every mode and seeds from
    /// the all-nodes index.
    pub modes: Option<ModeSet>,
}

impl SearchRequest {
    /// Create a new unrestricted search request.
    pub fn new(origin: Location, destination: Location) -> Self {
        Self {
            origin,
            destination,
            modes: None,
        }
    }

    /// Restrict the path to the given modes.
    pub fn with_modes(mut self, modes: ModeSet) -> Self {
        self.modes = Some(modes);
        self
    }

    /// Validate the search request.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.modes.is_some_and(|modes| modes.is_empty()) {
            return Err(SearchError::InvalidRequest(
                "allowed-mode set is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The modes relaxation may use.
    pub fn allowed_modes(&self) -> ModeSet {
        self.modes.unwrap_or_else(ModeSet::all)
    }
}

/// A path through the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPath {
    /// Edges in travel order.
    pub edges: Vec<GraphEdge>,

    /// Cost at the destination node: the walk to the first node, every edge
    /// duration and every transfer penalty, in seconds.
    pub cost_secs: u64,
}

impl GraphPath {
    /// True when origin and destination resolved to the same node.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Modes of the edges, in travel order.
    pub fn modes(&self) -> impl Iterator<Item = TransportMode> + '_ {
        self.edges.iter().map(|edge| edge.mode)
    }
}

/// Result of path search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The cheapest path, or `None` when no destination candidate is
    /// reachable.
    pub path: Option<GraphPath>,

    /// Number of nodes settled before the search stopped.
    pub nodes_settled: usize,
}

impl SearchResult {
    /// A result reporting that no route exists.
    pub fn no_route(nodes_settled: usize) -> Self {
        Self {
            path: None,
            nodes_settled,
        }
    }

    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }
}

/// Path search over one graph snapshot and its index.
pub struct PathSearch<'a> {
    graph: &'a Graph,
    index: &'a SpatialIndex,
    config: &'a SearchConfig,
}

impl<'a> PathSearch<'a> {
    /// Create a new path search.
    pub fn new(graph: &'a Graph, index: &'a SpatialIndex, config: &'a SearchConfig) -> Self {
        Self {
            graph,
            index,
            config,
        }
    }

    /// Find the cheapest path between the request's coordinates.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        request.validate()?;

        let (origins, destinations) = self.seeds(request);
        debug!(
            origin = %request.origin,
            destination = %request.destination,
            origin_seeds = origins.len(),
            destination_seeds = destinations.len(),
            "Seeded path search"
        );

        self.search_from_seeds(
            &request.origin,
            &origins,
            &destinations,
            request.allowed_modes(),
        )
    }

    /// Candidate start and end nodes for a request.
    ///
    /// Restricted requests draw from every allowed mode's tree: outgoing
    /// trees near the origin, ingoing trees near the destination.
    fn seeds(&self, request: &SearchRequest) -> (Vec<NodeId>, Vec<NodeId>) {
        match request.modes {
            None => (
                self.index
                    .nearest(&request.origin, self.config.candidate_count),
                self.index
                    .nearest(&request.destination, self.config.candidate_count),
            ),
            Some(modes) => (
                self.mode_seeds(&request.origin, modes, Direction::Outgoing),
                self.mode_seeds(&request.destination, modes, Direction::Ingoing),
            ),
        }
    }

    fn mode_seeds(&self, point: &Location, modes: ModeSet, direction: Direction) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        modes
            .iter()
            .flat_map(|mode| {
                self.index
                    .nearest_for_mode(point, mode, direction, self.config.candidates_per_mode)
            })
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Run the search from explicit candidate sets.
    ///
    /// Each origin candidate starts at the walking time from `origin` to it.
    /// An empty candidate set on either side yields no route.
    pub fn search_from_seeds(
        &self,
        origin: &Location,
        origins: &[NodeId],
        destinations: &[NodeId],
        allowed: ModeSet,
    ) -> Result<SearchResult, SearchError> {
        if origins.is_empty() || destinations.is_empty() {
            return Ok(SearchResult::no_route(0));
        }

        let destination_set: HashSet<NodeId> = destinations.iter().copied().collect();

        let mut frontier = Frontier::new();
        let mut settled: HashSet<NodeId> = HashSet::new();
        // Edge used to reach each node at its current priority.
        let mut predecessor: HashMap<NodeId, GraphEdge> = HashMap::new();
        // Mode of that edge; absent for nodes still at their seed priority.
        let mut arrival_mode: HashMap<NodeId, TransportMode> = HashMap::new();

        for &seed in origins {
            let node = self.graph.node(seed)?;
            let walk = TransportMode::Walk.duration_for_distance(origin.distance_meters(&node.location));
            match frontier.priority(seed) {
                None => frontier.insert(seed, walk),
                Some(existing) if walk < existing => frontier.decrease_key(seed, walk),
                Some(_) => {}
            }
        }

        while let Some((node, priority)) = frontier.pop_min() {
            if destination_set.contains(&node) {
                let edges = reconstruct(&predecessor, node);
                debug!(
                    cost_secs = priority,
                    edges = edges.len(),
                    nodes_settled = settled.len(),
                    "Path found"
                );
                return Ok(SearchResult {
                    path: Some(GraphPath {
                        edges,
                        cost_secs: priority,
                    }),
                    nodes_settled: settled.len(),
                });
            }

            settled.insert(node);
            let current_mode = arrival_mode.get(&node).copied();
            trace!(node = %node, priority, mode = ?current_mode, "Settled node");

            for edge in self.graph.outgoing_edges(node) {
                if settled.contains(&edge.to)
                    || !allowed.contains(edge.mode)
                    || !TransportMode::can_transfer(current_mode, edge.mode)
                {
                    continue;
                }

                let penalty = match current_mode {
                    Some(prev) if prev != edge.mode => prev.transfer_penalty(),
                    _ => 0,
                };
                let candidate = priority
                    .saturating_add(edge.duration_secs)
                    .saturating_add(penalty);

                match frontier.priority(edge.to) {
                    None => frontier.insert(edge.to, candidate),
                    Some(existing) if existing > candidate => {
                        frontier.decrease_key(edge.to, candidate)
                    }
                    Some(_) => continue,
                }
                predecessor.insert(edge.to, *edge);
                arrival_mode.insert(edge.to, edge.mode);
            }
        }

        debug!(nodes_settled = settled.len(), "No route found");
        Ok(SearchResult::no_route(settled.len()))
    }
}

/// Walk predecessor edges back from `destination` to a seed.
///
/// Predecessors always point at nodes settled earlier, so the walk ends at
/// a node that was never relaxed into, which is an origin seed. The walk
/// does not stop at the first origin seed it meets: a seed reached more
/// cheaply through another seed keeps its predecessor, so the edges always
/// add up to the reported cost.
fn reconstruct(predecessor: &HashMap<NodeId, GraphEdge>, destination: NodeId) -> Vec<GraphEdge> {
    let mut edges = Vec::new();
    let mut current = destination;
    while let Some(edge) = predecessor.get(&current) {
        edges.push(*edge);
        current = edge.from;
    }
    edges.reverse();
    edges
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
