//! Immutable graph + index snapshots and the handle that swaps them.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::{Itinerary, TransportMode};
use crate::graph::Graph;
use crate::index::SpatialIndex;

/// A graph and the spatial index built from it.
///
/// Never mutated after construction, so searches can share it freely.
#[derive(Clone, Default)]
pub struct Network {
    graph: Graph,
    index: SpatialIndex,
}

/// Size of a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    pub nodes: usize,
    pub edges: usize,
    pub edges_by_mode: BTreeMap<TransportMode, usize>,
}

impl Network {
    /// An empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a graph and index it.
    pub fn build(graph: Graph) -> Self {
        let index = SpatialIndex::build(&graph);
        Self { graph, index }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            nodes: self.graph.node_count(),
            edges: self.graph.edge_count(),
            edges_by_mode: self.graph.edge_count_by_mode().into_iter().collect(),
        }
    }
}

/// Shared, swappable reference to the current network.
///
/// Readers take a snapshot and search it without holding the lock. Writers
/// build a new network off to the side and swap it in, so a search always
/// sees one consistent graph and index.
#[derive(Clone, Default)]
pub struct NetworkHandle {
    current: Arc<RwLock<Arc<Network>>>,
}

impl NetworkHandle {
    pub fn new(network: Network) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(network))),
        }
    }

    /// The network as of now.
    pub async fn snapshot(&self) -> Arc<Network> {
        self.current.read().await.clone()
    }

    /// Add itineraries to the graph and publish the result.
    ///
    /// Returns the number of edges added. When nothing new was added the
    /// current snapshot is kept.
    pub async fn expand(&self, itineraries: &[Itinerary]) -> usize {
        let mut current = self.current.write().await;

        let mut graph = current.graph().clone();
        let nodes_before = graph.node_count();
        let added = graph.add_itineraries(itineraries);

        if added == 0 && graph.node_count() == nodes_before {
            return 0;
        }

        *current = Arc::new(Network::build(graph));
        info!(
            edges_added = added,
            nodes = current.graph().node_count(),
            edges = current.graph().edge_count(),
            "Published expanded network"
        );
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Leg, Location};

    fn loc(lat: f64, lon: f64) -> Location {
        Location::new(lat, lon).unwrap()
    }

    fn walk(from: (f64, f64), to: (f64, f64)) -> Itinerary {
        Itinerary::new(vec![Leg::leaf(
            loc(from.0, from.1),
            loc(to.0, to.1),
            120,
            TransportMode::Walk,
        )])
    }

    #[test]
    fn stats_count_by_mode() {
        let network = Network::build(Graph::from_itineraries(&[Itinerary::new(vec![
            Leg::leaf(loc(50.0, 14.0), loc(50.1, 14.0), 60, TransportMode::Car),
            Leg::leaf(loc(50.1, 14.0), loc(50.2, 14.0), 60, TransportMode::Walk),
        ])]));

        let stats = network.stats();
        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.edges, 2);
        assert_eq!(stats.edges_by_mode.get(&TransportMode::Car), Some(&1));
        assert_eq!(stats.edges_by_mode.get(&TransportMode::Walk), Some(&1));
    }

    #[tokio::test]
    async fn expansion_publishes_new_snapshot() {
        let handle = NetworkHandle::new(Network::new());
        let before = handle.snapshot().await;

        let added = handle.expand(&[walk((50.0, 14.0), (50.1, 14.0))]).await;

        assert_eq!(added, 1);
        let after = handle.snapshot().await;
        assert_eq!(after.graph().edge_count(), 1);
        assert_eq!(after.index().len(), 2);
        // Snapshots taken earlier are unaffected.
        assert!(before.graph().is_empty());
        assert!(before.index().is_empty());
    }

    #[tokio::test]
    async fn repeated_expansion_keeps_snapshot() {
        let handle = NetworkHandle::new(Network::new());
        let itinerary = walk((50.0, 14.0), (50.1, 14.0));

        handle.expand(std::slice::from_ref(&itinerary)).await;
        let first = handle.snapshot().await;
        let added = handle.expand(&[itinerary]).await;
        let second = handle.snapshot().await;

        assert_eq!(added, 0);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn concurrent_expansions_are_all_applied() {
        let handle = NetworkHandle::new(Network::new());

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let handle = handle.clone();
                let lat = 50.0 + f64::from(i) * 0.01;
                tokio::spawn(async move { handle.expand(&[walk((lat, 14.0), (lat, 14.5))]).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(handle.snapshot().await.graph().edge_count(), 8);
    }
}
