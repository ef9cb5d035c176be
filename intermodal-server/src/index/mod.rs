//! Nearest-node lookup for mapping query coordinates onto the graph.
//!
//! Besides one tree over every node, the index keeps, per transport mode,
//! a tree of nodes that can be *left* by that mode and a tree of nodes that
//! can be *reached* by it. Seeding a mode-restricted search from the plain
//! nearest node could strand it on a node with no edge of the wanted mode.
//!
//! The index is never updated in place: build a new one from the graph
//! whenever the node set changes.

use std::collections::HashMap;

use rstar::RTree;
use rstar::primitives::GeomWithData;
use tracing::debug;

use crate::domain::{Location, TransportMode};
use crate::graph::{Graph, NodeId};

type IndexedNode = GeomWithData<[f64; 2], NodeId>;

/// Which side of a node's edges a per-mode tree is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Nodes with at least one edge of the mode leaving them.
    Outgoing,
    /// Nodes with at least one edge of the mode arriving at them.
    Ingoing,
}

/// Point tree over a subset of graph nodes.
#[derive(Clone)]
struct NodeTree {
    tree: RTree<IndexedNode>,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self { tree: RTree::new() }
    }
}

impl NodeTree {
    fn build<'a>(nodes: impl Iterator<Item = (&'a Location, NodeId)>) -> Self {
        let points: Vec<IndexedNode> = nodes
            .map(|(location, id)| GeomWithData::new(location.to_point(), id))
            .collect();
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    fn nearest(&self, point: [f64; 2], k: usize) -> Vec<NodeId> {
        self.tree
            .nearest_neighbor_iter(&point)
            .take(k)
            .map(|entry| entry.data)
            .collect()
    }

    fn len(&self) -> usize {
        self.tree.size()
    }
}

/// Spatial index over one graph snapshot.
#[derive(Clone, Default)]
pub struct SpatialIndex {
    all: NodeTree,
    by_mode: HashMap<(TransportMode, Direction), NodeTree>,
}

impl SpatialIndex {
    /// Build every tree from the graph's current nodes and mode sets.
    pub fn build(graph: &Graph) -> Self {
        let all = NodeTree::build(graph.nodes().iter().map(|n| (&n.location, n.id)));

        let mut by_mode = HashMap::new();
        for mode in TransportMode::ALL {
            for direction in [Direction::Outgoing, Direction::Ingoing] {
                let tree = NodeTree::build(
                    graph
                        .nodes()
                        .iter()
                        .filter(|n| {
                            let modes = match direction {
                                Direction::Outgoing => graph.outgoing_modes(n.id),
                                Direction::Ingoing => graph.ingoing_modes(n.id),
                            };
                            modes.contains(mode)
                        })
                        .map(|n| (&n.location, n.id)),
                );
                by_mode.insert((mode, direction), tree);
            }
        }

        debug!(nodes = all.len(), "Built spatial index");

        Self { all, by_mode }
    }

    /// Up to `k` nodes nearest to `point`, closest first.
    ///
    /// Distance is Euclidean in degree space, which ranks candidates well
    /// enough at city scale. An empty index yields an empty result.
    pub fn nearest(&self, point: &Location, k: usize) -> Vec<NodeId> {
        self.all.nearest(point.to_point(), k)
    }

    /// Like [`SpatialIndex::nearest`], restricted to nodes with an edge of
    /// `mode` in the given direction.
    pub fn nearest_for_mode(
        &self,
        point: &Location,
        mode: TransportMode,
        direction: Direction,
        k: usize,
    ) -> Vec<NodeId> {
        self.by_mode
            .get(&(mode, direction))
            .map(|tree| tree.nearest(point.to_point(), k))
            .unwrap_or_default()
    }

    /// Number of nodes in the global tree.
    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes indexed for a mode and direction.
    pub fn len_for_mode(&self, mode: TransportMode, direction: Direction) -> usize {
        self.by_mode
            .get(&(mode, direction))
            .map(NodeTree::len)
            .unwrap_or(0)
    }
}
