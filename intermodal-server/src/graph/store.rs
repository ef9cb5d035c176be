//! Node and edge arenas with location-based deduplication.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::{Itinerary, Leg, LegSegment, Location, ModeSet, TransportMode};

use super::error::GraphError;
use super::types::{GraphEdge, GraphNode, NodeId};

/// The multimodal graph.
///
/// Grows additively: nodes and edges are never removed. At most one edge is
/// kept per `(from, to, mode)`; the first one seen wins.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    by_source_key: HashMap<u64, NodeId>,
    edges: Vec<GraphEdge>,
    edge_keys: HashSet<(NodeId, NodeId, TransportMode)>,
    /// Edge indices leaving each node, parallel to `nodes`.
    outgoing: Vec<Vec<usize>>,
    /// Modes of edges arriving at each node.
    ingoing_modes: Vec<ModeSet>,
    /// Modes of edges leaving each node.
    outgoing_modes: Vec<ModeSet>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a batch of itineraries.
    pub fn from_itineraries(itineraries: &[Itinerary]) -> Self {
        let mut graph = Self::new();
        graph.add_itineraries(itineraries);
        graph
    }

    /// Add every leaf of every leg as an edge.
    ///
    /// Returns the number of edges actually inserted.
    pub fn add_itineraries(&mut self, itineraries: &[Itinerary]) -> usize {
        let before = self.edges.len();
        for itinerary in itineraries {
            for leg in &itinerary.legs {
                self.add_leg(leg);
            }
        }
        let added = self.edges.len() - before;
        debug!(
            itineraries = itineraries.len(),
            edges_added = added,
            nodes = self.nodes.len(),
            "Added itineraries to graph"
        );
        added
    }

    /// Add the leaves of a single (possibly nested) leg.
    pub fn add_leg(&mut self, leg: &Leg) {
        for segment in leg.leaves() {
            self.add_segment(segment);
        }
    }

    fn add_segment(&mut self, segment: &LegSegment) {
        let from = self.get_or_create_node(segment.start);
        let to = self.get_or_create_node(segment.end);
        self.insert_edge(GraphEdge {
            from,
            to,
            mode: segment.mode,
            duration_secs: segment.duration_secs,
        });
    }

    /// Id of the node at `location`, creating it if its quantized cell is new.
    pub fn get_or_create_node(&mut self, location: Location) -> NodeId {
        let source_key = location.source_key();
        if let Some(&id) = self.by_source_key.get(&source_key) {
            return id;
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(GraphNode {
            id,
            source_key,
            location,
        });
        self.by_source_key.insert(source_key, id);
        self.outgoing.push(Vec::new());
        self.ingoing_modes.push(ModeSet::empty());
        self.outgoing_modes.push(ModeSet::empty());
        id
    }

    /// Insert an edge unless one with the same endpoints and mode exists.
    ///
    /// Both endpoints must already be nodes of this graph.
    fn insert_edge(&mut self, edge: GraphEdge) -> bool {
        if !self.edge_keys.insert((edge.from, edge.to, edge.mode)) {
            return false;
        }
        let idx = self.edges.len();
        self.edges.push(edge);
        self.outgoing[edge.from.index()].push(idx);
        self.outgoing_modes[edge.from.index()].insert(edge.mode);
        self.ingoing_modes[edge.to.index()].insert(edge.mode);
        true
    }

    /// Fold another graph into this one through the same dedup path.
    ///
    /// Node ids of `other` are remapped; its nodes are visited in id order so
    /// new nodes keep their relative order.
    pub fn merge_graph(&mut self, other: &Graph) {
        let remap: Vec<NodeId> = other
            .nodes
            .iter()
            .map(|node| self.get_or_create_node(node.location))
            .collect();

        for edge in &other.edges {
            self.insert_edge(GraphEdge {
                from: remap[edge.from.index()],
                to: remap[edge.to.index()],
                ..*edge
            });
        }
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Result<&GraphNode, GraphError> {
        self.nodes.get(id.index()).ok_or(GraphError::NodeNotFound(id))
    }

    /// Look up a node by location, without creating it.
    pub fn find_node(&self, location: &Location) -> Option<NodeId> {
        self.by_source_key.get(&location.source_key()).copied()
    }

    /// Edges leaving `id`. Unknown ids and dead ends both yield nothing.
    pub fn outgoing_edges(&self, id: NodeId) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.outgoing
            .get(id.index())
            .into_iter()
            .flatten()
            .map(|&idx| &self.edges[idx])
    }

    /// Modes of edges arriving at `id`.
    pub fn ingoing_modes(&self, id: NodeId) -> ModeSet {
        self.ingoing_modes
            .get(id.index())
            .copied()
            .unwrap_or_default()
    }

    /// Modes of edges leaving `id`.
    pub fn outgoing_modes(&self, id: NodeId) -> ModeSet {
        self.outgoing_modes
            .get(id.index())
            .copied()
            .unwrap_or_default()
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges of each mode, in mode declaration order.
    pub fn edge_count_by_mode(&self) -> Vec<(TransportMode, usize)> {
        TransportMode::ALL
            .into_iter()
            .map(|mode| {
                let count = self.edges.iter().filter(|e| e.mode == mode).count();
                (mode, count)
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
