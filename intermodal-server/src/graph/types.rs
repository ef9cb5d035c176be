//! Node and edge types.

use std::fmt;

use serde::Serialize;

use crate::domain::{Location, TransportMode};

/// Dense index of a node in its graph's node arena.
///
/// Ids are assigned in insertion order starting at zero and are only
/// meaningful within the graph that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point where itinerary legs start or end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: NodeId,
    /// Pairing of the quantized coordinates; unique per node.
    pub source_key: u64,
    pub location: Location,
}

/// A directed, single-mode connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GraphEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub mode: TransportMode,
    pub duration_secs: u64,
}
