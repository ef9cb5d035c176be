//! Multimodal graph assembled from external itineraries.
//!
//! Nodes are deduplicated by quantized location, so the endpoints of legs
//! reported by different planners meet whenever they fall in the same
//! milli-degree cell. Edges carry a single mode and a duration.

mod error;
mod store;
mod types;

pub use error::GraphError;
pub use store::Graph;
pub use types::{GraphEdge, GraphNode, NodeId};
