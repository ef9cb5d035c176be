//! Graph error types.

use super::NodeId;

/// Errors from graph lookups.
///
/// These indicate an inconsistency between a caller's ids and the graph
/// snapshot they were used with, never a normal outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The id does not name a node of this graph
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GraphError::NodeNotFound(NodeId(42));
        assert_eq!(err.to_string(), "node 42 not found in graph");
    }
}
