//! Priority frontier for uniform-cost search.
//!
//! A binary heap with lazy invalidation: `decrease_key` pushes a fresh entry
//! and records the new best priority, and `pop_min` discards entries whose
//! priority no longer matches. Equal priorities pop in insertion order.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::graph::NodeId;

#[derive(Copy, Clone, Eq, PartialEq)]
struct Entry {
    priority: u64,
    seq: u64,
    node: NodeId,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lowest priority first; earlier seq wins ties
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue of nodes supporting decrease-key.
#[derive(Default)]
pub(super) struct Frontier {
    heap: BinaryHeap<Entry>,
    /// Current priority of every node still queued.
    queued: HashMap<NodeId, u64>,
    next_seq: u64,
}

impl Frontier {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Queue `node` with `priority`. The node must not already be queued.
    pub(super) fn insert(&mut self, node: NodeId, priority: u64) {
        debug_assert!(!self.queued.contains_key(&node));
        self.queued.insert(node, priority);
        self.push(node, priority);
    }

    /// Lower the priority of a queued node.
    pub(super) fn decrease_key(&mut self, node: NodeId, priority: u64) {
        debug_assert!(self.queued.get(&node).is_some_and(|&p| priority < p));
        self.queued.insert(node, priority);
        self.push(node, priority);
    }

    /// Current priority of `node`, if it is queued.
    pub(super) fn priority(&self, node: NodeId) -> Option<u64> {
        self.queued.get(&node).copied()
    }

    /// Remove and return the node with the lowest priority.
    pub(super) fn pop_min(&mut self) -> Option<(NodeId, u64)> {
        while let Some(Entry { priority, node, .. }) = self.heap.pop() {
            // Skip entries superseded by a later decrease_key
            if self.queued.get(&node) == Some(&priority) {
                self.queued.remove(&node);
                return Some((node, priority));
            }
        }
        None
    }

    fn push(&mut self, node: NodeId, priority: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            priority,
            seq,
            node,
        });
    }
}
