//! Serializable views of ring state.

use crate::node::NodeId;
use serde::Serialize;

/// One node's place on the ring.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeTopology<T> {
    pub id: NodeId,
    pub position: T,
    /// Entries currently held (primary and replica copies alike).
    pub entries: usize,
    /// Fraction of the ring this node is primary for.
    pub ownership: f64,
}

/// Nodes in ring order, as produced by `HashRing::topology`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RingTopology<T> {
    pub partitioner: String,
    pub nodes: Vec<NodeTopology<T>>,
}

impl<T> RingTopology<T> {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn total_entries(&self) -> usize {
        self.nodes.iter().map(|n| n.entries).sum()
    }
}
