//! Hash ring data structure.
//!
//! Holds a `BTreeMap<Token, Node>` and the successor lookup that every
//! placement decision is built on.

use crate::error::{Error, Result};
use crate::node::{Node, NodeId};
use crate::partitioner::{Partitioner, PolynomialPartitioner};
use crate::ring::topology::{NodeTopology, RingTopology};
use crate::token::Token;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared handle to a node on a ring using partitioner `P`.
pub type NodeRef<P, V> = Arc<Node<<P as Partitioner>::TokenType, V>>;

/// Consistent hash ring.
///
/// Each node sits at exactly one position, `partition(node_id)`. Positions are
/// unique: a node whose id collides with an existing node's position replaces
/// it (last write wins).
///
/// Membership changes take `&mut self`; lookups and the nodes' entry stores
/// only need `&self`.
pub struct HashRing<P: Partitioner, V> {
    partitioner: Arc<P>,
    nodes: BTreeMap<P::TokenType, NodeRef<P, V>>,
}

impl<V> HashRing<PolynomialPartitioner, V> {
    /// Create an empty ring using the reference polynomial partitioner.
    pub fn new() -> Self {
        Self::with_partitioner(PolynomialPartitioner::default())
    }
}

impl<V> Default for HashRing<PolynomialPartitioner, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Partitioner, V> HashRing<P, V> {
    /// Create an empty ring using the given partitioner.
    pub fn with_partitioner(partitioner: P) -> Self {
        Self {
            partitioner: Arc::new(partitioner),
            nodes: BTreeMap::new(),
        }
    }

    pub fn partitioner(&self) -> &Arc<P> {
        &self.partitioner
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    /// Ring position of an identifier.
    pub fn position(&self, id: &str) -> P::TokenType {
        self.partitioner.partition(id)
    }

    /// Register a node at `partition(node_id)`.
    ///
    /// Adding a node that is already registered returns the existing handle
    /// and leaves its entries untouched. A different node at the same position
    /// is replaced, taking its entries with it.
    pub fn add(&mut self, node_id: impl Into<NodeId>) -> NodeRef<P, V> {
        let id = node_id.into();
        let token = self.position(id.as_str());

        match self.nodes.entry(token) {
            Entry::Occupied(mut slot) => {
                if slot.get().id() == &id {
                    return Arc::clone(slot.get());
                }
                warn!(
                    node = %id,
                    displaced = %slot.get().id(),
                    %token,
                    "node position collision, replacing previous occupant"
                );
                let node = Arc::new(Node::new(id, token));
                slot.insert(Arc::clone(&node));
                node
            }
            Entry::Vacant(slot) => {
                debug!(node = %id, %token, "added node to ring");
                Arc::clone(slot.insert(Arc::new(Node::new(id, token))))
            }
        }
    }

    /// Remove whatever node sits at `partition(node_id)`.
    ///
    /// Absent nodes are a no-op. Under a collision the occupant is removed
    /// even if it was registered under the other id.
    pub fn remove(&mut self, node_id: &NodeId) -> Option<NodeRef<P, V>> {
        let token = self.position(node_id.as_str());
        let removed = self.nodes.remove(&token)?;

        if removed.id() != node_id {
            warn!(
                requested = %node_id,
                removed = %removed.id(),
                %token,
                "removed colliding node occupying the requested position"
            );
        }
        debug!(node = %removed.id(), %token, entries = removed.len(), "removed node from ring");
        Some(removed)
    }

    /// Node at the smallest position `>= token`, wrapping to the first node
    /// when `token` is past the last one.
    pub fn successor(&self, token: P::TokenType) -> Result<&NodeRef<P, V>> {
        self.nodes
            .range(token..)
            .next()
            .or_else(|| self.nodes.iter().next())
            .map(|(_, node)| node)
            .ok_or(Error::EmptyRing)
    }

    /// Node at exactly `token`, if any.
    pub fn exact(&self, token: P::TokenType) -> Option<&NodeRef<P, V>> {
        self.nodes.get(&token)
    }

    /// Node owning `token`: the exact occupant if there is one, otherwise the
    /// successor.
    pub fn primary(&self, token: P::TokenType) -> Result<&NodeRef<P, V>> {
        match self.exact(token) {
            Some(node) => Ok(node),
            None => self.successor(token),
        }
    }

    /// Next node clockwise after `node`. On a single-node ring this is the
    /// node itself.
    pub fn next_after(&self, node: &Node<P::TokenType, V>) -> Result<&NodeRef<P, V>> {
        self.successor(node.token().next())
    }

    /// Primary node for a key.
    pub fn lookup(&self, key: &str) -> Result<&NodeRef<P, V>> {
        self.primary(self.position(key))
    }

    /// Registered node with this id. A colliding node registered under a
    /// different id does not match.
    pub fn get_node(&self, node_id: &NodeId) -> Option<&NodeRef<P, V>> {
        self.exact(self.position(node_id.as_str()))
            .filter(|node| node.id() == node_id)
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.get_node(node_id).is_some()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in ring order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeRef<P, V>> + '_ {
        self.nodes.values()
    }

    /// `(position, node id)` pairs in ring order.
    pub fn tokens(&self) -> Vec<(P::TokenType, NodeId)> {
        self.nodes
            .iter()
            .map(|(token, node)| (*token, node.id().clone()))
            .collect()
    }

    /// Fraction of the ring each node owns, in ring order.
    ///
    /// A node owns the arc `(predecessor, own position]`. Fractions sum to 1.
    pub fn ownership(&self) -> Vec<(NodeId, f64)> {
        let mut prev = match self.nodes.keys().next_back() {
            Some(last) => *last,
            None => return Vec::new(),
        };
        if self.nodes.len() == 1 {
            return self
                .nodes
                .values()
                .map(|node| (node.id().clone(), 1.0))
                .collect();
        }

        let span = <P::TokenType as Token>::ring_span();
        self.nodes
            .iter()
            .map(|(token, node)| {
                let owned = prev.distance_to(token);
                prev = *token;
                (node.id().clone(), owned as f64 / span)
            })
            .collect()
    }

    /// Point-in-time view of positions, entry counts and ownership.
    pub fn topology(&self) -> RingTopology<P::TokenType> {
        let nodes = self
            .nodes
            .values()
            .zip(self.ownership())
            .map(|(node, (_, ownership))| NodeTopology {
                id: node.id().clone(),
                position: node.token(),
                entries: node.len(),
                ownership,
            })
            .collect();

        RingTopology {
            partitioner: self.partitioner_name().to_string(),
            nodes,
        }
    }
}

impl<P: Partitioner, V> fmt::Debug for HashRing<P, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("partitioner", &self.partitioner.name())
            .field("nodes", &self.nodes.values().map(|n| n.id()).collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for a ring with an initial node set.
#[derive(Debug)]
pub struct RingBuilder<P> {
    partitioner: P,
    nodes: Vec<NodeId>,
}

impl RingBuilder<PolynomialPartitioner> {
    pub fn new() -> Self {
        Self {
            partitioner: PolynomialPartitioner::default(),
            nodes: Vec::new(),
        }
    }
}

impl Default for RingBuilder<PolynomialPartitioner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Partitioner> RingBuilder<P> {
    /// Swap the partitioner, keeping the nodes queued so far.
    pub fn with_partitioner<Q: Partitioner>(self, partitioner: Q) -> RingBuilder<Q> {
        RingBuilder {
            partitioner,
            nodes: self.nodes,
        }
    }

    pub fn add_node(mut self, node_id: impl Into<NodeId>) -> Self {
        self.nodes.push(node_id.into());
        self
    }

    pub fn add_nodes<I>(mut self, node_ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<NodeId>,
    {
        self.nodes.extend(node_ids.into_iter().map(Into::into));
        self
    }

    pub fn build<V>(self) -> HashRing<P, V> {
        let mut ring = HashRing::with_partitioner(self.partitioner);
        for id in self.nodes {
            ring.add(id);
        }
        ring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Token32;

    /// Parses the key as a decimal position, so tests can place nodes exactly.
    struct NumericPartitioner;

    impl Partitioner for NumericPartitioner {
        type TokenType = Token32;

        fn partition(&self, key: &str) -> Token32 {
            Token32(key.parse().unwrap_or(0))
        }

        fn name(&self) -> &'static str {
            "NumericPartitioner"
        }
    }

    fn numeric_ring(positions: &[i32]) -> HashRing<NumericPartitioner, ()> {
        RingBuilder::new()
            .with_partitioner(NumericPartitioner)
            .add_nodes(positions.iter().map(|p| p.to_string()))
            .build()
    }

    fn id_at(node: &NodeRef<NumericPartitioner, ()>) -> &str {
        node.id().as_str()
    }

    #[test]
    fn test_successor_between_nodes() {
        let ring = numeric_ring(&[10, 50, 90]);
        assert_eq!(id_at(ring.successor(Token32(51)).unwrap()), "90");
        assert_eq!(id_at(ring.successor(Token32(11)).unwrap()), "50");
    }

    #[test]
    fn test_successor_exact_hit() {
        let ring = numeric_ring(&[10, 50, 90]);
        assert_eq!(id_at(ring.successor(Token32(50)).unwrap()), "50");
        assert_eq!(id_at(ring.exact(Token32(50)).unwrap()), "50");
        assert!(ring.exact(Token32(51)).is_none());
    }

    #[test]
    fn test_successor_wraps() {
        let ring = numeric_ring(&[10, 50, 90]);
        assert_eq!(id_at(ring.successor(Token32(95)).unwrap()), "10");
        assert_eq!(id_at(ring.successor(Token32::max_token()).unwrap()), "10");
        assert_eq!(id_at(ring.successor(Token32::min_token()).unwrap()), "10");
    }

    #[test]
    fn test_successor_on_empty_ring() {
        let ring = numeric_ring(&[]);
        assert_eq!(ring.successor(Token32(0)).unwrap_err(), Error::EmptyRing);
        assert_eq!(ring.lookup("1").unwrap_err(), Error::EmptyRing);
    }

    #[test]
    fn test_next_after_wraps_to_first() {
        let ring = numeric_ring(&[10, 50, 90]);
        let last = ring.successor(Token32(90)).unwrap();
        assert_eq!(id_at(ring.next_after(last).unwrap()), "10");

        let single = numeric_ring(&[i32::MAX]);
        let only = single.successor(Token32(0)).unwrap();
        assert_eq!(id_at(single.next_after(only).unwrap()), id_at(only));
    }

    #[test]
    fn test_ownership_sums_to_one() {
        let ring = numeric_ring(&[10, 50, 90]);
        let shares = ring.ownership();
        assert_eq!(shares.len(), 3);
        let total: f64 = shares.iter().map(|(_, s)| s).sum();
        assert!((total - 1.0).abs() < 1e-9);
        // "50" owns (10, 50]
        assert!((shares[1].1 - 40.0 / Token32::ring_span()).abs() < 1e-15);
    }

    #[test]
    fn test_single_node_owns_everything() {
        let ring = numeric_ring(&[7]);
        assert_eq!(ring.ownership(), vec![(NodeId::new("7"), 1.0)]);
        assert!(numeric_ring(&[]).ownership().is_empty());
    }

    #[test]
    fn test_topology_lists_nodes_in_order() {
        let ring = numeric_ring(&[90, 10, 50]);
        let topology = ring.topology();
        assert_eq!(topology.partitioner, "NumericPartitioner");
        let positions: Vec<i32> = topology.nodes.iter().map(|n| n.position.0).collect();
        assert_eq!(positions, vec![10, 50, 90]);
    }
}
