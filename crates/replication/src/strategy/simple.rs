//! Simple replication strategy.
//!
//! Places R replicas sequentially around the ring (clockwise from the primary).
//!
//! # Algorithm
//!
//! 1. Primary: the node at the entry's position, or its successor
//! 2. Each replica: the successor of the previous node's position plus one,
//!    i.e. the next node after the previous one, not after the entry again
//! 3. Stop after R replicas, or as soon as the walk comes back to the primary
//!
//! # Performance
//!
//! - **Time**: O(r * log n) where r = replica count, n = nodes
//! - **Space**: O(r)
//!
//! # Limitations
//!
//! - Doesn't consider data center/rack placement
//! - Neighbouring nodes on the ring share the load of a failed node's keys

use crate::strategy::ReplicationStrategy;
use corelib::partitioner::Partitioner;
use corelib::ring::{HashRing, NodeRef};
use corelib::Result;

/// Replicas used when none is configured: primary plus two copies.
pub const DEFAULT_REPLICAS: usize = 2;

/// Simple replication strategy: R replicas placed sequentially around the ring.
///
/// # Example
///
/// ```rust
/// use corelib::ring::{HashRing, RingBuilder};
/// use corelib::PolynomialPartitioner;
/// use replication::{ReplicationStrategy, SimpleStrategy};
///
/// let ring: HashRing<PolynomialPartitioner, ()> = RingBuilder::new()
///     .add_nodes(["A", "E", "M", "V"])
///     .build();
/// let strategy = SimpleStrategy::new(2);
///
/// let chain = strategy.replica_chain(&ring, ring.position("N")).unwrap();
/// let ids: Vec<&str> = chain.iter().map(|n| n.id().as_str()).collect();
/// assert_eq!(ids, ["V", "A", "E"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleStrategy {
    /// Copies beyond the primary.
    replicas: usize,
}

impl SimpleStrategy {
    /// Create a strategy keeping `replicas` copies in addition to the primary.
    ///
    /// - 0: No replication (single copy)
    /// - 2: Standard (primary + 2 replicas)
    pub fn new(replicas: usize) -> Self {
        Self { replicas }
    }
}

impl Default for SimpleStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_REPLICAS)
    }
}

impl ReplicationStrategy for SimpleStrategy {
    fn replicas(&self) -> usize {
        self.replicas
    }

    fn replica_chain<'r, P: Partitioner, V>(
        &self,
        ring: &'r HashRing<P, V>,
        position: P::TokenType,
    ) -> Result<Vec<&'r NodeRef<P, V>>> {
        let primary = ring.primary(position)?;
        let mut chain = Vec::with_capacity(self.replicas.min(ring.node_count()) + 1);
        chain.push(primary);

        let mut current = primary;
        for _ in 0..self.replicas {
            let next = ring.next_after(current)?;
            // Back at the start: every node has been visited once.
            if next.token() == primary.token() {
                break;
            }
            chain.push(next);
            current = next;
        }

        Ok(chain)
    }

    fn name(&self) -> &'static str {
        "SimpleStrategy"
    }
}
