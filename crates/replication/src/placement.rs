//! Placement engine: stores entries on their replica chain and reads them
//! back with failover.
//!
//! The engine only tracks which node holds which entry. Payloads live in each
//! node's own store, so a node removed from the ring takes its copies with
//! it. Nothing is re-replicated implicitly; [`PlacementEngine::rereplicate`]
//! does it on request.

use crate::strategy::{ReplicationStrategy, SimpleStrategy};
use corelib::partitioner::{Partitioner, PolynomialPartitioner};
use corelib::ring::{HashRing, NodeRef};
use corelib::token::Token;
use corelib::{CacheEntry, Error, Node, NodeId, Result};
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace};

/// Where an entry's copies go: the primary node followed by its replicas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReplicaPlacement {
    pub entry_id: String,
    pub primary: NodeId,
    pub replicas: Vec<NodeId>,
}

impl ReplicaPlacement {
    fn from_chain<T: Token, V>(entry_id: &str, chain: &[&Arc<Node<T, V>>]) -> Result<Self> {
        let (primary, replicas) = chain.split_first().ok_or(Error::EmptyRing)?;
        Ok(Self {
            entry_id: entry_id.to_string(),
            primary: primary.id().clone(),
            replicas: replicas.iter().map(|node| node.id().clone()).collect(),
        })
    }

    /// Primary then replicas, in chain order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        std::iter::once(&self.primary).chain(self.replicas.iter())
    }

    /// Number of copies, primary included.
    pub fn copies(&self) -> usize {
        self.replicas.len() + 1
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.nodes().any(|id| id == node_id)
    }
}

/// Replica-aware cache placement over a [`HashRing`].
///
/// Ring membership changes take `&mut self`. `put`, `get` and the other entry
/// operations take `&self`, since each node guards its own entry store; see
/// [`crate::SharedPlacement`] for the locked, shareable form.
pub struct PlacementEngine<P: Partitioner, V, S = SimpleStrategy> {
    ring: HashRing<P, V>,
    strategy: S,
}

impl<V> PlacementEngine<PolynomialPartitioner, V> {
    /// Engine over the reference polynomial partitioner with `replicas` copies
    /// beyond the primary.
    pub fn new(replicas: usize) -> Self {
        Self::with_partitioner(PolynomialPartitioner::default(), replicas)
    }
}

impl<P: Partitioner, V> PlacementEngine<P, V> {
    pub fn with_partitioner(partitioner: P, replicas: usize) -> Self {
        Self::with_strategy(HashRing::with_partitioner(partitioner), SimpleStrategy::new(replicas))
    }
}

impl<P: Partitioner, V, S: ReplicationStrategy> PlacementEngine<P, V, S> {
    /// Engine over an existing ring. Nodes already on the ring are kept.
    pub fn with_strategy(ring: HashRing<P, V>, strategy: S) -> Self {
        Self { ring, strategy }
    }

    pub fn ring(&self) -> &HashRing<P, V> {
        &self.ring
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Copies kept beyond the primary.
    pub fn replicas(&self) -> usize {
        self.strategy.replicas()
    }

    /// Add a node to the ring. Registering a node twice is a no-op.
    ///
    /// A node whose position is already taken by a different id replaces the
    /// occupant, which is counted as a removal.
    pub fn register_node(&mut self, node_id: impl Into<NodeId>) -> NodeRef<P, V> {
        let node_id = node_id.into();
        if let Some(existing) = self.ring.get_node(&node_id) {
            return Arc::clone(existing);
        }
        if self.ring.exact(self.ring.position(node_id.as_str())).is_some() {
            counter!("placement_node_removals_total").increment(1);
        }
        counter!("placement_node_registrations_total").increment(1);
        self.ring.add(node_id)
    }

    /// Remove a node and every copy it held.
    ///
    /// Entries whose only copy was on this node are orphaned: later `get`s
    /// return `None` until the entry is placed again.
    pub fn deregister_node(&mut self, node_id: &NodeId) -> Option<NodeRef<P, V>> {
        let removed = self.ring.remove(node_id)?;
        counter!("placement_node_removals_total").increment(1);

        let orphaned = removed
            .entry_ids()
            .iter()
            .filter(|id| !self.is_retrievable(id))
            .count();
        debug!(
            node = %removed.id(),
            held = removed.len(),
            orphaned,
            "deregistered node"
        );
        Some(removed)
    }

    /// The chain an entry is (or would be) placed on, without storing it.
    pub fn replicas_for(&self, entry_id: &str) -> Result<ReplicaPlacement> {
        let chain = self.chain(entry_id)?;
        ReplicaPlacement::from_chain(entry_id, &chain)
    }

    /// Nodes currently holding a copy, in ring order. Copies left behind on
    /// nodes that are no longer in the entry's chain are included.
    pub fn holders(&self, entry_id: &str) -> Vec<NodeId> {
        let token = self.ring.position(entry_id);
        self.ring
            .nodes()
            .filter(|node| node.holds(token, entry_id))
            .map(|node| node.id().clone())
            .collect()
    }

    /// Delete every copy of an entry from every node. Returns the number of
    /// copies removed.
    pub fn remove_entry(&self, entry_id: &str) -> Result<usize> {
        if self.ring.is_empty() {
            return Err(Error::EmptyRing);
        }
        let token = self.ring.position(entry_id);
        let removed = self
            .ring
            .nodes()
            .filter_map(|node| node.evict(token, entry_id))
            .count();
        debug!(entry = entry_id, removed, "removed entry");
        Ok(removed)
    }

    fn chain(&self, entry_id: &str) -> Result<Vec<&NodeRef<P, V>>> {
        self.strategy
            .replica_chain(&self.ring, self.ring.position(entry_id))
    }

    fn is_retrievable(&self, entry_id: &str) -> bool {
        let token = self.ring.position(entry_id);
        self.chain(entry_id)
            .map(|chain| chain.iter().any(|node| node.holds(token, entry_id)))
            .unwrap_or(false)
    }
}

impl<P: Partitioner, V: Clone, S: ReplicationStrategy> PlacementEngine<P, V, S> {
    /// Store an entry on its primary node and each replica.
    ///
    /// # Errors
    /// `Error::EmptyRing` when no nodes are registered.
    pub fn put(&self, entry_id: impl Into<String>, payload: V) -> Result<ReplicaPlacement> {
        let entry_id = entry_id.into();
        let token = self.ring.position(&entry_id);
        let chain = self.strategy.replica_chain(&self.ring, token)?;

        for node in &chain {
            trace!(entry = %entry_id, node = %node.id(), "storing copy");
            node.store(token, CacheEntry::new(entry_id.clone(), payload.clone()));
        }
        counter!("placement_puts_total").increment(1);

        ReplicaPlacement::from_chain(&entry_id, &chain)
    }

    /// Read an entry, trying the primary first and then each replica in
    /// chain order.
    ///
    /// `Ok(None)` means no node in the chain holds the entry: it was never
    /// placed, was removed, or was orphaned by a node removal.
    ///
    /// # Errors
    /// `Error::EmptyRing` when no nodes are registered.
    pub fn get(&self, entry_id: &str) -> Result<Option<V>> {
        let token = self.ring.position(entry_id);
        let chain = self.strategy.replica_chain(&self.ring, token)?;

        for (rank, node) in chain.iter().enumerate() {
            if let Some(payload) = node.fetch(token, entry_id) {
                let outcome = if rank == 0 { "hit" } else { "replica_hit" };
                counter!("placement_lookups_total", "outcome" => outcome).increment(1);
                if rank > 0 {
                    debug!(entry = entry_id, node = %node.id(), rank, "served from replica");
                }
                return Ok(Some(payload));
            }
        }

        counter!("placement_lookups_total", "outcome" => "miss").increment(1);
        debug!(entry = entry_id, "entry not found on any replica");
        Ok(None)
    }

    /// Place a retrievable entry again on its current chain, restoring the
    /// full copy count after membership changes.
    ///
    /// Returns `None` when no node in the chain holds the entry any more.
    pub fn rereplicate(&self, entry_id: &str) -> Result<Option<ReplicaPlacement>> {
        match self.get(entry_id)? {
            Some(payload) => self.put(entry_id, payload).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
    use std::collections::HashMap;

    fn reference_engine(replicas: usize) -> PlacementEngine<PolynomialPartitioner, String> {
        let mut engine = PlacementEngine::new(replicas);
        for id in ["A", "E", "M", "V"] {
            engine.register_node(id);
        }
        engine
    }

    fn node_ids(ids: &[&str]) -> Vec<NodeId> {
        ids.iter().map(|id| NodeId::new(*id)).collect()
    }

    /// Counter values keyed by `name` or `name{label=value}`.
    fn counters(snapshotter: &Snapshotter) -> HashMap<String, u64> {
        snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .filter_map(|(key, _, _, value)| match value {
                DebugValue::Counter(n) => {
                    let key = key.key();
                    let mut name = key.name().to_string();
                    for label in key.labels() {
                        name.push_str(&format!("{{{}={}}}", label.key(), label.value()));
                    }
                    Some((name, n))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_put_reports_chain() {
        let engine = reference_engine(2);
        let placement = engine.put("N", "payload-n".to_string()).unwrap();

        assert_eq!(placement.primary, NodeId::new("V"));
        assert_eq!(placement.replicas, node_ids(&["A", "E"]));
        assert_eq!(placement.copies(), 3);
        assert!(placement.contains(&NodeId::new("E")));
        assert!(!placement.contains(&NodeId::new("M")));
        assert_eq!(engine.replicas_for("N").unwrap(), placement);
    }

    #[test]
    fn test_get_falls_back_to_replica() {
        let engine = reference_engine(2);
        engine.put("N", "payload-n".to_string()).unwrap();

        // Drop the primary copy by hand; the first replica must serve it.
        let token = engine.ring().position("N");
        let primary = engine.ring().get_node(&NodeId::new("V")).unwrap();
        assert!(primary.evict(token, "N").is_some());

        assert_eq!(engine.get("N").unwrap(), Some("payload-n".to_string()));
    }

    #[test]
    fn test_holders_and_remove_entry() {
        let engine = reference_engine(1);
        engine.put("G", "g".to_string()).unwrap();
        assert_eq!(engine.holders("G"), node_ids(&["M", "V"]));

        assert_eq!(engine.remove_entry("G").unwrap(), 2);
        assert!(engine.holders("G").is_empty());
        assert_eq!(engine.get("G").unwrap(), None);
        assert_eq!(engine.remove_entry("G").unwrap(), 0);
    }

    #[test]
    fn test_rereplicate_restores_copy_count() {
        let mut engine = reference_engine(2);
        engine.put("G", "g".to_string()).unwrap();
        engine.deregister_node(&NodeId::new("M"));

        // G's chain is now V, A, E; only V and A hold copies.
        assert_eq!(engine.holders("G"), node_ids(&["A", "V"]));

        let placement = engine.rereplicate("G").unwrap().unwrap();
        assert_eq!(placement.primary, NodeId::new("V"));
        assert_eq!(engine.holders("G"), node_ids(&["A", "E", "V"]));
    }

    #[test]
    fn test_rereplicate_missing_entry() {
        let engine = reference_engine(2);
        assert_eq!(engine.rereplicate("never-placed").unwrap(), None);
    }

    #[test]
    fn test_metrics_count_membership_changes_and_lookups() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            let mut engine = reference_engine(2);
            // Re-registering an existing node is not a registration.
            engine.register_node("V");

            engine.put("N", "payload-n".to_string()).unwrap();
            engine.get("N").unwrap();

            let token = engine.ring().position("N");
            let primary = engine.ring().get_node(&NodeId::new("V")).unwrap();
            primary.evict(token, "N");
            engine.get("N").unwrap();
            engine.get("never-placed").unwrap();

            engine.deregister_node(&NodeId::new("M"));
            engine.deregister_node(&NodeId::new("M"));
        });

        let counters = counters(&snapshotter);
        assert_eq!(counters["placement_node_registrations_total"], 4);
        assert_eq!(counters["placement_node_removals_total"], 1);
        assert_eq!(counters["placement_puts_total"], 1);
        assert_eq!(counters["placement_lookups_total{outcome=hit}"], 1);
        assert_eq!(counters["placement_lookups_total{outcome=replica_hit}"], 1);
        assert_eq!(counters["placement_lookups_total{outcome=miss}"], 1);
    }

    #[test]
    fn test_colliding_registration_counts_displaced_node() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        metrics::with_local_recorder(&recorder, || {
            let mut engine: PlacementEngine<PolynomialPartitioner, String> =
                PlacementEngine::new(1);
            engine.register_node("Aa");
            engine.register_node("BB");
            engine.register_node("BB");
            assert_eq!(engine.ring().node_count(), 1);
        });

        // Registrations minus removals tracks the ring size.
        let counters = counters(&snapshotter);
        assert_eq!(counters["placement_node_registrations_total"], 2);
        assert_eq!(counters["placement_node_removals_total"], 1);
    }

    #[test]
    fn test_empty_engine() {
        let engine: PlacementEngine<PolynomialPartitioner, String> = PlacementEngine::new(2);
        assert_eq!(engine.put("N", "n".to_string()).unwrap_err(), Error::EmptyRing);
        assert_eq!(engine.get("N").unwrap_err(), Error::EmptyRing);
        assert_eq!(engine.remove_entry("N").unwrap_err(), Error::EmptyRing);
        assert!(engine.holders("N").is_empty());
    }
}
