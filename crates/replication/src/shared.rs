//! Thread-safe wrapper around [`PlacementEngine`].
//!
//! A single reader/writer lock guards ring membership: registering or
//! removing a node takes the write lock, while placement and lookups share the
//! read lock for the duration of their ring walk. Entry writes are then guarded
//! per node by each node's own store, so puts landing on different nodes do
//! not contend.

use crate::placement::{PlacementEngine, ReplicaPlacement};
use crate::strategy::{ReplicationStrategy, SimpleStrategy};
use corelib::partitioner::Partitioner;
use corelib::ring::{NodeRef, RingTopology};
use corelib::{NodeId, Result};
use parking_lot::{RwLock, RwLockReadGuard};

pub struct SharedPlacement<P: Partitioner, V, S = SimpleStrategy> {
    inner: RwLock<PlacementEngine<P, V, S>>,
}

impl<P: Partitioner, V, S: ReplicationStrategy> SharedPlacement<P, V, S> {
    pub fn new(engine: PlacementEngine<P, V, S>) -> Self {
        Self {
            inner: RwLock::new(engine),
        }
    }

    pub fn register_node(&self, node_id: impl Into<NodeId>) -> NodeRef<P, V> {
        self.inner.write().register_node(node_id)
    }

    pub fn deregister_node(&self, node_id: &NodeId) -> Option<NodeRef<P, V>> {
        self.inner.write().deregister_node(node_id)
    }

    pub fn replicas_for(&self, entry_id: &str) -> Result<ReplicaPlacement> {
        self.inner.read().replicas_for(entry_id)
    }

    pub fn remove_entry(&self, entry_id: &str) -> Result<usize> {
        self.inner.read().remove_entry(entry_id)
    }

    pub fn node_count(&self) -> usize {
        self.inner.read().ring().node_count()
    }

    pub fn topology(&self) -> RingTopology<P::TokenType> {
        self.inner.read().ring().topology()
    }

    /// Hold the read lock for a batch of operations on the engine.
    pub fn read(&self) -> RwLockReadGuard<'_, PlacementEngine<P, V, S>> {
        self.inner.read()
    }

    pub fn into_inner(self) -> PlacementEngine<P, V, S> {
        self.inner.into_inner()
    }
}

impl<P: Partitioner, V: Clone, S: ReplicationStrategy> SharedPlacement<P, V, S> {
    pub fn put(&self, entry_id: impl Into<String>, payload: V) -> Result<ReplicaPlacement> {
        self.inner.read().put(entry_id, payload)
    }

    pub fn get(&self, entry_id: &str) -> Result<Option<V>> {
        self.inner.read().get(entry_id)
    }
}

impl<P: Partitioner, V, S: ReplicationStrategy> From<PlacementEngine<P, V, S>>
    for SharedPlacement<P, V, S>
{
    fn from(engine: PlacementEngine<P, V, S>) -> Self {
        Self::new(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::partitioner::Xxh3Partitioner;
    use std::sync::Arc;

    #[test]
    fn test_concurrent_puts_and_gets() {
        let shared: Arc<SharedPlacement<Xxh3Partitioner, u64>> =
            Arc::new(PlacementEngine::with_partitioner(Xxh3Partitioner, 2).into());
        for i in 0..8 {
            shared.register_node(format!("node-{i}"));
        }

        crossbeam::scope(|scope| {
            for worker in 0..4u64 {
                let shared = Arc::clone(&shared);
                scope.spawn(move |_| {
                    for i in 0..250u64 {
                        let key = format!("w{worker}-k{i}");
                        shared.put(key.clone(), worker * 1_000 + i).unwrap();
                        assert_eq!(shared.get(&key).unwrap(), Some(worker * 1_000 + i));
                    }
                });
            }
        })
        .unwrap();

        let engine = Arc::try_unwrap(shared).ok().unwrap().into_inner();
        for worker in 0..4u64 {
            for i in 0..250u64 {
                let key = format!("w{worker}-k{i}");
                assert_eq!(engine.holders(&key).len(), 3);
            }
        }
    }

    #[test]
    fn test_membership_changes_while_reading() {
        let shared: SharedPlacement<Xxh3Partitioner, u64> =
            PlacementEngine::with_partitioner(Xxh3Partitioner, 1).into();
        for i in 0..4 {
            shared.register_node(format!("node-{i}"));
        }
        for i in 0..100u64 {
            shared.put(format!("key-{i}"), i).unwrap();
        }

        crossbeam::scope(|scope| {
            scope.spawn(|_| {
                for round in 0..20 {
                    shared.register_node(format!("extra-{round}"));
                    shared.deregister_node(&NodeId::new(format!("extra-{round}")));
                }
            });
            scope.spawn(|_| {
                for i in 0..100u64 {
                    // Ring never drops below four nodes, so lookups keep working.
                    assert!(shared.get(&format!("key-{i}")).is_ok());
                }
            });
        })
        .unwrap();

        assert_eq!(shared.node_count(), 4);
    }
}
