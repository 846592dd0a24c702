//! Node abstractions for the consistent hash ring.
//!
//! A node is a storage unit registered on the ring. It owns the entries for
//! which it is a holder (primary or replica; the node does not distinguish),
//! keyed by the entry's token.

use crate::entry::{CacheEntry, Identify};
use crate::token::Token;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a node in the cluster.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId(id)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Identify for NodeId {
    fn id(&self) -> &str {
        &self.0
    }
}

/// Logical node participating in the ring.
///
/// The entry store is a `DashMap`, so different nodes (and different shards
/// of one node) can be written concurrently through a shared reference while
/// ring membership stays behind a single lock.
pub struct Node<T: Token, V> {
    id: NodeId,
    token: T,
    entries: DashMap<T, CacheEntry<V>>,
}

impl<T: Token, V> Node<T, V> {
    /// Construct a node at the given ring position.
    pub fn new(id: NodeId, token: T) -> Self {
        Self {
            id,
            token,
            entries: DashMap::new(),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// This node's position on the ring.
    pub fn token(&self) -> T {
        self.token
    }

    /// Store an entry under its token, replacing whatever was there.
    ///
    /// Two entries whose ids hash to the same token overwrite each other.
    pub fn store(&self, token: T, entry: CacheEntry<V>) -> Option<CacheEntry<V>> {
        self.entries.insert(token, entry)
    }

    /// True if this node holds the entry with this id at this token.
    pub fn holds(&self, token: T, id: &str) -> bool {
        self.entries
            .get(&token)
            .map_or(false, |entry| entry.id() == id)
    }

    /// Drop the entry with this id, if this node holds it.
    pub fn evict(&self, token: T, id: &str) -> Option<CacheEntry<V>> {
        self.entries
            .remove_if(&token, |_, entry| entry.id() == id)
            .map(|(_, entry)| entry)
    }

    /// Number of entries held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids of every entry held, in no particular order.
    pub fn entry_ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.value().id().to_string())
            .collect()
    }
}

impl<T: Token, V: Clone> Node<T, V> {
    /// Payload of the entry with this id, if this node holds it.
    ///
    /// A different entry stored at the same token (hash collision) reads as a
    /// miss.
    pub fn fetch(&self, token: T, id: &str) -> Option<V> {
        self.entries
            .get(&token)
            .filter(|entry| entry.id() == id)
            .map(|entry| entry.payload().clone())
    }
}

impl<T: Token, V> Identify for Node<T, V> {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl<T: Token, V> fmt::Debug for Node<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("token", &self.token)
            .field("entries", &self.entries.len())
            .finish()
    }
}
