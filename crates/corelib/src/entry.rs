//! Cache entries and the identity contract shared by everything placed on
//! the ring.

/// Anything that can be positioned on the ring exposes a string id; its
/// position is the partitioner applied to that id.
pub trait Identify {
    fn id(&self) -> &str;
}

impl Identify for str {
    fn id(&self) -> &str {
        self
    }
}

impl Identify for String {
    fn id(&self) -> &str {
        self
    }
}

/// A cached value together with the id it was placed under.
///
/// The payload is opaque to the ring. Nodes return clones of it, so large
/// payloads are best wrapped in an `Arc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry<V> {
    id: String,
    payload: V,
}

impl<V> CacheEntry<V> {
    pub fn new(id: impl Into<String>, payload: V) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }

    pub fn payload(&self) -> &V {
        &self.payload
    }

    pub fn into_payload(self) -> V {
        self.payload
    }
}

impl<V> Identify for CacheEntry<V> {
    fn id(&self) -> &str {
        &self.id
    }
}
