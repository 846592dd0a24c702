//! Replication strategy abstractions.
//!
//! A replication strategy determines how many copies of an entry exist and
//! which nodes hold them.
//!
//! - **SimpleStrategy**: R replicas placed on the nodes following the primary
//!   clockwise around the ring

pub mod simple;

pub use simple::SimpleStrategy;

use corelib::partitioner::Partitioner;
use corelib::ring::{HashRing, NodeRef};
use corelib::Result;

/// Trait for replication strategies.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync) as they may be
/// shared across threads.
pub trait ReplicationStrategy: Send + Sync + 'static {
    /// Number of copies beyond the primary.
    fn replicas(&self) -> usize;

    /// Total number of copies, primary included.
    fn replication_factor(&self) -> usize {
        self.replicas() + 1
    }

    /// Nodes that hold an entry at `position`, primary first.
    ///
    /// Every node appears at most once, so a ring smaller than the
    /// replication factor yields every node exactly once.
    ///
    /// # Errors
    /// `Error::EmptyRing` when no nodes are registered.
    fn replica_chain<'r, P: Partitioner, V>(
        &self,
        ring: &'r HashRing<P, V>,
        position: P::TokenType,
    ) -> Result<Vec<&'r NodeRef<P, V>>>;

    /// Get the strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}
