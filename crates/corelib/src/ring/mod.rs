//! Consistent hash ring implementation.
//!
//! The ring manages node positions and provides efficient lookup
//! operations for finding nodes responsible for keys.

pub mod ring;
pub mod topology;

pub use ring::{HashRing, NodeRef, RingBuilder};
pub use topology::{NodeTopology, RingTopology};

/// Alias for the main ring type (used by lib.rs).
pub type Ring<P, V> = HashRing<P, V>;
