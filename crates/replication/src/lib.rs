//! Replica-aware placement on top of the consistent hash ring.
//!
//! This crate decides:
//! - How many copies of an entry exist (primary plus a fixed replica count)
//! - Which nodes hold them (a clockwise walk of the ring)
//! - How lookups fail over from the primary to the replicas

pub mod config;
pub mod placement;
pub mod shared;
pub mod strategy;

pub use config::PlacementConfig;
pub use placement::{PlacementEngine, ReplicaPlacement};
pub use shared::SharedPlacement;
pub use strategy::{ReplicationStrategy, SimpleStrategy};
