//! Core library for consistent hashing implementation.
//!
//! This crate provides the fundamental abstractions for consistent hashing:
//! - Token types (ring positions)
//! - Partitioner algorithms (the ring's hash functions)
//! - Nodes and the entries they hold
//! - The ring itself, with successor lookup and topology views

pub mod entry;
pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod token;

pub use entry::{CacheEntry, Identify};
pub use error::{Error, Result};
pub use node::{Node, NodeId};
pub use partitioner::{Partitioner, PartitionerKind, PolynomialPartitioner};
pub use ring::{HashRing, NodeRef, Ring, RingBuilder, RingTopology};
pub use token::{Token, Token32, Token64};
