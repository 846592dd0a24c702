//! CLI tool for exercising consistent hash rings.
//!
//! Provides commands for:
//! - Hashing identifiers onto the ring
//! - Resolving keys to nodes
//! - Showing replica chains
//! - Inspecting ring state
//! - Simulating a node removal

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
