//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
///
/// A lookup that finds nothing is not an error; callers see `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A placement or lookup ran against a ring with no registered nodes.
    #[error("ring has no registered nodes")]
    EmptyRing,
    /// Partitioner name not recognised
    #[error("unknown partitioner: {0}")]
    UnknownPartitioner(String),
    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}
