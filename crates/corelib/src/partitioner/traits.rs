//! Core partitioner trait definitions.

use crate::token::Token;

/// A partitioner is the ring's hash function: it converts an identifier into
/// a token on the ring.
///
/// Node ids and entry ids go through the same partitioner, so both land in
/// the same position domain. Implementations must be deterministic and total
/// (defined for every string, including the empty one). Distinct identifiers
/// may collide; the ring tolerates it.
///
/// Partitioners are stateless and thread-safe, allowing concurrent
/// token generation without synchronization overhead.
pub trait Partitioner: Send + Sync + 'static {
    /// The token type produced by this partitioner.
    type TokenType: Token;

    /// Converts an identifier into a token.
    fn partition(&self, key: &str) -> Self::TokenType;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
