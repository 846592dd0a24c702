//! Core token trait definitions.
//!
//! A token is a position on the ring. The ring is a fixed-width integer domain
//! treated as a circle, so every token type wraps at its maximum.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Minimal token trait for the hash ring.
///
/// Tokens are immutable, comparable positions. Implementations must be
/// thread-safe and cheap to copy, compare and hash.
pub trait Token: Copy + Ord + Hash + Send + Sync + Debug + Display + 'static {
    /// Minimum token value (start of ring).
    fn min_token() -> Self;
    /// Maximum token value (end of ring).
    fn max_token() -> Self;
    /// The position immediately clockwise of this one, wrapping at the end.
    fn next(&self) -> Self;
    /// Clockwise distance from `self` to `other` on the ring.
    fn distance_to(&self, other: &Self) -> u64;

    /// True if this token is the minimum.
    fn is_min(&self) -> bool {
        *self == Self::min_token()
    }

    /// True if this token is the maximum.
    fn is_max(&self) -> bool {
        *self == Self::max_token()
    }

    /// Number of positions on the ring, as a float for ratio arithmetic.
    fn ring_span() -> f64 {
        Self::min_token().distance_to(&Self::max_token()) as f64 + 1.0
    }
}
