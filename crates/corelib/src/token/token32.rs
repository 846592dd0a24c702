//! 32-bit signed token, the position domain of the polynomial hash.

use crate::token::traits::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ring position in wrapping `i32` space.
///
/// Ordering is signed, so the ring starts at `i32::MIN` and ends at
/// `i32::MAX`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token32(pub i32);

impl Token for Token32 {
    fn min_token() -> Self {
        Token32(i32::MIN)
    }

    fn max_token() -> Self {
        Token32(i32::MAX)
    }

    fn next(&self) -> Self {
        Token32(self.0.wrapping_add(1))
    }

    fn distance_to(&self, other: &Self) -> u64 {
        other.0.wrapping_sub(self.0) as u32 as u64
    }
}

impl fmt::Display for Token32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
