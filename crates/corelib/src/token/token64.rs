//! 64-bit unsigned token used by the general-purpose hash families.

use crate::token::traits::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ring position in wrapping `u64` space.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token64(pub u64);

impl Token for Token64 {
    fn min_token() -> Self {
        Token64(0)
    }

    fn max_token() -> Self {
        Token64(u64::MAX)
    }

    fn next(&self) -> Self {
        Token64(self.0.wrapping_add(1))
    }

    fn distance_to(&self, other: &Self) -> u64 {
        other.0.wrapping_sub(self.0)
    }
}

impl fmt::Display for Token64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
