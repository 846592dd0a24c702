//! Partitioner abstraction for consistent hashing.
//!
//! Partitioners are responsible for converting identifiers into tokens
//! that can be placed on the hash ring. The ring and everything built on it
//! are generic over [`Partitioner`], so a hash family can be swapped without
//! touching ring code.

pub mod blake;
pub mod polynomial;
pub mod sip;
pub mod traits;
pub mod xxh3;

pub use blake::Blake3Partitioner;
pub use polynomial::PolynomialPartitioner;
pub use sip::SipPartitioner;
pub use traits::Partitioner;
pub use xxh3::Xxh3Partitioner;

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Names the built-in partitioners, for configuration and command-line
/// selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionerKind {
    #[default]
    Polynomial,
    Xxh3,
    Siphash,
    Blake3,
}

impl PartitionerKind {
    pub const ALL: [PartitionerKind; 4] = [
        PartitionerKind::Polynomial,
        PartitionerKind::Xxh3,
        PartitionerKind::Siphash,
        PartitionerKind::Blake3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartitionerKind::Polynomial => "polynomial",
            PartitionerKind::Xxh3 => "xxh3",
            PartitionerKind::Siphash => "siphash",
            PartitionerKind::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for PartitionerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PartitionerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| Error::UnknownPartitioner(s.to_string()))
    }
}
