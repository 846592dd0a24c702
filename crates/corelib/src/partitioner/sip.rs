//! SipHash-1-3 partitioner implementation.

use crate::partitioner::traits::Partitioner;
use crate::token::Token64;
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// SipHash-1-3 partitioner with fixed zero keys, so tokens are stable across
/// processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SipPartitioner;

impl Partitioner for SipPartitioner {
    type TokenType = Token64;

    fn partition(&self, key: &str) -> Self::TokenType {
        let mut hasher = SipHasher13::new();
        hasher.write(key.as_bytes());
        Token64(hasher.finish())
    }

    fn name(&self) -> &'static str {
        "SipPartitioner"
    }
}
