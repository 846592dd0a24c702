//! Polynomial string hash, the reference partitioner.
//!
//! `h = seed; for c in key { h = h * base + c }` evaluated in wrapping 32-bit
//! signed arithmetic, where `c` runs over the UTF-16 code units of the key.
//! Characters above U+FFFF therefore contribute their two surrogates. It has poor avalanche behaviour but is fully
//! reproducible by hand, which makes it the source of the test vectors used
//! across the workspace.

use crate::partitioner::traits::Partitioner;
use crate::token::Token32;

/// Multiplier applied per code unit.
pub const DEFAULT_BASE: i32 = 31;
/// Starting value before the first code unit.
pub const DEFAULT_SEED: i32 = 7;

/// Polynomial partitioner (base 31, seed 7 by default).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolynomialPartitioner {
    base: i32,
    seed: i32,
}

impl PolynomialPartitioner {
    pub fn new(base: i32, seed: i32) -> Self {
        Self { base, seed }
    }

    pub fn base(&self) -> i32 {
        self.base
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }
}

impl Default for PolynomialPartitioner {
    fn default() -> Self {
        Self::new(DEFAULT_BASE, DEFAULT_SEED)
    }
}

impl Partitioner for PolynomialPartitioner {
    type TokenType = Token32;

    fn partition(&self, key: &str) -> Self::TokenType {
        let hash = key.encode_utf16().fold(self.seed, |acc, unit| {
            acc.wrapping_mul(self.base).wrapping_add(unit as i32)
        });
        Token32(hash)
    }

    fn name(&self) -> &'static str {
        "PolynomialPartitioner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(key: &str) -> i32 {
        PolynomialPartitioner::default().partition(key).0
    }

    #[test]
    fn test_single_character_vectors() {
        // 7 * 31 + code point
        assert_eq!(hash("A"), 282);
        assert_eq!(hash("B"), 283);
        assert_eq!(hash("E"), 286);
        assert_eq!(hash("G"), 288);
        assert_eq!(hash("M"), 294);
        assert_eq!(hash("N"), 295);
        assert_eq!(hash("V"), 303);
        assert_eq!(hash("X"), 305);
    }

    #[test]
    fn test_empty_key_is_seed() {
        assert_eq!(hash(""), DEFAULT_SEED);
    }

    #[test]
    fn test_known_collision() {
        // "Aa" and "BB" differ by (+1 * 31, -31) in the last two positions.
        assert_eq!(hash("Aa"), 8839);
        assert_eq!(hash("Aa"), hash("BB"));
    }

    #[test]
    fn test_overflow_wraps() {
        let key = "the quick brown fox jumps over the lazy dog";
        let mut expected: i64 = DEFAULT_SEED as i64;
        for unit in key.encode_utf16() {
            expected = (expected * 31 + unit as i64).rem_euclid(1 << 32);
        }
        assert_eq!(hash(key), expected as u32 as i32);
    }

    #[test]
    fn test_supplementary_character_hashes_surrogate_pair() {
        // U+1F600 is the pair 0xD83D 0xDE00.
        assert_eq!(hash("\u{1F600}"), 7 * 31 * 31 + 0xD83D * 31 + 0xDE00);
        assert_eq!(hash("\u{1F600}"), 1_779_626);
        // BMP characters are a single unit.
        assert_eq!(hash("\u{e9}"), 7 * 31 + 0xE9);
    }

    #[test]
    fn test_custom_base_and_seed() {
        let p = PolynomialPartitioner::new(2, 0);
        // ((0 * 2 + 1) * 2 + 1)
        assert_eq!(p.partition("\u{1}\u{1}").0, 3);
    }
}
