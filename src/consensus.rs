//! Consensus constants and the value types shared with the chain layer
//!
//! Everything here is part of the consensus contract: changing a constant
//! changes which blocks are accepted.

use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use serde::{Deserialize, Serialize};

use crate::pow::Proof;

/// Number of edges in a proof-of-work cycle
pub const PROOF_SIZE: usize = 42;

/// Percentage of the graph's nodes that nonces may range over
pub const EASINESS: u64 = 50;

/// Graph size (log2 of the node count) used on the main chain
pub const DEFAULT_SIZE_SHIFT: u8 = 30;

/// Smallest supported size shift; packed nonces need at least one bit
pub const MIN_SIZE_SHIFT: u8 = 2;

/// Largest supported size shift; packed nonces must fit a `u32`
pub const MAX_SIZE_SHIFT: u8 = 33;

/// Lowest difficulty a proof can map to
pub const MINIMUM_DIFFICULTY: Difficulty = Difficulty::from_num(10);

/// 256-bit digest
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// Digest length in bytes
    pub const LEN: usize = 32;

    /// Hex representation
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Hash(bytes)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

/// Comparable amount of work; larger is harder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Difficulty(u64);

impl Difficulty {
    /// Difficulty from a raw number
    pub const fn from_num(num: u64) -> Self {
        Difficulty(num)
    }

    /// Raw number
    pub fn to_num(&self) -> u64 {
        self.0
    }

    /// Difficulty of a proof hash, never below `self`.
    ///
    /// The first 8 bytes of the hash are read as a big-endian target; the
    /// difficulty is the maximum target divided by it, so hashes with more
    /// leading zeros map to larger difficulties.
    pub fn from_hash(&self, hash: &Hash) -> Difficulty {
        let num = BigEndian::read_u64(&hash.0[..8]);
        let difficulty = match num {
            0 => u64::MAX,
            num => u64::MAX / num,
        };
        Difficulty(difficulty.max(self.0))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the PoW engine needs from a block header
pub trait PowHeader {
    /// Hash of the header, used to key the graph
    fn hash(&self) -> Hash;

    /// Proof of work carried by the header
    fn pow(&self) -> &Proof;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_with_prefix(prefix: u64) -> Hash {
        let mut bytes = [0xffu8; 32];
        bytes[..8].copy_from_slice(&prefix.to_be_bytes());
        Hash(bytes)
    }

    #[test]
    fn test_difficulty_from_hash() {
        assert_eq!(
            MINIMUM_DIFFICULTY.from_hash(&hash_with_prefix(1 << 32)),
            Difficulty::from_num(u64::MAX >> 32)
        );
        assert_eq!(
            MINIMUM_DIFFICULTY.from_hash(&hash_with_prefix(0)),
            Difficulty::from_num(u64::MAX)
        );
    }

    #[test]
    fn test_difficulty_floor() {
        assert_eq!(
            MINIMUM_DIFFICULTY.from_hash(&hash_with_prefix(u64::MAX)),
            MINIMUM_DIFFICULTY
        );
    }

    #[test]
    fn test_difficulty_monotonic() {
        let mut previous = Difficulty::from_num(u64::MAX);
        for shift in 0..64 {
            let difficulty = MINIMUM_DIFFICULTY.from_hash(&hash_with_prefix(1 << shift));
            assert!(difficulty <= previous);
            previous = difficulty;
        }
    }

    #[test]
    fn test_hash_display() {
        let hash = Hash([0xab; 32]);
        assert_eq!(hash.to_string(), "ab".repeat(32));
        assert_eq!(hash.as_ref().len(), Hash::LEN);
    }
}
