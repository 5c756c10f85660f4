//! Cuckoo graph
//!
//! The classic Cuckoo Cycle graph: `2^size_shift` nodes split evenly between
//! the two partitions, each endpoint of edge `i` taken from its own
//! SipHash-2-4 evaluation (`2i` for U, `2i + 1` for V) reduced modulo the
//! partition size. Only nonces below the easiness bound may be used.

pub mod solver;

use tracing::debug;

use super::{
    cycle::{verify_cycle, VerifyError},
    graph::Edge,
    siphash::{derive_keys, siphash24, SipKeys},
    AlgorithmError, EdgeGenerator,
};
use crate::consensus::{MAX_SIZE_SHIFT, MIN_SIZE_SHIFT};

/// Cuckoo graph defined by its keys and size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cuckoo {
    keys: SipKeys,
    size_shift: u8,
    mask: u64,
}

impl Cuckoo {
    /// Graph keyed by the BLAKE2b-256 hash of `header`
    pub fn new(header: &[u8], size_shift: u8) -> Result<Self, AlgorithmError> {
        Self::from_keys(derive_keys(header), size_shift)
    }

    /// Graph with explicit SipHash keys
    pub fn from_keys(keys: SipKeys, size_shift: u8) -> Result<Self, AlgorithmError> {
        if !(MIN_SIZE_SHIFT..=MAX_SIZE_SHIFT).contains(&size_shift) {
            return Err(AlgorithmError::InvalidSizeShift(size_shift));
        }

        Ok(Self {
            keys,
            size_shift,
            mask: (1u64 << (size_shift - 1)) - 1,
        })
    }

    /// SipHash keys of the graph
    pub fn keys(&self) -> &SipKeys {
        &self.keys
    }

    /// Log2 of the total node count
    pub fn size_shift(&self) -> u8 {
        self.size_shift
    }

    /// Total number of nodes (both partitions)
    pub fn size(&self) -> u64 {
        1 << self.size_shift
    }

    /// Exclusive upper bound on nonces at the given easiness percentage
    pub fn easiness_limit(&self, easiness: u64) -> u64 {
        let limit = easiness.saturating_mul(self.size()) / 100;
        limit.min(self.size())
    }

    fn node(&self, nonce: u64, uorv: u64) -> u64 {
        siphash24(&self.keys, 2 * nonce + uorv) & self.mask
    }

    /// Check a claimed 42-cycle, reporting why it is rejected
    pub fn check(&self, nonces: &[u32], easiness: u64) -> Result<(), VerifyError> {
        verify_cycle(self, nonces, self.easiness_limit(easiness))
    }

    /// Whether `nonces` is a valid cycle of this graph at `easiness` percent
    pub fn verify(&self, nonces: &[u32], easiness: u64) -> bool {
        match self.check(nonces, easiness) {
            Ok(()) => true,
            Err(reason) => {
                debug!(size_shift = self.size_shift, %reason, "cuckoo cycle rejected");
                false
            }
        }
    }
}

impl EdgeGenerator for Cuckoo {
    fn edge(&self, nonce: u64) -> Edge {
        Edge::new(self.node(nonce, 0), self.node(nonce, 1))
    }
}

#[cfg(test)]
pub(crate) mod vectors {
    use crate::consensus::PROOF_SIZE;

    /// Header `[49]`, size shift 20, easiness 75
    pub(crate) static V1: [u32; PROOF_SIZE] = [
        0x3bbd, 0x4e96, 0x1013b, 0x1172b, 0x1371b, 0x13e6a, 0x1aaa6, 0x1b575, 0x1e237, 0x1ee88,
        0x22f94, 0x24223, 0x25b4f, 0x2e9f3, 0x33b49, 0x34063, 0x3454a, 0x3c081, 0x3d08e, 0x3d863,
        0x4285a, 0x42f22, 0x43122, 0x4b853, 0x4cd0c, 0x4f280, 0x557d5, 0x562cf, 0x58e59, 0x59a62,
        0x5b568, 0x644b9, 0x657e9, 0x66337, 0x6821c, 0x7866f, 0x7e14b, 0x7ec7c, 0x7eed7, 0x80643,
        0x8628c, 0x8949e,
    ];

    /// Header hash `[175; 32]`, size shift 16, easiness 50
    pub(crate) static V16_175: [u32; PROOF_SIZE] = [
        0x6f, 0x337, 0x61e, 0x840, 0x9dd, 0x150d, 0x1bae, 0x2343, 0x24d8, 0x2879, 0x2cd9,
        0x2e4f, 0x2fd2, 0x2fd7, 0x3253, 0x32ec, 0x3320, 0x3403, 0x3578, 0x3740, 0x3de0, 0x3ff2,
        0x40a4, 0x48d3, 0x4a85, 0x4c38, 0x4eab, 0x59a3, 0x5a0a, 0x5c0e, 0x5f9c, 0x6194, 0x6224,
        0x6315, 0x659a, 0x6be0, 0x6c7c, 0x6ce6, 0x6e0b, 0x75f4, 0x7723, 0x7f4a,
    ];
}
