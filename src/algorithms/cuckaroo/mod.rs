//! Cuckaroo graph
//!
//! Cuckaroo derives both endpoints of an edge from a single
//! [`siphash_block`] evaluation: the low 32 bits give the U node and the high
//! 32 bits the V node, each masked to `edge_bits`. Verification follows the
//! same pipeline as [`Cuckoo`](super::Cuckoo) with the full edge range
//! allowed.

use tracing::debug;

use super::{
    cycle::{verify_cycle, VerifyError},
    graph::Edge,
    siphash::{derive_keys, siphash_block, SipKeys},
    AlgorithmError, EdgeGenerator,
};

/// Cuckaroo graph defined by its keys and edge bits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cuckaroo {
    keys: SipKeys,
    edge_bits: u8,
    edge_mask: u64,
}

impl Cuckaroo {
    /// Graph keyed by the BLAKE2b-256 hash of `header`
    pub fn new(header: &[u8], edge_bits: u8) -> Result<Self, AlgorithmError> {
        Self::from_keys(derive_keys(header), edge_bits)
    }

    /// Graph with explicit SipHash keys
    pub fn from_keys(keys: SipKeys, edge_bits: u8) -> Result<Self, AlgorithmError> {
        if !(1..=32).contains(&edge_bits) {
            return Err(AlgorithmError::InvalidEdgeBits(edge_bits));
        }

        Ok(Self {
            keys,
            edge_bits,
            edge_mask: (1u64 << edge_bits) - 1,
        })
    }

    /// SipHash keys of the graph
    pub fn keys(&self) -> &SipKeys {
        &self.keys
    }

    /// Log2 of the number of edges
    pub fn edge_bits(&self) -> u8 {
        self.edge_bits
    }

    /// Check a claimed 42-cycle, reporting why it is rejected
    pub fn check(&self, nonces: &[u32]) -> Result<(), VerifyError> {
        verify_cycle(self, nonces, self.edge_mask + 1)
    }

    /// Whether `nonces` is a valid cycle of this graph
    pub fn verify(&self, nonces: &[u32]) -> bool {
        match self.check(nonces) {
            Ok(()) => true,
            Err(reason) => {
                debug!(edge_bits = self.edge_bits, %reason, "cuckaroo cycle rejected");
                false
            }
        }
    }
}

impl EdgeGenerator for Cuckaroo {
    fn edge(&self, nonce: u64) -> Edge {
        let hash = siphash_block(&self.keys, nonce);
        Edge::new(hash & self.edge_mask, (hash >> 32) & self.edge_mask)
    }
}
