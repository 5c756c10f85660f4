// src/algorithms/mod.rs - Unified algorithms module for Cuckoo and Cuckaroo
// Tree location: ./src/algorithms/mod.rs

//! Algorithms module
//!
//! Provides the Cuckoo and Cuckaroo graph definitions, the shared cycle
//! verifier and the reference miner. Both graph flavours plug into
//! verification through the [`EdgeGenerator`] trait.
//!
//! # Version History
//! - 0.1.0: Cuckoo graph with SipHash-2-4 edges and cycle verification
//! - 0.2.0: Added Cuckaroo (block SipHash) graphs
//! - 0.2.1: Reference miner moved under cuckoo::solver

pub mod cuckaroo;
pub mod cuckoo;
pub mod cycle;
pub mod graph;
pub mod siphash;

pub use cuckaroo::Cuckaroo;
pub use cuckoo::{solver::Miner, Cuckoo};
pub use cycle::{find_cycle_length, verify_cycle, VerifyError};
pub use graph::{Edge, Node, Partition};
pub use siphash::{derive_keys, siphash24, siphash_block, SipKeys};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cuckoo::solver::SolverError;

/// Supported graph flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// One SipHash-2-4 evaluation per endpoint, easiness-bounded nonces
    Cuckoo,
    /// Block SipHash, both endpoints from one 64-bit hash
    Cuckaroo,
}

impl Algorithm {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Cuckoo => "Cuckoo",
            Algorithm::Cuckaroo => "Cuckaroo",
        }
    }

    /// Parse a name as accepted on the command line
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "cuckoo" => Some(Algorithm::Cuckoo),
            "cuckaroo" => Some(Algorithm::Cuckaroo),
            _ => None,
        }
    }
}

/// Maps an edge index to its endpoints. Must be a pure function.
pub trait EdgeGenerator {
    /// Endpoints of edge `nonce`
    fn edge(&self, nonce: u64) -> Edge;
}

/// Unified algorithm errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmError {
    /// Graph size parameter outside the supported range
    #[error("size shift {0} outside 2..=33")]
    InvalidSizeShift(u8),

    /// Edge bits parameter outside the supported range
    #[error("edge bits {0} outside 1..=32")]
    InvalidEdgeBits(u8),

    /// Solution rejected
    #[error("verification failed: {0}")]
    Verify(#[from] VerifyError),

    /// Reference miner failure
    #[error("solver error: {0}")]
    Solver(#[from] SolverError),
}
