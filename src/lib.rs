// src/lib.rs - Main library file for the Cuckoo Cycle proof-of-work engine
// Tree location: ./src/lib.rs

//! cuckoo-pow - Cuckoo Cycle proof of work for MimbleWimble blocks
//!
//! Verifies that a block's proof is a 42-cycle in the bipartite graph keyed by
//! the block header, encodes proofs in their consensus byte layout and maps
//! them to a difficulty. A reference miner is included for tests and tooling.
//!
//! # Version History
//! - 0.1.0: Cuckoo verification, proof codec, difficulty and block validation
//! - 0.1.1: Cuckaroo verifier and reference miner
//! - 0.1.2: JSON settings and command line tools

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod algorithms;
/// Engine settings
pub mod config;
pub mod consensus;
pub mod pow;

// Re-export main types for convenience
pub use algorithms::{Algorithm, AlgorithmError, Cuckaroo, Cuckoo, Miner, VerifyError};
pub use config::{ConfigError, Settings};
pub use consensus::{Difficulty, Hash, PowHeader};
pub use pow::{validate, PowError, Proof, ProofError};

use hex::FromHexError;
use thiserror::Error;

/// Main error type for cuckoo-pow
#[derive(Error, Debug)]
pub enum CuckooPowError {
    /// Graph construction, verification or mining errors
    #[error("Algorithm error: {0}")]
    Algorithm(#[from] AlgorithmError),

    /// Proof encoding errors
    #[error("Proof error: {0}")]
    Proof(#[from] ProofError),

    /// Block proof-of-work rejected
    #[error("PoW error: {0}")]
    Pow(#[from] PowError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid command line input
    #[error("Invalid input: {0}")]
    Input(String),

    /// IO operation errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Hex decode errors
    #[error("Hex decode error: {0}")]
    Hex(#[from] FromHexError),
}

impl From<VerifyError> for CuckooPowError {
    fn from(err: VerifyError) -> Self {
        CuckooPowError::Algorithm(err.into())
    }
}

impl From<algorithms::cuckoo::solver::SolverError> for CuckooPowError {
    fn from(err: algorithms::cuckoo::solver::SolverError) -> Self {
        CuckooPowError::Algorithm(err.into())
    }
}

/// Result type alias for cuckoo-pow operations
pub type Result<T> = std::result::Result<T, CuckooPowError>;

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Library name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Library description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Initialize logging from `RUST_LOG`
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::debug!("{} v{} - {}", NAME, VERSION, DESCRIPTION);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions() {
        let err: CuckooPowError = VerifyError::NotAscending { index: 3 }.into();
        assert!(matches!(
            err,
            CuckooPowError::Algorithm(AlgorithmError::Verify(_))
        ));

        let err: CuckooPowError = hex::decode("zz").unwrap_err().into();
        assert!(err.to_string().starts_with("Hex decode error"));

        let err: CuckooPowError = PowError::InvalidPow.into();
        assert_eq!(err.to_string(), "PoW error: invalid pow verify");
    }
}
