//! Block proof-of-work validation
//!
//! Entry point used by the chain layer: a header is accepted iff its proof
//! is a 42-cycle of the Cuckoo graph keyed by the header hash.

pub mod proof;

pub use proof::{Proof, ProofError};

use thiserror::Error;
use tracing::debug;

use crate::algorithms::Cuckoo;
use crate::consensus::{PowHeader, EASINESS};

/// Block proof-of-work errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PowError {
    /// The proof does not verify against the header
    #[error("invalid pow verify")]
    InvalidPow,
}

/// Validate the proof of work of `header` on a graph of size `2^cuckoo_size`
pub fn validate<H: PowHeader + ?Sized>(header: &H, cuckoo_size: u8) -> Result<(), PowError> {
    let hash = header.hash();
    debug!(%hash, cuckoo_size, "block POW validate");

    let cuckoo = Cuckoo::new(hash.as_ref(), cuckoo_size).map_err(|e| {
        debug!(error = %e, "pow graph rejected");
        PowError::InvalidPow
    })?;

    cuckoo
        .check(&header.pow().nonces, EASINESS)
        .map_err(|reason| {
            debug!(%hash, %reason, "invalid pow");
            PowError::InvalidPow
        })
}
