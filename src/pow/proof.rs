// src/pow/proof.rs - Proof of work container and its consensus encoding
// Tree location: ./src/pow/proof.rs

//! Proof of work
//!
//! A proof is the graph size shift plus the 42 nonces of a cycle. On the
//! wire it is a big-endian `u64` size shift followed by the nonces packed
//! least significant bit first, `size_shift - 1` bits each.

use std::io::{self, Read, Write};

use blake2::Digest;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithms::siphash::Blake2b256;
use crate::consensus::{
    Difficulty, Hash, MAX_SIZE_SHIFT, MINIMUM_DIFFICULTY, MIN_SIZE_SHIFT, PROOF_SIZE,
};

/// Proof encoding errors
#[derive(Error, Debug)]
pub enum ProofError {
    /// Underlying reader or writer failed, including truncated input
    #[error("proof i/o error: {0}")]
    Io(#[from] io::Error),

    /// Size shift that cannot describe a packed nonce width
    #[error("invalid proof size shift {0}")]
    InvalidSizeShift(u64),

    /// Nonce list of the wrong length
    #[error("expected {expected} nonces, got {actual}")]
    WrongNonceCount {
        /// Required number of nonces
        expected: usize,
        /// Number of nonces supplied
        actual: usize,
    },
}

/// Cuckoo cycle proof carried by a block header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProofRepr", into = "ProofRepr")]
pub struct Proof {
    /// Log2 of the graph's node count
    pub cuckoo_size_shift: u8,
    /// Cycle nonces, ascending in a valid proof
    pub nonces: [u32; PROOF_SIZE],
}

#[derive(Serialize, Deserialize)]
struct ProofRepr {
    cuckoo_size_shift: u8,
    nonces: Vec<u32>,
}

impl TryFrom<ProofRepr> for Proof {
    type Error = ProofError;

    fn try_from(repr: ProofRepr) -> Result<Self, Self::Error> {
        Proof::new(repr.cuckoo_size_shift, &repr.nonces)
    }
}

impl From<Proof> for ProofRepr {
    fn from(proof: Proof) -> Self {
        ProofRepr {
            cuckoo_size_shift: proof.cuckoo_size_shift,
            nonces: proof.nonces.to_vec(),
        }
    }
}

fn check_size_shift(size_shift: u64) -> Result<u8, ProofError> {
    match u8::try_from(size_shift) {
        Ok(shift) if (MIN_SIZE_SHIFT..=MAX_SIZE_SHIFT).contains(&shift) => Ok(shift),
        _ => Err(ProofError::InvalidSizeShift(size_shift)),
    }
}

/// Bits per packed nonce and the byte length of the packed vector
fn layout(size_shift: u8) -> (usize, usize) {
    let nonce_bits = usize::from(size_shift) - 1;
    (nonce_bits, PROOF_SIZE * nonce_bits / 8 + 1)
}

impl Proof {
    /// Proof from a nonce slice of exactly [`PROOF_SIZE`] entries
    pub fn new(size_shift: u8, nonces: &[u32]) -> Result<Self, ProofError> {
        let nonces: [u32; PROOF_SIZE] = nonces.try_into().map_err(|_| ProofError::WrongNonceCount {
            expected: PROOF_SIZE,
            actual: nonces.len(),
        })?;

        Ok(Self {
            cuckoo_size_shift: size_shift,
            nonces,
        })
    }

    /// All-zero proof, used as a placeholder before mining
    pub fn zero(size_shift: u8) -> Self {
        Self {
            cuckoo_size_shift: size_shift,
            nonces: [0; PROOF_SIZE],
        }
    }

    /// Write the consensus encoding.
    ///
    /// Nonce bits at or above `size_shift - 1` do not fit the packed width
    /// and are dropped.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), ProofError> {
        let size_shift = check_size_shift(u64::from(self.cuckoo_size_shift))?;
        let (nonce_bits, len) = layout(size_shift);

        let mut bitvec = vec![0u8; len];
        for (n, &nonce) in self.nonces.iter().enumerate() {
            for bit in 0..nonce_bits {
                if nonce >> bit & 1 == 1 {
                    let offset = n * nonce_bits + bit;
                    bitvec[offset / 8] |= 1 << (offset % 8);
                }
            }
        }

        writer.write_u64::<BigEndian>(u64::from(size_shift))?;
        writer.write_all(&bitvec)?;
        Ok(())
    }

    /// Consensus encoding as a byte vector
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProofError> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Read a proof in consensus encoding.
    ///
    /// Nonce order and range are not checked here; that is the verifier's job.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self, ProofError> {
        let size_shift = check_size_shift(reader.read_u64::<BigEndian>()?)?;
        let (nonce_bits, len) = layout(size_shift);

        let mut bitvec = vec![0u8; len];
        reader.read_exact(&mut bitvec)?;

        let mut nonces = [0u32; PROOF_SIZE];
        for (n, nonce) in nonces.iter_mut().enumerate() {
            for bit in 0..nonce_bits {
                let offset = n * nonce_bits + bit;
                if bitvec[offset / 8] >> (offset % 8) & 1 == 1 {
                    *nonce |= 1 << bit;
                }
            }
        }

        Ok(Self {
            cuckoo_size_shift: size_shift,
            nonces,
        })
    }

    /// BLAKE2b-256 of the encoded proof
    pub fn hash(&self) -> Result<Hash, ProofError> {
        let digest = Blake2b256::digest(self.to_bytes()?);
        let mut hash = [0u8; Hash::LEN];
        hash.copy_from_slice(&digest);
        Ok(Hash(hash))
    }

    /// Difficulty this proof satisfies
    pub fn to_difficulty(&self) -> Result<Difficulty, ProofError> {
        Ok(MINIMUM_DIFFICULTY.from_hash(&self.hash()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::cuckoo::vectors::{V1, V16_175};
    use crate::consensus::DEFAULT_SIZE_SHIFT;

    #[test]
    fn test_round_trip() {
        // Every nonce fits in size_shift - 1 bits
        let proofs = [
            Proof::new(21, &V1).unwrap(),
            Proof::new(16, &V16_175).unwrap(),
            Proof::zero(DEFAULT_SIZE_SHIFT),
            Proof::new(MAX_SIZE_SHIFT, &[u32::MAX; PROOF_SIZE]).unwrap(),
        ];

        for proof in proofs {
            let bytes = proof.to_bytes().unwrap();
            let decoded = Proof::read_from(&mut bytes.as_slice()).unwrap();
            assert_eq!(decoded, proof);
        }
    }

    #[test]
    fn test_wide_nonces_masked() {
        // V1 at size shift 20 has nonces at or above 2^19
        let bytes = Proof::new(20, &V1).unwrap().to_bytes().unwrap();
        let decoded = Proof::read_from(&mut bytes.as_slice()).unwrap();

        assert_eq!(decoded.cuckoo_size_shift, 20);
        for (&nonce, &original) in decoded.nonces.iter().zip(V1.iter()) {
            assert_eq!(nonce, original & ((1 << 19) - 1));
        }
        assert_eq!(decoded.nonces[..39], V1[..39]);
        assert_eq!(decoded.nonces[39..], [0x643, 0x628c, 0x949e]);
    }

    #[test]
    fn test_encoded_length() {
        let bytes = Proof::new(20, &V1).unwrap().to_bytes().unwrap();
        // 42 * 19 bits = 798 bits
        assert_eq!(bytes.len(), 8 + 798 / 8 + 1);
        assert_eq!(&bytes[..8], &[0, 0, 0, 0, 0, 0, 0, 20]);
    }

    #[test]
    fn test_byte_layout() {
        // size shift 9 packs 8 bits per nonce, one byte each
        let nonces: Vec<u32> = (0..PROOF_SIZE as u32).map(|n| n * 5 + 1).collect();
        let bytes = Proof::new(9, &nonces).unwrap().to_bytes().unwrap();

        let mut expected = vec![0, 0, 0, 0, 0, 0, 0, 9];
        expected.extend(nonces.iter().map(|&n| n as u8));
        expected.push(0);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_lsb_first_packing() {
        // size shift 5 packs 4 bits per nonce, two per byte
        let mut nonces = [0u32; PROOF_SIZE];
        nonces[0] = 0x3;
        nonces[1] = 0xa;
        let bytes = Proof::new(5, &nonces).unwrap().to_bytes().unwrap();
        assert_eq!(bytes[8], 0xa3);
        assert_eq!(bytes.len(), 8 + 42 * 4 / 8 + 1);
    }

    #[test]
    fn test_high_bits_dropped() {
        let mut nonces = [0u32; PROOF_SIZE];
        nonces[0] = 0x1ff;
        let bytes = Proof::new(9, &nonces).unwrap().to_bytes().unwrap();
        let decoded = Proof::read_from(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded.nonces[0], 0xff);
    }

    #[test]
    fn test_truncated_input() {
        let bytes = Proof::new(20, &V1).unwrap().to_bytes().unwrap();
        for len in [0, 4, 8, bytes.len() - 1] {
            let result = Proof::read_from(&mut &bytes[..len]);
            assert!(matches!(result, Err(ProofError::Io(_))));
        }
    }

    #[test]
    fn test_invalid_size_shift() {
        let mut bytes = vec![0u8; 8 + 200];
        bytes[7] = 1;
        assert!(matches!(
            Proof::read_from(&mut bytes.as_slice()),
            Err(ProofError::InvalidSizeShift(1))
        ));

        bytes[7] = 34;
        assert!(matches!(
            Proof::read_from(&mut bytes.as_slice()),
            Err(ProofError::InvalidSizeShift(34))
        ));

        bytes[0] = 1;
        assert!(matches!(
            Proof::read_from(&mut bytes.as_slice()),
            Err(ProofError::InvalidSizeShift(_))
        ));

        assert!(matches!(
            Proof::zero(0).to_bytes(),
            Err(ProofError::InvalidSizeShift(0))
        ));
    }

    #[test]
    fn test_wrong_nonce_count() {
        assert!(matches!(
            Proof::new(20, &V1[..40]),
            Err(ProofError::WrongNonceCount {
                expected: PROOF_SIZE,
                actual: 40
            })
        ));
    }

    #[test]
    fn test_hash_and_difficulty() {
        let proof = Proof::new(20, &V1).unwrap();
        let hash = proof.hash().unwrap();
        assert_eq!(hash, proof.hash().unwrap());
        assert_ne!(hash, Proof::zero(20).hash().unwrap());

        let difficulty = proof.to_difficulty().unwrap();
        assert!(difficulty >= MINIMUM_DIFFICULTY);
        assert_eq!(difficulty, MINIMUM_DIFFICULTY.from_hash(&hash));
    }

    #[test]
    fn test_json() {
        let proof = Proof::new(16, &V16_175).unwrap();
        let json = serde_json::to_string(&proof).unwrap();
        let decoded: Proof = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, proof);

        let short = r#"{"cuckoo_size_shift":16,"nonces":[1,2,3]}"#;
        assert!(serde_json::from_str::<Proof>(short).is_err());
    }
}
