//! SipHash-2-4 edge generation
//!
//! The graph is keyed by four 64-bit words derived from the block header with
//! BLAKE2b-256. Those words are used directly as the SipHash internal state,
//! so a hash evaluation is just the compression/finalization rounds applied to
//! a single 64-bit message (the edge index).
//!
//! Two flavours are provided:
//! - [`siphash24`]: one independent evaluation per index (Cuckoo graphs)
//! - [`siphash_block`]: evaluates a whole block of 64 indices with a single
//!   running state and folds the last hash of the block into the result
//!   (Cuckaroo graphs)

use blake2::{digest::consts::U32, Blake2b, Digest};
use byteorder::{ByteOrder, LittleEndian};

/// SipHash keys of a graph (the initial `v0..v3` state)
pub type SipKeys = [u64; 4];

/// Number of consecutive nonces hashed together by [`siphash_block`]
pub const SIPHASH_BLOCK_BITS: u64 = 6;
/// Block size in nonces
pub const SIPHASH_BLOCK_SIZE: u64 = 1 << SIPHASH_BLOCK_BITS;
/// Mask selecting the position of a nonce inside its block
pub const SIPHASH_BLOCK_MASK: u64 = SIPHASH_BLOCK_SIZE - 1;

/// Rotation of `v3` in the second half of a round
const ROT_E: u32 = 21;

pub(crate) type Blake2b256 = Blake2b<U32>;

/// Derive the SipHash keys of a graph from arbitrary header bytes.
///
/// BLAKE2b with a 256-bit digest, read back as four little-endian words.
pub fn derive_keys(header: &[u8]) -> SipKeys {
    let digest = Blake2b256::digest(header);

    let mut keys = [0u64; 4];
    LittleEndian::read_u64_into(&digest, &mut keys);
    keys
}

/// Running SipHash-2-4 state
#[derive(Clone, Debug)]
pub struct SipHash24 {
    v0: u64,
    v1: u64,
    v2: u64,
    v3: u64,
}

impl SipHash24 {
    /// Create a state from graph keys
    pub fn new(keys: &SipKeys) -> Self {
        Self {
            v0: keys[0],
            v1: keys[1],
            v2: keys[2],
            v3: keys[3],
        }
    }

    /// Absorb one 64-bit message: 2 compression rounds, 4 finalization rounds.
    ///
    /// The state is not reset afterwards; [`siphash_block`] relies on that.
    pub fn hash(&mut self, nonce: u64) {
        self.v3 ^= nonce;
        for _ in 0..2 {
            self.round();
        }

        self.v0 ^= nonce;
        self.v2 ^= 0xff;
        for _ in 0..4 {
            self.round();
        }
    }

    /// Current 64-bit digest
    pub fn digest(&self) -> u64 {
        (self.v0 ^ self.v1) ^ (self.v2 ^ self.v3)
    }

    #[inline]
    fn round(&mut self) {
        self.v0 = self.v0.wrapping_add(self.v1);
        self.v2 = self.v2.wrapping_add(self.v3);
        self.v1 = self.v1.rotate_left(13);
        self.v3 = self.v3.rotate_left(16);
        self.v1 ^= self.v0;
        self.v3 ^= self.v2;
        self.v0 = self.v0.rotate_left(32);

        self.v2 = self.v2.wrapping_add(self.v1);
        self.v0 = self.v0.wrapping_add(self.v3);
        self.v1 = self.v1.rotate_left(17);
        self.v3 = self.v3.rotate_left(ROT_E);
        self.v1 ^= self.v2;
        self.v3 ^= self.v0;
        self.v2 = self.v2.rotate_left(32);
    }
}

/// SipHash-2-4 of a single nonce under `keys`
pub fn siphash24(keys: &SipKeys, nonce: u64) -> u64 {
    let mut state = SipHash24::new(keys);
    state.hash(nonce);
    state.digest()
}

/// Block-oriented SipHash used by Cuckaroo edge generation.
///
/// Hashes every nonce of the 64-nonce block containing `nonce` with one
/// running state, then returns the hash at `nonce` XORed with the hash of the
/// last nonce of the block. The last nonce of a block is returned as is.
pub fn siphash_block(keys: &SipKeys, nonce: u64) -> u64 {
    let nonce0 = nonce & !SIPHASH_BLOCK_MASK;
    let nonce_i = nonce & SIPHASH_BLOCK_MASK;

    let mut hashes = [0u64; SIPHASH_BLOCK_SIZE as usize];
    let mut state = SipHash24::new(keys);
    for (i, slot) in hashes.iter_mut().enumerate() {
        state.hash(nonce0 + i as u64);
        *slot = state.digest();
    }

    let mut xor = hashes[nonce_i as usize];
    if nonce_i < SIPHASH_BLOCK_MASK {
        xor ^= hashes[SIPHASH_BLOCK_MASK as usize];
    }
    xor
}
