use log::{debug, trace};

use super::error::ChainError;
use super::hash::{Hash32, HeaderHasher, digest};
use super::{Block, MAX_NONCE};

/// Emit a progress line every this many attempts.
const PROGRESS_INTERVAL: u64 = 1 << 20;

/// Unsigned 256-bit integer stored as big-endian 64-bit limbs.
///
/// The derived ordering compares the most significant limb first, which is the
/// numeric ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct U256([u64; 4]);

impl U256 {
    /// Interpret 32 bytes as a big-endian integer.
    pub fn from_be_bytes(bytes: &Hash32) -> Self {
        let mut limbs = [0u64; 4];
        for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *limb = u64::from_be_bytes(word);
        }
        U256(limbs)
    }

    pub fn to_be_bytes(self) -> Hash32 {
        let mut out = [0u8; 32];
        for (chunk, limb) in out.chunks_exact_mut(8).zip(self.0) {
            chunk.copy_from_slice(&limb.to_be_bytes());
        }
        out
    }

    /// `2^exp`, or `None` when it does not fit in 256 bits.
    pub fn pow2(exp: u32) -> Option<Self> {
        if exp >= 256 {
            return None;
        }
        let mut limbs = [0u64; 4];
        limbs[3 - (exp / 64) as usize] = 1u64 << (exp % 64);
        Some(U256(limbs))
    }
}

/// A solved proof-of-work: the accepted nonce and the digest it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seal {
    pub nonce: u64,
    pub hash: Hash32,
}

/// Proof-of-Work engine for a fixed difficulty.
///
/// A digest is accepted when its big-endian integer value is strictly below
/// `2^(256 - target_bits)`.
#[derive(Debug, Clone)]
pub struct ProofOfWork {
    target_bits: u32,
    target: U256,
    max_nonce: u64,
}

impl ProofOfWork {
    pub fn new(target_bits: u32) -> Result<Self, ChainError> {
        Self::with_max_nonce(target_bits, MAX_NONCE)
    }

    /// Build an engine whose nonce search stops after `max_nonce` (inclusive).
    pub fn with_max_nonce(target_bits: u32, max_nonce: u64) -> Result<Self, ChainError> {
        if target_bits == 0 {
            return Err(ChainError::InvalidTargetBits(target_bits));
        }
        let target = 256u32
            .checked_sub(target_bits)
            .and_then(U256::pow2)
            .ok_or(ChainError::InvalidTargetBits(target_bits))?;

        Ok(Self {
            target_bits,
            target,
            max_nonce,
        })
    }

    pub fn target_bits(&self) -> u32 {
        self.target_bits
    }

    pub fn target(&self) -> U256 {
        self.target
    }

    pub fn max_nonce(&self) -> u64 {
        self.max_nonce
    }

    /// Whether `hash` falls strictly below the target.
    pub fn meets_target(&self, hash: &Hash32) -> bool {
        U256::from_be_bytes(hash) < self.target
    }

    /// Search nonces from zero for the first digest below the target.
    pub fn mine(&self, prev_hash: &[u8], data: &[u8], timestamp: i64) -> Result<Seal, ChainError> {
        let hasher = HeaderHasher::new(prev_hash, data, timestamp, self.target_bits);

        for nonce in 0..=self.max_nonce {
            let hash = hasher.digest(nonce);
            if self.meets_target(&hash) {
                debug!("POW - solved {}-bit target at nonce {}", self.target_bits, nonce);
                return Ok(Seal { nonce, hash });
            }
            if nonce > 0 && nonce % PROGRESS_INTERVAL == 0 {
                trace!("POW - nonce {} ({})", nonce, hex::encode(hash));
            }
        }

        Err(ChainError::NonceExhausted {
            target_bits: self.target_bits,
            max_nonce: self.max_nonce,
        })
    }

    /// Check the stored nonce of `block` against the target. No search.
    pub fn validate(&self, block: &Block) -> bool {
        self.meets_target(&self.recompute(block))
    }

    /// Like [`validate`](Self::validate), but also requires the stored hash to
    /// match the recomputed digest and the nonce to lie within the search bound.
    pub fn verify(&self, block: &Block) -> Result<(), ChainError> {
        let recomputed = self.recompute(block);
        if block.nonce() > self.max_nonce
            || recomputed != *block.hash()
            || !self.meets_target(&recomputed)
        {
            return Err(ChainError::InvalidProof {
                hash: hex::encode(block.hash()),
            });
        }
        Ok(())
    }

    fn recompute(&self, block: &Block) -> Hash32 {
        digest(
            block.prev_hash(),
            block.data(),
            block.timestamp(),
            self.target_bits,
            block.nonce(),
        )
    }
}
