use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::error::ChainError;
use super::hash::Hash32;
use super::pow::ProofOfWork;
use super::GENESIS_DATA;

/// A single mined block. Byte fields serialize as hex strings.
///
/// Blocks only exist fully mined: the constructors run proof-of-work before
/// returning, and the fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    timestamp: i64, // Unix timestamp (UTC)
    #[serde(with = "hex::serde")]
    data: Vec<u8>,
    #[serde(with = "hex::serde")]
    prev_hash: Vec<u8>,
    #[serde(with = "hex::serde")]
    hash: Hash32,
    nonce: u64,
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis(pow: &ProofOfWork) -> Result<Self, ChainError> {
        Self::new(GENESIS_DATA.as_bytes(), &[], pow)
    }

    /// Mine a new block over `data` that links to `prev_hash`.
    pub fn new(data: &[u8], prev_hash: &[u8], pow: &ProofOfWork) -> Result<Self, ChainError> {
        Self::mine_at(Utc::now().timestamp(), data, prev_hash, pow)
    }

    /// Mine a block with an explicit creation time.
    pub fn mine_at(
        timestamp: i64,
        data: &[u8],
        prev_hash: &[u8],
        pow: &ProofOfWork,
    ) -> Result<Self, ChainError> {
        let seal = pow.mine(prev_hash, data, timestamp)?;
        Ok(Self {
            timestamp,
            data: data.to_vec(),
            prev_hash: prev_hash.to_vec(),
            hash: seal.hash,
            nonce: seal.nonce,
        })
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn prev_hash(&self) -> &[u8] {
        &self.prev_hash
    }

    pub fn hash(&self) -> &Hash32 {
        &self.hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_hash.is_empty()
    }

    /// Copy of this block with a different payload and the old seal.
    #[cfg(test)]
    pub(crate) fn with_data(&self, data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::hash::digest;
    use crate::blockchain::TARGET_BITS;

    #[test]
    fn genesis_meets_a_24_bit_target() {
        let pow = ProofOfWork::new(TARGET_BITS).unwrap();
        let b = Block::genesis(&pow).unwrap();

        assert!(b.is_genesis());
        assert_eq!(b.data(), b"Genesis Block");
        assert_eq!(&b.hash()[..3], &[0, 0, 0]);
        assert!(pow.validate(&b));
        assert!(pow.verify(&b).is_ok());
    }

    #[test]
    fn stored_hash_matches_digest() {
        let pow = ProofOfWork::new(8).unwrap();
        let b = Block::mine_at(1_700_000_000, b"hello", &[7; 32], &pow).unwrap();
        assert_eq!(
            *b.hash(),
            digest(&[7; 32], b"hello", 1_700_000_000, 8, b.nonce())
        );
    }

    #[test]
    fn invalid_when_mutated() {
        let pow = ProofOfWork::new(16).unwrap();
        let b = Block::mine_at(1_700_000_000, b"Send 1 MBX to Edward", &[], &pow).unwrap();
        assert!(pow.validate(&b));

        // Tampering with the payload without re-mining
        let tampered = b.with_data(b"Send 100 MBX to Edward");
        assert!(!pow.validate(&tampered));
        assert_eq!(
            pow.verify(&tampered).unwrap_err(),
            ChainError::InvalidProof {
                hash: hex::encode(b.hash()),
            }
        );
    }

    #[test]
    fn validation_depends_on_engine_difficulty() {
        let easy = ProofOfWork::new(4).unwrap();
        let b = Block::mine_at(1, b"easy", &[], &easy).unwrap();
        let other = ProofOfWork::new(5).unwrap();
        // target_bits is part of the preimage, so the digest changes too
        assert!(other.verify(&b).is_err());
    }

    #[test]
    fn serializes_bytes_as_hex() {
        let pow = ProofOfWork::new(4).unwrap();
        let b = Block::mine_at(16, b"MBX", &[], &pow).unwrap();

        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["data"], "4d4258");
        assert_eq!(json["prev_hash"], "");
        assert_eq!(json["hash"], hex::encode(b.hash()));
        assert_eq!(json["timestamp"], 16);

        let decoded: Block = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, b);
    }

    #[test]
    fn rejects_nonce_beyond_search_bound() {
        let pow = ProofOfWork::new(8).unwrap();
        let b = (0..)
            .map(|ts| Block::mine_at(ts, b"MBX", &[], &pow).unwrap())
            .find(|b| b.nonce() > 0)
            .unwrap();

        let bounded = ProofOfWork::with_max_nonce(8, b.nonce()).unwrap();
        assert!(bounded.verify(&b).is_ok());

        // Same difficulty, so the digest still matches; only the bound differs.
        let tighter = ProofOfWork::with_max_nonce(8, b.nonce() - 1).unwrap();
        assert_eq!(
            tighter.verify(&b).unwrap_err(),
            ChainError::InvalidProof {
                hash: hex::encode(b.hash()),
            }
        );
    }
}
