pub mod block;
pub mod error;
pub mod hash;
pub mod model;
pub mod pow;

pub use block::Block;
pub use error::ChainError;
pub use model::Blockchain;
pub use pow::ProofOfWork;

/// Default Proof-of-Work difficulty: a digest must be below `2^(256 - TARGET_BITS)`.
pub const TARGET_BITS: u32 = 24;

/// Upper bound of the nonce search (inclusive).
pub const MAX_NONCE: u64 = i64::MAX as u64;

/// Payload of the first block in every chain.
pub const GENESIS_DATA: &str = "Genesis Block";
