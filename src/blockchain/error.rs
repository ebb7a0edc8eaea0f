use thiserror::Error;

/// Failures raised while mining, validating or linking blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("target bits must be within 1..=256, got {0}")]
    InvalidTargetBits(u32),

    #[error("no nonce in 0..={max_nonce} satisfies a {target_bits}-bit target")]
    NonceExhausted { target_bits: u32, max_nonce: u64 },

    #[error("chain has no blocks to link to")]
    EmptyChain,

    #[error("block links to {found:?} but the chain tip is {expected:?}")]
    BrokenLink { expected: String, found: String },

    #[error("block {hash} does not satisfy its proof-of-work")]
    InvalidProof { hash: String },

    #[error("chain JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ChainError {
    fn from(e: serde_json::Error) -> Self {
        ChainError::Json(e.to_string())
    }
}
