use sha2::{Digest, Sha256};

/// A SHA-256 digest.
pub type Hash32 = [u8; 32];

/// Lowercase base-16 text of `value`. Negative values keep a leading `-`
/// followed by the hex of the magnitude.
pub fn hex_text(value: i64) -> String {
    if value < 0 {
        format!("-{:x}", value.unsigned_abs())
    } else {
        format!("{value:x}")
    }
}

/// Hash a block header for a given nonce.
///
/// The preimage is `prev_hash || data || hex(timestamp) || hex(target_bits) || hex(nonce)`
/// with no separators or length prefixes.
pub fn digest(prev_hash: &[u8], data: &[u8], timestamp: i64, target_bits: u32, nonce: u64) -> Hash32 {
    HeaderHasher::new(prev_hash, data, timestamp, target_bits).digest(nonce)
}

/// Hasher that has already absorbed the nonce-independent part of a header.
///
/// Mining clones this state once per candidate instead of rehashing the payload.
#[derive(Clone)]
pub struct HeaderHasher {
    prefix: Sha256,
}

impl HeaderHasher {
    pub fn new(prev_hash: &[u8], data: &[u8], timestamp: i64, target_bits: u32) -> Self {
        let mut prefix = Sha256::new();
        prefix.update(prev_hash);
        prefix.update(data);
        prefix.update(hex_text(timestamp).as_bytes());
        prefix.update(format!("{target_bits:x}").as_bytes());
        Self { prefix }
    }

    pub fn digest(&self, nonce: u64) -> Hash32 {
        let mut hasher = self.prefix.clone();
        hasher.update(format!("{nonce:x}").as_bytes());
        hasher.finalize().into()
    }
}
