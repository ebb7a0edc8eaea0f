use std::env;

use crate::blockchain::TARGET_BITS;

/// Settings for the demo run, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub target_bits: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let target_bits = lookup("TARGET_BITS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(TARGET_BITS);

        Self { target_bits }
    }

    /// Whether the run departs from the compiled `TARGET_BITS`.
    pub fn overrides_difficulty(&self) -> bool {
        self.target_bits != TARGET_BITS
    }
}
