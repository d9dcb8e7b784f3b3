//! # Merkle Sync Configuration
//!
//! Configuration for the merkle-block sync handler.

use serde::{Deserialize, Serialize};
use std::env;

use crate::domain::MAX_BLOCK_TRANSACTIONS;

/// Merkle-block sync configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MerkleSyncConfig {
    /// Largest transaction count a proof may declare.
    pub max_block_transactions: u32,

    /// Serialize concurrent handling of the same block.
    pub serialize_per_block: bool,

    /// Run the updater on its own task so a dropped `handle` future cannot
    /// interrupt persistence.
    pub detached_persist: bool,
}

impl Default for MerkleSyncConfig {
    fn default() -> Self {
        Self {
            max_block_transactions: MAX_BLOCK_TRANSACTIONS,
            serialize_per_block: true,
            detached_persist: true,
        }
    }
}

impl MerkleSyncConfig {
    /// Create a config for testing (inline persistence).
    pub fn for_testing() -> Self {
        Self {
            detached_persist: false,
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SPV_MAX_BLOCK_TRANSACTIONS`: transaction ceiling (default: 16666)
    /// - `SPV_SERIALIZE_PER_BLOCK`: per-block locking (default: true)
    /// - `SPV_DETACHED_PERSIST`: detached updater task (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_block_transactions: env::var("SPV_MAX_BLOCK_TRANSACTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_block_transactions),

            serialize_per_block: env::var("SPV_SERIALIZE_PER_BLOCK")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.serialize_per_block),

            detached_persist: env::var("SPV_DETACHED_PERSIST")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.detached_persist),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value.to_lowercase() != "false" && value != "0"
}
