//! # Outbound Ports
//!
//! Capabilities the handler depends on: block lookup, block update and proof
//! validation.

use async_trait::async_trait;

use crate::algorithms::validate_and_extract;
use crate::domain::{
    Block, ExtractedMatches, Hash, MerkleBlockMessage, ProofResult, StoreError,
    MAX_BLOCK_TRANSACTIONS,
};

/// Block lookup - outbound port.
///
/// Implemented by the wallet's block store.
#[async_trait]
pub trait BlockLookup: Send + Sync {
    /// Find the locally tracked block with this header hash.
    async fn lookup(&self, header_hash: &Hash) -> Result<Option<Block>, StoreError>;
}

/// Block updater - outbound port.
///
/// Must apply the association atomically. Re-applying an identical match set
/// is expected and must not create duplicates.
#[async_trait]
pub trait BlockUpdater: Send + Sync {
    /// Record `matched` transaction hashes against `block`.
    async fn update(&self, block: &Block, matched: &[Hash]) -> Result<(), StoreError>;
}

/// Proof validator - outbound port.
///
/// Production uses [`PartialMerkleValidator`]; tests may substitute doubles.
pub trait ProofValidator: Send + Sync {
    /// Rebuild the root and matches of a merkle-block proof.
    fn validate(&self, message: &MerkleBlockMessage) -> ProofResult<ExtractedMatches>;
}

/// Partial Merkle tree validator.
#[derive(Clone, Copy, Debug)]
pub struct PartialMerkleValidator {
    max_transactions: u32,
}

impl PartialMerkleValidator {
    /// Create a validator with a transaction ceiling.
    pub fn new(max_transactions: u32) -> Self {
        Self { max_transactions }
    }
}

impl Default for PartialMerkleValidator {
    fn default() -> Self {
        Self::new(MAX_BLOCK_TRANSACTIONS)
    }
}

impl ProofValidator for PartialMerkleValidator {
    fn validate(&self, message: &MerkleBlockMessage) -> ProofResult<ExtractedMatches> {
        validate_and_extract(message, self.max_transactions)
    }
}
