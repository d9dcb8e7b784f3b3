//! # Domain Entities
//!
//! Block header and the locally tracked block record.

use super::errors::Hash;
use super::invariants::HEADER_SIZE;
use crate::algorithms::hashing::sha256d;
use serde::{Deserialize, Serialize};

/// Bitcoin block header (80 bytes on the wire).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockHeader {
    /// Protocol version.
    pub version: i32,
    /// Hash of the previous header.
    pub previous_block_hash: Hash,
    /// Merkle root of the block's transactions.
    pub merkle_root: Hash,
    /// Unix timestamp.
    pub timestamp: u32,
    /// Compact difficulty target.
    pub bits: u32,
    /// Proof-of-work nonce.
    pub nonce: u32,
}

impl BlockHeader {
    /// Create a new block header.
    pub fn new(
        version: i32,
        previous_block_hash: Hash,
        merkle_root: Hash,
        timestamp: u32,
        bits: u32,
        nonce: u32,
    ) -> Self {
        Self {
            version,
            previous_block_hash,
            merkle_root,
            timestamp,
            bits,
            nonce,
        }
    }

    /// Serialize to the 80-byte consensus layout.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..36].copy_from_slice(&self.previous_block_hash);
        out[36..68].copy_from_slice(&self.merkle_root);
        out[68..72].copy_from_slice(&self.timestamp.to_le_bytes());
        out[72..76].copy_from_slice(&self.bits.to_le_bytes());
        out[76..80].copy_from_slice(&self.nonce.to_le_bytes());
        out
    }

    /// Parse the 80-byte consensus layout.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        let word = |at: usize| [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]];
        let mut previous_block_hash = [0u8; 32];
        previous_block_hash.copy_from_slice(&bytes[4..36]);
        let mut merkle_root = [0u8; 32];
        merkle_root.copy_from_slice(&bytes[36..68]);

        Self {
            version: i32::from_le_bytes(word(0)),
            previous_block_hash,
            merkle_root,
            timestamp: u32::from_le_bytes(word(68)),
            bits: u32::from_le_bytes(word(72)),
            nonce: u32::from_le_bytes(word(76)),
        }
    }

    /// Identity hash: double SHA-256 of the serialized header.
    pub fn hash(&self) -> Hash {
        sha256d(&self.to_bytes())
    }
}

/// A block the wallet already tracks (created during header sync).
///
/// Owned by the store. The handler only ever sees a copy returned by lookup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    /// Header hash (primary key).
    pub header_hash: Hash,
    /// Height from genesis.
    pub height: u64,
    /// Header, when it was stored alongside the block.
    pub header: Option<BlockHeader>,
    /// Matched transactions have been recorded for this block.
    pub synced: bool,
}

impl Block {
    /// Create a block record known only by hash and height.
    pub fn new(header_hash: Hash, height: u64) -> Self {
        Self {
            header_hash,
            height,
            header: None,
            synced: false,
        }
    }

    /// Create a block record from a full header.
    pub fn from_header(header: BlockHeader, height: u64) -> Self {
        Self {
            header_hash: header.hash(),
            height,
            header: Some(header),
            synced: false,
        }
    }

    /// Merkle root recorded with the stored header, if any.
    pub fn merkle_root(&self) -> Option<&Hash> {
        self.header.as_ref().map(|h| &h.merkle_root)
    }
}
