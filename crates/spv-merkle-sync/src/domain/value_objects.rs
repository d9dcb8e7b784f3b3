//! # Domain Value Objects
//!
//! Immutable values flowing through merkle-block handling.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use super::entities::BlockHeader;
use super::errors::Hash;

/// Traversal flags, one bit per visited node, least significant bit first.
pub type FlagBits = BitVec<u8, Lsb0>;

/// How the flag stream was delivered.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum FlagEncoding {
    /// Exact bit sequence, every bit must be consumed.
    #[default]
    Bits,
    /// Packed wire bytes; the final byte may carry up to 7 zero padding bits.
    PackedBytes,
}

/// Decoded `merkleblock` message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleBlockMessage {
    /// Header of the block the proof refers to.
    pub header: BlockHeader,
    /// Transactions in the full block (leaf count).
    pub total_transactions: u32,
    /// Declared number of hashes.
    pub number_of_hashes: u32,
    /// Node hashes in depth-first order.
    pub hashes: Vec<Hash>,
    /// Declared number of flags (bits, or bytes under `PackedBytes`).
    pub number_of_flags: u32,
    /// Traversal flags.
    pub flags: FlagBits,
    /// How `flags` was delivered.
    pub flag_encoding: FlagEncoding,
}

impl MerkleBlockMessage {
    /// Build a message whose declared lengths match its contents.
    pub fn new(header: BlockHeader, total_transactions: u32, hashes: Vec<Hash>, flags: FlagBits) -> Self {
        Self {
            header,
            total_transactions,
            number_of_hashes: hashes.len() as u32,
            hashes,
            number_of_flags: flags.len() as u32,
            flags,
            flag_encoding: FlagEncoding::Bits,
        }
    }

    /// Build a message from wire fields, flags still packed into bytes.
    pub fn from_wire(
        header: BlockHeader,
        total_transactions: u32,
        number_of_hashes: u32,
        hashes: Vec<Hash>,
        number_of_flags: u32,
        flag_bytes: Vec<u8>,
    ) -> Self {
        Self {
            header,
            total_transactions,
            number_of_hashes,
            hashes,
            number_of_flags,
            flags: FlagBits::from_vec(flag_bytes),
            flag_encoding: FlagEncoding::PackedBytes,
        }
    }

    /// Number of flags actually present, in the unit `number_of_flags` uses.
    pub fn flag_count(&self) -> usize {
        match self.flag_encoding {
            FlagEncoding::Bits => self.flags.len(),
            FlagEncoding::PackedBytes => self.flags.len() / 8,
        }
    }
}

/// Outcome of a successful partial tree traversal.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedMatches {
    /// Root rebuilt from the proof.
    pub merkle_root: Hash,
    /// Matched leaf hashes, left to right.
    pub matched: Vec<Hash>,
    /// Leaf index of each matched hash.
    pub indices: Vec<u32>,
}

/// Handler progress, used in logs and to classify failures.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HandleStage {
    /// Not started.
    Idle,
    /// Looking the block up.
    Lookup,
    /// Validating the proof.
    Validating,
    /// Handing matches to the updater.
    Persisting,
    /// Finished successfully.
    Done,
    /// Aborted.
    Failed,
}
