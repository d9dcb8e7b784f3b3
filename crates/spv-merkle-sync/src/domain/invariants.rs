//! # Domain Invariants
//!
//! Rules a merkle-block message must satisfy before and after traversal.

use super::errors::{Hash, HandleError, MalformedReason, ProofError};
use super::value_objects::MerkleBlockMessage;

/// Size of a serialized block header.
pub const HEADER_SIZE: usize = 80;

/// Maximum block weight.
pub const MAX_BLOCK_WEIGHT: u32 = 4_000_000;

/// Weight of the smallest possible transaction.
pub const MIN_TRANSACTION_WEIGHT: u32 = 4 * 60;

/// No block can hold more transactions than this.
pub const MAX_BLOCK_TRANSACTIONS: u32 = MAX_BLOCK_WEIGHT / MIN_TRANSACTION_WEIGHT;

/// Invariant: declared lengths equal the supplied element counts.
pub fn invariant_declared_lengths(message: &MerkleBlockMessage) -> Result<(), ProofError> {
    if message.number_of_hashes as usize != message.hashes.len() {
        return Err(MalformedReason::HashCountMismatch {
            declared: message.number_of_hashes,
            actual: message.hashes.len(),
        }
        .into());
    }

    let flags = message.flag_count();
    if message.number_of_flags as usize != flags {
        return Err(MalformedReason::FlagCountMismatch {
            declared: message.number_of_flags,
            actual: flags,
        }
        .into());
    }

    Ok(())
}

/// Invariant: a transaction count the tree can be built for.
pub fn invariant_transaction_count(total: u32, max: u32) -> Result<(), ProofError> {
    if total == 0 {
        return Err(MalformedReason::NoTransactions.into());
    }
    if total > max {
        return Err(MalformedReason::TooManyTransactions { total, max }.into());
    }
    Ok(())
}

/// Invariant: the rebuilt root equals the block's root.
pub fn invariant_root_matches(expected: &Hash, computed: &Hash) -> Result<(), HandleError> {
    if expected != computed {
        return Err(HandleError::WrongMerkleRoot {
            expected: *expected,
            computed: *computed,
        });
    }
    Ok(())
}
