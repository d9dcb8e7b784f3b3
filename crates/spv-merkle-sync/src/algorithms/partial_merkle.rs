//! # Partial Merkle Tree Validation
//!
//! Rebuilds the Merkle root implied by a `merkleblock` proof and extracts the
//! matched transaction hashes.
//!
//! # Algorithm
//!
//! The tree has `total_transactions` leaves and height `h = ceil(log2(total))`.
//! Nodes are visited depth-first, left to right. Each visit consumes one flag:
//!
//! - at a leaf, or when the flag is 0, the next hash is taken as the node's
//!   value (a leaf with flag 1 is a match);
//! - otherwise both children are computed and hashed together. A level with an
//!   odd width pairs its last node with itself.
//!
//! Both streams must be consumed exactly. Two real siblings with identical
//! hashes are rejected, since that shape lets a peer forge a tree with the same
//! root but a different transaction list.

use bitvec::prelude::*;

use super::hashing::hash_pair;
use crate::domain::{
    invariant_declared_lengths, invariant_transaction_count, ExtractedMatches, FlagBits,
    FlagEncoding, Hash, MalformedReason, MerkleBlockMessage, ProofError, ProofResult,
};

/// Height of a tree with `total` leaves (0 for a single leaf).
pub fn tree_height(total: u32) -> u32 {
    if total <= 1 {
        0
    } else {
        32 - (total - 1).leading_zeros()
    }
}

/// Shape of the full tree a partial proof is cut from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeShape {
    total: u32,
    height: u32,
}

impl TreeShape {
    /// Shape for `total` leaves.
    pub fn new(total: u32) -> Self {
        Self {
            total,
            height: tree_height(total),
        }
    }

    /// Tree height (depth of the leaves).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Leaf count.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Number of nodes at `depth`.
    pub fn width(&self, depth: u32) -> u64 {
        let shift = self.height - depth;
        (u64::from(self.total) + (1u64 << shift) - 1) >> shift
    }

    /// Is `depth` the leaf level?
    pub fn is_leaf(&self, depth: u32) -> bool {
        depth == self.height
    }

    /// Does the node at (`depth`, `index`) have a real right child?
    pub fn has_right_child(&self, depth: u32, index: u32) -> bool {
        u64::from(index) * 2 + 1 < self.width(depth + 1)
    }

    /// Does the subtree at (`depth`, `index`) contain any leaf in `matches`?
    pub(crate) fn covers_match(&self, depth: u32, index: u32, matches: &[bool]) -> bool {
        let span = self.height - depth;
        let start = (u64::from(index) << span) as usize;
        let end = ((u64::from(index) + 1) << span).min(u64::from(self.total)) as usize;
        matches.get(start..end).is_some_and(|range| range.iter().any(|m| *m))
    }
}

/// Owned partial Merkle tree: leaf count, hashes and flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialMerkleTree {
    /// Leaf count of the full tree.
    pub total_transactions: u32,
    /// Node hashes in depth-first order.
    pub hashes: Vec<Hash>,
    /// Traversal flags.
    pub flags: FlagBits,
}

impl PartialMerkleTree {
    /// Wrap already decoded streams.
    pub fn new(total_transactions: u32, hashes: Vec<Hash>, flags: FlagBits) -> Self {
        Self {
            total_transactions,
            hashes,
            flags,
        }
    }

    /// Rebuild the root and collect matches.
    pub fn extract_matches(&self, max_transactions: u32) -> ProofResult<ExtractedMatches> {
        extract_matches(
            self.total_transactions,
            &self.hashes,
            &self.flags,
            FlagEncoding::Bits,
            max_transactions,
        )
    }
}

/// Validate a decoded message and extract its matches.
///
/// The root is returned, not compared: the caller decides which header root
/// is authoritative.
pub fn validate_and_extract(
    message: &MerkleBlockMessage,
    max_transactions: u32,
) -> ProofResult<ExtractedMatches> {
    invariant_declared_lengths(message)?;
    extract_matches(
        message.total_transactions,
        &message.hashes,
        &message.flags,
        message.flag_encoding,
        max_transactions,
    )
}

/// Traverse hash and flag streams for a tree of `total` leaves.
pub fn extract_matches(
    total: u32,
    hashes: &[Hash],
    flags: &BitSlice<u8, Lsb0>,
    encoding: FlagEncoding,
    max_transactions: u32,
) -> ProofResult<ExtractedMatches> {
    invariant_transaction_count(total, max_transactions)?;

    // One leaf, one hash, no flags: the root alone, nothing matched.
    if total == 1 && hashes.len() == 1 && flags.is_empty() {
        return Ok(ExtractedMatches {
            merkle_root: hashes[0],
            ..Default::default()
        });
    }

    if hashes.len() as u64 > u64::from(total) {
        return Err(MalformedReason::MoreHashesThanTransactions {
            hashes: hashes.len(),
            total,
        }
        .into());
    }
    if flags.len() < hashes.len() {
        return Err(MalformedReason::FewerFlagsThanHashes {
            flags: flags.len(),
            hashes: hashes.len(),
        }
        .into());
    }

    let mut traversal = Traversal::new(TreeShape::new(total), hashes, flags);
    let root = traversal.traverse(0, 0)?;
    traversal.finish(root, encoding)
}

/// Cursor state threaded through one traversal.
struct Traversal<'a> {
    shape: TreeShape,
    hashes: &'a [Hash],
    flags: &'a BitSlice<u8, Lsb0>,
    hash_cursor: usize,
    flag_cursor: usize,
    matched: Vec<Hash>,
    indices: Vec<u32>,
}

impl<'a> Traversal<'a> {
    fn new(shape: TreeShape, hashes: &'a [Hash], flags: &'a BitSlice<u8, Lsb0>) -> Self {
        Self {
            shape,
            hashes,
            flags,
            hash_cursor: 0,
            flag_cursor: 0,
            matched: Vec::new(),
            indices: Vec::new(),
        }
    }

    fn next_flag(&mut self) -> ProofResult<bool> {
        let bit = self
            .flags
            .get(self.flag_cursor)
            .map(|bit| *bit)
            .ok_or(MalformedReason::FlagsExhausted {
                consumed: self.flag_cursor,
            })?;
        self.flag_cursor += 1;
        Ok(bit)
    }

    fn next_hash(&mut self) -> ProofResult<Hash> {
        let hash = self
            .hashes
            .get(self.hash_cursor)
            .copied()
            .ok_or(MalformedReason::HashesExhausted {
                consumed: self.hash_cursor,
            })?;
        self.hash_cursor += 1;
        Ok(hash)
    }

    fn traverse(&mut self, depth: u32, index: u32) -> ProofResult<Hash> {
        let descend = self.next_flag()?;

        if self.shape.is_leaf(depth) || !descend {
            let hash = self.next_hash()?;
            if self.shape.is_leaf(depth) && descend {
                self.matched.push(hash);
                self.indices.push(index);
            }
            return Ok(hash);
        }

        let left = self.traverse(depth + 1, index * 2)?;
        let right = if self.shape.has_right_child(depth, index) {
            let right = self.traverse(depth + 1, index * 2 + 1)?;
            if right == left {
                return Err(ProofError::DuplicateLeaf {
                    depth: depth + 1,
                    index: index * 2 + 1,
                });
            }
            right
        } else {
            left
        };

        Ok(hash_pair(&left, &right))
    }

    fn finish(self, merkle_root: Hash, encoding: FlagEncoding) -> ProofResult<ExtractedMatches> {
        if self.hash_cursor != self.hashes.len() {
            return Err(MalformedReason::UnusedHashes {
                remaining: self.hashes.len() - self.hash_cursor,
            }
            .into());
        }

        let remaining = self.flags.len() - self.flag_cursor;
        match encoding {
            FlagEncoding::Bits if remaining != 0 => {
                return Err(MalformedReason::UnusedFlags { remaining }.into());
            }
            FlagEncoding::PackedBytes => {
                // Only the tail of the last byte may be left over.
                if self.flag_cursor.div_ceil(8) * 8 != self.flags.len() {
                    return Err(MalformedReason::UnusedFlags { remaining }.into());
                }
                if self.flags[self.flag_cursor..].any() {
                    return Err(MalformedReason::NonZeroPadding.into());
                }
            }
            FlagEncoding::Bits => {}
        }

        Ok(ExtractedMatches {
            merkle_root,
            matched: self.matched,
            indices: self.indices,
        })
    }
}
