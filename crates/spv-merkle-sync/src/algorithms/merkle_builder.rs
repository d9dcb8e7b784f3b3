//! # Merkle Tree Building
//!
//! Full-tree root computation and the standard partial tree compression used
//! by full nodes to answer a filtered block request.

use super::hashing::hash_pair;
use super::partial_merkle::{PartialMerkleTree, TreeShape};
use crate::domain::{FlagBits, Hash, TreeBuildError};

/// Compute the Merkle root of a block's transaction hashes.
///
/// Returns `None` for an empty list.
pub fn compute_merkle_root(tx_hashes: &[Hash]) -> Option<Hash> {
    if tx_hashes.is_empty() {
        return None;
    }
    let shape = TreeShape::new(tx_hashes.len() as u32);
    Some(node_hash(&shape, 0, 0, tx_hashes))
}

/// Hash of the node at (`depth`, `index`) in the full tree.
fn node_hash(shape: &TreeShape, depth: u32, index: u32, tx_hashes: &[Hash]) -> Hash {
    if shape.is_leaf(depth) {
        return tx_hashes[index as usize];
    }

    let left = node_hash(shape, depth + 1, index * 2, tx_hashes);
    let right = if shape.has_right_child(depth, index) {
        node_hash(shape, depth + 1, index * 2 + 1, tx_hashes)
    } else {
        left
    };
    hash_pair(&left, &right)
}

impl PartialMerkleTree {
    /// Compress a full transaction list into a partial tree revealing `matches`.
    ///
    /// `matches[i]` marks `tx_hashes[i]` as relevant; both slices must have the
    /// same length.
    pub fn from_matches(tx_hashes: &[Hash], matches: &[bool]) -> Result<Self, TreeBuildError> {
        if tx_hashes.is_empty() {
            return Err(TreeBuildError::EmptyBlock);
        }
        if tx_hashes.len() != matches.len() {
            return Err(TreeBuildError::MatchCountMismatch {
                transactions: tx_hashes.len(),
                matches: matches.len(),
            });
        }

        let shape = TreeShape::new(tx_hashes.len() as u32);
        let mut builder = Builder {
            shape,
            tx_hashes,
            matches,
            hashes: Vec::new(),
            flags: FlagBits::new(),
        };
        builder.build(0, 0);

        Ok(Self::new(shape.total(), builder.hashes, builder.flags))
    }
}

struct Builder<'a> {
    shape: TreeShape,
    tx_hashes: &'a [Hash],
    matches: &'a [bool],
    hashes: Vec<Hash>,
    flags: FlagBits,
}

impl Builder<'_> {
    fn build(&mut self, depth: u32, index: u32) {
        let parent_of_match = self.shape.covers_match(depth, index, self.matches);
        self.flags.push(parent_of_match);

        if self.shape.is_leaf(depth) || !parent_of_match {
            self.hashes
                .push(node_hash(&self.shape, depth, index, self.tx_hashes));
            return;
        }

        self.build(depth + 1, index * 2);
        if self.shape.has_right_child(depth, index) {
            self.build(depth + 1, index * 2 + 1);
        }
    }
}
