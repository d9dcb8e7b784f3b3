//! Shared builders: leaf sets, headers committing to them, and proofs.

use spv_merkle_sync::{
    compute_merkle_root, sha256d, Block, BlockHeader, FlagBits, Hash, MerkleBlockMessage,
    PartialMerkleTree,
};

/// `n` distinct transaction hashes. Different seeds give disjoint sets.
pub fn leaves(n: usize, seed: u32) -> Vec<Hash> {
    (0..n as u32)
        .map(|i| {
            let mut preimage = [0u8; 8];
            preimage[..4].copy_from_slice(&seed.to_le_bytes());
            preimage[4..].copy_from_slice(&i.to_le_bytes());
            sha256d(&preimage)
        })
        .collect()
}

/// Header committing to `leaves`.
pub fn header_for(leaves: &[Hash], nonce: u32) -> BlockHeader {
    let merkle_root = compute_merkle_root(leaves).expect("non-empty block");
    BlockHeader::new(0x2000_0000, [0x11; 32], merkle_root, 1_700_000_000, 0x1d00_ffff, nonce)
}

/// Block as the header sync layer would have stored it.
pub fn stored_block(header: &BlockHeader, height: u64) -> Block {
    Block::from_header(header.clone(), height)
}

/// Partial tree revealing `matches`.
pub fn proof(leaves: &[Hash], matches: &[bool]) -> PartialMerkleTree {
    PartialMerkleTree::from_matches(leaves, matches).expect("valid tree input")
}

/// Leaves selected by `matches`, left to right.
pub fn selected(leaves: &[Hash], matches: &[bool]) -> Vec<Hash> {
    leaves
        .iter()
        .zip(matches)
        .filter(|(_, m)| **m)
        .map(|(h, _)| *h)
        .collect()
}

/// Message carrying `tree` with flags as individual bits.
pub fn message(header: &BlockHeader, tree: &PartialMerkleTree) -> MerkleBlockMessage {
    MerkleBlockMessage::new(
        header.clone(),
        tree.total_transactions,
        tree.hashes.clone(),
        tree.flags.clone(),
    )
}

/// Message carrying `tree` the way it arrives off the wire: flags packed
/// LSB-first into zero-padded bytes.
pub fn wire_message(header: &BlockHeader, tree: &PartialMerkleTree) -> MerkleBlockMessage {
    let bytes = pack_flags(&tree.flags);
    MerkleBlockMessage::from_wire(
        header.clone(),
        tree.total_transactions,
        tree.hashes.len() as u32,
        tree.hashes.clone(),
        bytes.len() as u32,
        bytes,
    )
}

/// Pack flag bits into bytes, least significant bit first.
pub fn pack_flags(flags: &FlagBits) -> Vec<u8> {
    let mut bytes = vec![0u8; flags.len().div_ceil(8)];
    for (i, bit) in flags.iter().by_vals().enumerate() {
        if bit {
            bytes[i / 8] |= 1 << (i % 8);
        }
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::prelude::*;

    #[test]
    fn test_pack_flags_lsb_first() {
        let flags: FlagBits = bitvec![u8, Lsb0; 1, 0, 1, 0, 0, 0, 0, 0, 1];
        assert_eq!(pack_flags(&flags), vec![0x05, 0x01]);
    }

    #[test]
    fn test_leaf_sets_are_distinct() {
        let a = leaves(8, 1);
        let b = leaves(8, 2);
        assert!(a.iter().all(|h| !b.contains(h)));
    }
}
