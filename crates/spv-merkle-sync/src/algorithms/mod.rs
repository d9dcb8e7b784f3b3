//! # Algorithms Module
//!
//! Hashing, partial Merkle tree validation and tree construction.

pub mod hashing;
pub mod merkle_builder;
pub mod partial_merkle;

pub use hashing::{hash_pair, sha256d};
pub use merkle_builder::compute_merkle_root;
pub use partial_merkle::{
    extract_matches, tree_height, validate_and_extract, PartialMerkleTree, TreeShape,
};
