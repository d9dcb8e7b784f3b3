//! # Hashing
//!
//! Double SHA-256 as used for block headers and Merkle nodes.

use sha2::{Digest, Sha256};

use crate::domain::Hash;

/// SHA-256 applied twice.
pub fn sha256d(data: &[u8]) -> Hash {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut output = [0u8; 32];
    output.copy_from_slice(&second);
    output
}

/// Hash two child nodes into their parent.
pub fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left);
    buf[32..].copy_from_slice(right);
    sha256d(&buf)
}
