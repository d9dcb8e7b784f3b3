//! # Application Module
//!
//! Application services orchestrating the domain and outbound ports.

pub mod block_locks;
pub mod handler;

pub use block_locks::{BlockLockGuard, BlockLocks};
pub use handler::MerkleBlockHandler;
