//! # SPV Merkle Sync
//!
//! Validation of BIP37 `merkleblock` messages for light clients, and the
//! handler that records which transactions a peer proved to be in a block.
//!
//! ## Purpose
//!
//! A light client keeps headers only. Peers answer its bloom filter with a
//! partial Merkle tree: a depth-first sequence of node hashes plus one flag
//! bit per visited node. This crate:
//! - Rebuilds the Merkle root from that partial tree
//! - Rejects malformed proofs and the duplicate-sibling (CVE-2012-2459) forgery
//! - Checks the root against the locally known block header
//! - Persists the matched transaction hashes through an outbound port
//!
//! ## Module Structure
//!
//! ```text
//! spv-merkle-sync/
//! ├── domain/          # Headers, blocks, messages, errors, invariants
//! ├── algorithms/      # Double SHA-256, partial tree traversal, tree builder
//! ├── ports/           # MerkleBlockApi (inbound) + store/validator traits (outbound)
//! ├── application/     # MerkleBlockHandler, per-block locks
//! ├── adapters/        # InMemoryBlockStore
//! ├── config.rs        # MerkleSyncConfig
//! └── telemetry.rs     # tracing-subscriber setup
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;

// Re-exports
pub use adapters::InMemoryBlockStore;
pub use algorithms::{
    compute_merkle_root, extract_matches, hash_pair, sha256d, tree_height, validate_and_extract,
    PartialMerkleTree, TreeShape,
};
pub use application::{BlockLocks, MerkleBlockHandler};
pub use config::MerkleSyncConfig;
pub use domain::{
    display_hash, Block, BlockHeader, ExtractedMatches, FlagBits, FlagEncoding, HandleError,
    HandleResult, HandleStage, Hash, MalformedReason, MerkleBlockMessage, ProofError,
    ProofResult, StoreError, TreeBuildError, HEADER_SIZE, MAX_BLOCK_TRANSACTIONS,
};
pub use ports::{BlockLookup, BlockUpdater, MerkleBlockApi, PartialMerkleValidator, ProofValidator};
pub use telemetry::{init_logging, TelemetryConfig, TelemetryError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
