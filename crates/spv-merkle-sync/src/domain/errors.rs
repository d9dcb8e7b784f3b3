//! # Domain Errors
//!
//! Error types for merkle-block validation and sync.
//!
//! Failures split into two layers: [`ProofError`] is produced by the pure
//! partial Merkle tree validator, [`HandleError`] is what the sync handler
//! reports to its caller.

use thiserror::Error;

/// Hash type alias (32-byte double SHA-256, internal byte order).
pub type Hash = [u8; 32];

/// Render a hash the way Bitcoin displays it (byte-reversed hex).
pub fn display_hash(hash: &Hash) -> String {
    let mut reversed = *hash;
    reversed.reverse();
    hex::encode(reversed)
}

/// Why a proof is structurally inconsistent with its declared shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedReason {
    /// The block claims to contain no transactions.
    #[error("block declares zero transactions")]
    NoTransactions,

    /// More transactions than a block can hold.
    #[error("{total} transactions exceeds limit of {max}")]
    TooManyTransactions {
        /// Declared transaction count
        total: u32,
        /// Configured ceiling
        max: u32,
    },

    /// Declared hash count differs from the hashes supplied.
    #[error("declared {declared} hashes, got {actual}")]
    HashCountMismatch {
        /// Count carried by the message
        declared: u32,
        /// Hashes actually present
        actual: usize,
    },

    /// Declared flag count differs from the flags supplied.
    #[error("declared {declared} flags, got {actual}")]
    FlagCountMismatch {
        /// Count carried by the message
        declared: u32,
        /// Flag bits actually present
        actual: usize,
    },

    /// A partial tree can never reveal more hashes than it has leaves.
    #[error("{hashes} hashes for {total} transactions")]
    MoreHashesThanTransactions {
        /// Hashes supplied
        hashes: usize,
        /// Declared transaction count
        total: u32,
    },

    /// Every hash needs at least one flag bit.
    #[error("{flags} flags cannot cover {hashes} hashes")]
    FewerFlagsThanHashes {
        /// Flags supplied
        flags: usize,
        /// Hashes supplied
        hashes: usize,
    },

    /// Traversal needed another hash.
    #[error("hash stream exhausted after {consumed}")]
    HashesExhausted {
        /// Hashes consumed before the shortfall
        consumed: usize,
    },

    /// Traversal needed another flag bit.
    #[error("flag stream exhausted after {consumed}")]
    FlagsExhausted {
        /// Flags consumed before the shortfall
        consumed: usize,
    },

    /// Traversal finished with hashes left over.
    #[error("{remaining} unused hashes")]
    UnusedHashes {
        /// Hashes never consumed
        remaining: usize,
    },

    /// Traversal finished with flags left over.
    #[error("{remaining} unused flags")]
    UnusedFlags {
        /// Flags never consumed
        remaining: usize,
    },

    /// Byte padding after the last consumed flag was not zero.
    #[error("non-zero flag padding")]
    NonZeroPadding,
}

/// Partial Merkle tree validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProofError {
    /// Hash/flag streams do not fit the declared transaction count.
    #[error("malformed proof: {reason}")]
    MalformedProof {
        /// What was inconsistent
        reason: MalformedReason,
    },

    /// Two real siblings carried the same hash (CVE-2012-2459 class).
    #[error("duplicate leaf at depth {depth}, index {index}")]
    DuplicateLeaf {
        /// Depth of the right sibling
        depth: u32,
        /// Index of the right sibling within its level
        index: u32,
    },
}

impl From<MalformedReason> for ProofError {
    fn from(reason: MalformedReason) -> Self {
        ProofError::MalformedProof { reason }
    }
}

/// Partial tree construction failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeBuildError {
    /// A block always has at least its coinbase.
    #[error("cannot build a tree without transactions")]
    EmptyBlock,

    /// One match flag is needed per transaction.
    #[error("{matches} match flags for {transactions} transactions")]
    MatchCountMismatch {
        /// Transactions supplied
        transactions: usize,
        /// Match flags supplied
        matches: usize,
    },
}

/// Failure reported by the block store collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("store failure: {message}")]
pub struct StoreError {
    /// Human readable cause.
    pub message: String,
}

impl StoreError {
    /// Create a store error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Merkle-block handling failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    /// No local block for the message's header hash.
    #[error("block not found: {}", display_hash(.hash))]
    BlockNotFound {
        /// Header hash that was looked up
        hash: Hash,
    },

    /// The partial Merkle tree failed validation.
    #[error("invalid proof: {0}")]
    InvalidProof(#[from] ProofError),

    /// The proof reconstructs a root other than the block's.
    #[error("wrong merkle root: expected {}, computed {}", display_hash(.expected), display_hash(.computed))]
    WrongMerkleRoot {
        /// Root recorded for the block
        expected: Hash,
        /// Root rebuilt from the proof
        computed: Hash,
    },

    /// Lookup or update failed inside the store.
    #[error(transparent)]
    StoreFailure(#[from] StoreError),
}

impl HandleError {
    /// Does this failure point at a misbehaving or malicious peer?
    pub fn is_peer_misbehaviour(&self) -> bool {
        matches!(
            self,
            HandleError::InvalidProof(_) | HandleError::WrongMerkleRoot { .. }
        )
    }
}

/// Result alias for the validator.
pub type ProofResult<T> = Result<T, ProofError>;

/// Result alias for the handler.
pub type HandleResult<T> = Result<T, HandleError>;
