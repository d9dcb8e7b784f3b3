//! # In-Memory Block Store
//!
//! Implements both outbound store ports over `parking_lot::RwLock`.
//! Used by tests and embedders without a persistent backend.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::domain::{display_hash, Block, Hash, StoreError};
use crate::ports::{BlockLookup, BlockUpdater};

#[derive(Default)]
struct StoreState {
    blocks: HashMap<Hash, Block>,
    /// Matched transactions per block, in first-seen order.
    matched: HashMap<Hash, Vec<Hash>>,
    /// Transaction hash to containing block.
    tx_index: HashMap<Hash, Hash>,
}

/// In-memory block store.
///
/// Updates are idempotent: re-recording the same matches leaves the store
/// unchanged apart from the `synced` flag, which is already set.
#[derive(Default)]
pub struct InMemoryBlockStore {
    state: RwLock<StoreState>,
}

impl InMemoryBlockStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a known block.
    pub fn insert_block(&self, block: Block) {
        self.state.write().blocks.insert(block.header_hash, block);
    }

    /// Current copy of a stored block.
    pub fn block(&self, header_hash: &Hash) -> Option<Block> {
        self.state.read().blocks.get(header_hash).cloned()
    }

    /// Transactions recorded as matched in a block.
    pub fn matched_transactions(&self, header_hash: &Hash) -> Vec<Hash> {
        self.state
            .read()
            .matched
            .get(header_hash)
            .cloned()
            .unwrap_or_default()
    }

    /// Block a matched transaction was recorded in.
    pub fn block_for_transaction(&self, tx_hash: &Hash) -> Option<Hash> {
        self.state.read().tx_index.get(tx_hash).copied()
    }

    /// Number of known blocks.
    pub fn len(&self) -> usize {
        self.state.read().blocks.len()
    }

    /// True when no blocks are known.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlockLookup for InMemoryBlockStore {
    async fn lookup(&self, header_hash: &Hash) -> Result<Option<Block>, StoreError> {
        Ok(self.block(header_hash))
    }
}

#[async_trait]
impl BlockUpdater for InMemoryBlockStore {
    async fn update(&self, block: &Block, matched: &[Hash]) -> Result<(), StoreError> {
        let mut state = self.state.write();
        let StoreState {
            blocks,
            matched: recorded,
            tx_index,
        } = &mut *state;

        let stored = blocks.get_mut(&block.header_hash).ok_or_else(|| {
            StoreError::new(format!("unknown block {}", display_hash(&block.header_hash)))
        })?;
        stored.synced = true;

        let entry = recorded.entry(block.header_hash).or_default();
        for tx in matched {
            if !entry.contains(tx) {
                entry.push(*tx);
            }
            tx_index.insert(*tx, block.header_hash);
        }
        Ok(())
    }
}
