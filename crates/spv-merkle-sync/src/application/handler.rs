//! # Merkle-Block Handler
//!
//! Application service orchestrating merkle-block sync.
//!
//! ```text
//! Idle → Lookup → Validating → Persisting → Done
//!          │          │
//!          └──────────┴──→ Failed   (no store mutation)
//! ```
//!
//! The updater is only reached after the proof validated and its root matched.
//! Once persistence starts it is not cancellable: with `detached_persist` the
//! update runs on its own task, holding the block's lock until it completes.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::block_locks::{BlockLockGuard, BlockLocks};
use crate::config::MerkleSyncConfig;
use crate::domain::{
    display_hash, invariant_root_matches, Block, HandleError, HandleResult, HandleStage, Hash,
    MerkleBlockMessage, StoreError,
};
use crate::ports::{
    BlockLookup, BlockUpdater, MerkleBlockApi, PartialMerkleValidator, ProofValidator,
};

/// Merkle-block handler - validates proofs and records matches.
pub struct MerkleBlockHandler {
    /// Configuration.
    config: MerkleSyncConfig,
    /// Finds the local block a message refers to.
    lookup: Arc<dyn BlockLookup>,
    /// Records matched transactions.
    updater: Arc<dyn BlockUpdater>,
    /// Rebuilds roots from proofs.
    validator: Arc<dyn ProofValidator>,
    /// Per-block critical sections.
    locks: BlockLocks,
}

impl MerkleBlockHandler {
    /// Create a handler using the partial Merkle tree validator.
    pub fn new(
        config: MerkleSyncConfig,
        lookup: Arc<dyn BlockLookup>,
        updater: Arc<dyn BlockUpdater>,
    ) -> Self {
        let validator = Arc::new(PartialMerkleValidator::new(config.max_block_transactions));
        Self::with_validator(config, lookup, updater, validator)
    }

    /// Create a handler with an explicit validator.
    pub fn with_validator(
        config: MerkleSyncConfig,
        lookup: Arc<dyn BlockLookup>,
        updater: Arc<dyn BlockUpdater>,
        validator: Arc<dyn ProofValidator>,
    ) -> Self {
        Self {
            config,
            lookup,
            updater,
            validator,
            locks: BlockLocks::new(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &MerkleSyncConfig {
        &self.config
    }

    async fn process(
        &self,
        header_hash: Hash,
        message: &MerkleBlockMessage,
        stage: &mut HandleStage,
    ) -> HandleResult<()> {
        let guard = if self.config.serialize_per_block {
            Some(self.locks.acquire(header_hash).await)
        } else {
            None
        };

        advance(stage, HandleStage::Lookup);
        let block = self
            .lookup
            .lookup(&header_hash)
            .await?
            .ok_or(HandleError::BlockNotFound { hash: header_hash })?;

        advance(stage, HandleStage::Validating);
        let extracted = self.validator.validate(message)?;
        let expected = block.merkle_root().unwrap_or(&message.header.merkle_root);
        invariant_root_matches(expected, &extracted.merkle_root)?;

        debug!(
            "[spv-sync] Proof for block #{} valid, {} matched of {} transactions",
            block.height,
            extracted.matched.len(),
            message.total_transactions
        );

        advance(stage, HandleStage::Persisting);
        self.persist(block, extracted.matched, guard).await
    }

    async fn persist(
        &self,
        block: Block,
        matched: Vec<Hash>,
        guard: Option<BlockLockGuard>,
    ) -> HandleResult<()> {
        if !self.config.detached_persist {
            let result = self.updater.update(&block, &matched).await;
            drop(guard);
            return result.map_err(HandleError::from);
        }

        let updater = Arc::clone(&self.updater);
        let task = tokio::spawn(async move {
            let _guard = guard;
            updater.update(&block, &matched).await
        });

        match task.await {
            Ok(result) => result.map_err(HandleError::from),
            Err(e) => Err(StoreError::new(format!("persist task aborted: {}", e)).into()),
        }
    }
}

fn advance(stage: &mut HandleStage, next: HandleStage) {
    let from = *stage;
    debug!(from = ?from, to = ?next, "[spv-sync] Stage transition");
    *stage = next;
}

#[async_trait]
impl MerkleBlockApi for MerkleBlockHandler {
    async fn handle(&self, message: MerkleBlockMessage) -> HandleResult<()> {
        let header_hash = message.header.hash();
        let mut stage = HandleStage::Idle;

        match self.process(header_hash, &message, &mut stage).await {
            Ok(()) => {
                advance(&mut stage, HandleStage::Done);
                info!(
                    "[spv-sync] Merkle block {} synced",
                    display_hash(&header_hash)
                );
                Ok(())
            }
            Err(e) => {
                let exited = stage;
                advance(&mut stage, HandleStage::Failed);
                warn!(
                    stage = ?exited,
                    peer_misbehaviour = e.is_peer_misbehaviour(),
                    "[spv-sync] Merkle block {} failed: {}",
                    display_hash(&header_hash),
                    e
                );
                Err(e)
            }
        }
    }
}
