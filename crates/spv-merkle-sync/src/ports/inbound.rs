//! # Inbound Ports
//!
//! API trait defining what the merkle-block sync handler offers.

use async_trait::async_trait;

use crate::domain::{HandleResult, MerkleBlockMessage};

/// Merkle-block sync API - inbound port.
///
/// Called by the peer layer once per decoded `merkleblock` message.
#[async_trait]
pub trait MerkleBlockApi: Send + Sync {
    /// Validate the message's proof and persist its matched transactions.
    async fn handle(&self, message: MerkleBlockMessage) -> HandleResult<()>;
}
