//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits for the merkle-block sync handler.

mod memory_store;

pub use memory_store::InMemoryBlockStore;
