//! # Integration Tests
//!
//! Handler, validator and in-memory store wired together.

pub mod proof_properties;
