//! Flotilla - Consistency engine for a fleet-management domain model
//!
//! This crate re-exports all layers of the Flotilla system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: flotilla_engine     - Invariants, transactions, seed loading, queries
//! Layer 1: flotilla_storage    - Copy-on-write tables, reference index, resolver
//! Layer 0: flotilla_foundation - Core types (EntityId, Record, Error, Violation)
//! ```

pub use flotilla_engine as engine;
pub use flotilla_foundation as foundation;
pub use flotilla_storage as storage;
