//! Integration tests for Layer 1: Storage
//!
//! Tests for tables, the store, snapshot isolation, and reference resolution.

mod resolver;
mod snapshots;
mod store;
