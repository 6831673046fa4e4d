//! Cross-layer integration tests for Flotilla
//!
//! Tests that verify correct interaction between multiple crates.

mod history;
