//! Invariant checking, transactions, seed loading, and queries for Flotilla.
//!
//! This crate provides:
//! - [`InvariantChecker`] - The eight rules every committed state satisfies
//! - [`Engine`] - Serialized, all-or-nothing transaction application
//! - [`Dataset`] - Seed rows validated once at load
//! - [`View`] - Read-only composite queries over a pinned snapshot
//! - [`CommitLog`] - Bounded history of committed snapshots

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod damage;
pub mod engine;
pub mod history;
pub mod intent;
pub mod invariant;
pub mod query;
pub mod seed;
mod transaction;

pub use config::EngineConfig;
pub use damage::Repair;
pub use engine::Engine;
pub use history::{CommitLog, CommitRecord, CommitSummary};
pub use intent::{CommitId, Intent};
pub use invariant::{
    AcyclicSuccession, ArchiveMonotonic, CheckContext, CompletionMonotonic, DamageConsistency,
    FleetCapacity, Invariant, InvariantChecker, ReferentialIntegrity, ShipyardExclusion,
    UniqueFleetName,
};
pub use query::View;
pub use seed::Dataset;
