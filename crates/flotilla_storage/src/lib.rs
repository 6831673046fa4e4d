//! Copy-on-write entity storage and reference resolution for Flotilla.
//!
//! This crate provides:
//! - [`Table`] - Insertion-ordered records of one kind
//! - [`Store`] - All tables plus a reverse-reference index, cheap to clone
//! - [`Scan`] - Restartable snapshot iteration over one kind
//! - [`Resolver`] - Existence and reverse-lookup queries over a store
//!
//! The store performs no validation. Invariants are checked by the engine.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod resolver;
pub mod store;
pub mod table;

pub use resolver::Resolver;
pub use store::{Referrer, Store};
pub use table::{Scan, Table};
