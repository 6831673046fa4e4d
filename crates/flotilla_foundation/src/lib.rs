//! Identifiers, entity records, errors, and violations for Flotilla.
//!
//! This crate provides:
//! - [`EntityId`], [`EntityKind`], [`EntityRef`] - Entity addressing
//! - [`RefField`], [`Reference`] - Typed foreign-key style references
//! - [`Record`] and one struct per entity kind - The domain data model
//! - [`Error`] - Rich error types with context
//! - [`Violation`], [`Rejection`] - Structured invariant failures

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod record;
pub mod reference;
pub mod violation;

pub use entity::{EntityId, EntityKind, EntityRef};
pub use error::{Error, ErrorContext, ErrorKind};
pub use record::{
    Building, BuildingOnPlanet, Captain, DamageReport, Entity, Fleet, Logbook, Mission,
    MissionType, Planet, Record, ShipType, ShipyardEntry, Spaceship,
};
pub use reference::{RefField, Reference};
pub use violation::{InvariantId, Rejection, Violation, ViolationClass};

/// Result type alias using Flotilla's Error type.
pub type Result<T> = std::result::Result<T, Error>;
