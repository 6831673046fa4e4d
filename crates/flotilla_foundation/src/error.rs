//! Error types for the Flotilla system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Invariant failures inside a transaction are not errors; they are
//! reported as a [`Rejection`](crate::Rejection).

use std::fmt;

use thiserror::Error;

use crate::entity::{EntityId, EntityKind, EntityRef};
use crate::violation::Violation;

/// The main error type for Flotilla operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an entity not found error.
    #[must_use]
    pub fn not_found(kind: EntityKind, id: EntityId) -> Self {
        Self::new(ErrorKind::NotFound(EntityRef::new(kind, id)))
    }

    /// Creates a cyclic successor chain error.
    #[must_use]
    pub fn cyclic_chain(mission: EntityId) -> Self {
        Self::new(ErrorKind::CyclicChain(mission))
    }

    /// Creates a corrupt seed error carrying the violations found at load.
    #[must_use]
    pub fn corrupt_seed(violations: Vec<Violation>) -> Self {
        Self::new(ErrorKind::CorruptSeed(violations))
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Entity does not exist.
    #[error("entity not found: {0}")]
    NotFound(EntityRef),

    /// A mission successor chain loops back on itself.
    #[error("cyclic successor chain through mission {0}")]
    CyclicChain(EntityId),

    /// Seed data failed validation; the engine was not started.
    #[error("corrupt seed: {} violation(s)", .0.len())]
    CorruptSeed(Vec<Violation>),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation that failed, e.g. `mission_chain`.
    pub operation: Option<String>,
    /// The entity the operation started from.
    pub origin: Option<EntityRef>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the originating entity.
    #[must_use]
    pub fn with_origin(mut self, origin: EntityRef) -> Self {
        self.origin = Some(origin);
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(op) = &self.operation {
            write!(f, "in {op}")?;
        }
        if let Some(origin) = &self.origin {
            if self.operation.is_some() {
                f.write_str(" ")?;
            }
            write!(f, "from {origin}")?;
        }
        Ok(())
    }
}
