//! Structured invariant violations.
//!
//! A rejected transaction reports every violation found, not just the first,
//! so callers can show precise diagnostics.

use std::fmt;

use thiserror::Error;

use crate::entity::EntityRef;

/// The eight invariants every committed state satisfies.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum InvariantId {
    /// Every non-null reference resolves to an entity of the expected kind.
    ReferentialIntegrity = 1,
    /// No fleet holds more spaceships than its `max_size`.
    FleetCapacity = 2,
    /// Mission successor chains terminate.
    AcyclicSuccession = 3,
    /// A mission's completion date never changes once set.
    CompletionMonotonic = 4,
    /// A logbook never goes from archived back to open.
    ArchiveMonotonic = 5,
    /// A ship's damage equals its latest damage report.
    DamageConsistency = 6,
    /// Fleet names are unique.
    UniqueFleetName = 7,
    /// A ship under construction is not assigned to a fleet.
    ShipyardExclusion = 8,
}

impl InvariantId {
    /// All invariants, in check order.
    pub const ALL: [InvariantId; 8] = [
        Self::ReferentialIntegrity,
        Self::FleetCapacity,
        Self::AcyclicSuccession,
        Self::CompletionMonotonic,
        Self::ArchiveMonotonic,
        Self::DamageConsistency,
        Self::UniqueFleetName,
        Self::ShipyardExclusion,
    ];

    /// Returns the invariant number (1-8).
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Returns a short name for this invariant.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReferentialIntegrity => "referential-integrity",
            Self::FleetCapacity => "fleet-capacity",
            Self::AcyclicSuccession => "acyclic-succession",
            Self::CompletionMonotonic => "completion-monotonic",
            Self::ArchiveMonotonic => "archive-monotonic",
            Self::DamageConsistency => "damage-consistency",
            Self::UniqueFleetName => "unique-fleet-name",
            Self::ShipyardExclusion => "shipyard-exclusion",
        }
    }
}

impl fmt::Display for InvariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I{} {}", self.number(), self.name())
    }
}

/// Classification of a violation, for callers that branch on failure type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ViolationClass {
    /// A referenced or targeted entity does not exist.
    NotFound,
    /// A delete would orphan a reference.
    ReferentialConflict,
    /// A fleet would exceed its maximum size.
    CardinalityExceeded,
    /// A mission successor chain would become cyclic.
    CyclicChain,
    /// An attempt to un-complete a mission or un-archive a logbook.
    MonotonicityViolation,
    /// A uniqueness constraint would be violated.
    DuplicateKey,
    /// A derived value disagrees with its source history.
    DerivedMismatch,
    /// An entity is in two mutually exclusive states.
    ExclusiveState,
}

impl fmt::Display for ViolationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not found",
            Self::ReferentialConflict => "referential conflict",
            Self::CardinalityExceeded => "cardinality exceeded",
            Self::CyclicChain => "cyclic chain",
            Self::MonotonicityViolation => "monotonicity violation",
            Self::DuplicateKey => "duplicate key",
            Self::DerivedMismatch => "derived mismatch",
            Self::ExclusiveState => "exclusive state",
        };
        f.write_str(name)
    }
}

/// A single invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// The invariant that failed.
    pub invariant: InvariantId,
    /// What kind of failure this is.
    pub class: ViolationClass,
    /// The entity the violation is reported against.
    pub entity: EntityRef,
    /// Human-readable detail.
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        invariant: InvariantId,
        class: ViolationClass,
        entity: EntityRef,
        message: impl Into<String>,
    ) -> Self {
        Self {
            invariant,
            class,
            entity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} on {}: {}",
            self.invariant, self.class, self.entity, self.message
        )
    }
}

/// The violations that caused a transaction to be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("transaction rejected with {} violation(s)", .violations.len())]
pub struct Rejection {
    violations: Vec<Violation>,
}

impl Rejection {
    /// Wraps a list of violations.
    #[must_use]
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns the violations.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes the rejection, returning its violations.
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Returns true if any violation has the given class.
    #[must_use]
    pub fn has_class(&self, class: ViolationClass) -> bool {
        self.violations.iter().any(|v| v.class == class)
    }

    /// Returns true if any violation is of the given invariant.
    #[must_use]
    pub fn has_invariant(&self, invariant: InvariantId) -> bool {
        self.violations.iter().any(|v| v.invariant == invariant)
    }
}
