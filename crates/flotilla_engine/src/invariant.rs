//! Invariant checking for Flotilla.
//!
//! The checker runs every invariant against a complete candidate state and
//! collects all violations; it never stops at the first failure.
//!
//! Two modes:
//! - [`InvariantChecker::check`] validates a state on its own. Monotonicity
//!   holds trivially because there is no earlier state to compare against.
//! - [`InvariantChecker::check_transition`] validates a candidate against the
//!   state it was derived from, which enables the monotonicity invariants and
//!   attributes orphaned references to the delete that caused them.

use std::collections::{HashMap, HashSet};
use std::fmt;

use flotilla_foundation::{
    EntityId, EntityKind, EntityRef, Fleet, InvariantId, Logbook, Mission, RefField,
    ShipyardEntry, Spaceship, Violation, ViolationClass,
};
use flotilla_storage::{Resolver, Store};

use crate::damage;

// =============================================================================
// Check Context
// =============================================================================

/// The state under validation, and optionally the state it replaces.
#[derive(Clone, Copy, Debug)]
pub struct CheckContext<'a> {
    /// The candidate state.
    pub candidate: &'a Store,
    /// The committed state the candidate was derived from.
    pub baseline: Option<&'a Store>,
}

impl<'a> CheckContext<'a> {
    /// Returns a resolver over the candidate.
    #[must_use]
    pub fn resolver(&self) -> Resolver<'a> {
        Resolver::new(self.candidate)
    }

    /// Returns true if `target` existed in the baseline but not the candidate.
    #[must_use]
    pub fn deleted(&self, target: EntityRef) -> bool {
        self.baseline
            .is_some_and(|b| b.contains(target.kind, target.id))
            && !self.candidate.contains(target.kind, target.id)
    }
}

// =============================================================================
// Invariant Trait
// =============================================================================

/// One rule every committed state must satisfy.
pub trait Invariant: Send + Sync {
    /// Which invariant this is.
    fn id(&self) -> InvariantId;

    /// Appends any violations found in `cx` to `out`.
    fn check(&self, cx: &CheckContext<'_>, out: &mut Vec<Violation>);
}

fn violation(
    invariant: InvariantId,
    class: ViolationClass,
    kind: EntityKind,
    id: EntityId,
    message: String,
) -> Violation {
    Violation::new(invariant, class, EntityRef::new(kind, id), message)
}

// =============================================================================
// 1. Referential Integrity
// =============================================================================

/// Every non-null reference resolves to an existing entity of the right kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReferentialIntegrity;

impl Invariant for ReferentialIntegrity {
    fn id(&self) -> InvariantId {
        InvariantId::ReferentialIntegrity
    }

    fn check(&self, cx: &CheckContext<'_>, out: &mut Vec<Violation>) {
        let resolver = cx.resolver();

        // Dangling references whose target was never there, or vanished
        // outside this transition.
        for kind in EntityKind::ALL {
            for (id, record) in cx.candidate.table(kind).iter() {
                for reference in resolver.dangling(record) {
                    if cx.deleted(reference.target) {
                        continue;
                    }
                    out.push(violation(
                        self.id(),
                        ViolationClass::NotFound,
                        kind,
                        id,
                        format!("{} references missing {}", reference.field, reference.target),
                    ));
                }
            }
        }

        // Deletes that would orphan a reference are reported on the deleted entity.
        let Some(baseline) = cx.baseline else {
            return;
        };
        for kind in EntityKind::ALL {
            for (id, _) in baseline.table(kind).iter() {
                if cx.candidate.contains(kind, id) {
                    continue;
                }
                let referrers = resolver.referrers(kind, id);
                if referrers.is_empty() {
                    continue;
                }
                let names: Vec<String> = referrers.iter().map(ToString::to_string).collect();
                out.push(violation(
                    self.id(),
                    ViolationClass::ReferentialConflict,
                    kind,
                    id,
                    format!("still referenced by {}", names.join(", ")),
                ));
            }
        }
    }
}

// =============================================================================
// 2. Fleet Capacity
// =============================================================================

/// No fleet has more spaceships than its `max_size`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FleetCapacity;

impl Invariant for FleetCapacity {
    fn id(&self) -> InvariantId {
        InvariantId::FleetCapacity
    }

    fn check(&self, cx: &CheckContext<'_>, out: &mut Vec<Violation>) {
        let resolver = cx.resolver();
        for (id, fleet) in cx.candidate.iter_as::<Fleet>() {
            let members = resolver.count_via(id, RefField::SpaceshipFleet);
            if members > fleet.max_size as usize {
                out.push(violation(
                    self.id(),
                    ViolationClass::CardinalityExceeded,
                    EntityKind::Fleet,
                    id,
                    format!(
                        "{members} spaceships assigned, max_size is {}",
                        fleet.max_size
                    ),
                ));
            }
        }
    }
}

// =============================================================================
// 3. Acyclic Succession
// =============================================================================

/// Following `successor` links from any mission terminates.
///
/// Walks each chain iteratively with an on-path set. Missions already proven
/// to terminate (or already reported) are skipped, so the whole check is
/// linear in the number of missions and each cycle is reported once, on the
/// mission whose successor link closes it.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcyclicSuccession;

impl Invariant for AcyclicSuccession {
    fn id(&self) -> InvariantId {
        InvariantId::AcyclicSuccession
    }

    fn check(&self, cx: &CheckContext<'_>, out: &mut Vec<Violation>) {
        let store = cx.candidate;
        let bound = store.len(EntityKind::Mission);
        let mut finished: HashSet<EntityId> = HashSet::with_capacity(bound);

        for (start, _) in store.iter_as::<Mission>() {
            if finished.contains(&start) {
                continue;
            }

            let mut path: Vec<EntityId> = Vec::new();
            let mut on_path: HashSet<EntityId> = HashSet::new();
            let mut current = start;

            // A chain can visit each mission at most once before repeating.
            for _ in 0..=bound {
                if finished.contains(&current) {
                    break;
                }
                if !on_path.insert(current) {
                    let closer = path.last().copied().unwrap_or(current);
                    let length = path
                        .iter()
                        .position(|m| *m == current)
                        .map_or(path.len(), |i| path.len() - i);
                    out.push(violation(
                        self.id(),
                        ViolationClass::CyclicChain,
                        EntityKind::Mission,
                        closer,
                        format!("successor {current} closes a cycle of {length} mission(s)"),
                    ));
                    break;
                }
                path.push(current);

                match store.find_as::<Mission>(current).and_then(|m| m.successor) {
                    Some(next) if store.contains(EntityKind::Mission, next) => current = next,
                    // Terminal, or a dangling successor reported by integrity
                    _ => break,
                }
            }

            finished.extend(path);
        }
    }
}

// =============================================================================
// 4. Completion Monotonicity
// =============================================================================

/// A mission's completion date, once set, never changes.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompletionMonotonic;

impl Invariant for CompletionMonotonic {
    fn id(&self) -> InvariantId {
        InvariantId::CompletionMonotonic
    }

    fn check(&self, cx: &CheckContext<'_>, out: &mut Vec<Violation>) {
        let Some(baseline) = cx.baseline else {
            return;
        };
        for (id, before) in baseline.iter_as::<Mission>() {
            let Some(completed) = before.completed else {
                continue;
            };
            let Some(after) = cx.candidate.find_as::<Mission>(id) else {
                continue;
            };
            let message = match after.completed {
                Some(date) if date == completed => continue,
                Some(date) => format!("completion date changed from {completed} to {date}"),
                None => format!("completion date {completed} cleared"),
            };
            out.push(violation(
                self.id(),
                ViolationClass::MonotonicityViolation,
                EntityKind::Mission,
                id,
                message,
            ));
        }
    }
}

// =============================================================================
// 5. Archive Monotonicity
// =============================================================================

/// A logbook's `archived` flag only goes from false to true.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArchiveMonotonic;

impl Invariant for ArchiveMonotonic {
    fn id(&self) -> InvariantId {
        InvariantId::ArchiveMonotonic
    }

    fn check(&self, cx: &CheckContext<'_>, out: &mut Vec<Violation>) {
        let Some(baseline) = cx.baseline else {
            return;
        };
        for (id, before) in baseline.iter_as::<Logbook>() {
            if !before.archived {
                continue;
            }
            if let Some(after) = cx.candidate.find_as::<Logbook>(id) {
                if !after.archived {
                    out.push(violation(
                        self.id(),
                        ViolationClass::MonotonicityViolation,
                        EntityKind::Logbook,
                        id,
                        "archived logbook cannot be reopened".to_string(),
                    ));
                }
            }
        }
    }
}

// =============================================================================
// 6. Damage Consistency
// =============================================================================

/// A ship's `damage` equals its latest damage report, if it has any.
#[derive(Clone, Copy, Debug, Default)]
pub struct DamageConsistency;

impl Invariant for DamageConsistency {
    fn id(&self) -> InvariantId {
        InvariantId::DamageConsistency
    }

    fn check(&self, cx: &CheckContext<'_>, out: &mut Vec<Violation>) {
        for (id, ship) in cx.candidate.iter_as::<Spaceship>() {
            let Some((report_id, report)) = damage::latest(cx.candidate, id) else {
                continue;
            };
            if ship.damage != report.damage {
                out.push(violation(
                    self.id(),
                    ViolationClass::DerivedMismatch,
                    EntityKind::Spaceship,
                    id,
                    format!(
                        "damage is {} but latest report {report_id} ({}) says {}",
                        ship.damage, report.date, report.damage
                    ),
                ));
            }
        }
    }
}

// =============================================================================
// 7. Unique Fleet Names
// =============================================================================

/// No two fleets share a name.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniqueFleetName;

impl Invariant for UniqueFleetName {
    fn id(&self) -> InvariantId {
        InvariantId::UniqueFleetName
    }

    fn check(&self, cx: &CheckContext<'_>, out: &mut Vec<Violation>) {
        let mut owners: HashMap<&str, EntityId> = HashMap::new();
        for (id, fleet) in cx.candidate.iter_as::<Fleet>() {
            if let Some(owner) = owners.get(fleet.name.as_str()) {
                out.push(violation(
                    self.id(),
                    ViolationClass::DuplicateKey,
                    EntityKind::Fleet,
                    id,
                    format!("name {:?} already used by fleet{owner}", fleet.name),
                ));
            } else {
                owners.insert(&fleet.name, id);
            }
        }
    }
}

// =============================================================================
// 8. Shipyard Exclusion
// =============================================================================

/// A ship still in the shipyard is not assigned to a fleet.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShipyardExclusion;

impl Invariant for ShipyardExclusion {
    fn id(&self) -> InvariantId {
        InvariantId::ShipyardExclusion
    }

    fn check(&self, cx: &CheckContext<'_>, out: &mut Vec<Violation>) {
        for (entry_id, entry) in cx.candidate.iter_as::<ShipyardEntry>() {
            let Some(ship) = cx.candidate.find_as::<Spaceship>(entry.ship) else {
                continue;
            };
            if let Some(fleet) = ship.fleet {
                out.push(violation(
                    self.id(),
                    ViolationClass::ExclusiveState,
                    EntityKind::Spaceship,
                    entry.ship,
                    format!(
                        "under construction (shipyard entry {entry_id}) but assigned to fleet{fleet}"
                    ),
                ));
            }
        }
    }
}

// =============================================================================
// Invariant Checker
// =============================================================================

/// Runs the full invariant set against candidate states.
pub struct InvariantChecker {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InvariantChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.invariants.iter().map(|i| i.id()))
            .finish()
    }
}

impl InvariantChecker {
    /// Creates a checker enforcing all eight invariants, in order.
    #[must_use]
    pub fn new() -> Self {
        Self {
            invariants: vec![
                Box::new(ReferentialIntegrity),
                Box::new(FleetCapacity),
                Box::new(AcyclicSuccession),
                Box::new(CompletionMonotonic),
                Box::new(ArchiveMonotonic),
                Box::new(DamageConsistency),
                Box::new(UniqueFleetName),
                Box::new(ShipyardExclusion),
            ],
        }
    }

    /// Returns the ids of the enforced invariants, in check order.
    pub fn invariants(&self) -> impl Iterator<Item = InvariantId> + '_ {
        self.invariants.iter().map(|i| i.id())
    }

    /// Validates a state on its own.
    ///
    /// Returns an empty list if every invariant holds.
    #[must_use]
    pub fn check(&self, store: &Store) -> Vec<Violation> {
        self.run(&CheckContext {
            candidate: store,
            baseline: None,
        })
    }

    /// Validates `after` as the successor of the committed state `before`.
    #[must_use]
    pub fn check_transition(&self, before: &Store, after: &Store) -> Vec<Violation> {
        self.run(&CheckContext {
            candidate: after,
            baseline: Some(before),
        })
    }

    fn run(&self, cx: &CheckContext<'_>) -> Vec<Violation> {
        let mut out = Vec::new();
        for invariant in &self.invariants {
            invariant.check(cx, &mut out);
        }
        out
    }
}
