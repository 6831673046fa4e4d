//! Transaction staging and validation.
//!
//! A transaction applies its intents, in order, to a shadow copy of the
//! committed store. The shadow starts as a clone of the committed store and
//! shares every untouched record with it; only the records an intent writes
//! are replaced. The checker then runs once against the complete shadow.
//!
//! ```text
//! Pending --stage--> Validating --validate--> Committed
//!    |                    |
//!    +----> Rejected <----+
//! ```

use std::collections::BTreeSet;

use flotilla_foundation::{
    DamageReport, Entity, EntityId, EntityKind, EntityRef, InvariantId, Record, Violation,
    ViolationClass,
};
use flotilla_storage::Store;

use crate::damage;
use crate::history::CommitSummary;
use crate::intent::{CommitId, Intent};
use crate::invariant::InvariantChecker;

/// Where a transaction is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransactionState {
    /// Intents received, nothing applied.
    Pending,
    /// Intents applied to the shadow; invariants being checked.
    Validating,
    /// The shadow replaced the live store.
    Committed(CommitId),
    /// The shadow was discarded.
    Rejected,
}

/// A batch of intents moving through staging and validation.
#[derive(Debug)]
pub(crate) struct Transaction {
    intents: Vec<Intent>,
    state: TransactionState,
    summary: CommitSummary,
}

impl Transaction {
    pub(crate) fn new(intents: Vec<Intent>) -> Self {
        Self {
            intents,
            state: TransactionState::Pending,
            summary: CommitSummary::default(),
        }
    }

    pub(crate) fn state(&self) -> TransactionState {
        self.state
    }

    pub(crate) fn summary(&self) -> CommitSummary {
        self.summary
    }

    pub(crate) fn len(&self) -> usize {
        self.intents.len()
    }

    /// Applies every intent to a shadow of `base`.
    ///
    /// Intents that cannot apply (insert over an existing id, update or
    /// delete of a missing one) are collected as violations; if there are
    /// any, the transaction is rejected without running the checker.
    pub(crate) fn stage(
        &mut self,
        base: &Store,
        derive_damage: bool,
    ) -> Result<Store, Vec<Violation>> {
        debug_assert_eq!(self.state, TransactionState::Pending);

        let mut shadow = base.clone();
        let mut violations = Vec::new();
        let mut touched_ships = BTreeSet::new();

        for intent in std::mem::take(&mut self.intents) {
            let target = intent.target();
            match intent {
                Intent::Insert { id, record } => {
                    if shadow.contains(target.kind, id) {
                        violations.push(structural(
                            ViolationClass::DuplicateKey,
                            target,
                            "insert over an existing id",
                        ));
                        continue;
                    }
                    note_report_ship(&record, &mut touched_ships);
                    shadow.put(id, record);
                    self.summary.inserted += 1;
                }
                Intent::Update { id, record } => {
                    let Some(old) = shadow.find(target.kind, id) else {
                        violations.push(structural(
                            ViolationClass::NotFound,
                            target,
                            "update of a missing entity",
                        ));
                        continue;
                    };
                    note_report_ship(old, &mut touched_ships);
                    note_report_ship(&record, &mut touched_ships);
                    shadow.put(id, record);
                    self.summary.updated += 1;
                }
                Intent::Delete { kind, id } => match shadow.delete(kind, id) {
                    Ok(old) => {
                        note_report_ship(&old, &mut touched_ships);
                        self.summary.deleted += 1;
                    }
                    Err(_) => violations.push(structural(
                        ViolationClass::NotFound,
                        target,
                        "delete of a missing entity",
                    )),
                },
            }
        }

        if !violations.is_empty() {
            self.state = TransactionState::Rejected;
            return Err(violations);
        }

        if derive_damage {
            self.summary.repaired = damage::reconcile(&mut shadow, &touched_ships).len();
        }

        self.state = TransactionState::Validating;
        Ok(shadow)
    }

    /// Runs the checker against the staged shadow.
    pub(crate) fn validate(
        &mut self,
        checker: &InvariantChecker,
        base: &Store,
        shadow: &Store,
    ) -> Vec<Violation> {
        debug_assert_eq!(self.state, TransactionState::Validating);
        let violations = checker.check_transition(base, shadow);
        if !violations.is_empty() {
            self.state = TransactionState::Rejected;
        }
        violations
    }

    pub(crate) fn commit(&mut self, id: CommitId) {
        debug_assert_eq!(self.state, TransactionState::Validating);
        self.state = TransactionState::Committed(id);
    }
}

fn structural(class: ViolationClass, target: EntityRef, message: &str) -> Violation {
    Violation::new(InvariantId::ReferentialIntegrity, class, target, message)
}

/// Records the ship a damage report belongs to.
fn note_report_ship(record: &Record, ships: &mut BTreeSet<EntityId>) {
    if record.kind() == EntityKind::DamageReport {
        if let Some(report) = DamageReport::downcast(record) {
            ships.insert(report.ship);
        }
    }
}
