//! Ship damage derived from damage report history.
//!
//! The latest report wins. Reports are ordered by `(date, report id)`, so two
//! reports filed on the same day resolve to the one with the larger id.

use std::collections::BTreeSet;

use flotilla_foundation::{DamageReport, EntityId, RefField, Spaceship};
use flotilla_storage::{Resolver, Store};
use tracing::debug;

/// Returns the reports filed against `ship`, oldest first.
#[must_use]
pub fn history(store: &Store, ship: EntityId) -> Vec<(EntityId, &DamageReport)> {
    let mut reports: Vec<_> = Resolver::new(store)
        .referrers_via(ship, RefField::DamageReportShip)
        .into_iter()
        .filter_map(|id| store.find_as::<DamageReport>(id).map(|r| (id, r)))
        .collect();
    reports.sort_by_key(|(id, r)| (r.date, *id));
    reports
}

/// Returns the most recent report filed against `ship`.
#[must_use]
pub fn latest(store: &Store, ship: EntityId) -> Option<(EntityId, &DamageReport)> {
    Resolver::new(store)
        .referrers_via(ship, RefField::DamageReportShip)
        .into_iter()
        .filter_map(|id| store.find_as::<DamageReport>(id).map(|r| (id, r)))
        .max_by_key(|(id, r)| (r.date, *id))
}

/// A ship whose damage was rewritten to match its history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Repair {
    /// The repaired ship.
    pub ship: EntityId,
    /// Damage before the repair.
    pub from: u32,
    /// Damage after the repair.
    pub to: u32,
}

/// Sets each listed ship's damage to its latest report.
///
/// Ships that no longer exist or have no reports are left alone.
pub(crate) fn reconcile(store: &mut Store, ships: &BTreeSet<EntityId>) -> Vec<Repair> {
    let mut repairs = Vec::new();
    for &id in ships {
        let Some(ship) = store.find_as::<Spaceship>(id) else {
            continue;
        };
        let Some((_, report)) = latest(store, id) else {
            continue;
        };
        if ship.damage == report.damage {
            continue;
        }
        let repair = Repair {
            ship: id,
            from: ship.damage,
            to: report.damage,
        };
        let mut updated = ship.clone();
        updated.damage = report.damage;
        store.put(id, updated);
        debug!(ship = %id, from = repair.from, to = repair.to, "derived damage from latest report");
        repairs.push(repair);
    }
    repairs
}
