//! Integration tests for the invariant set
//!
//! Each invariant is exercised through `Engine::apply`, so the tests see
//! exactly what a caller sees: a commit or a structured rejection.

use flotilla_engine::{Intent, InvariantChecker};
use flotilla_foundation::{
    EntityId, EntityKind, EntityRef, Fleet, InvariantId, Logbook, Mission, Planet, ShipType,
    ShipyardEntry, Spaceship, ViolationClass,
};
use flotilla_storage::Store;

use crate::fixtures::{base_engine, date};

// =============================================================================
// 1. Referential Integrity
// =============================================================================

#[test]
fn insert_with_dangling_reference_is_rejected() {
    let engine = base_engine();
    let rejection = engine
        .apply([Intent::insert(
            EntityId(3),
            Spaceship::new("Ghost", EntityId(9)),
        )])
        .unwrap_err();

    let violation = &rejection.violations()[0];
    assert_eq!(violation.invariant, InvariantId::ReferentialIntegrity);
    assert_eq!(violation.class, ViolationClass::NotFound);
    assert_eq!(
        violation.entity,
        EntityRef::new(EntityKind::Spaceship, EntityId(3))
    );
}

#[test]
fn delete_of_referenced_entity_is_a_conflict() {
    let engine = base_engine();
    let rejection = engine
        .apply([Intent::delete(EntityKind::Captain, EntityId(1))])
        .unwrap_err();

    assert_eq!(rejection.violations().len(), 1);
    let violation = &rejection.violations()[0];
    assert_eq!(violation.class, ViolationClass::ReferentialConflict);
    assert_eq!(
        violation.entity,
        EntityRef::new(EntityKind::Captain, EntityId(1))
    );
    assert!(violation.message.contains("spaceship#1"));
}

#[test]
fn delete_with_referrer_removed_in_same_transaction() {
    let engine = base_engine();
    engine
        .apply([
            Intent::update(
                EntityId(1),
                Spaceship::new("Nomad", EntityId(1)).with_fleet(EntityId(1)),
            ),
            Intent::delete(EntityKind::Captain, EntityId(1)),
        ])
        .unwrap();

    assert!(
        !engine
            .snapshot()
            .contains(EntityKind::Captain, EntityId(1))
    );
}

#[test]
fn references_are_kind_checked() {
    let engine = base_engine();
    // Fleet 2 exists, but there is no ship type 2
    let rejection = engine
        .apply([Intent::insert(
            EntityId(3),
            Spaceship::new("Mixup", EntityId(2)).with_fleet(EntityId(2)),
        )])
        .unwrap_err();

    assert!(rejection.has_class(ViolationClass::NotFound));
}

// =============================================================================
// 2. Fleet Capacity
// =============================================================================

#[test]
fn moving_a_ship_into_a_full_fleet_is_rejected() {
    let engine = base_engine();
    engine
        .apply([Intent::insert(
            EntityId(3),
            Spaceship::new("Warden", EntityId(1)).with_fleet(EntityId(2)),
        )])
        .unwrap();

    let rejection = engine
        .apply([Intent::update(
            EntityId(3),
            Spaceship::new("Warden", EntityId(1)).with_fleet(EntityId(1)),
        )])
        .unwrap_err();

    let violation = &rejection.violations()[0];
    assert_eq!(violation.class, ViolationClass::CardinalityExceeded);
    assert_eq!(violation.entity, EntityRef::new(EntityKind::Fleet, EntityId(1)));
    assert_eq!(violation.message, "3 spaceships assigned, max_size is 2");
}

#[test]
fn shrinking_max_size_below_members_is_rejected() {
    let engine = base_engine();
    let rejection = engine
        .apply([Intent::update(
            EntityId(1),
            Fleet::new("Home Guard", 1).with_home_planet(EntityId(1)),
        )])
        .unwrap_err();

    assert!(rejection.has_invariant(InvariantId::FleetCapacity));
}

#[test]
fn swap_within_one_transaction_is_allowed() {
    let engine = base_engine();
    engine
        .apply([
            Intent::update(
                EntityId(2),
                Spaceship::new("Drifter", EntityId(1)).with_fleet(EntityId(2)),
            ),
            Intent::insert(
                EntityId(3),
                Spaceship::new("Warden", EntityId(1)).with_fleet(EntityId(1)),
            ),
        ])
        .unwrap();

    assert_eq!(engine.view().fleet_member_count(EntityId(1)).unwrap(), 2);
}

// =============================================================================
// 3. Acyclic Succession
// =============================================================================

fn mission(name: &str, day: u32) -> Mission {
    Mission::new(name, date(1, day), EntityId(1), EntityId(1))
}

#[test]
fn linking_a_chain_into_a_cycle_is_rejected() {
    let engine = base_engine();
    engine
        .apply([
            Intent::insert(EntityId(3), mission("C", 3)),
            Intent::insert(EntityId(2), mission("B", 2).with_successor(EntityId(3))),
            Intent::insert(EntityId(1), mission("A", 1).with_successor(EntityId(2))),
        ])
        .unwrap();

    let rejection = engine
        .apply([Intent::update(
            EntityId(3),
            mission("C", 3).with_successor(EntityId(1)),
        )])
        .unwrap_err();

    let cycles: Vec<_> = rejection
        .violations()
        .iter()
        .filter(|v| v.class == ViolationClass::CyclicChain)
        .collect();
    assert_eq!(cycles.len(), 1);
    assert!(cycles[0].message.contains("3 mission(s)"));
}

#[test]
fn self_successor_is_a_cycle() {
    let engine = base_engine();
    let rejection = engine
        .apply([Intent::insert(
            EntityId(1),
            mission("Loop", 1).with_successor(EntityId(1)),
        )])
        .unwrap_err();

    let violation = &rejection.violations()[0];
    assert_eq!(violation.class, ViolationClass::CyclicChain);
    assert_eq!(violation.entity, EntityRef::new(EntityKind::Mission, EntityId(1)));
}

#[test]
fn converging_chains_are_not_cycles() {
    let engine = base_engine();
    engine
        .apply([
            Intent::insert(EntityId(3), mission("End", 3)),
            Intent::insert(EntityId(1), mission("Left", 1).with_successor(EntityId(3))),
            Intent::insert(EntityId(2), mission("Right", 2).with_successor(EntityId(3))),
        ])
        .unwrap();
    assert!(engine.verify().is_empty());
}

// =============================================================================
// 4-5. Monotonicity
// =============================================================================

#[test]
fn completing_a_mission_is_allowed_once() {
    let engine = base_engine();
    engine
        .apply([Intent::insert(EntityId(1), mission("Sweep", 1))])
        .unwrap();
    engine
        .apply([Intent::update(
            EntityId(1),
            mission("Sweep", 1).completed_on(date(2, 1)),
        )])
        .unwrap();

    let cleared = engine
        .apply([Intent::update(EntityId(1), mission("Sweep", 1))])
        .unwrap_err();
    assert!(cleared.has_class(ViolationClass::MonotonicityViolation));

    let moved = engine
        .apply([Intent::update(
            EntityId(1),
            mission("Sweep", 1).completed_on(date(3, 1)),
        )])
        .unwrap_err();
    assert!(moved.has_invariant(InvariantId::CompletionMonotonic));
}

#[test]
fn delete_and_reinsert_cannot_reset_completion() {
    let engine = base_engine();
    engine
        .apply([Intent::insert(
            EntityId(1),
            mission("Sweep", 1).completed_on(date(2, 1)),
        )])
        .unwrap();

    let rejection = engine
        .apply([
            Intent::delete(EntityKind::Mission, EntityId(1)),
            Intent::insert(EntityId(1), mission("Sweep", 1)),
        ])
        .unwrap_err();
    assert!(rejection.has_class(ViolationClass::MonotonicityViolation));
}

#[test]
fn completed_mission_can_be_deleted() {
    let engine = base_engine();
    engine
        .apply([Intent::insert(
            EntityId(1),
            mission("Sweep", 1).completed_on(date(2, 1)),
        )])
        .unwrap();
    engine
        .apply([Intent::delete(EntityKind::Mission, EntityId(1))])
        .unwrap();
}

#[test]
fn unarchiving_a_logbook_is_rejected() {
    let engine = base_engine();
    engine
        .apply([Intent::update(EntityId(1), Logbook::new(EntityId(1)).archive())])
        .unwrap();

    let rejection = engine
        .apply([Intent::update(EntityId(1), Logbook::new(EntityId(1)))])
        .unwrap_err();

    let violation = &rejection.violations()[0];
    assert_eq!(violation.invariant, InvariantId::ArchiveMonotonic);
    assert_eq!(violation.class, ViolationClass::MonotonicityViolation);
}

// =============================================================================
// 7. Unique Fleet Names
// =============================================================================

#[test]
fn duplicate_fleet_name_is_rejected() {
    let engine = base_engine();
    let rejection = engine
        .apply([Intent::insert(EntityId(3), Fleet::new("Vanguard", 1))])
        .unwrap_err();

    let violation = &rejection.violations()[0];
    assert_eq!(violation.class, ViolationClass::DuplicateKey);
    assert_eq!(violation.entity, EntityRef::new(EntityKind::Fleet, EntityId(3)));
}

#[test]
fn renaming_frees_the_old_name() {
    let engine = base_engine();
    engine
        .apply([
            Intent::update(EntityId(2), Fleet::new("Rearguard", 5)),
            Intent::insert(EntityId(3), Fleet::new("Vanguard", 1)),
        ])
        .unwrap();
}

// =============================================================================
// 8. Shipyard Exclusion
// =============================================================================

#[test]
fn ship_in_shipyard_cannot_serve_in_a_fleet() {
    let engine = base_engine();
    let rejection = engine
        .apply([Intent::insert(
            EntityId(1),
            ShipyardEntry::new(EntityId(2), "Drifter refit", EntityId(1)),
        )])
        .unwrap_err();

    let violation = &rejection.violations()[0];
    assert_eq!(violation.class, ViolationClass::ExclusiveState);
    assert_eq!(
        violation.entity,
        EntityRef::new(EntityKind::Spaceship, EntityId(2))
    );
}

#[test]
fn shipyard_entry_for_unbuilt_ship_is_fine() {
    let engine = base_engine();
    engine
        .apply([Intent::insert(
            EntityId(1),
            ShipyardEntry::new(EntityId(40), "Keel 40", EntityId(1)),
        )])
        .unwrap();
}

// =============================================================================
// Checker
// =============================================================================

#[test]
fn checker_reports_everything_in_one_pass() {
    let mut store = Store::new();
    store.put(EntityId(1), ShipType::new("Frigate"));
    store.put(EntityId(1), Fleet::new("Twin", 0));
    store.put(EntityId(2), Fleet::new("Twin", 0).with_home_planet(EntityId(9)));
    store.put(
        EntityId(1),
        Spaceship::new("Nomad", EntityId(1)).with_fleet(EntityId(1)),
    );
    store.put(EntityId(1), Planet::new("Vega"));

    let violations = InvariantChecker::new().check(&store);
    let invariants: Vec<_> = violations.iter().map(|v| v.invariant).collect();

    assert_eq!(
        invariants,
        vec![
            InvariantId::ReferentialIntegrity,
            InvariantId::FleetCapacity,
            InvariantId::UniqueFleetName
        ]
    );
}

#[test]
fn checker_enforces_all_eight() {
    let ids: Vec<_> = InvariantChecker::new().invariants().collect();
    assert_eq!(ids, InvariantId::ALL.to_vec());
}
