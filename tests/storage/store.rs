//! Integration tests for the entity store
//!
//! Tests put/get/delete/scan semantics. The store performs no validation.

use flotilla_foundation::{EntityId, EntityKind, ErrorKind, Fleet, Planet, Spaceship};
use flotilla_storage::Store;

// =============================================================================
// Put and Get
// =============================================================================

#[test]
fn put_then_get() {
    let mut store = Store::new();
    store.put(EntityId(1), Planet::new("Vega"));

    let planet = store.get_as::<Planet>(EntityId(1)).unwrap();
    assert_eq!(planet.name, "Vega");
    assert_eq!(store.len(EntityKind::Planet), 1);
}

#[test]
fn ids_are_scoped_by_kind() {
    let mut store = Store::new();
    store.put(EntityId(1), Planet::new("Vega"));
    store.put(EntityId(1), Fleet::new("Home Guard", 2));

    assert!(store.contains(EntityKind::Planet, EntityId(1)));
    assert!(store.contains(EntityKind::Fleet, EntityId(1)));
    assert_eq!(store.total_len(), 2);
}

#[test]
fn get_missing_is_not_found() {
    let store = Store::new();
    let err = store.get(EntityKind::Captain, EntityId(4)).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn put_replaces_and_returns_previous() {
    let mut store = Store::new();
    assert!(store.put(EntityId(1), Planet::new("Vega")).is_none());

    let previous = store.put(EntityId(1), Planet::new("Vega Prime")).unwrap();
    assert_eq!(previous.kind(), EntityKind::Planet);
    assert_eq!(store.get_as::<Planet>(EntityId(1)).unwrap().name, "Vega Prime");
}

#[test]
fn store_does_not_validate() {
    let mut store = Store::new();
    // Dangling ship type and fleet are accepted as-is
    store.put(
        EntityId(1),
        Spaceship::new("Nomad", EntityId(42)).with_fleet(EntityId(43)),
    );
    assert!(store.contains(EntityKind::Spaceship, EntityId(1)));
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn delete_removes_record() {
    let mut store = Store::new();
    store.put(EntityId(1), Planet::new("Vega"));

    let removed = store.delete(EntityKind::Planet, EntityId(1)).unwrap();
    assert_eq!(removed.kind(), EntityKind::Planet);
    assert!(store.is_empty());
}

#[test]
fn delete_missing_is_not_found() {
    let mut store = Store::new();
    let err = store.delete(EntityKind::Planet, EntityId(1)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::NotFound(_)));
}

// =============================================================================
// Scan
// =============================================================================

#[test]
fn scan_is_in_insertion_order() {
    let mut store = Store::new();
    for (id, name) in [(5, "Deneb"), (2, "Altair"), (9, "Vega")] {
        store.put(EntityId(id), Planet::new(name));
    }

    let scan = store.scan(EntityKind::Planet);
    assert_eq!(scan.ids(), vec![EntityId(5), EntityId(2), EntityId(9)]);
}

#[test]
fn replacing_keeps_position() {
    let mut store = Store::new();
    store.put(EntityId(1), Planet::new("Vega"));
    store.put(EntityId(2), Planet::new("Altair"));
    store.put(EntityId(1), Planet::new("Vega Prime"));

    assert_eq!(
        store.scan(EntityKind::Planet).ids(),
        vec![EntityId(1), EntityId(2)]
    );
}

#[test]
fn scan_is_restartable() {
    let mut store = Store::new();
    store.put(EntityId(1), Planet::new("Vega"));
    store.put(EntityId(2), Planet::new("Altair"));

    let scan = store.scan(EntityKind::Planet);
    let first: Vec<_> = scan.iter().map(|(id, _)| id).collect();
    let second: Vec<_> = scan.iter().map(|(id, _)| id).collect();
    assert_eq!(first, second);
}

#[test]
fn iter_as_yields_typed_records() {
    let mut store = Store::new();
    store.put(EntityId(1), Fleet::new("Home Guard", 2));
    store.put(EntityId(2), Fleet::new("Vanguard", 5));

    let sizes: Vec<u32> = store.iter_as::<Fleet>().map(|(_, f)| f.max_size).collect();
    assert_eq!(sizes, vec![2, 5]);
}
