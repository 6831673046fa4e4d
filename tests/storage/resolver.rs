//! Integration tests for reference resolution
//!
//! Tests existence checks, reverse lookups, and index maintenance.

use flotilla_foundation::{
    Captain, EntityId, EntityKind, EntityRef, Fleet, Planet, RefField, ShipType, Spaceship,
};
use flotilla_storage::{Resolver, Store};

fn fleet_store() -> Store {
    let mut store = Store::new();
    store.put(EntityId(1), Planet::new("Vega"));
    store.put(EntityId(1), ShipType::new("Frigate"));
    store.put(EntityId(1), Fleet::new("Home Guard", 4).with_home_planet(EntityId(1)));
    store.put(EntityId(1), Captain::new("Reyes").with_home_planet(EntityId(1)));
    store.put(
        EntityId(1),
        Spaceship::new("Nomad", EntityId(1))
            .with_captain(EntityId(1))
            .with_fleet(EntityId(1)),
    );
    store.put(
        EntityId(2),
        Spaceship::new("Drifter", EntityId(1)).with_fleet(EntityId(1)),
    );
    store
}

#[test]
fn exists_checks_kind_and_id() {
    let store = fleet_store();
    let resolver = Resolver::new(&store);

    assert!(resolver.exists(EntityKind::Planet, EntityId(1)));
    assert!(!resolver.exists(EntityKind::Planet, EntityId(2)));
    assert!(!resolver.exists(EntityKind::Mission, EntityId(1)));
}

#[test]
fn referrers_lists_each_source_once() {
    let store = fleet_store();
    let resolver = Resolver::new(&store);

    let referrers = resolver.referrers(EntityKind::Planet, EntityId(1));
    assert_eq!(
        referrers,
        vec![
            EntityRef::new(EntityKind::Fleet, EntityId(1)),
            EntityRef::new(EntityKind::Captain, EntityId(1)),
        ]
    );
}

#[test]
fn referrers_via_filters_by_column() {
    let store = fleet_store();
    let resolver = Resolver::new(&store);

    assert_eq!(
        resolver.referrers_via(EntityId(1), RefField::SpaceshipFleet),
        vec![EntityId(1), EntityId(2)]
    );
    assert_eq!(resolver.count_via(EntityId(1), RefField::SpaceshipCaptain), 1);
    assert_eq!(resolver.count_via(EntityId(1), RefField::CaptainHomePlanet), 1);
}

#[test]
fn index_follows_updates() {
    let mut store = fleet_store();
    store.put(
        EntityId(2),
        Spaceship::new("Drifter", EntityId(1)),
    );

    let resolver = Resolver::new(&store);
    assert_eq!(
        resolver.referrers_via(EntityId(1), RefField::SpaceshipFleet),
        vec![EntityId(1)]
    );
}

#[test]
fn index_follows_deletes() {
    let mut store = fleet_store();
    store.delete(EntityKind::Spaceship, EntityId(1)).unwrap();
    store.delete(EntityKind::Spaceship, EntityId(2)).unwrap();

    let resolver = Resolver::new(&store);
    assert!(resolver.referrers(EntityKind::Fleet, EntityId(1)).is_empty());
    assert!(resolver.referrers(EntityKind::Captain, EntityId(1)).is_empty());
}

#[test]
fn dangling_references_are_reported() {
    let mut store = fleet_store();
    store.delete(EntityKind::Captain, EntityId(1)).unwrap();

    let resolver = Resolver::new(&store);
    let ship = store.get(EntityKind::Spaceship, EntityId(1)).unwrap();
    let dangling = resolver.dangling(ship);

    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].field, RefField::SpaceshipCaptain);
    assert!(resolver.resolve(&dangling[0]).is_none());
}
