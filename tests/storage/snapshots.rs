//! Integration tests for snapshot isolation
//!
//! Clones of a store are independent snapshots; scans never see later writes.

use flotilla_foundation::{EntityId, EntityKind, Planet};
use flotilla_storage::Store;
use proptest::prelude::*;

#[test]
fn scan_ignores_later_writes() {
    let mut store = Store::new();
    store.put(EntityId(1), Planet::new("Vega"));

    let scan = store.scan(EntityKind::Planet);
    store.put(EntityId(2), Planet::new("Altair"));
    store.delete(EntityKind::Planet, EntityId(1)).unwrap();

    assert_eq!(scan.ids(), vec![EntityId(1)]);
    assert_eq!(store.scan(EntityKind::Planet).ids(), vec![EntityId(2)]);
}

#[test]
fn clone_is_isolated() {
    let mut live = Store::new();
    live.put(EntityId(1), Planet::new("Vega"));

    let mut shadow = live.clone();
    shadow.put(EntityId(1), Planet::new("Vega Prime"));
    shadow.put(EntityId(2), Planet::new("Altair"));

    assert_eq!(live.get_as::<Planet>(EntityId(1)).unwrap().name, "Vega");
    assert_eq!(live.len(EntityKind::Planet), 1);
    assert_ne!(live, shadow);
}

proptest! {
    #[test]
    fn mutating_a_clone_never_changes_the_original(
        ids in prop::collection::vec(0u64..32, 1..24),
        deletes in prop::collection::vec(0u64..32, 0..8),
    ) {
        let mut live = Store::new();
        for id in &ids {
            live.put(EntityId(*id), Planet::new(format!("P{id}")));
        }
        let before = live.clone();

        let mut shadow = live.clone();
        for id in &deletes {
            let _ = shadow.delete(EntityKind::Planet, EntityId(*id));
        }
        shadow.put(EntityId(100), Planet::new("Extra"));

        prop_assert_eq!(&live, &before);
    }
}
