//! Reading past states through the commit history

use flotilla::engine::{CommitId, Engine, EngineConfig, Intent};
use flotilla::foundation::{EntityId, EntityKind, Planet};

#[test]
fn snapshot_at_reads_retained_commits() {
    let engine = Engine::new(EngineConfig::default().with_history_size(3));
    for i in 1..=5 {
        engine
            .apply([Intent::insert(EntityId(i), Planet::new(format!("P{i}")))])
            .unwrap();
    }

    // Retains commits 3, 4, 5
    assert!(engine.snapshot_at(CommitId(2)).is_none());
    let third = engine.snapshot_at(CommitId(3)).unwrap();
    assert_eq!(third.commit(), CommitId(3));
    assert_eq!(third.store().len(EntityKind::Planet), 3);

    let ids: Vec<_> = engine.history().into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec![CommitId(3), CommitId(4), CommitId(5)]);
}

#[test]
fn summaries_count_intents() {
    let engine = Engine::default();
    engine
        .apply([
            Intent::insert(EntityId(1), Planet::new("Vega")),
            Intent::insert(EntityId(2), Planet::new("Altair")),
            Intent::update(EntityId(2), Planet::new("Altair Prime")),
            Intent::delete(EntityKind::Planet, EntityId(1)),
        ])
        .unwrap();

    let (_, summary) = *engine.history().last().unwrap();
    assert_eq!(summary.inserted, 2);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.deleted, 1);
    assert_eq!(summary.intents(), 4);
}
