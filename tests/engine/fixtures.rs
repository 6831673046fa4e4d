//! Shared fixtures for engine tests.

use chrono::NaiveDate;
use flotilla_engine::{Dataset, Engine, EngineConfig};
use flotilla_foundation::{
    Captain, EntityId, Fleet, Logbook, MissionType, Planet, ShipType, Spaceship,
};

pub fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

/// Planet 1, ship type 1, mission type 1, captain 1, fleets 1 (max 2) and
/// 2 (max 5), ships 1 and 2 in fleet 1, logbook 1 for ship 1.
pub fn base_dataset() -> Dataset {
    Dataset::new()
        .with(EntityId(1), Planet::new("Vega"))
        .with(EntityId(1), ShipType::new("Frigate"))
        .with(EntityId(1), MissionType::new("Patrol", "Routine patrol"))
        .with(EntityId(1), Captain::new("Reyes").with_home_planet(EntityId(1)))
        .with(EntityId(1), Fleet::new("Home Guard", 2).with_home_planet(EntityId(1)))
        .with(EntityId(2), Fleet::new("Vanguard", 5))
        .with(
            EntityId(1),
            Spaceship::new("Nomad", EntityId(1))
                .with_captain(EntityId(1))
                .with_fleet(EntityId(1)),
        )
        .with(
            EntityId(2),
            Spaceship::new("Drifter", EntityId(1)).with_fleet(EntityId(1)),
        )
        .with(EntityId(1), Logbook::new(EntityId(1)))
}

pub fn base_engine() -> Engine {
    Engine::load(base_dataset(), EngineConfig::default()).unwrap()
}
