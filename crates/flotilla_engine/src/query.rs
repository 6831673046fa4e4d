//! Read-only queries over a committed store.
//!
//! A [`View`] pins one snapshot. Every query on it sees the same state no
//! matter how many commits happen meanwhile. Results are owned copies.

use std::collections::HashSet;
use std::sync::Arc;

use flotilla_foundation::{
    BuildingOnPlanet, DamageReport, Entity, EntityId, EntityKind, EntityRef, Error,
    ErrorContext, Fleet, Mission, RefField, Record, Result, Spaceship,
};
use flotilla_storage::{Resolver, Scan, Store};

use crate::damage;
use crate::intent::CommitId;

/// A read-only snapshot of the store at one commit.
#[derive(Clone, Debug)]
pub struct View {
    commit: CommitId,
    store: Arc<Store>,
}

impl View {
    /// Creates a view over a committed store.
    #[must_use]
    pub fn new(commit: CommitId, store: Arc<Store>) -> Self {
        Self { commit, store }
    }

    /// Returns the commit this view reads.
    #[must_use]
    pub const fn commit(&self) -> CommitId {
        self.commit
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns a resolver over the underlying store.
    #[must_use]
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.store)
    }

    // =========================================================================
    // Point Lookups and Scans
    // =========================================================================

    /// Gets a copy of a record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such entity exists.
    pub fn get(&self, kind: EntityKind, id: EntityId) -> Result<Record> {
        self.store.get(kind, id).cloned()
    }

    /// Gets a copy of a typed record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no such entity exists.
    pub fn get_as<T: Entity>(&self, id: EntityId) -> Result<T> {
        self.store.get_as::<T>(id).cloned()
    }

    /// Returns every record of a kind in insertion order.
    #[must_use]
    pub fn scan(&self, kind: EntityKind) -> Scan {
        self.store.scan(kind)
    }

    // =========================================================================
    // Fleet Queries
    // =========================================================================

    /// Returns the ships assigned to a fleet, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the fleet does not exist.
    pub fn ships_in_fleet(&self, fleet: EntityId) -> Result<Vec<(EntityId, Spaceship)>> {
        self.require::<Fleet>(fleet, "ships_in_fleet")?;
        Ok(self
            .store
            .iter_as::<Spaceship>()
            .filter(|(_, ship)| ship.fleet == Some(fleet))
            .map(|(id, ship)| (id, ship.clone()))
            .collect())
    }

    /// Returns the number of ships assigned to a fleet.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the fleet does not exist.
    pub fn fleet_member_count(&self, fleet: EntityId) -> Result<usize> {
        self.require::<Fleet>(fleet, "fleet_member_count")?;
        Ok(self.resolver().count_via(fleet, RefField::SpaceshipFleet))
    }

    /// Returns the missions of a fleet that have no completion date.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the fleet does not exist.
    pub fn active_missions_for_fleet(&self, fleet: EntityId) -> Result<Vec<(EntityId, Mission)>> {
        self.require::<Fleet>(fleet, "active_missions_for_fleet")?;
        Ok(self
            .store
            .iter_as::<Mission>()
            .filter(|(_, mission)| mission.fleet == fleet && mission.is_active())
            .map(|(id, mission)| (id, mission.clone()))
            .collect())
    }

    /// Returns the fleets whose home planet is `planet`.
    #[must_use]
    pub fn fleets_homed_at(&self, planet: EntityId) -> Vec<(EntityId, Fleet)> {
        self.resolver()
            .referrers_via(planet, RefField::FleetHomePlanet)
            .into_iter()
            .filter_map(|id| self.store.find_as::<Fleet>(id).map(|f| (id, f.clone())))
            .collect()
    }

    // =========================================================================
    // Mission Chains
    // =========================================================================

    /// Follows successor links from `start` to the terminal mission.
    ///
    /// The result starts with `start` and ends with the first mission that
    /// has no successor.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `start` or any successor is missing, and
    /// `CyclicChain` if a mission repeats.
    pub fn mission_chain(&self, start: EntityId) -> Result<Vec<(EntityId, Mission)>> {
        let context = || {
            ErrorContext::new()
                .with_operation("mission_chain")
                .with_origin(EntityRef::new(EntityKind::Mission, start))
        };

        // Each step visits a new, existing mission, so the walk is bounded
        // by the mission count.
        let mut seen = HashSet::with_capacity(self.store.len(EntityKind::Mission));
        let mut chain = Vec::new();
        let mut cursor = Some(start);

        while let Some(id) = cursor {
            if !seen.insert(id) {
                return Err(Error::cyclic_chain(id).with_context(context()));
            }
            let mission = self
                .store
                .get_as::<Mission>(id)
                .map_err(|e| e.with_context(context()))?;
            cursor = mission.successor;
            chain.push((id, mission.clone()));
        }

        Ok(chain)
    }

    // =========================================================================
    // Damage and Buildings
    // =========================================================================

    /// Returns the damage reports filed against a ship, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the ship does not exist.
    pub fn damage_history(&self, ship: EntityId) -> Result<Vec<(EntityId, DamageReport)>> {
        self.require::<Spaceship>(ship, "damage_history")?;
        Ok(damage::history(&self.store, ship)
            .into_iter()
            .map(|(id, report)| (id, report.clone()))
            .collect())
    }

    /// Returns the buildings placed on a planet.
    #[must_use]
    pub fn buildings_on_planet(&self, planet: EntityId) -> Vec<(EntityId, BuildingOnPlanet)> {
        self.resolver()
            .referrers_via(planet, RefField::BuildingOnPlanetPlanet)
            .into_iter()
            .filter_map(|id| {
                self.store
                    .find_as::<BuildingOnPlanet>(id)
                    .map(|b| (id, b.clone()))
            })
            .collect()
    }

    fn require<T: Entity>(&self, id: EntityId, operation: &str) -> Result<&T> {
        self.store
            .get_as::<T>(id)
            .map_err(|e| e.with_context(ErrorContext::new().with_operation(operation)))
    }
}
