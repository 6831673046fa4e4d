//! Typed foreign-key style references between entities.

use std::fmt;

use crate::entity::{EntityKind, EntityRef};

/// A reference column on some entity kind.
///
/// Each column knows which kind holds it and which kind it points at, so
/// a reference can never silently target the wrong table.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum RefField {
    /// `Fleet.homePlanet` → Planet
    FleetHomePlanet,
    /// `Captain.homePlanet` → Planet
    CaptainHomePlanet,
    /// `Spaceship.shipType` → ShipType
    SpaceshipShipType,
    /// `Spaceship.captain` → Captain
    SpaceshipCaptain,
    /// `Spaceship.fleet` → Fleet
    SpaceshipFleet,
    /// `ShipyardEntry.shipType` → ShipType
    ShipyardShipType,
    /// `DamageReport.ship` → Spaceship
    DamageReportShip,
    /// `Logbook.ship` → Spaceship
    LogbookShip,
    /// `BuildingOnPlanet.building` → Building
    BuildingOnPlanetBuilding,
    /// `BuildingOnPlanet.planet` → Planet
    BuildingOnPlanetPlanet,
    /// `Mission.successor` → Mission
    MissionSuccessor,
    /// `Mission.missionType` → MissionType
    MissionMissionType,
    /// `Mission.fleet` → Fleet
    MissionFleet,
}

impl RefField {
    /// All reference columns.
    pub const ALL: [RefField; 13] = [
        Self::FleetHomePlanet,
        Self::CaptainHomePlanet,
        Self::SpaceshipShipType,
        Self::SpaceshipCaptain,
        Self::SpaceshipFleet,
        Self::ShipyardShipType,
        Self::DamageReportShip,
        Self::LogbookShip,
        Self::BuildingOnPlanetBuilding,
        Self::BuildingOnPlanetPlanet,
        Self::MissionSuccessor,
        Self::MissionMissionType,
        Self::MissionFleet,
    ];

    /// The kind that holds this column.
    #[must_use]
    pub const fn source_kind(self) -> EntityKind {
        match self {
            Self::FleetHomePlanet => EntityKind::Fleet,
            Self::CaptainHomePlanet => EntityKind::Captain,
            Self::SpaceshipShipType | Self::SpaceshipCaptain | Self::SpaceshipFleet => {
                EntityKind::Spaceship
            }
            Self::ShipyardShipType => EntityKind::ShipyardEntry,
            Self::DamageReportShip => EntityKind::DamageReport,
            Self::LogbookShip => EntityKind::Logbook,
            Self::BuildingOnPlanetBuilding | Self::BuildingOnPlanetPlanet => {
                EntityKind::BuildingOnPlanet
            }
            Self::MissionSuccessor | Self::MissionMissionType | Self::MissionFleet => {
                EntityKind::Mission
            }
        }
    }

    /// The kind this column points at.
    #[must_use]
    pub const fn target_kind(self) -> EntityKind {
        match self {
            Self::FleetHomePlanet | Self::CaptainHomePlanet | Self::BuildingOnPlanetPlanet => {
                EntityKind::Planet
            }
            Self::SpaceshipShipType | Self::ShipyardShipType => EntityKind::ShipType,
            Self::SpaceshipCaptain => EntityKind::Captain,
            Self::SpaceshipFleet | Self::MissionFleet => EntityKind::Fleet,
            Self::DamageReportShip | Self::LogbookShip => EntityKind::Spaceship,
            Self::BuildingOnPlanetBuilding => EntityKind::Building,
            Self::MissionSuccessor => EntityKind::Mission,
            Self::MissionMissionType => EntityKind::MissionType,
        }
    }

    /// The column name, as `kind.column`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FleetHomePlanet => "fleet.home_planet",
            Self::CaptainHomePlanet => "captain.home_planet",
            Self::SpaceshipShipType => "spaceship.ship_type",
            Self::SpaceshipCaptain => "spaceship.captain",
            Self::SpaceshipFleet => "spaceship.fleet",
            Self::ShipyardShipType => "shipyard-entry.ship_type",
            Self::DamageReportShip => "damage-report.ship",
            Self::LogbookShip => "logbook.ship",
            Self::BuildingOnPlanetBuilding => "building-on-planet.building",
            Self::BuildingOnPlanetPlanet => "building-on-planet.planet",
            Self::MissionSuccessor => "mission.successor",
            Self::MissionMissionType => "mission.mission_type",
            Self::MissionFleet => "mission.fleet",
        }
    }
}

impl fmt::Display for RefField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single non-null reference held by a record.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Reference {
    /// The column holding the reference.
    pub field: RefField,
    /// The referenced entity.
    pub target: EntityRef,
}

impl Reference {
    /// Creates a reference through `field` to the entity with raw id `target`.
    #[must_use]
    pub fn new(field: RefField, target: crate::EntityId) -> Self {
        Self {
            field,
            target: EntityRef::new(field.target_kind(), target),
        }
    }
}
