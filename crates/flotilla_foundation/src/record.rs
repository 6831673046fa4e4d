//! Entity records for the fleet domain.
//!
//! Every record is a plain value type. References to other entities are
//! stored as bare [`EntityId`]s; the column (see [`RefField`]) determines the
//! target kind.

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, EntityKind};
use crate::reference::{RefField, Reference};

/// Typed access to one variant of [`Record`].
pub trait Entity: Clone + Into<Record> {
    /// The kind this record type is stored under.
    const KIND: EntityKind;

    /// Borrows the typed record out of a [`Record`], if the variant matches.
    fn downcast(record: &Record) -> Option<&Self>;

    /// Returns the non-null references this record holds.
    fn references(&self) -> Vec<Reference>;
}

macro_rules! records {
    ($($(#[$meta:meta])* $kind:ident($ty:ident)),* $(,)?) => {
        /// A record of any entity kind.
        #[derive(Clone, Debug, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub enum Record {
            $($(#[$meta])* $kind($ty),)*
        }

        impl Record {
            /// Returns the kind of this record.
            #[must_use]
            pub fn kind(&self) -> EntityKind {
                match self {
                    $(Self::$kind(_) => EntityKind::$kind,)*
                }
            }

            /// Returns the non-null references this record holds.
            #[must_use]
            pub fn references(&self) -> Vec<Reference> {
                match self {
                    $(Self::$kind(r) => r.references(),)*
                }
            }
        }

        $(
            impl From<$ty> for Record {
                fn from(record: $ty) -> Self {
                    Self::$kind(record)
                }
            }
        )*
    };
}

records! {
    /// A planet.
    Planet(Planet),
    /// A fleet.
    Fleet(Fleet),
    /// A ship type.
    ShipType(ShipType),
    /// A captain.
    Captain(Captain),
    /// A ship in service.
    Spaceship(Spaceship),
    /// A ship under construction.
    ShipyardEntry(ShipyardEntry),
    /// A damage report.
    DamageReport(DamageReport),
    /// A logbook.
    Logbook(Logbook),
    /// A mission type.
    MissionType(MissionType),
    /// A building.
    Building(Building),
    /// A building on a planet.
    BuildingOnPlanet(BuildingOnPlanet),
    /// A mission.
    Mission(Mission),
}

macro_rules! entity_impl {
    ($ty:ident, $kind:ident, |$this:ident| $refs:expr) => {
        impl Entity for $ty {
            const KIND: EntityKind = EntityKind::$kind;

            fn downcast(record: &Record) -> Option<&Self> {
                match record {
                    Record::$kind(r) => Some(r),
                    _ => None,
                }
            }

            fn references(&self) -> Vec<Reference> {
                let $this = self;
                $refs
            }
        }
    };
}

/// Collects the set fields of `(field, Option<id>)` pairs into references.
fn collect_refs<const N: usize>(fields: [(RefField, Option<EntityId>); N]) -> Vec<Reference> {
    fields
        .into_iter()
        .filter_map(|(field, id)| id.map(|id| Reference::new(field, id)))
        .collect()
}

// =============================================================================
// Planet
// =============================================================================

/// A planet with coordinates and resource stockpiles.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Planet {
    /// Planet name.
    pub name: String,
    /// Number of inhabitants.
    pub population: u64,
    /// Galaxy coordinate.
    pub galaxy: u32,
    /// System coordinate within the galaxy.
    pub system: u32,
    /// Orbital position within the system.
    pub position: u32,
    /// Metal stockpile.
    pub metal: u64,
    /// Crystal stockpile.
    pub crystal: u64,
    /// Dark-matter stockpile.
    pub dark_matter: u64,
}

impl Planet {
    /// Creates an uninhabited planet at the origin with empty stockpiles.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            population: 0,
            galaxy: 0,
            system: 0,
            position: 0,
            metal: 0,
            crystal: 0,
            dark_matter: 0,
        }
    }

    /// Builder method to set the population.
    #[must_use]
    pub fn with_population(mut self, population: u64) -> Self {
        self.population = population;
        self
    }

    /// Builder method to set galaxy, system, and position.
    #[must_use]
    pub fn with_coordinates(mut self, galaxy: u32, system: u32, position: u32) -> Self {
        self.galaxy = galaxy;
        self.system = system;
        self.position = position;
        self
    }

    /// Builder method to set metal, crystal, and dark-matter stockpiles.
    #[must_use]
    pub fn with_resources(mut self, metal: u64, crystal: u64, dark_matter: u64) -> Self {
        self.metal = metal;
        self.crystal = crystal;
        self.dark_matter = dark_matter;
        self
    }
}

entity_impl!(Planet, Planet, |_p| Vec::new());

// =============================================================================
// Fleet
// =============================================================================

/// A fleet. Names are unique across all fleets.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fleet {
    /// Fleet name.
    pub name: String,
    /// Maximum number of spaceships assigned to this fleet.
    pub max_size: u32,
    /// Home planet.
    pub home_planet: Option<EntityId>,
}

impl Fleet {
    /// Creates a fleet with no home planet.
    #[must_use]
    pub fn new(name: impl Into<String>, max_size: u32) -> Self {
        Self {
            name: name.into(),
            max_size,
            home_planet: None,
        }
    }

    /// Builder method to set the home planet.
    #[must_use]
    pub fn with_home_planet(mut self, planet: EntityId) -> Self {
        self.home_planet = Some(planet);
        self
    }
}

entity_impl!(Fleet, Fleet, |f| collect_refs([(
    RefField::FleetHomePlanet,
    f.home_planet
)]));

// =============================================================================
// ShipType
// =============================================================================

/// A class of ship.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShipType {
    /// Type designation, e.g. "Frigate".
    pub designation: String,
    /// Crew complement.
    pub crew: u32,
    /// Hull size.
    pub size: u32,
    /// Number of weapons.
    pub weapons: u32,
    /// Shield strength.
    pub shield: u32,
    /// Cargo capacity.
    pub cargo: u32,
    /// Speed.
    pub speed: u32,
}

impl ShipType {
    /// Creates a ship type with all stats zeroed.
    #[must_use]
    pub fn new(designation: impl Into<String>) -> Self {
        Self {
            designation: designation.into(),
            crew: 0,
            size: 0,
            weapons: 0,
            shield: 0,
            cargo: 0,
            speed: 0,
        }
    }

    /// Builder method to set crew and hull size.
    #[must_use]
    pub fn with_hull(mut self, crew: u32, size: u32) -> Self {
        self.crew = crew;
        self.size = size;
        self
    }

    /// Builder method to set weapon count and shield strength.
    #[must_use]
    pub fn with_armament(mut self, weapons: u32, shield: u32) -> Self {
        self.weapons = weapons;
        self.shield = shield;
        self
    }

    /// Builder method to set cargo capacity and speed.
    #[must_use]
    pub fn with_logistics(mut self, cargo: u32, speed: u32) -> Self {
        self.cargo = cargo;
        self.speed = speed;
        self
    }
}

entity_impl!(ShipType, ShipType, |_t| Vec::new());

// =============================================================================
// Captain
// =============================================================================

/// A ship captain.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Captain {
    /// Captain name.
    pub name: String,
    /// Home planet as free text, independent of `home_planet`.
    pub home_planet_name: String,
    /// Salary.
    pub salary: u32,
    /// Years of service.
    pub years_of_service: u32,
    /// Home planet reference.
    pub home_planet: Option<EntityId>,
}

impl Captain {
    /// Creates a captain with no recorded home planet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            home_planet_name: String::new(),
            salary: 0,
            years_of_service: 0,
            home_planet: None,
        }
    }

    /// Builder method to set salary and years of service.
    #[must_use]
    pub fn with_service(mut self, salary: u32, years: u32) -> Self {
        self.salary = salary;
        self.years_of_service = years;
        self
    }

    /// Builder method to set the free-text home planet name.
    #[must_use]
    pub fn with_home_planet_name(mut self, name: impl Into<String>) -> Self {
        self.home_planet_name = name.into();
        self
    }

    /// Builder method to set the home planet reference.
    #[must_use]
    pub fn with_home_planet(mut self, planet: EntityId) -> Self {
        self.home_planet = Some(planet);
        self
    }
}

entity_impl!(Captain, Captain, |c| collect_refs([(
    RefField::CaptainHomePlanet,
    c.home_planet
)]));

// =============================================================================
// Spaceship
// =============================================================================

/// A ship in active service.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spaceship {
    /// Ship name.
    pub name: String,
    /// Current damage level; mirrors the latest damage report, if any.
    pub damage: u32,
    /// Whether the ship is active.
    pub active: bool,
    /// Ship type.
    pub ship_type: EntityId,
    /// Commanding captain.
    pub captain: Option<EntityId>,
    /// Assigned fleet.
    pub fleet: Option<EntityId>,
}

impl Spaceship {
    /// Creates an active, undamaged ship with no captain and no fleet.
    #[must_use]
    pub fn new(name: impl Into<String>, ship_type: EntityId) -> Self {
        Self {
            name: name.into(),
            damage: 0,
            active: true,
            ship_type,
            captain: None,
            fleet: None,
        }
    }

    /// Builder method to set the damage level.
    #[must_use]
    pub fn with_damage(mut self, damage: u32) -> Self {
        self.damage = damage;
        self
    }

    /// Builder method to set the active flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Builder method to set the captain.
    #[must_use]
    pub fn with_captain(mut self, captain: EntityId) -> Self {
        self.captain = Some(captain);
        self
    }

    /// Builder method to set the fleet.
    #[must_use]
    pub fn with_fleet(mut self, fleet: EntityId) -> Self {
        self.fleet = Some(fleet);
        self
    }
}

entity_impl!(Spaceship, Spaceship, |s| collect_refs([
    (RefField::SpaceshipShipType, Some(s.ship_type)),
    (RefField::SpaceshipCaptain, s.captain),
    (RefField::SpaceshipFleet, s.fleet),
]));

// =============================================================================
// ShipyardEntry
// =============================================================================

/// A ship under construction.
///
/// `ship` is the identifier the ship will carry once commissioned. It is an
/// identifier, not a reference: the ship need not exist yet.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShipyardEntry {
    /// Identifier of the ship being built.
    pub ship: EntityId,
    /// Ship name.
    pub name: String,
    /// Ship type.
    pub ship_type: EntityId,
}

impl ShipyardEntry {
    /// Creates a shipyard entry.
    #[must_use]
    pub fn new(ship: EntityId, name: impl Into<String>, ship_type: EntityId) -> Self {
        Self {
            ship,
            name: name.into(),
            ship_type,
        }
    }
}

entity_impl!(ShipyardEntry, ShipyardEntry, |e| collect_refs([(
    RefField::ShipyardShipType,
    Some(e.ship_type)
)]));

// =============================================================================
// DamageReport
// =============================================================================

/// One entry in a ship's damage history.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DamageReport {
    /// The damaged ship.
    pub ship: EntityId,
    /// Date of the report.
    pub date: NaiveDate,
    /// Damage level recorded.
    pub damage: u32,
}

impl DamageReport {
    /// Creates a damage report.
    #[must_use]
    pub fn new(ship: EntityId, date: NaiveDate, damage: u32) -> Self {
        Self { ship, date, damage }
    }
}

entity_impl!(DamageReport, DamageReport, |d| collect_refs([(
    RefField::DamageReportShip,
    Some(d.ship)
)]));

// =============================================================================
// Logbook
// =============================================================================

/// A ship's logbook. Once archived, it stays archived.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Logbook {
    /// The ship this logbook belongs to.
    pub ship: EntityId,
    /// Whether the logbook is archived.
    pub archived: bool,
}

impl Logbook {
    /// Creates an open logbook.
    #[must_use]
    pub fn new(ship: EntityId) -> Self {
        Self {
            ship,
            archived: false,
        }
    }

    /// Returns an archived copy of this logbook.
    #[must_use]
    pub fn archive(mut self) -> Self {
        self.archived = true;
        self
    }
}

entity_impl!(Logbook, Logbook, |l| collect_refs([(
    RefField::LogbookShip,
    Some(l.ship)
)]));

// =============================================================================
// MissionType
// =============================================================================

/// A category of mission.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MissionType {
    /// Designation, e.g. "Escort".
    pub designation: String,
    /// Description.
    pub description: String,
}

impl MissionType {
    /// Creates a mission type.
    #[must_use]
    pub fn new(designation: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            designation: designation.into(),
            description: description.into(),
        }
    }
}

entity_impl!(MissionType, MissionType, |_t| Vec::new());

// =============================================================================
// Building
// =============================================================================

/// A kind of building and its construction cost.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Building {
    /// Building name.
    pub name: String,
    /// Crystal cost.
    pub crystal_cost: u64,
    /// Metal cost.
    pub metal_cost: u64,
    /// Dark-matter cost.
    pub dark_matter_cost: u64,
    /// Category tag.
    pub category: String,
}

impl Building {
    /// Creates a free building.
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            crystal_cost: 0,
            metal_cost: 0,
            dark_matter_cost: 0,
            category: category.into(),
        }
    }

    /// Builder method to set crystal, metal, and dark-matter costs.
    #[must_use]
    pub fn with_cost(mut self, crystal: u64, metal: u64, dark_matter: u64) -> Self {
        self.crystal_cost = crystal;
        self.metal_cost = metal;
        self.dark_matter_cost = dark_matter;
        self
    }
}

entity_impl!(Building, Building, |_b| Vec::new());

// =============================================================================
// BuildingOnPlanet
// =============================================================================

/// A building constructed on a planet.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BuildingOnPlanet {
    /// The building.
    pub building: EntityId,
    /// The planet it stands on.
    pub planet: EntityId,
    /// Upgrade level.
    pub level: u32,
}

impl BuildingOnPlanet {
    /// Creates a building placement.
    #[must_use]
    pub fn new(building: EntityId, planet: EntityId, level: u32) -> Self {
        Self {
            building,
            planet,
            level,
        }
    }
}

entity_impl!(BuildingOnPlanet, BuildingOnPlanet, |b| collect_refs([
    (RefField::BuildingOnPlanetBuilding, Some(b.building)),
    (RefField::BuildingOnPlanetPlanet, Some(b.planet)),
]));

// =============================================================================
// Mission
// =============================================================================

/// A mission assigned to a fleet.
///
/// Missions form successor chains through `successor`. A mission with no
/// completion date is active; once completed, the date never changes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mission {
    /// Mission name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Date the mission was issued.
    pub issued: NaiveDate,
    /// Date the mission was completed.
    pub completed: Option<NaiveDate>,
    /// Follow-up mission.
    pub successor: Option<EntityId>,
    /// Mission type.
    pub mission_type: EntityId,
    /// Fleet carrying out the mission.
    pub fleet: EntityId,
}

impl Mission {
    /// Creates an active mission with no successor.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        issued: NaiveDate,
        mission_type: EntityId,
        fleet: EntityId,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            issued,
            completed: None,
            successor: None,
            mission_type,
            fleet,
        }
    }

    /// Builder method to set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method to set the successor mission.
    #[must_use]
    pub fn with_successor(mut self, successor: EntityId) -> Self {
        self.successor = Some(successor);
        self
    }

    /// Builder method to mark the mission completed on `date`.
    #[must_use]
    pub fn completed_on(mut self, date: NaiveDate) -> Self {
        self.completed = Some(date);
        self
    }

    /// Returns true if the mission has no completion date.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.completed.is_none()
    }
}

entity_impl!(Mission, Mission, |m| collect_refs([
    (RefField::MissionSuccessor, m.successor),
    (RefField::MissionMissionType, Some(m.mission_type)),
    (RefField::MissionFleet, Some(m.fleet)),
]));
