//! Entity identifiers and kinds.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque entity identifier.
///
/// Identifiers are only unique within a single [`EntityKind`]; a Fleet and a
/// Planet may share the same numeric id.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntityId(pub u64);

impl EntityId {
    /// Creates a new entity ID.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The twelve entity kinds of the fleet domain.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityKind {
    /// A planet with population, coordinates, and resource stockpiles.
    Planet,
    /// A named fleet with a maximum size.
    Fleet,
    /// A class of ship.
    ShipType,
    /// A ship captain.
    Captain,
    /// A ship in active service.
    Spaceship,
    /// A ship under construction.
    ShipyardEntry,
    /// One entry in a ship's damage history.
    DamageReport,
    /// A ship's logbook.
    Logbook,
    /// A category of mission.
    MissionType,
    /// A kind of building.
    Building,
    /// A building constructed on a planet.
    BuildingOnPlanet,
    /// A mission assigned to a fleet.
    Mission,
}

impl EntityKind {
    /// Number of entity kinds.
    pub const COUNT: usize = 12;

    /// All kinds, in declaration order.
    pub const ALL: [EntityKind; Self::COUNT] = [
        Self::Planet,
        Self::Fleet,
        Self::ShipType,
        Self::Captain,
        Self::Spaceship,
        Self::ShipyardEntry,
        Self::DamageReport,
        Self::Logbook,
        Self::MissionType,
        Self::Building,
        Self::BuildingOnPlanet,
        Self::Mission,
    ];

    /// Returns the dense index of this kind (`0..COUNT`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the display name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Planet => "planet",
            Self::Fleet => "fleet",
            Self::ShipType => "ship-type",
            Self::Captain => "captain",
            Self::Spaceship => "spaceship",
            Self::ShipyardEntry => "shipyard-entry",
            Self::DamageReport => "damage-report",
            Self::Logbook => "logbook",
            Self::MissionType => "mission-type",
            Self::Building => "building",
            Self::BuildingOnPlanet => "building-on-planet",
            Self::Mission => "mission",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fully-qualified entity address: kind plus identifier.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityRef {
    /// The entity kind.
    pub kind: EntityKind,
    /// The identifier within that kind.
    pub id: EntityId,
}

impl EntityRef {
    /// Creates a new entity reference.
    #[must_use]
    pub const fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.id)
    }
}
