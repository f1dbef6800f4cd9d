//! Placed entity model
//!
//! Every entity shares a base shape (name, position, facing, footprint) and
//! carries one capability payload out of a closed set. Resolvers match on
//! [`EntityKind`] rather than on prototype names.

use serde::{Deserialize, Serialize};

use crate::belt::TransportBelt;
use crate::geometry::{Dimensions, Direction, Position};

/// An entity placed in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Prototype name (e.g. `steam-engine`)
    pub name: String,

    /// Game-assigned unit number, when the entity has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<u64>,

    /// Centre of the entity
    pub position: Position,

    /// Facing
    #[serde(default)]
    pub direction: Direction,

    /// Footprint in tiles
    #[serde(default)]
    pub dimensions: Dimensions,

    /// Capability payload
    #[serde(flatten)]
    pub kind: EntityKind,
}

/// Capability set of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityKind {
    /// Generic fluid handler (pipes, tanks, pumps, chemical plants)
    FluidHandler { connection_points: Vec<Position> },
    /// Boiler: water sockets plus one fixed steam outlet
    Boiler {
        connection_points: Vec<Position>,
        steam_output_point: Position,
    },
    /// Steam engine or turbine
    Generator { connection_points: Vec<Position> },
    /// Offshore pump
    OffshorePump { connection_points: Vec<Position> },
    /// Mining drill
    MiningDrill { drop_position: Position },
    /// Inserter
    Inserter {
        pickup_position: Position,
        drop_position: Position,
    },
    /// Single transport belt tile
    TransportBelt {
        input_position: Position,
        output_position: Position,
    },
    /// Anything without a connection capability
    Other,
}

impl Entity {
    /// Create a 1x1 entity facing up
    pub fn new(name: impl Into<String>, position: Position, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            unit_number: None,
            position,
            direction: Direction::default(),
            dimensions: Dimensions::default(),
            kind,
        }
    }

    /// Set the facing
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the footprint
    pub fn with_dimensions(mut self, width: f64, height: f64) -> Self {
        self.dimensions = Dimensions::new(width, height);
        self
    }

    /// Set the unit number
    pub fn with_unit_number(mut self, unit_number: u64) -> Self {
        self.unit_number = Some(unit_number);
        self
    }

    /// A transport belt with ports derived from its facing
    pub fn belt(position: Position, direction: Direction) -> Self {
        let belt = TransportBelt::new(position, direction);
        Self::new(
            "transport-belt",
            position,
            EntityKind::TransportBelt {
                input_position: belt.input_position,
                output_position: belt.output_position,
            },
        )
        .with_direction(direction)
    }

    /// Declared pipe sockets, for every fluid-capable kind
    pub fn connection_points(&self) -> Option<&[Position]> {
        match &self.kind {
            EntityKind::FluidHandler { connection_points }
            | EntityKind::Boiler {
                connection_points, ..
            }
            | EntityKind::Generator { connection_points }
            | EntityKind::OffshorePump { connection_points } => Some(connection_points),
            _ => None,
        }
    }

    pub fn is_fluid_handler(&self) -> bool {
        self.connection_points().is_some()
    }

    pub fn is_boiler(&self) -> bool {
        matches!(self.kind, EntityKind::Boiler { .. })
    }

    pub fn is_offshore_pump(&self) -> bool {
        matches!(self.kind, EntityKind::OffshorePump { .. })
    }

    pub fn is_generator(&self) -> bool {
        matches!(self.kind, EntityKind::Generator { .. })
    }

    /// View a belt entity as a [`TransportBelt`] segment
    pub fn as_belt(&self) -> Option<TransportBelt> {
        match self.kind {
            EntityKind::TransportBelt {
                input_position,
                output_position,
            } => Some(TransportBelt {
                position: self.position,
                direction: self.direction,
                input_position,
                output_position,
            }),
            _ => None,
        }
    }

    /// Distance from a point to this entity's footprint (zero inside)
    pub fn distance_to(&self, point: &Position) -> f64 {
        self.dimensions.distance_from(&self.position, point)
    }
}
