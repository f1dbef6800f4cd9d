//! Connection endpoints and ranked connection pairs

use serde::{Deserialize, Serialize};

use crate::belt::BeltGroup;
use crate::entity::Entity;
use crate::geometry::Position;

/// Something a belt or pipe can be routed from or to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Endpoint {
    /// A bare map position
    Position(Position),
    /// A placed entity
    Entity(Entity),
    /// A run of belts
    BeltGroup(BeltGroup),
}

impl Endpoint {
    /// The endpoint's own position, used wherever no better point is known
    pub fn position(&self) -> Position {
        match self {
            Endpoint::Position(position) => *position,
            Endpoint::Entity(entity) => entity.position,
            Endpoint::BeltGroup(group) => group.position(),
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Endpoint::Entity(entity) => Some(entity),
            _ => None,
        }
    }
}

impl From<Position> for Endpoint {
    fn from(position: Position) -> Self {
        Endpoint::Position(position)
    }
}

impl From<Entity> for Endpoint {
    fn from(entity: Entity) -> Self {
        Endpoint::Entity(entity)
    }
}

impl From<BeltGroup> for Endpoint {
    fn from(group: BeltGroup) -> Self {
        Endpoint::BeltGroup(group)
    }
}

/// A candidate source point paired with a candidate target point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionPair {
    pub source: Position,
    pub target: Position,
}

impl ConnectionPair {
    pub fn new(source: Position, target: Position) -> Self {
        Self { source, target }
    }

    /// Ranking cost: Manhattan distance between the two points
    pub fn cost(&self) -> f64 {
        self.source.manhattan(&self.target)
    }
}
