//! Occupancy query capability

use std::sync::Arc;

use crate::entity::Entity;
use crate::geometry::Position;

/// Read-only spatial query over placed entities
///
/// Resolvers only ever ask whether anything occupies a small radius around
/// a candidate point. Implementations must not mutate world state.
pub trait EntityQuery {
    /// Entities whose footprint lies within `radius` tiles of `position`
    fn get_entities(&self, position: Position, radius: f64) -> Vec<Entity>;
}

impl<Q: EntityQuery + ?Sized> EntityQuery for &Q {
    fn get_entities(&self, position: Position, radius: f64) -> Vec<Entity> {
        (**self).get_entities(position, radius)
    }
}

impl<Q: EntityQuery + ?Sized> EntityQuery for Box<Q> {
    fn get_entities(&self, position: Position, radius: f64) -> Vec<Entity> {
        (**self).get_entities(position, radius)
    }
}

impl<Q: EntityQuery + ?Sized> EntityQuery for Arc<Q> {
    fn get_entities(&self, position: Position, radius: f64) -> Vec<Entity> {
        (**self).get_entities(position, radius)
    }
}

/// A plain entity list answers queries by footprint distance
impl EntityQuery for [Entity] {
    fn get_entities(&self, position: Position, radius: f64) -> Vec<Entity> {
        self.iter()
            .filter(|entity| entity.distance_to(&position) < radius)
            .cloned()
            .collect()
    }
}

impl EntityQuery for Vec<Entity> {
    fn get_entities(&self, position: Position, radius: f64) -> Vec<Entity> {
        self.as_slice().get_entities(position, radius)
    }
}
