//! Pipe connection resolving between fluid handlers

use connect_core::geometry::is_tile_aligned;
use connect_core::{ConnectionPair, Endpoint, Entity, EntityKind, EntityQuery, Position};
use tracing::debug;

use crate::resolver::{Resolver, is_blocked, rank_pairs};

/// Resolves pipe attachment points
///
/// Dispatch is a first-match cascade over the entity kinds:
/// offshore pumps offer every socket, a boiler feeding a generator is pinned
/// to its steam outlet, other fluid handlers offer their free sockets
/// nearest the other endpoint first, and anything else uses its position.
pub struct FluidConnectionResolver<Q> {
    query: Q,
}

impl<Q: EntityQuery> FluidConnectionResolver<Q> {
    pub fn new(query: Q) -> Self {
        Self { query }
    }

    fn source_candidates(&self, source: &Endpoint, target: &Endpoint) -> Vec<Position> {
        let Some(entity) = source.as_entity() else {
            return vec![source.position()];
        };
        let target_kind = target.as_entity().map(|t| &t.kind);

        match (&entity.kind, target_kind) {
            (EntityKind::OffshorePump { connection_points }, _) => {
                self.declared_or_position(entity, connection_points)
            }
            (
                EntityKind::Boiler {
                    steam_output_point, ..
                },
                Some(EntityKind::Generator { .. }),
            ) => vec![*steam_output_point],
            // Boiler to boiler or pump shares the flexible search below
            _ if entity.is_fluid_handler() => self.nearest_or_position(entity, target.position()),
            _ => vec![entity.position],
        }
    }

    fn target_candidates(&self, source: &Endpoint, target: &Endpoint) -> Vec<Position> {
        let Some(entity) = target.as_entity() else {
            return vec![target.position()];
        };
        let fed_by_water = source
            .as_entity()
            .is_some_and(|s| s.is_offshore_pump() || s.is_boiler());

        match &entity.kind {
            EntityKind::OffshorePump { connection_points } => {
                self.declared_or_position(entity, connection_points)
            }
            EntityKind::Boiler { .. } if fed_by_water => {
                self.nearest_or_position(entity, source.position())
            }
            EntityKind::Boiler {
                steam_output_point, ..
            } => vec![*steam_output_point],
            _ if entity.is_fluid_handler() => self.nearest_or_position(entity, source.position()),
            _ => vec![entity.position],
        }
    }

    /// Free sockets of a fluid handler, nearest to `reference` first
    ///
    /// Tile-aligned coordinates are pushed half a tile away from the
    /// handler's centre so every point lands on a tile centre. Sockets whose
    /// tile is occupied are dropped; the result may be empty.
    pub fn connection_points_near(&self, handler: &Entity, reference: Position) -> Vec<Position> {
        let mut points = handler.connection_points().unwrap_or_default().to_vec();
        points.sort_by(|a, b| a.manhattan(&reference).total_cmp(&b.manhattan(&reference)));
        self.free_points(handler, points)
    }

    fn nearest_or_position(&self, handler: &Entity, reference: Position) -> Vec<Position> {
        let points = self.connection_points_near(handler, reference);
        if points.is_empty() {
            debug!("No free connection points on {}, using its position", handler.name);
            return vec![handler.position];
        }
        points
    }

    fn declared_or_position(&self, handler: &Entity, declared: &[Position]) -> Vec<Position> {
        let points = self.free_points(handler, declared.to_vec());
        if points.is_empty() {
            return vec![handler.position];
        }
        points
    }

    fn free_points(&self, handler: &Entity, points: Vec<Position>) -> Vec<Position> {
        points
            .into_iter()
            .map(|point| snap_outward(point, handler.position))
            .filter(|point| !is_blocked(&self.query, *point))
            .collect()
    }
}

impl<Q: EntityQuery> Resolver for FluidConnectionResolver<Q> {
    fn resolve(&self, source: &Endpoint, target: &Endpoint) -> Vec<ConnectionPair> {
        let sources = self.source_candidates(source, target);
        let targets = self.target_candidates(source, target);
        debug!(
            "Fluid connection: {} source x {} target candidates",
            sources.len(),
            targets.len()
        );
        rank_pairs(&sources, &targets)
    }
}

/// Move tile-aligned coordinates half a tile away from `center`
fn snap_outward(point: Position, center: Position) -> Position {
    let snap = |value: f64, origin: f64| {
        if !is_tile_aligned(value) {
            value
        } else if value >= origin {
            value + 0.5
        } else {
            value - 0.5
        }
    };
    Position::new(snap(point.x, center.x), snap(point.y, center.y))
}
