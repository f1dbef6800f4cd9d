//! Belt connection resolving

use connect_core::{
    ConnectionPair, Endpoint, Entity, EntityKind, EntityQuery, Position, TransportBelt,
};
use tracing::debug;

use crate::resolver::{Resolver, is_blocked, rank_pairs};

/// Which end of the connection a belt is being resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BeltRole {
    /// Items leave through the belt's output port
    Source,
    /// Items enter through the belt's input port
    Target,
}

/// Resolves belt attachment points
///
/// Belt groups offer their functional end plus the two tiles beside it,
/// inserters and drills offer their single pickup or drop point, a lone
/// belt used as a target offers its four corner tiles for side-loading, and
/// bare positions snap to the tile centre.
pub struct TransportConnectionResolver<Q> {
    query: Q,
}

impl<Q: EntityQuery> TransportConnectionResolver<Q> {
    pub fn new(query: Q) -> Self {
        Self { query }
    }

    fn source_candidates(&self, source: &Endpoint) -> Vec<Position> {
        match source {
            Endpoint::BeltGroup(group) => match group.last_output() {
                Some(belt) => self.belt_ports(belt, BeltRole::Source),
                None => vec![group.position()],
            },
            Endpoint::Position(position) => vec![position.tile_center()],
            Endpoint::Entity(entity) => match &entity.kind {
                EntityKind::Inserter { drop_position, .. } => vec![*drop_position],
                EntityKind::MiningDrill { drop_position } => vec![*drop_position],
                _ => vec![entity.position],
            },
        }
    }

    fn target_candidates(&self, target: &Endpoint) -> Vec<Position> {
        match target {
            Endpoint::BeltGroup(group) => match group.first_input() {
                Some(belt) => self.belt_ports(belt, BeltRole::Target),
                None => vec![group.position()],
            },
            Endpoint::Position(position) => vec![position.tile_center()],
            Endpoint::Entity(entity) => match &entity.kind {
                EntityKind::Inserter {
                    pickup_position, ..
                } => vec![*pickup_position],
                EntityKind::MiningDrill { drop_position } => vec![*drop_position],
                EntityKind::TransportBelt { .. } => self.corner_tiles(entity),
                _ => vec![entity.position],
            },
        }
    }

    /// Functional port of a belt followed by its two free side tiles
    ///
    /// Belts accept and emit items through their sides as well as their
    /// ends. Side tiles run left/right of vertical belts and above/below
    /// horizontal ones. The port itself is always kept.
    fn belt_ports(&self, belt: &TransportBelt, role: BeltRole) -> Vec<Position> {
        let port = match role {
            BeltRole::Source => belt.output_position,
            BeltRole::Target => belt.input_position,
        };

        let p = belt.position;
        let sides = if belt.direction.is_vertical() {
            [p.offset(-1.0, 0.0), p.offset(1.0, 0.0)]
        } else {
            [p.offset(0.0, -1.0), p.offset(0.0, 1.0)]
        };

        std::iter::once(port)
            .chain(sides.into_iter().filter(|side| !is_blocked(&self.query, *side)))
            .collect()
    }

    /// Free diagonal neighbours of a lone belt, or the belt itself
    fn corner_tiles(&self, belt: &Entity) -> Vec<Position> {
        let p = belt.position;
        let corners: Vec<Position> = [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)]
            .into_iter()
            .map(|(dx, dy)| p.offset(dx, dy))
            .filter(|corner| !is_blocked(&self.query, *corner))
            .collect();

        if corners.is_empty() {
            debug!("All corners around belt at {} are occupied", p);
            return vec![p];
        }
        corners
    }
}

impl<Q: EntityQuery> Resolver for TransportConnectionResolver<Q> {
    fn resolve(&self, source: &Endpoint, target: &Endpoint) -> Vec<ConnectionPair> {
        let sources = self.source_candidates(source);
        let targets = self.target_candidates(target);
        debug!(
            "Belt connection: {} source x {} target candidates",
            sources.len(),
            targets.len()
        );
        rank_pairs(&sources, &targets)
    }
}
