//! Shared resolver contract and ranking helpers

use std::fmt::Display;

use connect_core::{ConnectError, ConnectionPair, Endpoint, EntityQuery, Position, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::fluid::FluidConnectionResolver;
use crate::transport::TransportConnectionResolver;

/// Radius of the occupancy check around a candidate point, in tiles
pub const OCCUPANCY_RADIUS: f64 = 0.5;

/// Resolves candidate attachment point pairs between two endpoints
///
/// Implementations never fail: unknown shapes fall back to the endpoint's
/// own position, so the result always holds at least one pair. Pairs are
/// sorted by ascending Manhattan distance and the full product is returned,
/// letting callers retry later pairs when placement fails.
pub trait Resolver {
    fn resolve(&self, source: &Endpoint, target: &Endpoint) -> Vec<ConnectionPair>;
}

/// Physical medium of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// Transport belts
    Belt,
    /// Pipes
    Pipe,
}

impl std::str::FromStr for ConnectionKind {
    type Err = ConnectError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "belt" | "transport-belt" => Ok(ConnectionKind::Belt),
            "pipe" => Ok(ConnectionKind::Pipe),
            other => Err(ConnectError::InvalidEndpoint(format!(
                "unknown connection kind '{}'",
                other
            ))),
        }
    }
}

/// Pick the resolver for a connection medium
pub fn resolver_for<'a, Q>(kind: ConnectionKind, query: Q) -> Box<dyn Resolver + 'a>
where
    Q: EntityQuery + 'a,
{
    match kind {
        ConnectionKind::Belt => Box::new(TransportConnectionResolver::new(query)),
        ConnectionKind::Pipe => Box::new(FluidConnectionResolver::new(query)),
    }
}

/// Whether any entity occupies the tile around `point`
pub fn is_blocked<Q: EntityQuery + ?Sized>(query: &Q, point: Position) -> bool {
    let hits = query.get_entities(point, OCCUPANCY_RADIUS);
    match hits.first() {
        Some(blocker) => {
            trace!("Candidate {} blocked by {}", point, blocker.name);
            true
        }
        None => false,
    }
}

/// Cartesian product of both candidate lists, cheapest pair first
///
/// The sort is stable, so equally ranked pairs keep candidate order.
pub fn rank_pairs(sources: &[Position], targets: &[Position]) -> Vec<ConnectionPair> {
    let mut pairs: Vec<ConnectionPair> = sources
        .iter()
        .flat_map(|source| {
            targets
                .iter()
                .map(move |target| ConnectionPair::new(*source, *target))
        })
        .collect();

    pairs.sort_by(|a, b| a.cost().total_cmp(&b.cost()));
    pairs
}

/// Hand ranked pairs to a placement routine until one succeeds
///
/// Returns the first successful placement, or
/// [`ConnectError::ConnectionFailed`] once every pair has been tried.
pub fn attempt_in_order<T, E, F>(pairs: &[ConnectionPair], mut place: F) -> Result<T>
where
    E: Display,
    F: FnMut(&ConnectionPair) -> std::result::Result<T, E>,
{
    for (attempt, pair) in pairs.iter().enumerate() {
        match place(pair) {
            Ok(placed) => {
                debug!(
                    "Connected {} -> {} on attempt {}",
                    pair.source,
                    pair.target,
                    attempt + 1
                );
                return Ok(placed);
            }
            Err(e) => debug!("Placement {} -> {} failed: {}", pair.source, pair.target, e),
        }
    }

    Err(ConnectError::ConnectionFailed {
        attempts: pairs.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect_core::{Entity, EntityKind};

    #[test]
    fn test_rank_pairs_product_sorted() {
        let sources = [Position::new(0.5, 0.5), Position::new(3.5, 0.5)];
        let targets = [Position::new(9.5, 0.5), Position::new(4.5, 0.5)];
        let pairs = rank_pairs(&sources, &targets);

        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0], ConnectionPair::new(sources[1], targets[1]));
        assert!(pairs.windows(2).all(|w| w[0].cost() <= w[1].cost()));
    }

    #[test]
    fn test_rank_pairs_stable_ties() {
        let sources = [Position::new(0.5, 0.5)];
        let targets = [Position::new(1.5, 0.5), Position::new(-0.5, 0.5)];
        let pairs = rank_pairs(&sources, &targets);
        assert_eq!(pairs[0].target, targets[0]);
        assert_eq!(pairs[1].target, targets[1]);
    }

    #[test]
    fn test_is_blocked() {
        let world = vec![Entity::new("pipe", Position::new(1.5, 1.5), EntityKind::Other)];
        assert!(is_blocked(&world, Position::new(1.5, 1.5)));
        assert!(!is_blocked(&world, Position::new(2.5, 1.5)));
    }

    #[test]
    fn test_attempt_in_order_first_success() {
        let pairs = rank_pairs(
            &[Position::new(0.5, 0.5)],
            &[Position::new(1.5, 0.5), Position::new(5.5, 0.5)],
        );
        let mut tried = Vec::new();
        let placed = attempt_in_order(&pairs, |pair| {
            tried.push(*pair);
            if pair.target.x > 2.0 {
                Ok(pair.target)
            } else {
                Err("path blocked")
            }
        })
        .unwrap();

        assert_eq!(placed, Position::new(5.5, 0.5));
        assert_eq!(tried.len(), 2);
    }

    #[test]
    fn test_attempt_in_order_exhausted() {
        let pairs = rank_pairs(&[Position::new(0.5, 0.5)], &[Position::new(1.5, 0.5)]);
        let result: Result<()> = attempt_in_order(&pairs, |_| Err("no route"));
        assert!(matches!(
            result,
            Err(ConnectError::ConnectionFailed { attempts: 1 })
        ));
    }

    #[test]
    fn test_connection_kind_parse() {
        assert_eq!("belt".parse::<ConnectionKind>().unwrap(), ConnectionKind::Belt);
        assert_eq!("pipe".parse::<ConnectionKind>().unwrap(), ConnectionKind::Pipe);
        assert!("rail".parse::<ConnectionKind>().is_err());

        let kind: ConnectionKind = serde_json::from_str("\"pipe\"").unwrap();
        assert_eq!(kind, ConnectionKind::Pipe);
    }

    #[test]
    fn test_resolver_for_never_empty() {
        let world: Vec<Entity> = Vec::new();
        let source = Endpoint::Position(Position::new(0.0, 0.0));
        let target = Endpoint::Position(Position::new(3.0, 0.0));
        for kind in [ConnectionKind::Belt, ConnectionKind::Pipe] {
            let resolver = resolver_for(kind, &world);
            assert!(!resolver.resolve(&source, &target).is_empty());
        }
    }
}
