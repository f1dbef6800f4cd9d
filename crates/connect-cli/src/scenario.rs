//! Offline scenarios and resolve reports

use connect_core::{Endpoint, Entity, Position, Result};
use connect_resolver::{ConnectionKind, resolver_for};
use factorio_bridge::WorldSnapshot;
use serde::{Deserialize, Serialize};

/// A connection request against a hand-described world
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub kind: ConnectionKind,
    pub source: Endpoint,
    pub target: Endpoint,
    /// Entities already placed in the world
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn resolve(&self) -> Result<Report> {
        let snapshot = WorldSnapshot::from_entities(self.entities.clone());
        Report::build(self.kind, &snapshot, &self.source, &self.target)
    }
}

/// One ranked candidate pair
#[derive(Debug, Clone, Serialize)]
pub struct RankedPair {
    pub rank: usize,
    pub source: Position,
    pub target: Position,
    pub cost: f64,
}

/// Resolver output printed by the CLI
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub kind: ConnectionKind,
    /// Hash of the world the pairs were ranked against
    pub state_hash: String,
    pub pairs: Vec<RankedPair>,
}

impl Report {
    pub fn build(
        kind: ConnectionKind,
        snapshot: &WorldSnapshot,
        source: &Endpoint,
        target: &Endpoint,
    ) -> Result<Self> {
        let pairs = resolver_for(kind, snapshot)
            .resolve(source, target)
            .into_iter()
            .enumerate()
            .map(|(rank, pair)| RankedPair {
                rank,
                source: pair.source,
                target: pair.target,
                cost: pair.cost(),
            })
            .collect();

        Ok(Self {
            kind,
            state_hash: snapshot.state_hash()?,
            pairs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_boiler_scenario() {
        let scenario =
            Scenario::from_json(include_str!("../scenarios/boiler_to_engine.json")).unwrap();
        assert_eq!(scenario.kind, ConnectionKind::Pipe);

        let report = scenario.resolve().unwrap();
        assert!(!report.pairs.is_empty());
        assert!(report.pairs.iter().all(|p| p.source == Position::new(0.0, -1.5)));
        assert!(report.pairs.windows(2).all(|w| w[0].cost <= w[1].cost));
    }

    #[test]
    fn test_bundled_belt_scenario() {
        let scenario =
            Scenario::from_json(include_str!("../scenarios/belt_to_inserter.json")).unwrap();
        let report = scenario.resolve().unwrap();

        assert_eq!(report.pairs.len(), 3);
        assert_eq!(report.pairs[0].source, Position::new(3.0, 2.0));
        assert_eq!(report.pairs[0].cost, 2.0);
        assert_eq!(report.pairs[2].rank, 2);
    }

    #[test]
    fn test_report_serializes() {
        let scenario =
            Scenario::from_json(include_str!("../scenarios/belt_to_inserter.json")).unwrap();
        let json = serde_json::to_value(scenario.resolve().unwrap()).unwrap();
        assert_eq!(json["kind"], "belt");
        assert_eq!(json["state_hash"].as_str().map(str::len), Some(64));
    }
}
