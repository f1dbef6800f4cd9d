//! Command-line endpoint descriptions
//!
//! `entity:<unit>` picks a placed entity, `group:<unit>` the belt run
//! containing a belt, `pos:<x>,<y>` a bare map position.

use std::str::FromStr;

use connect_core::{ConnectError, Endpoint, Position, Result};
use factorio_bridge::WorldSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub enum EndpointSpec {
    Entity(u64),
    Group(u64),
    Position(Position),
}

impl EndpointSpec {
    /// Look the endpoint up in a snapshot
    pub fn resolve(&self, snapshot: &WorldSnapshot) -> Result<Endpoint> {
        match self {
            EndpointSpec::Entity(unit) => Ok(Endpoint::Entity(snapshot.entity(*unit)?.clone())),
            EndpointSpec::Group(unit) => Ok(Endpoint::BeltGroup(snapshot.belt_group(*unit)?)),
            EndpointSpec::Position(position) => Ok(Endpoint::Position(*position)),
        }
    }
}

impl FromStr for EndpointSpec {
    type Err = ConnectError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ConnectError::InvalidEndpoint(s.to_string());
        let (prefix, value) = s.split_once(':').ok_or_else(invalid)?;
        match prefix {
            "entity" => value.parse().map(EndpointSpec::Entity).map_err(|_| invalid()),
            "group" => value.parse().map(EndpointSpec::Group).map_err(|_| invalid()),
            "pos" => parse_point(value).map(EndpointSpec::Position),
            _ => Err(invalid()),
        }
    }
}

/// Parse `x,y` into a position
pub fn parse_point(s: &str) -> Result<Position> {
    let invalid = || ConnectError::InvalidEndpoint(format!("expected x,y, got '{}'", s));
    let (x, y) = s.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse().map_err(|_| invalid())?;
    let y = y.trim().parse().map_err(|_| invalid())?;
    Ok(Position::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use connect_core::{Direction, Entity};

    #[test]
    fn test_parse_specs() {
        assert_eq!("entity:42".parse::<EndpointSpec>().unwrap(), EndpointSpec::Entity(42));
        assert_eq!("group:7".parse::<EndpointSpec>().unwrap(), EndpointSpec::Group(7));
        assert_eq!(
            "pos:4, -1.5".parse::<EndpointSpec>().unwrap(),
            EndpointSpec::Position(Position::new(4.0, -1.5))
        );
    }

    #[test]
    fn test_parse_invalid_specs() {
        for input in ["42", "entity:abc", "pos:1", "tile:1,2"] {
            assert!(
                matches!(
                    input.parse::<EndpointSpec>(),
                    Err(ConnectError::InvalidEndpoint(_))
                ),
                "accepted {}",
                input
            );
        }
    }

    #[test]
    fn test_resolve_against_snapshot() {
        let snapshot = WorldSnapshot::from_entities(vec![
            Entity::belt(Position::new(0.5, 0.5), Direction::Right).with_unit_number(1),
            Entity::belt(Position::new(1.5, 0.5), Direction::Right).with_unit_number(2),
        ]);

        match EndpointSpec::Group(2).resolve(&snapshot).unwrap() {
            Endpoint::BeltGroup(group) => assert_eq!(group.len(), 2),
            other => panic!("Expected belt group, got {:?}", other),
        }
        assert!(EndpointSpec::Entity(1).resolve(&snapshot).unwrap().as_entity().is_some());
        assert!(matches!(
            EndpointSpec::Entity(9).resolve(&snapshot),
            Err(ConnectError::EntityNotFound(9))
        ));
    }
}
