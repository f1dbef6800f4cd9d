//! End-to-end resolving scenarios over small hand-built worlds

use connect_core::{
    BeltGroup, ConnectionPair, Direction, Endpoint, Entity, EntityKind, Position, TransportBelt,
};
use connect_resolver::{FluidConnectionResolver, Resolver, TransportConnectionResolver};

fn boiler() -> Entity {
    Entity::new(
        "boiler",
        Position::new(0.0, 0.0),
        EntityKind::Boiler {
            connection_points: vec![Position::new(-2.0, 0.5), Position::new(2.0, 0.5)],
            steam_output_point: Position::new(0.0, -1.5),
        },
    )
    .with_direction(Direction::Up)
    .with_dimensions(3.0, 2.0)
}

fn steam_engine() -> Entity {
    Entity::new(
        "steam-engine",
        Position::new(0.0, 3.0),
        EntityKind::Generator {
            connection_points: vec![Position::new(2.0, 3.0), Position::new(-2.0, 4.0)],
        },
    )
    .with_dimensions(3.0, 3.0)
}

fn storage_tank() -> Entity {
    Entity::new(
        "storage-tank",
        Position::new(8.0, 0.0),
        EntityKind::FluidHandler {
            connection_points: vec![Position::new(6.0, 0.0), Position::new(10.0, 0.0)],
        },
    )
    .with_dimensions(3.0, 3.0)
}

fn inserter() -> Entity {
    Entity::new(
        "inserter",
        Position::new(5.0, 3.0),
        EntityKind::Inserter {
            pickup_position: Position::new(5.0, 2.0),
            drop_position: Position::new(5.0, 4.0),
        },
    )
}

fn belt_run() -> Vec<TransportBelt> {
    (0..3)
        .map(|i| TransportBelt::new(Position::new(i as f64, 2.0), Direction::Right))
        .collect()
}

fn belt_entities(belts: &[TransportBelt]) -> Vec<Entity> {
    belts
        .iter()
        .map(|b| Entity::belt(b.position, b.direction))
        .collect()
}

fn assert_sorted(pairs: &[ConnectionPair]) {
    assert!(
        pairs.windows(2).all(|w| w[0].cost() <= w[1].cost()),
        "pairs not sorted by cost: {:?}",
        pairs
    );
}

#[test]
fn test_boiler_feeds_generator_from_steam_outlet() {
    let world = vec![boiler(), steam_engine()];
    let resolver = FluidConnectionResolver::new(&world);

    let pairs = resolver.resolve(&boiler().into(), &steam_engine().into());

    let steam = Position::new(0.0, -1.5);
    assert_eq!(
        pairs,
        vec![
            ConnectionPair::new(steam, Position::new(2.5, 3.5)),
            ConnectionPair::new(steam, Position::new(-2.5, 4.5)),
        ]
    );
    assert_sorted(&pairs);
}

#[test]
fn test_generator_to_boiler_also_pins_steam_outlet() {
    let world = vec![boiler(), steam_engine()];
    let resolver = FluidConnectionResolver::new(&world);

    let pairs = resolver.resolve(&steam_engine().into(), &boiler().into());

    assert!(!pairs.is_empty());
    assert!(pairs.iter().all(|p| p.target == Position::new(0.0, -1.5)));
}

#[test]
fn test_resolution_is_not_symmetric() {
    let world = vec![boiler(), storage_tank()];
    let resolver = FluidConnectionResolver::new(&world);
    let steam = Position::new(0.0, -1.5);

    let forward = resolver.resolve(&boiler().into(), &storage_tank().into());
    let backward = resolver.resolve(&storage_tank().into(), &boiler().into());

    // Boiler as source offers its water sockets
    assert!(forward.iter().all(|p| p.source != steam));
    assert_eq!(forward[0].source, Position::new(2.5, 0.5));
    // Boiler as target of a tank is pinned to the steam outlet
    assert!(backward.iter().all(|p| p.target == steam));

    let reversed: Vec<ConnectionPair> = backward
        .iter()
        .map(|p| ConnectionPair::new(p.target, p.source))
        .collect();
    assert_ne!(forward, reversed);
}

#[test]
fn test_blocked_fluid_socket_excluded() {
    let blocked = Position::new(2.5, 0.5);
    let world = vec![
        boiler(),
        storage_tank(),
        Entity::new("pipe", blocked, EntityKind::Other),
    ];
    let resolver = FluidConnectionResolver::new(&world);

    let pairs = resolver.resolve(&boiler().into(), &storage_tank().into());

    assert!(!pairs.is_empty());
    assert!(pairs.iter().all(|p| p.source != blocked && p.target != blocked));
    assert!(pairs.iter().all(|p| p.source == Position::new(-2.5, 0.5)));
}

#[test]
fn test_belt_group_output_to_inserter() {
    let belts = belt_run();
    let mut world = belt_entities(&belts);
    world.push(inserter());
    let resolver = TransportConnectionResolver::new(&world);

    let group = BeltGroup::from_belts(belts);
    let pairs = resolver.resolve(&group.into(), &inserter().into());

    let pickup = Position::new(5.0, 2.0);
    assert_eq!(
        pairs,
        vec![
            ConnectionPair::new(Position::new(3.0, 2.0), pickup),
            ConnectionPair::new(Position::new(2.0, 1.0), pickup),
            ConnectionPair::new(Position::new(2.0, 3.0), pickup),
        ]
    );
    assert_sorted(&pairs);
}

#[test]
fn test_blocked_belt_side_excluded() {
    let belts = belt_run();
    let mut world = belt_entities(&belts);
    world.push(inserter());
    world.push(Entity::new("wooden-chest", Position::new(2.0, 1.0), EntityKind::Other));
    let resolver = TransportConnectionResolver::new(&world);

    let pairs = resolver.resolve(&BeltGroup::from_belts(belts).into(), &inserter().into());

    assert_eq!(pairs.len(), 2);
    assert!(pairs.iter().all(|p| p.source != Position::new(2.0, 1.0)));
}

#[test]
fn test_position_to_lone_belt_uses_corners() {
    let belt = Entity::belt(Position::new(4.0, 4.0), Direction::Down);
    let world = vec![belt.clone()];
    let resolver = TransportConnectionResolver::new(&world);

    let pairs = resolver.resolve(&Position::new(4.0, 1.0).into(), &belt.into());

    let source = Position::new(4.5, 1.5);
    assert_eq!(
        pairs,
        vec![
            ConnectionPair::new(source, Position::new(5.0, 3.0)),
            ConnectionPair::new(source, Position::new(3.0, 3.0)),
            ConnectionPair::new(source, Position::new(5.0, 5.0)),
            ConnectionPair::new(source, Position::new(3.0, 5.0)),
        ]
    );
}

#[test]
fn test_default_branches_may_coincide() {
    let world: Vec<Entity> = Vec::new();
    let point: Endpoint = Position::new(3.0, 3.0).into();

    let fluid = FluidConnectionResolver::new(&world).resolve(&point, &point);
    assert_eq!(fluid, vec![ConnectionPair::new(Position::new(3.0, 3.0), Position::new(3.0, 3.0))]);
    assert_eq!(fluid[0].cost(), 0.0);

    let belt = TransportConnectionResolver::new(&world).resolve(&point, &point);
    assert_eq!(belt, vec![ConnectionPair::new(Position::new(3.5, 3.5), Position::new(3.5, 3.5))]);
}

#[test]
fn test_repeated_calls_identical() {
    let world = vec![boiler(), steam_engine(), storage_tank()];
    let resolver = FluidConnectionResolver::new(&world);

    let first = resolver.resolve(&storage_tank().into(), &steam_engine().into());
    let second = resolver.resolve(&storage_tank().into(), &steam_engine().into());
    assert_eq!(first, second);
}

#[test]
fn test_scenario_from_json() {
    let json = r#"{
        "source": {"type": "position", "x": 4.0, "y": 1.0},
        "target": {"type": "entity", "name": "transport-belt",
                   "position": {"x": 4.0, "y": 4.0}, "direction": "down",
                   "kind": "transport_belt",
                   "input_position": {"x": 4.0, "y": 3.0},
                   "output_position": {"x": 4.0, "y": 5.0}}
    }"#;

    #[derive(serde::Deserialize)]
    struct Scenario {
        source: Endpoint,
        target: Endpoint,
    }

    let scenario: Scenario = serde_json::from_str(json).unwrap();
    let world: Vec<Entity> = Vec::new();
    let pairs = TransportConnectionResolver::new(&world).resolve(&scenario.source, &scenario.target);
    assert_eq!(pairs.len(), 4);
    assert_eq!(pairs[0].target, Position::new(5.0, 3.0));
}
