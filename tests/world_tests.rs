//! World construction and tick driver tests

use rand::rngs::StdRng;
use rand::SeedableRng;

use city_sim::simulation::{
    CityMap, Direction, Pedestrian, Position, SimWorld, Tile, TileKind, Vehicle, VehicleKind,
    VehicleSnapshot, VehicleUpdate, ANIMATION_SPEED, MAX_CARS, MAX_POPULATION, TILE_SIZE,
};

/// A small all-road map for driver tests that do not need the city layout.
fn open_road_map() -> CityMap {
    let mut map = CityMap::new(60, 60);
    for y in 0..60 {
        for x in 0..60 {
            map.place_tile(x, y, Tile::new(TileKind::Road));
        }
    }
    map
}

/// Player parked far from the action but within despawn range.
fn parked_player() -> Position {
    Position::new(100.0, 1000.0)
}

#[test]
fn test_city_world_layout() {
    let world = SimWorld::create_city_world().unwrap();

    assert_eq!(world.intersections.len(), 12);
    assert!(world.vehicles().is_empty());
    assert!(world.pedestrians().is_empty());
    assert_eq!(world.frame, 0);

    // The avenue centered on tile row 30 is drivable two rows to either
    // side; its sidewalk rows are not.
    let x = 20.0 * TILE_SIZE + 1.0;
    for row in 28..=32 {
        assert!(world.map.is_road(x, row as f32 * TILE_SIZE + 1.0));
    }
    assert!(world.map.is_sidewalk(x, 26.0 * TILE_SIZE + 1.0));
    assert!(world.map.is_sidewalk(x, 33.0 * TILE_SIZE + 1.0));

    // Every authored intersection sits on pavement.
    for intersection in &world.intersections {
        assert!(world
            .map
            .is_road(intersection.position.x, intersection.position.y));
    }
}

#[test]
fn test_city_roads_are_continuous() {
    let world = SimWorld::create_city_world().unwrap();
    let center = |tile: usize| tile as f32 * TILE_SIZE + TILE_SIZE / 2.0;

    // Every avenue center line is drivable across the whole grid,
    // junction boxes included.
    for &row in &[30, 60, 84] {
        for col in 8..=107 {
            assert!(
                world.map.is_road(center(col), center(row)),
                "avenue row {} severed at column {}",
                row,
                col
            );
        }
    }
    // Every street center line is drivable from the northern end down to
    // the southern avenue.
    for &col in &[29, 54, 79, 106] {
        for row in 8..=86 {
            assert!(
                world.map.is_road(center(col), center(row)),
                "street column {} severed at row {}",
                col,
                row
            );
        }
    }
}

#[test]
fn test_eastbound_vehicle_clears_first_junction() {
    let world = SimWorld::create_city_world().unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    // Drive a car from the westernmost avenue spawn point toward the
    // first intersection at x = 522.
    let mut vehicle = Vehicle::new(
        VehicleKind::Car,
        Position::new(8.0 * TILE_SIZE, 30.0 * TILE_SIZE),
        Direction::Right,
    );
    let player = Position::new(900.0, 900.0);
    let first_junction_x = 29.0 * TILE_SIZE;

    for _ in 0..150 {
        let snapshot = vec![VehicleSnapshot {
            position: vehicle.position,
        }];
        let result = vehicle.update(
            &world.map,
            &world.intersections,
            &snapshot,
            0,
            player,
            &mut rng,
        );
        assert!(
            matches!(result, VehicleUpdate::Keep),
            "vehicle removed at ({:.0}, {:.0})",
            vehicle.position.x,
            vehicle.position.y
        );
        // Past the junction, or routed onto the crossing street: either
        // way it engaged the intersection and survived.
        if vehicle.position.x > first_junction_x + 2.0 * TILE_SIZE
            || vehicle.direction != Direction::Right
        {
            return;
        }
    }
    panic!("vehicle never reached the first junction");
}

#[test]
fn test_tick_spawns_and_maintains_vehicles() {
    let mut world = SimWorld::create_city_world_with_seed(11).unwrap();
    let player = Position::new(1000.0, 1000.0);

    for _ in 0..300 {
        world.tick(player, Direction::Down);
    }

    assert!(world.stats.vehicles_spawned > 0);
    assert!(world.vehicles().len() <= MAX_CARS);
    assert_eq!(world.frame, 300);

    // Healthy traffic sheds only at the network edges, so early removals
    // stay a small fraction of spawns.
    assert!(
        world.stats.vehicles_removed * 2 < world.stats.vehicles_spawned,
        "removed {} of {} spawned",
        world.stats.vehicles_removed,
        world.stats.vehicles_spawned
    );
    assert!(world.vehicles().len() >= 5);

    // Every live vehicle sits on pavement after its pass.
    for vehicle in world.vehicles() {
        assert!(
            world.map.is_road(vehicle.position.x, vehicle.position.y),
            "vehicle off road at ({:.0}, {:.0})",
            vehicle.position.x,
            vehicle.position.y
        );
    }
}

#[test]
fn test_fleet_recovers_after_mass_despawn() {
    let mut world = SimWorld::create_city_world_with_seed(23).unwrap();
    let player = Position::new(1000.0, 1000.0);

    for _ in 0..150 {
        world.tick(player, Direction::Down);
    }
    assert!(!world.vehicles().is_empty());

    // One tick with the player far away despawns the entire fleet.
    let outcome = world.tick(Position::new(100_000.0, 100_000.0), Direction::Down);
    assert!(outcome.vehicles_removed > 0);
    assert!(world.vehicles().is_empty());

    // The spawner refills within one spawn interval once the player is back.
    for _ in 0..30 {
        world.tick(player, Direction::Down);
    }
    assert!(!world.vehicles().is_empty());
}

#[test]
fn test_populate_pedestrians_places_on_sidewalks() {
    let mut world = SimWorld::create_city_world_with_seed(5).unwrap();
    world.populate_pedestrians();

    let count = world.pedestrians().len();
    assert!(count > 0);
    assert!(count <= MAX_POPULATION);
    assert_eq!(world.stats.pedestrians_spawned, count);

    for pedestrian in world.pedestrians() {
        assert!(world
            .map
            .is_sidewalk(pedestrian.position.x, pedestrian.position.y));
        assert!((1..=9).contains(&pedestrian.archetype));
        assert!(pedestrian.alive);
    }
}

#[test]
fn test_seeded_worlds_are_deterministic() {
    let run = || {
        let mut world = SimWorld::create_city_world_with_seed(42).unwrap();
        world.populate_pedestrians();
        for _ in 0..200 {
            world.tick(Position::new(900.0, 560.0), Direction::Right);
        }
        world
    };

    let a = run();
    let b = run();

    assert_eq!(a.vehicles().len(), b.vehicles().len());
    assert_eq!(a.pedestrians().len(), b.pedestrians().len());
    assert_eq!(a.stats.vehicles_spawned, b.stats.vehicles_spawned);
    assert_eq!(a.stats.pedestrians_hit, b.stats.pedestrians_hit);
    for (left, right) in a.vehicles().iter().zip(b.vehicles()) {
        assert_eq!(left.position.x, right.position.x);
        assert_eq!(left.position.y, right.position.y);
        assert_eq!(left.direction, right.direction);
    }
}

#[test]
fn test_validate_player_move() {
    let mut world = SimWorld::new_with_seed(open_road_map(), Vec::new(), Vec::new(), 1);
    world
        .vehicles
        .push(Vehicle::new(VehicleKind::Car, Position::new(500.0, 500.0), Direction::Down));

    assert!(!world.validate_player_move(Position::new(500.0, 500.0)));
    assert!(!world.validate_player_move(Position::new(520.0, 500.0)));
    assert!(world.validate_player_move(Position::new(600.0, 500.0)));

    world
        .pedestrians
        .push(Pedestrian::new(1, Position::new(600.0, 500.0), Direction::Down));
    assert!(!world.validate_player_move(Position::new(600.0, 500.0)));
}

#[test]
fn test_tick_reports_lethal_player_collision() {
    let mut world = SimWorld::new_with_seed(open_road_map(), Vec::new(), Vec::new(), 1);
    world
        .vehicles
        .push(Vehicle::new(VehicleKind::Car, Position::new(500.0, 540.0), Direction::Right));

    // Standing just ahead of a moving car: the car brakes into Waiting but
    // is still fast enough this tick to kill.
    let outcome = world.tick(Position::new(515.0, 540.0), Direction::Down);
    assert!(outcome.player_collision);

    // Standing clear of traffic is safe.
    let outcome = world.tick(parked_player(), Direction::Down);
    assert!(!outcome.player_collision);
}

#[test]
fn test_population_restored_after_hit_at_cap() {
    // Sidewalk everywhere except one road row carrying the vehicle.
    let mut map = CityMap::new(60, 60);
    for y in 0..60 {
        for x in 0..60 {
            map.place_tile(x, y, Tile::new(TileKind::Sidewalk));
        }
    }
    for x in 0..60 {
        map.place_tile(x, 30, Tile::new(TileKind::Road));
    }

    let mut world = SimWorld::new_with_seed(map, Vec::new(), Vec::new(), 9);
    for i in 0..MAX_POPULATION {
        let x = 100.0 + (i % 40) as f32 * 20.0;
        let y = 100.0 + (i / 40) as f32 * 20.0;
        world
            .pedestrians
            .push(Pedestrian::new(1, Position::new(x, y), Direction::Down));
    }

    let lane_y = 30.0 * TILE_SIZE + 9.0;
    world
        .vehicles
        .push(Vehicle::new(VehicleKind::Car, Position::new(500.0, lane_y), Direction::Right));
    world.pedestrians[0].position = Position::new(505.0, lane_y);

    world.tick(parked_player(), Direction::Down);
    assert_eq!(world.stats.pedestrians_hit, 1);
    // The body keeps its slot; nothing spawns past the cap.
    assert_eq!(world.pedestrians().len(), MAX_POPULATION);

    // Let the hurt animation play out with no further traffic.
    world.vehicles.clear();
    for _ in 0..60 {
        world.tick(parked_player(), Direction::Down);
    }

    assert_eq!(world.stats.pedestrians_removed, 1);
    assert_eq!(world.pedestrians().len(), MAX_POPULATION);
    assert!(world.pedestrians().iter().all(|p| p.alive));
}

#[test]
fn test_struck_pedestrian_lingers_then_is_removed() {
    let mut world = SimWorld::new_with_seed(open_road_map(), Vec::new(), Vec::new(), 1);
    world
        .vehicles
        .push(Vehicle::new(VehicleKind::Car, Position::new(500.0, 540.0), Direction::Right));
    world
        .pedestrians
        .push(Pedestrian::new(1, Position::new(505.0, 540.0), Direction::Down));

    let outcome = world.tick(parked_player(), Direction::Down);
    assert_eq!(world.stats.pedestrians_hit, 1);
    assert_eq!(outcome.pedestrians_removed, 0);
    // The body lingers; no sidewalk exists here, so no replacement either.
    assert_eq!(world.pedestrians().len(), 1);
    assert!(!world.pedestrians()[0].alive);

    let mut ticks = 1;
    while !world.pedestrians().is_empty() {
        ticks += 1;
        assert!(ticks < 100, "hurt pedestrian never removed");
        world.tick(parked_player(), Direction::Down);
    }
    assert_eq!(ticks as u32, 1 + 5 * ANIMATION_SPEED + 1);
    assert_eq!(world.stats.pedestrians_removed, 1);
}
