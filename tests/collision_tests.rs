//! Player collision and hazard rule tests

use city_sim::simulation::{
    hitbox_contains_player, lethal_vehicle_collision, player_blocked_by_pedestrians,
    player_blocked_by_vehicles, vehicle_hitbox, Direction, Pedestrian, Position, Vehicle,
    VehicleKind, LETHAL_SPEED, PEDESTRIAN_BLOCK_RADIUS, PLAYER_RADIUS, REAR_EXEMPTION,
};

fn car_at(x: f32, y: f32, direction: Direction) -> Vehicle {
    Vehicle::new(VehicleKind::Car, Position::new(x, y), direction)
}

#[test]
fn test_hitbox_rotates_with_heading() {
    let southbound = car_at(100.0, 100.0, Direction::Down);
    let hitbox = vehicle_hitbox(&southbound);
    assert_eq!(hitbox.right - hitbox.left, 27.0);
    assert_eq!(hitbox.bottom - hitbox.top, 46.0);

    let eastbound = car_at(100.0, 100.0, Direction::Right);
    let hitbox = vehicle_hitbox(&eastbound);
    assert_eq!(hitbox.right - hitbox.left, 46.0);
    assert_eq!(hitbox.bottom - hitbox.top, 27.0);
}

#[test]
fn test_truck_footprint_is_larger() {
    let truck = Vehicle::new(VehicleKind::Truck, Position::new(0.0, 0.0), Direction::Down);
    let hitbox = vehicle_hitbox(&truck);
    assert_eq!(hitbox.right - hitbox.left, 32.0);
    assert_eq!(hitbox.bottom - hitbox.top, 51.0);

    // Ambulances share the car footprint.
    let ambulance = Vehicle::new(VehicleKind::Ambulance, Position::new(0.0, 0.0), Direction::Down);
    let hitbox = vehicle_hitbox(&ambulance);
    assert_eq!(hitbox.right - hitbox.left, 27.0);
}

#[test]
fn test_blocking_check_includes_padding() {
    // Southbound car: hitbox right edge at x = 113.5. With the player
    // half-size (6) and blocking padding (5), contact reaches x = 124.5.
    let vehicles = vec![car_at(100.0, 100.0, Direction::Down)];

    assert!(player_blocked_by_vehicles(
        Position::new(124.0, 100.0),
        &vehicles
    ));
    assert!(!player_blocked_by_vehicles(
        Position::new(125.0, 100.0),
        &vehicles
    ));
    assert!(!player_blocked_by_vehicles(Position::new(124.0, 100.0), &[]));
}

#[test]
fn test_living_pedestrians_block_the_player() {
    let threshold = PLAYER_RADIUS + PEDESTRIAN_BLOCK_RADIUS;
    let mut pedestrian = Pedestrian::new(1, Position::new(200.0, 200.0), Direction::Down);
    let proposed = Position::new(200.0 + threshold - 0.5, 200.0);

    assert!(player_blocked_by_pedestrians(
        proposed,
        std::slice::from_ref(&pedestrian)
    ));
    assert!(!player_blocked_by_pedestrians(
        Position::new(200.0 + threshold, 200.0),
        std::slice::from_ref(&pedestrian)
    ));

    // A hurt pedestrian no longer blocks movement.
    pedestrian.alive = false;
    assert!(!player_blocked_by_pedestrians(
        proposed,
        std::slice::from_ref(&pedestrian)
    ));
}

#[test]
fn test_slow_vehicles_are_never_lethal() {
    let mut vehicle = car_at(100.0, 100.0, Direction::Right);
    vehicle.speed = LETHAL_SPEED - 0.1;
    let player = Position::new(110.0, 100.0);

    assert!(!lethal_vehicle_collision(
        player,
        std::slice::from_ref(&vehicle)
    ));

    vehicle.speed = LETHAL_SPEED;
    assert!(lethal_vehicle_collision(
        player,
        std::slice::from_ref(&vehicle)
    ));
}

#[test]
fn test_rear_contact_is_exempt() {
    // Eastbound car at speed: contact well behind the center is harmless,
    // contact ahead of the rear line kills.
    let vehicle = car_at(100.0, 100.0, Direction::Right);
    let vehicles = std::slice::from_ref(&vehicle);

    let rear = Position::new(100.0 - REAR_EXEMPTION - 0.5, 100.0);
    assert!(!lethal_vehicle_collision(rear, vehicles));
    // Exactly on the rear line is still exempt.
    assert!(!lethal_vehicle_collision(
        Position::new(100.0 - REAR_EXEMPTION, 100.0),
        vehicles
    ));

    let front = Position::new(110.0, 100.0);
    assert!(lethal_vehicle_collision(front, vehicles));
    let side = Position::new(100.0, 95.0);
    assert!(lethal_vehicle_collision(side, vehicles));
}

#[test]
fn test_rear_exemption_follows_heading() {
    let vehicle = car_at(100.0, 100.0, Direction::Up);
    let vehicles = std::slice::from_ref(&vehicle);

    // Below an upward-moving vehicle is behind it.
    assert!(!lethal_vehicle_collision(
        Position::new(100.0, 121.0),
        vehicles
    ));
    assert!(lethal_vehicle_collision(
        Position::new(100.0, 85.0),
        vehicles
    ));
}

#[test]
fn test_lethal_check_requires_hitbox_overlap() {
    let vehicle = car_at(100.0, 100.0, Direction::Right);
    // Fast, in front, but out of reach.
    assert!(!lethal_vehicle_collision(
        Position::new(160.0, 100.0),
        std::slice::from_ref(&vehicle)
    ));

    let hitbox = vehicle_hitbox(&vehicle);
    assert!(hitbox_contains_player(110.0, 100.0, &hitbox, 0.0));
    assert!(!hitbox_contains_player(160.0, 100.0, &hitbox, 0.0));
}
