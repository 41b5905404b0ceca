//! Standalone city agent simulation
//!
//! This module contains all core simulation logic: the map query surface,
//! the vehicle and pedestrian state machines, hazard detection, and
//! population maintenance. It has no rendering or input dependencies and
//! can be driven headless, one fixed-step tick at a time.

mod collision;
mod intersection;
mod map;
mod pedestrian;
mod spawner;
mod types;
mod vehicle;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use collision::{
    hitbox_contains_player, lethal_vehicle_collision, player_blocked_by_pedestrians,
    player_blocked_by_vehicles, vehicle_hitbox, Hitbox, BLOCKING_PADDING, LETHAL_SPEED,
    PEDESTRIAN_BLOCK_RADIUS,
    PLAYER_HALF_SIZE, PLAYER_RADIUS, REAR_EXEMPTION,
};
#[allow(unused_imports)]
pub use intersection::{
    find_intersection, Intersection, IntersectionKind, INTERSECTION_THRESHOLD,
};
#[allow(unused_imports)]
pub use map::{CityMap, Rotation, Surface, Tile, TileKind};
#[allow(unused_imports)]
pub use pedestrian::{
    Pedestrian, PedestrianState, PedestrianUpdate, ANIMATION_SPEED, ARCHETYPE_COUNT,
    DECISION_INTERVAL, MAX_POPULATION, PEDESTRIAN_RADIUS, SIT_DURATION, VEHICLE_RADIUS,
    WALK_SPEED,
};
#[allow(unused_imports)]
pub use spawner::{
    position_blocked, spawn_pedestrian, SpawnPoint, VehicleSpawner, PEDESTRIAN_SPAWN_MARGIN,
    SPAWN_CLEARANCE,
};
#[allow(unused_imports)]
pub use types::{
    Direction, Position, MAP_HEIGHT, MAP_TILES_HEIGHT, MAP_TILES_WIDTH, MAP_WIDTH, TILE_SIZE,
};
#[allow(unused_imports)]
pub use vehicle::{
    RemovalReason, Vehicle, VehicleKind, VehicleSnapshot, VehicleState, VehicleUpdate,
    BRAKE_DISTANCE, BRAKE_FORCE, CAR_MAX_SPEED, CAR_START_SPEED, DESPAWN_DISTANCE, MAX_CARS,
    MAX_WAIT_FRAMES, SPAWN_INTERVAL, STOP_DISTANCE, TURN_COOLDOWN_FRAMES,
};
pub use world::{PlayerView, SimStats, SimWorld, TickOutcome};
