//! Population maintenance for both agent kinds
//!
//! Vehicles spawn at a fixed interval from an authored catalog of
//! lane-aligned points, capped and spaced so two cars never spawn on top of
//! each other. Pedestrians spawn by bounded-retry random placement on
//! sidewalk tiles. Failed placements are silent no-ops; the next eligible
//! tick retries.

use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;

use super::map::CityMap;
use super::pedestrian::{Pedestrian, ARCHETYPE_COUNT};
use super::types::{Direction, Position, TILE_SIZE};
use super::vehicle::{Vehicle, VehicleKind, MAX_CARS, SPAWN_INTERVAL};

/// Minimum Euclidean distance from an existing vehicle for a spawn point
/// to be usable
pub const SPAWN_CLEARANCE: f32 = 100.0;

/// Candidate spawn points tried per vehicle spawn attempt
pub const SPAWN_CANDIDATES: usize = 5;

/// Placement retries per pedestrian spawn call
pub const PEDESTRIAN_SPAWN_ATTEMPTS: usize = 50;

/// Margin from the map edge for pedestrian placement, in world units
pub const PEDESTRIAN_SPAWN_MARGIN: f32 = 100.0;

/// An authored lane-aligned vehicle spawn point
#[derive(Debug, Clone, Copy)]
pub struct SpawnPoint {
    pub position: Position,
    pub direction: Direction,
}

impl SpawnPoint {
    pub fn new(position: Position, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }
}

/// Rate-limited vehicle spawner over a fixed spawn-point catalog
#[derive(Debug, Default)]
pub struct VehicleSpawner {
    timer: u32,
    points: Vec<SpawnPoint>,
}

impl VehicleSpawner {
    pub fn new(points: Vec<SpawnPoint>) -> Self {
        Self { timer: 0, points }
    }

    /// Top up the vehicle population: at most one spawn per
    /// [`SPAWN_INTERVAL`] ticks, never past [`MAX_CARS`]. Returns true
    /// when a vehicle was spawned.
    pub fn maintain<R: Rng + ?Sized>(&mut self, vehicles: &mut Vec<Vehicle>, rng: &mut R) -> bool {
        if vehicles.len() >= MAX_CARS || self.points.is_empty() {
            return false;
        }

        self.timer += 1;
        if self.timer < SPAWN_INTERVAL {
            return false;
        }
        self.timer = 0;

        for _ in 0..SPAWN_CANDIDATES {
            let point = match self.points.choose(rng) {
                Some(point) => *point,
                None => return false,
            };

            if position_blocked(point.position, vehicles, SPAWN_CLEARANCE) {
                continue;
            }

            let kind = *VehicleKind::ALL.choose(rng).unwrap_or(&VehicleKind::Car);
            vehicles.push(Vehicle::new(kind, point.position, point.direction));
            return true;
        }

        debug!("no clear vehicle spawn point this tick");
        false
    }
}

/// Is any existing vehicle within `min_dist` of the candidate position?
pub fn position_blocked(candidate: Position, vehicles: &[Vehicle], min_dist: f32) -> bool {
    vehicles
        .iter()
        .any(|vehicle| vehicle.position.distance(&candidate) < min_dist)
}

/// Try to place one pedestrian on a random sidewalk tile inside the map's
/// margins, with a bounded retry budget. Returns None when no spot was
/// found; the caller simply tries again later.
pub fn spawn_pedestrian<R: Rng + ?Sized>(map: &CityMap, rng: &mut R) -> Option<Pedestrian> {
    let max_x = map.width() as f32 * TILE_SIZE - PEDESTRIAN_SPAWN_MARGIN;
    let max_y = map.height() as f32 * TILE_SIZE - PEDESTRIAN_SPAWN_MARGIN;
    if max_x <= PEDESTRIAN_SPAWN_MARGIN || max_y <= PEDESTRIAN_SPAWN_MARGIN {
        return None;
    }

    for _ in 0..PEDESTRIAN_SPAWN_ATTEMPTS {
        let x = rng.random_range(PEDESTRIAN_SPAWN_MARGIN..max_x);
        let y = rng.random_range(PEDESTRIAN_SPAWN_MARGIN..max_y);

        if map.is_sidewalk(x, y) {
            let archetype = rng.random_range(1..=ARCHETYPE_COUNT);
            let direction = Direction::random(rng);
            return Some(Pedestrian::new(archetype, Position::new(x, y), direction));
        }
    }
    debug!("no sidewalk tile found for pedestrian spawn");
    None
}
