//! Simulation world and tick driver
//!
//! Owns the agent stores and advances them in a fixed order each tick:
//! spawn maintenance, the vehicle pass (over a start-of-tick position
//! snapshot), the pedestrian pass, then the lethal hazard check against
//! post-update positions. The map and intersection tables are immutable
//! once built; the player is owned externally and passed in per tick.

use anyhow::Result;
use log::debug;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use super::collision::{
    lethal_vehicle_collision, player_blocked_by_pedestrians, player_blocked_by_vehicles,
};
use super::intersection::{Intersection, IntersectionKind};
use super::map::CityMap;
use super::pedestrian::{Pedestrian, PedestrianUpdate, MAX_POPULATION};
use super::spawner::{spawn_pedestrian, SpawnPoint, VehicleSpawner};
use super::types::{Direction, Position, MAP_TILES_HEIGHT, MAP_TILES_WIDTH, TILE_SIZE};
use super::vehicle::{Vehicle, VehicleSnapshot, VehicleUpdate};

/// The externally-owned player, as seen by the core
#[derive(Debug, Clone, Copy)]
pub struct PlayerView {
    pub position: Position,
    pub direction: Direction,
}

impl Default for PlayerView {
    fn default() -> Self {
        Self {
            position: Position::new(500.0, 500.0),
            direction: Direction::Down,
        }
    }
}

/// What one tick did to the world
#[derive(Debug, Clone, Copy, Default)]
pub struct TickOutcome {
    pub vehicles_removed: usize,
    pub pedestrians_removed: usize,
    /// A vehicle lethally struck the player this tick
    pub player_collision: bool,
}

/// Cumulative simulation counters
#[derive(Debug, Clone, Copy, Default)]
pub struct SimStats {
    pub vehicles_spawned: usize,
    pub vehicles_removed: usize,
    pub pedestrians_spawned: usize,
    pub pedestrians_hit: usize,
    pub pedestrians_removed: usize,
}

/// The main simulation world
pub struct SimWorld {
    /// Static tile map, read-only after construction
    pub map: CityMap,

    /// Authored intersection table
    pub intersections: Vec<Intersection>,

    /// Vehicle spawn policy and catalog
    pub spawner: VehicleSpawner,

    /// All live vehicles
    pub vehicles: Vec<Vehicle>,

    /// All pedestrians, including hurt ones finishing their animation
    pub pedestrians: Vec<Pedestrian>,

    /// Player state as of the last tick
    pub player: PlayerView,

    /// Ticks elapsed
    pub frame: u64,

    /// Cumulative counters
    pub stats: SimStats,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl SimWorld {
    fn new_internal(
        map: CityMap,
        intersections: Vec<Intersection>,
        spawn_points: Vec<SpawnPoint>,
        rng: Option<StdRng>,
    ) -> Self {
        Self {
            map,
            intersections,
            spawner: VehicleSpawner::new(spawn_points),
            vehicles: Vec::new(),
            pedestrians: Vec::new(),
            player: PlayerView::default(),
            frame: 0,
            stats: SimStats::default(),
            rng,
        }
    }

    pub fn new(
        map: CityMap,
        intersections: Vec<Intersection>,
        spawn_points: Vec<SpawnPoint>,
    ) -> Self {
        Self::new_internal(map, intersections, spawn_points, None)
    }

    /// Create a world with a seeded RNG for reproducible simulations
    pub fn new_with_seed(
        map: CityMap,
        intersections: Vec<Intersection>,
        spawn_points: Vec<SpawnPoint>,
        seed: u64,
    ) -> Self {
        Self::new_internal(
            map,
            intersections,
            spawn_points,
            Some(StdRng::seed_from_u64(seed)),
        )
    }

    /// Live vehicles for a renderer, in stable iteration order
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Live pedestrians for a renderer, in stable iteration order
    pub fn pedestrians(&self) -> &[Pedestrian] {
        &self.pedestrians
    }

    /// One-time bulk spawn up to the target pedestrian population
    pub fn populate_pedestrians(&mut self) {
        let Self {
            map,
            pedestrians,
            rng,
            stats,
            ..
        } = self;

        let mut thread_rng;
        let rng: &mut dyn RngCore = match rng.as_mut() {
            Some(seeded) => seeded,
            None => {
                thread_rng = rand::rng();
                &mut thread_rng
            }
        };

        // One bounded attempt per missing slot; a failed placement is a
        // silent no-op.
        for _ in pedestrians.len()..MAX_POPULATION {
            if let Some(pedestrian) = spawn_pedestrian(map, rng) {
                pedestrians.push(pedestrian);
                stats.pedestrians_spawned += 1;
            }
        }
    }

    /// Check a proposed player move against vehicle hitboxes and living
    /// pedestrians. Returns true when the move is allowed. Must be called
    /// before the external movement step commits the position, so blocking
    /// sees current agent positions.
    pub fn validate_player_move(&self, proposed: Position) -> bool {
        !player_blocked_by_vehicles(proposed, &self.vehicles)
            && !player_blocked_by_pedestrians(proposed, &self.pedestrians)
    }

    /// Advance the whole simulation by one tick.
    pub fn tick(&mut self, player_position: Position, player_direction: Direction) -> TickOutcome {
        self.frame += 1;
        self.player = PlayerView {
            position: player_position,
            direction: player_direction,
        };

        let Self {
            map,
            intersections,
            spawner,
            vehicles,
            pedestrians,
            stats,
            rng,
            ..
        } = self;

        let mut thread_rng;
        let rng: &mut dyn RngCore = match rng.as_mut() {
            Some(seeded) => seeded,
            None => {
                thread_rng = rand::rng();
                &mut thread_rng
            }
        };

        let mut outcome = TickOutcome::default();

        // Spawn maintenance.
        if spawner.maintain(vehicles, rng) {
            stats.vehicles_spawned += 1;
        }

        // Vehicle pass. Every vehicle reads the same start-of-tick position
        // snapshot, so in-place removal during the pass is safe.
        let snapshot: Vec<VehicleSnapshot> = vehicles
            .iter()
            .map(|vehicle| VehicleSnapshot {
                position: vehicle.position,
            })
            .collect();

        let mut removed_vehicles = Vec::new();
        for (index, vehicle) in vehicles.iter_mut().enumerate() {
            match vehicle.update(
                map,
                intersections,
                &snapshot,
                index,
                player_position,
                rng,
            ) {
                VehicleUpdate::Keep => {}
                VehicleUpdate::Remove(reason) => {
                    debug!(
                        "removing vehicle at ({:.0}, {:.0}): {:?}",
                        vehicle.position.x, vehicle.position.y, reason
                    );
                    removed_vehicles.push(index);
                }
            }
        }
        for index in removed_vehicles.iter().rev() {
            vehicles.remove(*index);
        }
        outcome.vehicles_removed = removed_vehicles.len();
        stats.vehicles_removed += removed_vehicles.len();

        // Pedestrian pass. A hit pedestrian stays until its hurt animation
        // finishes; the replacement spawns the tick the body is removed, so
        // the population holds constant even when the store is at the cap.
        let mut removed_pedestrians = Vec::new();
        for (index, pedestrian) in pedestrians.iter_mut().enumerate() {
            match pedestrian.update(map, vehicles, rng) {
                PedestrianUpdate::Keep => {}
                PedestrianUpdate::Hit => stats.pedestrians_hit += 1,
                PedestrianUpdate::Remove => removed_pedestrians.push(index),
            }
        }
        for index in removed_pedestrians.iter().rev() {
            pedestrians.remove(*index);
        }
        outcome.pedestrians_removed = removed_pedestrians.len();
        stats.pedestrians_removed += removed_pedestrians.len();

        for _ in 0..removed_pedestrians.len() {
            if pedestrians.len() >= MAX_POPULATION {
                break;
            }
            if let Some(pedestrian) = spawn_pedestrian(map, rng) {
                pedestrians.push(pedestrian);
                stats.pedestrians_spawned += 1;
            }
        }

        // Hazard check against post-update positions.
        outcome.player_collision = lethal_vehicle_collision(player_position, vehicles);

        outcome
    }

    /// Build the authored residential district: three avenues, four
    /// streets, crosswalks at every crossing, the twelve authored
    /// intersections, and the fourteen lane-aligned spawn points.
    pub fn create_city_world() -> Result<Self> {
        let (map, intersections, spawn_points) = build_city_layout()?;
        Ok(Self::new(map, intersections, spawn_points))
    }

    /// Authored city world with a seeded RNG
    pub fn create_city_world_with_seed(seed: u64) -> Result<Self> {
        let (map, intersections, spawn_points) = build_city_layout()?;
        Ok(Self::new_with_seed(map, intersections, spawn_points, seed))
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== City Simulation Summary ===");
        println!("Tick: {}", self.frame);
        println!(
            "Vehicles: {} (spawned {}, removed {})",
            self.vehicles.len(),
            self.stats.vehicles_spawned,
            self.stats.vehicles_removed
        );
        println!(
            "Pedestrians: {} (hit {}, removed {})",
            self.pedestrians.len(),
            self.stats.pedestrians_hit,
            self.stats.pedestrians_removed
        );
        println!(
            "Player: ({:.0}, {:.0}) facing {:?}",
            self.player.position.x, self.player.position.y, self.player.direction
        );
    }
}

/// Center-line rows (in tiles) of the horizontal avenues. The road bodies
/// span two tiles to either side; intersections sit on these rows.
const AVENUE_ROWS: [usize; 3] = [30, 60, 84];

/// Center-line columns (in tiles) of the vertical streets
const STREET_COLS: [usize; 4] = [29, 54, 79, 106];

/// Number of drivable rows/columns in a road body
const ROAD_WIDTH_TILES: usize = 5;

/// Street segments as (start row, length), leaving gaps over the avenues'
/// road rows (28..=32, 58..=62, 82..=86) so the street placers never cut
/// an avenue with their sidewalk columns. The junction boxes themselves
/// come from the avenues. Streets end at the southern avenue, matching the
/// up-only intersection row there.
const STREET_SEGMENTS: [(usize, usize); 3] = [(8, 20), (33, 25), (63, 19)];

fn tile(n: usize) -> f32 {
    n as f32 * TILE_SIZE
}

/// Build one intersection whose exit lanes follow the authored pattern:
/// up exits two tiles above center, down two below, left/right two aside.
fn grid_intersection(
    col: usize,
    row: usize,
    kind: IntersectionKind,
    directions: &[Direction],
) -> Result<Intersection> {
    let exits = directions
        .iter()
        .map(|&direction| {
            let target = match direction {
                Direction::Up => Position::new(tile(col), tile(row - 2)),
                Direction::Down => Position::new(tile(col), tile(row + 2)),
                Direction::Left => Position::new(tile(col - 2), tile(row)),
                Direction::Right => Position::new(tile(col + 2), tile(row)),
            };
            (direction, vec![target])
        })
        .collect();
    Intersection::new(Position::new(tile(col), tile(row)), kind, exits)
}

/// Authored map, intersections, and spawn catalog for the default world
fn build_city_layout() -> Result<(CityMap, Vec<Intersection>, Vec<SpawnPoint>)> {
    use Direction::{Down, Left, Right, Up};
    use IntersectionKind::{Cross, Tee};

    let mut map = CityMap::new(MAP_TILES_WIDTH, MAP_TILES_HEIGHT);

    // Avenues run the full grid width. The row constants name center
    // lines, so the placers start two rows up.
    for &row in &AVENUE_ROWS {
        map.place_horizontal_road(8, row - 2, 100);
    }
    // Streets are segmented around the avenues; their road columns cover
    // the avenues' sidewalk rows at each approach, reconnecting the grid.
    for &col in &STREET_COLS {
        for &(start_y, length) in &STREET_SEGMENTS {
            map.place_vertical_road(col - 2, start_y, length);
        }
    }

    // Crosswalks at every crossing: across the street on the avenue's
    // northern sidewalk rows, and across the avenue through the junction's
    // western lane.
    for &row in &AVENUE_ROWS {
        for &col in &STREET_COLS {
            map.place_crosswalk_over_vertical(col - 2, row - 4, ROAD_WIDTH_TILES);
            map.place_crosswalk_over_vertical(col - 2, row - 3, ROAD_WIDTH_TILES);
            map.place_crosswalk_over_horizontal(col - 1, row - 2, ROAD_WIDTH_TILES);
        }
    }

    let intersections = vec![
        // Avenue at row 30
        grid_intersection(29, 30, Tee, &[Up, Down, Right])?,
        grid_intersection(54, 30, Cross, &[Up, Down, Left, Right])?,
        grid_intersection(79, 30, Cross, &[Up, Down, Left, Right])?,
        grid_intersection(106, 30, Tee, &[Up, Down, Left])?,
        // Avenue at row 60
        grid_intersection(29, 60, Cross, &[Up, Down, Right])?,
        grid_intersection(54, 60, Cross, &[Up, Down, Left, Right])?,
        grid_intersection(79, 60, Cross, &[Up, Down, Left, Right])?,
        grid_intersection(106, 60, Tee, &[Up, Down, Left])?,
        // Avenue at row 84
        grid_intersection(29, 84, Tee, &[Up, Right])?,
        grid_intersection(54, 84, Tee, &[Up, Left, Right])?,
        grid_intersection(79, 84, Tee, &[Up, Left, Right])?,
        grid_intersection(106, 84, Tee, &[Up, Left])?,
    ];

    // Lane-aligned spawn points. Eastbound and southbound enter on the
    // center lines and take part in intersection routing; westbound and
    // northbound hold the opposing lane one tile over and cruise through.
    let mut spawn_points = Vec::new();
    for &row in &AVENUE_ROWS {
        spawn_points.push(SpawnPoint::new(Position::new(tile(8), tile(row)), Right));
        spawn_points.push(SpawnPoint::new(
            Position::new(tile(100), tile(row + 1)),
            Left,
        ));
    }
    for &col in &STREET_COLS {
        spawn_points.push(SpawnPoint::new(Position::new(tile(col), tile(8)), Down));
        spawn_points.push(SpawnPoint::new(Position::new(tile(col + 1), tile(78)), Up));
    }

    Ok((map, intersections, spawn_points))
}
