//! Vehicle state machine
//!
//! Each vehicle runs a small per-tick state machine: lane keeping, an
//! obstacle scan that picks a braking tier, a local routing decision at
//! authored intersections, turn blending, and kinematic movement. Broken
//! vehicles (off the road network, stalled, or far from the player) are
//! shed rather than repaired; the spawner restores the population.

use ordered_float::OrderedFloat;
use rand::seq::IndexedRandom;
use rand::Rng;

use super::intersection::{find_intersection, Intersection};
use super::map::CityMap;
use super::types::{Direction, Position};

/// Maximum number of vehicles alive at once
pub const MAX_CARS: usize = 80;

/// Ticks between vehicle spawn attempts
pub const SPAWN_INTERVAL: u32 = 15;

/// Speed a vehicle spawns with
pub const CAR_START_SPEED: f32 = 3.0;

/// Cruise speed vehicles accelerate toward
pub const CAR_MAX_SPEED: f32 = 5.0;

/// Distance from the player beyond which a vehicle is removed
pub const DESPAWN_DISTANCE: f32 = 2000.0;

/// Obstacle distance below which a vehicle stops entirely
pub const STOP_DISTANCE: f32 = 100.0;

/// Obstacle distance below which a vehicle starts braking
pub const BRAKE_DISTANCE: f32 = 120.0;

/// Speed lost per tick while braking
pub const BRAKE_FORCE: f32 = 0.15;

/// Speed gained per tick while driving below cruise speed
pub const ACCELERATION: f32 = 0.06;

/// Ticks after a turn before lane keeping and routing resume
pub const TURN_COOLDOWN_FRAMES: u32 = 30;

/// Ticks a vehicle may sit blocked before it is removed as stalled
pub const MAX_WAIT_FRAMES: u32 = 500;

/// Cross-axis drift tolerated before lane correction kicks in
pub const LANE_SNAP_TOLERANCE: f32 = 3.0;

/// Fraction of the remaining lane offset corrected per tick
pub const LANE_CORRECTION: f32 = 0.15;

/// Fraction of the remaining turn vector covered per tick
pub const TURN_BLEND: f32 = 0.15;

/// Distance to the turn target at which a turn completes
pub const TURN_ARRIVE_DISTANCE: f32 = 10.0;

/// Cross-axis distance under which another vehicle shares the lane
pub const SAME_LANE_TOLERANCE: f32 = 15.0;

/// Cross-axis distance under which the player counts as in-lane
pub const PLAYER_LANE_TOLERANCE: f32 = 25.0;

/// Probability of keeping the current heading at an intersection when the
/// straight-through exit is legal
pub const STRAIGHT_THROUGH_BIAS: f64 = 0.90;

/// Vehicle archetype, which determines the collision footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleKind {
    Car,
    Truck,
    Ambulance,
}

impl VehicleKind {
    pub const ALL: [VehicleKind; 3] = [
        VehicleKind::Car,
        VehicleKind::Truck,
        VehicleKind::Ambulance,
    ];
}

/// Discrete vehicle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleState {
    Driving,
    Braking,
    Waiting,
    Turning,
}

/// Why a vehicle was removed from the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// Drove onto a tile that is not road or crosswalk
    OffRoad,
    /// Sat blocked longer than [`MAX_WAIT_FRAMES`]
    Stalled,
    /// Exceeded [`DESPAWN_DISTANCE`] from the player
    OutOfRange,
}

/// Result of a vehicle update indicating what the tick driver should do
#[derive(Debug, Clone, Copy)]
pub enum VehicleUpdate {
    Keep,
    Remove(RemovalReason),
}

/// Read-only view of a vehicle taken at the start of the tick, so the
/// obstacle scan never observes half-updated positions.
#[derive(Debug, Clone, Copy)]
pub struct VehicleSnapshot {
    pub position: Position,
}

/// A traffic vehicle
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub kind: VehicleKind,
    pub position: Position,
    pub direction: Direction,
    pub speed: f32,
    pub target_speed: f32,
    pub state: VehicleState,
    /// Fixed y coordinate to hold while heading left/right
    pub lane_y: Option<f32>,
    /// Fixed x coordinate to hold while heading up/down
    pub lane_x: Option<f32>,
    /// Lane coordinate to blend toward while turning
    pub turn_target: Option<Position>,
    /// Index of the intersection last acted on, cleared once the vehicle
    /// leaves the zone; prevents re-triggering a decision every tick
    pub last_intersection: Option<usize>,
    pub frames_since_turn: u32,
    pub wait_timer: u32,
}

impl Vehicle {
    pub fn new(kind: VehicleKind, position: Position, direction: Direction) -> Self {
        let (lane_x, lane_y) = if direction.is_horizontal() {
            (None, Some(position.y))
        } else {
            (Some(position.x), None)
        };
        Self {
            kind,
            position,
            direction,
            speed: CAR_START_SPEED,
            target_speed: CAR_MAX_SPEED,
            state: VehicleState::Driving,
            lane_y,
            lane_x,
            turn_target: None,
            last_intersection: None,
            frames_since_turn: TURN_COOLDOWN_FRAMES + 1,
            wait_timer: 0,
        }
    }

    /// Sprite rotation for a renderer
    pub fn angle(&self) -> f32 {
        self.direction.angle()
    }

    /// Distance to another agent measured along the heading axis, if that
    /// agent is strictly ahead and within `lane_tolerance` on the cross
    /// axis.
    fn ahead_distance(&self, other: Position, lane_tolerance: f32) -> Option<f32> {
        let (same_lane, dist) = match self.direction {
            Direction::Right => (
                (self.position.y - other.y).abs() < lane_tolerance,
                other.x - self.position.x,
            ),
            Direction::Left => (
                (self.position.y - other.y).abs() < lane_tolerance,
                self.position.x - other.x,
            ),
            Direction::Down => (
                (self.position.x - other.x).abs() < lane_tolerance,
                other.y - self.position.y,
            ),
            Direction::Up => (
                (self.position.x - other.x).abs() < lane_tolerance,
                self.position.y - other.y,
            ),
        };
        (same_lane && dist > 0.0).then_some(dist)
    }

    /// Nearest obstacle (vehicle or player) strictly ahead within
    /// [`BRAKE_DISTANCE`], if any.
    fn nearest_obstacle_ahead(
        &self,
        snapshot: &[VehicleSnapshot],
        self_index: usize,
        player: Position,
    ) -> Option<f32> {
        let vehicle_dists = snapshot
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self_index)
            .filter_map(|(_, other)| self.ahead_distance(other.position, SAME_LANE_TOLERANCE));
        let player_dist = self
            .ahead_distance(player, PLAYER_LANE_TOLERANCE)
            .into_iter();
        vehicle_dists
            .chain(player_dist)
            .filter(|dist| *dist < BRAKE_DISTANCE)
            .min_by_key(|dist| OrderedFloat(*dist))
    }

    /// Nudge the cross-axis coordinate toward the lane anchor. Only runs
    /// while driving straight, once the post-turn cooldown has elapsed, and
    /// only when the drift exceeds the snap tolerance.
    fn keep_lane(&mut self) {
        if self.state != VehicleState::Driving || self.frames_since_turn <= TURN_COOLDOWN_FRAMES {
            return;
        }
        if self.direction.is_horizontal() {
            if let Some(lane_y) = self.lane_y {
                if (self.position.y - lane_y).abs() > LANE_SNAP_TOLERANCE {
                    self.position.y += (lane_y - self.position.y) * LANE_CORRECTION;
                }
            }
        } else if let Some(lane_x) = self.lane_x {
            if (self.position.x - lane_x).abs() > LANE_SNAP_TOLERANCE {
                self.position.x += (lane_x - self.position.x) * LANE_CORRECTION;
            }
        }
    }

    /// Pick an exit direction at an intersection: never reverse, keep the
    /// current heading with [`STRAIGHT_THROUGH_BIAS`] when legal, otherwise
    /// choose uniformly among the remaining exits. Updates the lane anchor
    /// and returns the new heading with its lane target.
    fn choose_exit<R: Rng + ?Sized>(
        &mut self,
        intersection: &Intersection,
        rng: &mut R,
    ) -> (Direction, Option<Position>) {
        let opposite = self.direction.opposite();
        let available: Vec<Direction> = intersection
            .directions()
            .filter(|d| *d != opposite)
            .collect();

        if available.is_empty() {
            return (self.direction, None);
        }

        let new_direction = if available.contains(&self.direction) {
            if rng.random_range(0.0..1.0) < STRAIGHT_THROUGH_BIAS {
                self.direction
            } else {
                let turns: Vec<Direction> = available
                    .iter()
                    .copied()
                    .filter(|d| *d != self.direction)
                    .collect();
                *turns.choose(rng).unwrap_or(&self.direction)
            }
        } else {
            *available.choose(rng).unwrap_or(&self.direction)
        };

        let target = intersection.exit_target(new_direction);

        if new_direction.is_horizontal() {
            self.lane_y = Some(target.map(|t| t.y).unwrap_or(self.position.y));
            self.lane_x = None;
        } else {
            self.lane_x = Some(target.map(|t| t.x).unwrap_or(self.position.x));
            self.lane_y = None;
        }

        (new_direction, target)
    }

    /// Advance this vehicle by one tick.
    ///
    /// `snapshot` holds every vehicle's position captured at tick start
    /// (including this one, skipped via `self_index`).
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        map: &CityMap,
        intersections: &[Intersection],
        snapshot: &[VehicleSnapshot],
        self_index: usize,
        player: Position,
        rng: &mut R,
    ) -> VehicleUpdate {
        self.frames_since_turn = self.frames_since_turn.saturating_add(1);

        self.keep_lane();

        // Braking tiers from the obstacle scan. A turning vehicle finishes
        // its blend before rejoining traffic flow.
        let mut waiting = false;
        if self.state != VehicleState::Turning {
            match self.nearest_obstacle_ahead(snapshot, self_index, player) {
                Some(dist) if dist < STOP_DISTANCE => {
                    self.state = VehicleState::Waiting;
                    self.speed = (self.speed - BRAKE_FORCE * 3.0).max(0.0);
                    self.wait_timer += 1;
                    if self.wait_timer > MAX_WAIT_FRAMES {
                        return VehicleUpdate::Remove(RemovalReason::Stalled);
                    }
                    waiting = true;
                }
                Some(_) => {
                    self.state = VehicleState::Braking;
                    self.speed = (self.speed - BRAKE_FORCE).max(1.0);
                }
                None => {
                    self.state = VehicleState::Driving;
                    self.speed = (self.speed + ACCELERATION).min(self.target_speed);
                    self.wait_timer = 0;
                }
            }
        }

        if !waiting {
            // Routing decision, gated on the post-turn cooldown and on not
            // having already acted on this intersection.
            let current_intersection = if self.frames_since_turn > TURN_COOLDOWN_FRAMES {
                find_intersection(intersections, self.position.x, self.position.y)
            } else {
                None
            };

            if let Some(index) = current_intersection {
                if matches!(self.state, VehicleState::Driving | VehicleState::Braking)
                    && self.last_intersection != Some(index)
                {
                    let intersection = &intersections[index];
                    let (new_direction, target) = self.choose_exit(intersection, rng);

                    if new_direction != self.direction {
                        self.direction = new_direction;
                        self.turn_target = target;
                        self.state = VehicleState::Turning;
                        self.frames_since_turn = 0;
                        self.position = intersection.position;
                    }

                    self.last_intersection = Some(index);
                }
            }

            // Turn completion: blend toward the target lane coordinate.
            if self.state == VehicleState::Turning {
                if let Some(target) = self.turn_target {
                    let dx = target.x - self.position.x;
                    let dy = target.y - self.position.y;
                    if (dx * dx + dy * dy).sqrt() < TURN_ARRIVE_DISTANCE {
                        self.state = VehicleState::Driving;
                        self.turn_target = None;
                    } else {
                        self.position.x += dx * TURN_BLEND;
                        self.position.y += dy * TURN_BLEND;
                    }
                } else {
                    self.state = VehicleState::Driving;
                }
            }

            // Movement along the heading. Driving onto anything that is not
            // road is fatal for the vehicle, not an error to recover from.
            if matches!(self.state, VehicleState::Driving | VehicleState::Braking) {
                let (dx, dy) = self.direction.offset(self.speed);
                let next_x = self.position.x + dx;
                let next_y = self.position.y + dy;

                if map.is_road(next_x, next_y) {
                    self.position.x = next_x;
                    self.position.y = next_y;
                    if current_intersection.is_none() {
                        self.last_intersection = None;
                    }
                } else {
                    return VehicleUpdate::Remove(RemovalReason::OffRoad);
                }
            }
        }

        // Despawn on distance applies in every state, including waiting.
        if self.position.distance(&player) > DESPAWN_DISTANCE {
            return VehicleUpdate::Remove(RemovalReason::OutOfRange);
        }

        VehicleUpdate::Keep
    }
}
