//! Pedestrian state machine
//!
//! Pedestrians wander the sidewalk network on a decision timer: mostly
//! idling, sometimes walking a random cardinal direction, sometimes sitting
//! for a fixed spell. Contact with a vehicle is always fatal; a hurt
//! pedestrian plays out its hurt animation and is then removed while a
//! replacement holds the population constant.

use rand::Rng;

use super::map::CityMap;
use super::types::{Direction, Position};
use super::vehicle::Vehicle;

/// Target pedestrian population
pub const MAX_POPULATION: usize = 200;

/// Pedestrian walking speed per tick
pub const WALK_SPEED: f32 = 1.0;

/// Pedestrian running speed per tick (reserved for future behaviors)
pub const RUN_SPEED: f32 = 2.0;

/// Ticks between animation frame advances
pub const ANIMATION_SPEED: u32 = 8;

/// Ticks between behavior decisions
pub const DECISION_INTERVAL: u32 = 300;

/// Ticks a pedestrian stays seated
pub const SIT_DURATION: u32 = 240;

/// Ticks until the next decision after walking into an obstacle
pub const BLOCKED_REDECISION_DELAY: u32 = 10;

/// Number of pedestrian sprite archetypes
pub const ARCHETYPE_COUNT: u8 = 9;

/// Collision radius of a pedestrian
pub const PEDESTRIAN_RADIUS: f32 = 12.0;

/// Collision radius of a vehicle against pedestrians
pub const VEHICLE_RADIUS: f32 = 14.0;

/// Discrete pedestrian state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PedestrianState {
    Idle,
    Walking,
    Running,
    Sitting,
    Hurt,
}

impl PedestrianState {
    /// Number of animation frames for this state
    pub fn frame_count(self) -> u32 {
        match self {
            PedestrianState::Idle => 2,
            PedestrianState::Walking => 9,
            PedestrianState::Running => 8,
            PedestrianState::Sitting => 3,
            PedestrianState::Hurt => 6,
        }
    }
}

/// Result of a pedestrian update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PedestrianUpdate {
    Keep,
    /// Struck by a vehicle this tick; the body stays until the hurt
    /// animation completes
    Hit,
    /// Hurt animation finished; remove the pedestrian and spawn its
    /// replacement
    Remove,
}

/// A wandering pedestrian
#[derive(Debug, Clone)]
pub struct Pedestrian {
    /// Sprite archetype index, 1-based like the authored sprite families
    pub archetype: u8,
    pub position: Position,
    pub direction: Direction,
    pub state: PedestrianState,
    pub current_frame: u32,
    pub frame_delay: u32,
    pub decision_timer: u32,
    pub sit_timer: u32,
    pub alive: bool,
}

impl Pedestrian {
    pub fn new(archetype: u8, position: Position, direction: Direction) -> Self {
        Self {
            archetype,
            position,
            direction,
            state: PedestrianState::Idle,
            current_frame: 0,
            frame_delay: 0,
            decision_timer: 0,
            sit_timer: 0,
            alive: true,
        }
    }

    /// Advance the animation frame every [`ANIMATION_SPEED`] ticks,
    /// wrapping on the active state's frame count.
    fn advance_animation(&mut self) {
        self.frame_delay += 1;
        if self.frame_delay >= ANIMATION_SPEED {
            self.frame_delay = 0;
            self.current_frame += 1;
            if self.current_frame >= self.state.frame_count() {
                self.current_frame = 0;
            }
        }
    }

    /// True once the hurt animation sits on its final frame
    fn hurt_animation_done(&self) -> bool {
        self.current_frame >= PedestrianState::Hurt.frame_count() - 1
    }

    fn overlaps_vehicle(&self, vehicles: &[Vehicle]) -> bool {
        let threshold = PEDESTRIAN_RADIUS + VEHICLE_RADIUS;
        vehicles
            .iter()
            .any(|vehicle| self.position.distance(&vehicle.position) < threshold)
    }

    /// Advance this pedestrian by one tick
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        map: &CityMap,
        vehicles: &[Vehicle],
        rng: &mut R,
    ) -> PedestrianUpdate {
        // A struck pedestrian only plays out its hurt animation.
        if !self.alive {
            if self.hurt_animation_done() {
                return PedestrianUpdate::Remove;
            }
            self.frame_delay += 1;
            if self.frame_delay >= ANIMATION_SPEED {
                self.frame_delay = 0;
                self.current_frame += 1;
            }
            return PedestrianUpdate::Keep;
        }

        if self.state != PedestrianState::Sitting {
            self.advance_animation();
        }

        if self.overlaps_vehicle(vehicles) {
            self.state = PedestrianState::Hurt;
            self.alive = false;
            self.current_frame = 0;
            self.frame_delay = 0;
            return PedestrianUpdate::Hit;
        }

        self.decision_timer += 1;
        if self.decision_timer >= DECISION_INTERVAL {
            self.decision_timer = 0;
            let choice: f64 = rng.random_range(0.0..1.0);
            if choice < 0.30 {
                self.state = PedestrianState::Walking;
                self.direction = Direction::random(rng);
            } else if choice < 0.50 {
                self.state = PedestrianState::Sitting;
                self.sit_timer = SIT_DURATION;
                self.current_frame = 0;
            } else {
                self.state = PedestrianState::Idle;
            }
        }

        match self.state {
            PedestrianState::Sitting => {
                self.sit_timer = self.sit_timer.saturating_sub(1);
                // Hold the final sit frame for the whole duration.
                self.current_frame = PedestrianState::Sitting.frame_count() - 1;
                if self.sit_timer == 0 {
                    self.state = PedestrianState::Idle;
                    self.current_frame = 0;
                }
            }
            PedestrianState::Walking => {
                let (dx, dy) = self.direction.offset(WALK_SPEED);
                let next_x = self.position.x + dx;
                let next_y = self.position.y + dy;

                if map.is_walkable(next_x, next_y) {
                    self.position.x = next_x;
                    self.position.y = next_y;
                } else {
                    // Blocked: turn and re-decide shortly.
                    self.direction = Direction::random(rng);
                    self.decision_timer = DECISION_INTERVAL - BLOCKED_REDECISION_DELAY;
                }
            }
            _ => {}
        }

        PedestrianUpdate::Keep
    }
}
