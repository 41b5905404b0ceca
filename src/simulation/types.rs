//! Core types for the city simulation
//!
//! Standalone types shared by every subsystem.

use rand::seq::IndexedRandom;
use rand::Rng;

/// Size of one map tile in world units
pub const TILE_SIZE: f32 = 18.0;

/// Map width in tiles
pub const MAP_TILES_WIDTH: usize = 200;

/// Map height in tiles
pub const MAP_TILES_HEIGHT: usize = 150;

/// Map width in world units
pub const MAP_WIDTH: f32 = MAP_TILES_WIDTH as f32 * TILE_SIZE;

/// Map height in world units
pub const MAP_HEIGHT: f32 = MAP_TILES_HEIGHT as f32 * TILE_SIZE;

/// A 2D position in world units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Position of a tile's top-left corner, from tile coordinates
    pub fn from_tile(tile_x: usize, tile_y: usize) -> Self {
        Self {
            x: tile_x as f32 * TILE_SIZE,
            y: tile_y as f32 * TILE_SIZE,
        }
    }
}

/// One of the four cardinal headings agents can face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True for left/right headings (movement along the x axis)
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Displacement of one step at the given speed
    pub fn offset(self, speed: f32) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, -speed),
            Direction::Down => (0.0, speed),
            Direction::Left => (-speed, 0.0),
            Direction::Right => (speed, 0.0),
        }
    }

    /// Sprite rotation in degrees for a renderer
    pub fn angle(self) -> f32 {
        match self {
            Direction::Up => 180.0,
            Direction::Down => 0.0,
            Direction::Left => 270.0,
            Direction::Right => 90.0,
        }
    }

    /// Draw a uniformly random heading
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Direction {
        *Self::ALL.choose(rng).unwrap_or(&Direction::Down)
    }
}
