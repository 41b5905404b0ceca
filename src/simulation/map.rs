//! Tile map storage and the map query surface
//!
//! The map is authored once at world construction and read-only during the
//! simulation. Tiles carry an explicit kind and rotation instead of
//! string tags, and classification is an enum lookup rather than substring
//! matching.

use super::types::{Position, TILE_SIZE};

/// What a tile is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Grass,
    Road,
    /// Painted lane divider, drivable like plain road
    RoadLine,
    Sidewalk,
    Crosswalk,
    Building,
}

/// Tile rotation for the renderer, in 90 degree steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

/// Semantic classification of a tile for movement rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Road,
    Sidewalk,
    Crosswalk,
    /// Anything agents cannot enter: grass, buildings, unknown
    Blocked,
}

impl TileKind {
    /// Classify this tile kind. Sidewalk takes precedence; everything that
    /// is not road, sidewalk, or crosswalk blocks agents.
    pub fn surface(self) -> Surface {
        match self {
            TileKind::Sidewalk => Surface::Sidewalk,
            TileKind::Crosswalk => Surface::Crosswalk,
            TileKind::Road | TileKind::RoadLine => Surface::Road,
            TileKind::Grass | TileKind::Building => Surface::Blocked,
        }
    }
}

/// One cell of the city map
#[derive(Debug, Clone, Copy)]
pub struct Tile {
    pub kind: TileKind,
    pub rotation: Rotation,
}

impl Tile {
    pub fn new(kind: TileKind) -> Self {
        Self {
            kind,
            rotation: Rotation::R0,
        }
    }

    pub fn rotated(kind: TileKind, rotation: Rotation) -> Self {
        Self { kind, rotation }
    }
}

/// The static city map: a fixed-size grid of tiles
pub struct CityMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl CityMap {
    /// Create a map filled with grass
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::new(TileKind::Grass); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile at a world coordinate, or None when out of bounds
    pub fn tile_at(&self, x: f32, y: f32) -> Option<Tile> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let tile_x = (x / TILE_SIZE) as usize;
        let tile_y = (y / TILE_SIZE) as usize;
        self.tile_at_grid(tile_x, tile_y)
    }

    /// Tile at a grid coordinate, or None when out of bounds
    pub fn tile_at_grid(&self, tile_x: usize, tile_y: usize) -> Option<Tile> {
        if tile_x >= self.width || tile_y >= self.height {
            return None;
        }
        Some(self.tiles[tile_y * self.width + tile_x])
    }

    /// Classification of the tile under a world coordinate.
    /// Out-of-bounds classifies as blocked.
    pub fn surface_at(&self, x: f32, y: f32) -> Surface {
        self.tile_at(x, y)
            .map(|tile| tile.kind.surface())
            .unwrap_or(Surface::Blocked)
    }

    /// True when vehicles may occupy this coordinate (road or crosswalk)
    pub fn is_road(&self, x: f32, y: f32) -> bool {
        matches!(self.surface_at(x, y), Surface::Road | Surface::Crosswalk)
    }

    /// True when the coordinate is a sidewalk tile
    pub fn is_sidewalk(&self, x: f32, y: f32) -> bool {
        self.surface_at(x, y) == Surface::Sidewalk
    }

    /// True when pedestrians may walk here (sidewalk or crosswalk)
    pub fn is_walkable(&self, x: f32, y: f32) -> bool {
        matches!(self.surface_at(x, y), Surface::Sidewalk | Surface::Crosswalk)
    }

    /// World-space center of a tile
    pub fn tile_center(&self, tile_x: usize, tile_y: usize) -> Position {
        let corner = Position::from_tile(tile_x, tile_y);
        Position::new(corner.x + TILE_SIZE / 2.0, corner.y + TILE_SIZE / 2.0)
    }

    /// Set a single tile. Writes outside the grid are ignored, so layout
    /// helpers can run off the edge the way the authored data does.
    pub fn place_tile(&mut self, tile_x: usize, tile_y: usize, tile: Tile) {
        if tile_x < self.width && tile_y < self.height {
            self.tiles[tile_y * self.width + tile_x] = tile;
        }
    }

    /// Fill a rectangle with grass
    pub fn fill_grass(&mut self, start_x: usize, start_y: usize, width: usize, height: usize) {
        for dy in 0..height {
            for dx in 0..width {
                self.place_tile(start_x + dx, start_y + dy, Tile::new(TileKind::Grass));
            }
        }
    }

    /// Lay a horizontal two-lane road with sidewalks on both sides.
    /// Road rows span `start_y..start_y + 5` with a painted line in the
    /// middle row; sidewalks take the two rows above and below.
    pub fn place_horizontal_road(&mut self, start_x: usize, start_y: usize, length: usize) {
        for i in 0..length {
            let x = start_x + i;
            for dy in 0..2 {
                self.place_tile(x, start_y.wrapping_sub(2 - dy), Tile::new(TileKind::Sidewalk));
            }
            self.place_tile(x, start_y, Tile::new(TileKind::Road));
            self.place_tile(x, start_y + 1, Tile::new(TileKind::Road));
            self.place_tile(
                x,
                start_y + 2,
                Tile::rotated(TileKind::RoadLine, Rotation::R90),
            );
            self.place_tile(x, start_y + 3, Tile::new(TileKind::Road));
            self.place_tile(x, start_y + 4, Tile::new(TileKind::Road));
            self.place_tile(x, start_y + 5, Tile::new(TileKind::Sidewalk));
            self.place_tile(x, start_y + 6, Tile::new(TileKind::Sidewalk));
        }
    }

    /// Lay a vertical two-lane road with sidewalks on both sides.
    /// Road columns span `start_x..start_x + 5` with a painted line in the
    /// middle column.
    pub fn place_vertical_road(&mut self, start_x: usize, start_y: usize, length: usize) {
        for i in 0..length {
            let y = start_y + i;
            for dx in 0..2 {
                self.place_tile(
                    start_x.wrapping_sub(2 - dx),
                    y,
                    Tile::rotated(TileKind::Sidewalk, Rotation::R90),
                );
            }
            self.place_tile(start_x, y, Tile::rotated(TileKind::Road, Rotation::R90));
            self.place_tile(start_x + 1, y, Tile::rotated(TileKind::Road, Rotation::R90));
            self.place_tile(start_x + 2, y, Tile::new(TileKind::RoadLine));
            self.place_tile(start_x + 3, y, Tile::rotated(TileKind::Road, Rotation::R90));
            self.place_tile(start_x + 4, y, Tile::rotated(TileKind::Road, Rotation::R90));
            self.place_tile(start_x + 5, y, Tile::rotated(TileKind::Sidewalk, Rotation::R90));
            self.place_tile(start_x + 6, y, Tile::rotated(TileKind::Sidewalk, Rotation::R90));
        }
    }

    /// Crosswalk strip crossing a horizontal road at column `center_x`
    pub fn place_crosswalk_over_horizontal(
        &mut self,
        center_x: usize,
        road_start_y: usize,
        road_width: usize,
    ) {
        for dy in 0..road_width {
            self.place_tile(
                center_x,
                road_start_y + dy,
                Tile::rotated(TileKind::Crosswalk, Rotation::R90),
            );
        }
    }

    /// Crosswalk strip crossing a vertical road at row `center_y`
    pub fn place_crosswalk_over_vertical(
        &mut self,
        road_start_x: usize,
        center_y: usize,
        road_width: usize,
    ) {
        for dx in 0..road_width {
            self.place_tile(
                road_start_x + dx,
                center_y,
                Tile::new(TileKind::Crosswalk),
            );
        }
    }
}
