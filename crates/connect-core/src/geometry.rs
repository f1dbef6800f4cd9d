//! Grid geometry: positions, directions and footprints
//!
//! Factorio map coordinates are tile-based with y growing southward. Entity
//! positions are usually tile-centred (`x.5`), while some game-reported
//! points (fluidbox connections, build grid corners) are tile-aligned.

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing map coordinates
pub const EPSILON: f64 = 1e-6;

/// A point on the map grid
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Manhattan distance `|dx| + |dy|` to another position
    pub fn manhattan(&self, other: &Position) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Euclidean distance to another position
    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Centre of the tile containing this position
    pub fn tile_center(&self) -> Self {
        Self::new(self.x.floor() + 0.5, self.y.floor() + 0.5)
    }

    /// Translate by a tile offset
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Step one tile in a direction
    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.vector();
        self.offset(dx, dy)
    }

    /// Equality within [`EPSILON`]
    pub fn approx_eq(&self, other: &Position) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Whether a single coordinate sits on a tile boundary
pub fn is_tile_aligned(value: f64) -> bool {
    (value - value.round()).abs() < EPSILON
}

/// Cardinal facing of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All four directions, clockwise from north
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left]
    }

    /// Convert from the 16-way `defines.direction` encoding of Factorio 2.0
    ///
    /// Only the four cardinal values map; diagonals return `None`.
    pub fn from_factorio(value: u8) -> Option<Self> {
        match value {
            0 => Some(Direction::Up),
            4 => Some(Direction::Right),
            8 => Some(Direction::Down),
            12 => Some(Direction::Left),
            _ => None,
        }
    }

    /// Value in the 16-way `defines.direction` encoding
    pub fn to_factorio(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Right => 4,
            Direction::Down => 8,
            Direction::Left => 12,
        }
    }

    /// Unit tile step
    pub fn vector(self) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Right => (1.0, 0.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
        }
    }

    /// Facing north or south
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

/// Tile footprint of an entity, already rotated to its facing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Distance from a point to the footprint centred at `center`
    ///
    /// Zero when the point lies inside or on the edge.
    pub fn distance_from(&self, center: &Position, point: &Position) -> f64 {
        let dx = ((point.x - center.x).abs() - self.width / 2.0).max(0.0);
        let dy = ((point.y - center.y).abs() - self.height / 2.0).max(0.0);
        dx.hypot(dy)
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}
