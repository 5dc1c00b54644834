use std::convert::From;
use std::ops::{Add, Sub};

use smallvec::SmallVec;

/// A grid cell position. Signed so that positions just off the grid (and
/// negative world positions) can be represented and then rejected by a bounds check.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

pub type CoordinateSmallVec = SmallVec<[Coordinate; 4]>;

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Coordinate {
        Coordinate { x, y }
    }

    #[inline]
    pub fn offset(self, dir: Direction) -> Coordinate {
        self + dir.unit_offset()
    }

    /// Straight line distance between two cells, as a float.
    #[inline]
    pub fn distance(self, other: Coordinate) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Coordinate {
    type Output = Coordinate;
    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;
    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from(x_y_pair: (i32, i32)) -> Coordinate {
        Coordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CellState {
    Wall,
    Floor,
    Goal,
}

impl CellState {
    #[inline]
    pub fn is_wall(self) -> bool {
        self == CellState::Wall
    }
}

/// The four orthogonal moves. `y` grows "up", matching the ground plane the
/// world positions live on.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Neighbour expansion order used by the path finder.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    #[inline]
    pub fn unit_offset(self) -> Coordinate {
        match self {
            Direction::Up => Coordinate::new(0, 1),
            Direction::Right => Coordinate::new(1, 0),
            Direction::Down => Coordinate::new(0, -1),
            Direction::Left => Coordinate::new(-1, 0),
        }
    }
}
