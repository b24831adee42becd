//! Grid coordinates, compass directions, and cell walks.
//!
//! The world is a square grid of tiles. Coordinates are signed so that a
//! walk may step off the west or north edge without wrapping; world
//! positions themselves must be non-negative (see [`Coord::try_new`]).
//!
//! `Coord` orders by `x` then `y`. Every "nearest tile" search in the goal
//! handlers relies on that ordering as its tie-break.

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// A tile coordinate on the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    /// Column, growing east.
    pub x: i32,
    /// Row, growing south.
    pub y: i32,
}

impl Coord {
    /// Build a coordinate without validation.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Build a world position, rejecting negative components.
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::NegativeCoordinate`] if either component is
    /// below zero.
    pub const fn try_new(x: i32, y: i32) -> Result<Self, TypesError> {
        if x < 0 || y < 0 {
            return Err(TypesError::NegativeCoordinate { x, y });
        }
        Ok(Self { x, y })
    }

    /// Manhattan distance to another coordinate.
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }

    /// The neighbouring cell in `direction`, or `None` on overflow.
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// Move one tile toward `target`, closing the x gap before the y gap.
    ///
    /// Returns `self` unchanged when already at the target.
    pub fn step_toward(self, target: Self) -> Self {
        if self.x != target.x {
            let x = if target.x > self.x {
                self.x.saturating_add(1)
            } else {
                self.x.saturating_sub(1)
            };
            return Self { x, y: self.y };
        }
        if self.y != target.y {
            let y = if target.y > self.y {
                self.y.saturating_add(1)
            } else {
                self.y.saturating_sub(1)
            };
            return Self { x: self.x, y };
        }
        self
    }

    /// Cells visited walking from `self` (exclusive) in `direction`, at
    /// most `range` steps.
    pub fn walk(self, direction: Direction, range: u32) -> Vec<Self> {
        let mut cells = Vec::new();
        let mut cursor = self;
        for _ in 0..range {
            let Some(next) = cursor.step(direction) else {
                break;
            };
            cells.push(next);
            cursor = next;
        }
        cells
    }

    /// Cells on the straight line from `self` (exclusive) toward `target`,
    /// at most `range` steps.
    ///
    /// Uses Bresenham's algorithm. When `range` exceeds the distance to the
    /// target, the walk continues past it along the same line.
    pub fn line_toward(self, target: Self, range: u32) -> Vec<Self> {
        if self == target || range == 0 {
            return Vec::new();
        }
        let x0 = i64::from(self.x);
        let y0 = i64::from(self.y);
        let dx = i64::from(target.x).saturating_sub(x0);
        let dy = i64::from(target.y).saturating_sub(y0);
        let sx = dx.signum();
        let sy = dy.signum();
        let adx = dx.saturating_abs();
        let ady = dy.saturating_abs();

        let mut cells = Vec::new();
        let mut x = x0;
        let mut y = y0;
        let mut err = adx.saturating_sub(ady);
        for _ in 0..range {
            let doubled = err.saturating_mul(2);
            if doubled > ady.saturating_neg() {
                err = err.saturating_sub(ady);
                x = x.saturating_add(sx);
            }
            if doubled < adx {
                err = err.saturating_add(adx);
                y = y.saturating_add(sy);
            }
            let (Ok(cx), Ok(cy)) = (i32::try_from(x), i32::try_from(y)) else {
                break;
            };
            cells.push(Self { x: cx, y: cy });
        }
        cells
    }
}

impl core::fmt::Display for Coord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the eight compass directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Toward decreasing `y`.
    North,
    /// North and east.
    NorthEast,
    /// Toward increasing `x`.
    East,
    /// South and east.
    SouthEast,
    /// Toward increasing `y`.
    South,
    /// South and west.
    SouthWest,
    /// Toward decreasing `x`.
    West,
    /// North and west.
    NorthWest,
}

impl Direction {
    /// The `(dx, dy)` offset of one step in this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
        }
    }

    /// The direction whose step best approximates `from -> to`, by sign of
    /// each axis. `None` when the points coincide.
    pub const fn toward(from: Coord, to: Coord) -> Option<Self> {
        let sx = (to.x as i64 - from.x as i64).signum();
        let sy = (to.y as i64 - from.y as i64).signum();
        match (sx, sy) {
            (0, -1) => Some(Self::North),
            (1, -1) => Some(Self::NorthEast),
            (1, 0) => Some(Self::East),
            (1, 1) => Some(Self::SouthEast),
            (0, 1) => Some(Self::South),
            (-1, 1) => Some(Self::SouthWest),
            (-1, 0) => Some(Self::West),
            (-1, -1) => Some(Self::NorthWest),
            _ => None,
        }
    }
}
