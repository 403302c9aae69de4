#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the math maze generator.
//!
//! This crate defines the value types that flow between the pure systems.
//! The grid generation system carves a [`Grid`] of open cells and records a
//! [`SpanningTree`], the endpoint selection system turns that tree into a
//! solution path, and the cell population system labels every tile with a
//! [`CellFact`] whose parity reveals whether the tile lies on the path. The
//! finished [`Maze`] is what adapters hand to solvers and what the assessment
//! system grades answers against.

use std::fmt;

use serde::{Deserialize, Serialize};

mod arithmetic;
mod grid;
mod maze;
mod tree;

pub use arithmetic::{CellFact, ExpressionError, OperandTriple, OperationType, Operator};
pub use grid::{Grid, GridShapeError};
pub use maze::{Maze, MazeRecordError, Tile};
pub use tree::{SpanningTree, TreeNode};

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Points serialize as a two element `[x, y]` array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Point {
    x: u32,
    y: u32,
}

impl Point {
    /// Upper-left cell where every maze path begins.
    pub const START: Point = Point::new(0, 0);

    /// Creates a new grid point.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the point.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the point.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Reports whether the point lies on the outer ring of a grid.
    #[must_use]
    pub const fn at_border(&self, width: u32, height: u32) -> bool {
        self.x == 0 || self.y == 0 || self.x + 1 == width || self.y + 1 == height
    }

    /// Computes the Manhattan distance between two points.
    #[must_use]
    pub fn manhattan_distance(self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Moves `distance` cells in `direction`, staying inside a `width` x `height` grid.
    #[must_use]
    pub fn step(self, direction: Direction, distance: u32, width: u32, height: u32) -> Option<Point> {
        let (x, y) = match direction {
            Direction::Up => (Some(self.x), self.y.checked_sub(distance)),
            Direction::Down => (Some(self.x), self.y.checked_add(distance)),
            Direction::Left => (self.x.checked_sub(distance), Some(self.y)),
            Direction::Right => (self.x.checked_add(distance), Some(self.y)),
        };

        match (x, y) {
            (Some(x), Some(y)) if x < width && y < height => Some(Point::new(x, y)),
            _ => None,
        }
    }

    /// Orthogonal neighbours of the point that exist within the grid bounds.
    ///
    /// Neighbours are yielded in up, down, left, right order.
    pub fn neighbours(self, width: u32, height: u32) -> impl Iterator<Item = Point> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.step(direction, 1, width, height))
    }
}

impl From<[u32; 2]> for Point {
    fn from([x, y]: [u32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [u32; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal directions the maze carver can travel in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in declaration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Inclusive range of operands a maze may draw its numbers from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumberRange {
    start: u32,
    end: u32,
}

impl NumberRange {
    /// Creates a range spanning `start..=end`.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Smallest operand in the range.
    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Largest operand in the range.
    #[must_use]
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// Reports whether the value lies inside the range.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        i64::from(self.start) <= value && value <= i64::from(self.end)
    }

    /// Reports whether the range holds no operand at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Iterates every operand of the range in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = i64> {
        i64::from(self.start)..=i64::from(self.end)
    }
}

impl fmt::Display for NumberRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
