//! The finished, labelled maze handed to adapters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellFact, ExpressionError, Grid, NumberRange, OperationType, Point};

/// Content of a single maze tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Unlabelled tile where the path begins.
    Start,
    /// Unlabelled tile where the path ends.
    End,
    /// Tile carrying an arithmetic fact.
    Fact(CellFact),
}

impl Tile {
    /// Fact printed on the tile, if any.
    #[must_use]
    pub const fn fact(&self) -> Option<&CellFact> {
        match self {
            Self::Fact(fact) => Some(fact),
            Self::Start | Self::End => None,
        }
    }

    /// Rendered expression, empty for the start and end tiles.
    #[must_use]
    pub fn expression(&self) -> String {
        self.fact().map(CellFact::to_string).unwrap_or_default()
    }
}

/// Labelled maze together with its solution path.
///
/// The maze serializes with its tiles rendered as a `height x width` matrix
/// of expression strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MazeRecord", into = "MazeRecord")]
pub struct Maze {
    numbers_range: NumberRange,
    operation: OperationType,
    path_type_even: bool,
    tiles: Grid<Tile>,
    endpoint: Point,
    path: Vec<Point>,
}

impl Maze {
    /// Assembles a maze from its generated parts.
    #[must_use]
    pub fn new(
        numbers_range: NumberRange,
        operation: OperationType,
        path_type_even: bool,
        tiles: Grid<Tile>,
        endpoint: Point,
        path: Vec<Point>,
    ) -> Self {
        Self {
            numbers_range,
            operation,
            path_type_even,
            tiles,
            endpoint,
            path,
        }
    }

    /// Number of columns in the maze.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.tiles.width()
    }

    /// Number of rows in the maze.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.tiles.height()
    }

    /// Operands the maze was populated from.
    #[must_use]
    pub const fn numbers_range(&self) -> NumberRange {
        self.numbers_range
    }

    /// Operation family printed on the tiles.
    #[must_use]
    pub const fn operation(&self) -> OperationType {
        self.operation
    }

    /// Whether path tiles evaluate to even numbers.
    #[must_use]
    pub const fn path_type_even(&self) -> bool {
        self.path_type_even
    }

    /// Tiles of the maze.
    #[must_use]
    pub const fn tiles(&self) -> &Grid<Tile> {
        &self.tiles
    }

    /// Last tile of the solution path.
    #[must_use]
    pub const fn endpoint(&self) -> Point {
        self.endpoint
    }

    /// Ordered solution path from the start to the endpoint.
    #[must_use]
    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Rendered expression of every tile.
    #[must_use]
    pub fn expressions(&self) -> Grid<String> {
        self.tiles.map(|_, tile| tile.expression())
    }
}

/// Reasons a serialized maze cannot be restored.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MazeRecordError {
    /// The declared dimensions disagree with the expression matrix.
    #[error("maze declares {width}x{height} but carries a {actual_width}x{actual_height} matrix")]
    DimensionMismatch {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Width of the expression matrix.
        actual_width: u32,
        /// Height of the expression matrix.
        actual_height: u32,
    },
    /// The start or end tile carried an expression.
    #[error("tile {0} must be blank")]
    LabelledEndpoint(Point),
    /// A tile expression could not be parsed.
    #[error("tile {point}: {source}")]
    Expression {
        /// Location of the tile.
        point: Point,
        /// Parse failure.
        #[source]
        source: ExpressionError,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MazeRecord {
    width: u32,
    height: u32,
    numbers_range: NumberRange,
    operation: OperationType,
    path_type_even: bool,
    endpoint: Point,
    path: Vec<Point>,
    expressions: Grid<String>,
}

impl From<Maze> for MazeRecord {
    fn from(maze: Maze) -> Self {
        Self {
            width: maze.width(),
            height: maze.height(),
            numbers_range: maze.numbers_range,
            operation: maze.operation,
            path_type_even: maze.path_type_even,
            endpoint: maze.endpoint,
            expressions: maze.expressions(),
            path: maze.path,
        }
    }
}

impl TryFrom<MazeRecord> for Maze {
    type Error = MazeRecordError;

    fn try_from(record: MazeRecord) -> Result<Self, Self::Error> {
        let expressions = &record.expressions;
        if expressions.width() != record.width || expressions.height() != record.height {
            return Err(MazeRecordError::DimensionMismatch {
                width: record.width,
                height: record.height,
                actual_width: expressions.width(),
                actual_height: expressions.height(),
            });
        }

        let mut tiles = Grid::filled(record.width, record.height, Tile::Start);
        for (point, expression) in expressions.iter() {
            let tile = if point == Point::START || point == record.endpoint {
                if !expression.trim().is_empty() {
                    return Err(MazeRecordError::LabelledEndpoint(point));
                }
                if point == Point::START {
                    Tile::Start
                } else {
                    Tile::End
                }
            } else {
                CellFact::parse(expression)
                    .map(Tile::Fact)
                    .map_err(|source| MazeRecordError::Expression { point, source })?
            };

            if let Some(slot) = tiles.get_mut(point) {
                *slot = tile;
            }
        }

        Ok(Self::new(
            record.numbers_range,
            record.operation,
            record.path_type_even,
            tiles,
            record.endpoint,
            record.path,
        ))
    }
}
