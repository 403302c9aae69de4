//! Dense row-major storage for per-cell maze data.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::Point;

/// Rectangular matrix of cell values stored in row-major order.
///
/// Grids serialize as a list of rows so adapters see a `height x width`
/// matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

/// Reasons a list of rows cannot be turned into a [`Grid`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridShapeError {
    /// The rows did not all share the width of the first row.
    #[error("row {row} has {actual} cells but the grid is {expected} cells wide")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },
    /// The grid is too large to address with `u32` coordinates.
    #[error("grid dimensions exceed the addressable range")]
    TooLarge,
}

impl<T> Grid<T> {
    /// Creates a grid whose cells all hold a copy of `value`.
    #[must_use]
    pub fn filled(width: u32, height: u32, value: T) -> Self
    where
        T: Clone,
    {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![value; count],
        }
    }

    /// Creates a grid by evaluating `init` for every point in raster order.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut init: impl FnMut(Point) -> T) -> Self {
        let cells = raster(width, height).map(&mut init).collect();
        Self {
            width,
            height,
            cells,
        }
    }

    /// Builds a grid from a list of equally sized rows.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridShapeError> {
        let expected = rows.first().map_or(0, Vec::len);
        let height = u32::try_from(rows.len()).map_err(|_| GridShapeError::TooLarge)?;
        let width = u32::try_from(expected).map_err(|_| GridShapeError::TooLarge)?;

        let mut cells = Vec::with_capacity(expected * rows.len());
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != expected {
                return Err(GridShapeError::Ragged {
                    row,
                    expected,
                    actual: values.len(),
                });
            }
            cells.extend(values);
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major offset of the point, if it lies within the grid.
    #[must_use]
    pub fn index(&self, point: Point) -> Option<usize> {
        if point.x() >= self.width || point.y() >= self.height {
            return None;
        }
        Some(point.y() as usize * self.width as usize + point.x() as usize)
    }

    /// Value stored at the point.
    #[must_use]
    pub fn get(&self, point: Point) -> Option<&T> {
        self.index(point).and_then(|index| self.cells.get(index))
    }

    /// Mutable access to the value stored at the point.
    #[must_use]
    pub fn get_mut(&mut self, point: Point) -> Option<&mut T> {
        self.index(point).and_then(|index| self.cells.get_mut(index))
    }

    /// Every point of the grid in raster order.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        raster(self.width, self.height)
    }

    /// Every point paired with its value in raster order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> + '_ {
        self.points().zip(self.cells.iter())
    }

    /// Rows of the grid from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Produces a grid of the same shape by transforming every cell.
    #[must_use]
    pub fn map<U>(&self, mut transform: impl FnMut(Point, &T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self
                .iter()
                .map(|(point, value)| transform(point, value))
                .collect(),
        }
    }
}

fn raster(width: u32, height: u32) -> impl Iterator<Item = Point> {
    (0..height).flat_map(move |y| (0..width).map(move |x| Point::new(x, y)))
}

impl<T: Serialize> Serialize for Grid<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.rows())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Grid<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<Vec<T>>::deserialize(deserializer)?;
        Grid::from_rows(rows).map_err(de::Error::custom)
    }
}
