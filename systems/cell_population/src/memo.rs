//! Record of the triples already assigned to populated tiles.

use math_maze_core::{Grid, OperandTriple, Point};

/// Per-tile memo of chosen triples, filled in raster order.
///
/// Lookups gather all four neighbours, but because tiles are populated row by
/// row only the left and upper neighbours can hold a value at that point.
#[derive(Debug)]
pub(crate) struct NeighborMemo {
    triples: Grid<Option<OperandTriple>>,
}

impl NeighborMemo {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            triples: Grid::filled(width, height, None),
        }
    }

    pub(crate) fn record(&mut self, point: Point, triple: OperandTriple) {
        if let Some(slot) = self.triples.get_mut(point) {
            *slot = Some(triple);
        }
    }

    /// Triples recorded for the orthogonal neighbours of `point`.
    pub(crate) fn neighbours(&self, point: Point) -> Vec<OperandTriple> {
        point
            .neighbours(self.triples.width(), self.triples.height())
            .filter_map(|neighbour| self.triples.get(neighbour).copied().flatten())
            .collect()
    }
}
