#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized backtracker that carves a perfect maze over the tile grid.
//!
//! Rooms sit on cells whose coordinates are both even. The carver walks from
//! the start room to unvisited rooms two cells away, opening the corridor cell
//! between them, and backtracks when a room has no unvisited neighbours left.
//! Every opened cell is recorded in a [`SpanningTree`] together with its
//! parent and its distance from the start.

use math_maze_core::{Direction, Grid, Point, SpanningTree};
use rand::{seq::SliceRandom, Rng};

/// Grid of open cells together with the tree that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Carving {
    grid: Grid<bool>,
    tree: SpanningTree,
}

impl Carving {
    /// Open (`true`) and wall (`false`) cells.
    #[must_use]
    pub const fn grid(&self) -> &Grid<bool> {
        &self.grid
    }

    /// Parent links and distances of every open cell.
    #[must_use]
    pub const fn tree(&self) -> &SpanningTree {
        &self.tree
    }

    /// Splits the carving into its grid and tree.
    #[must_use]
    pub fn into_parts(self) -> (Grid<bool>, SpanningTree) {
        (self.grid, self.tree)
    }
}

/// Pure system that carves perfect mazes.
///
/// The traversal keeps its own explicit stack instead of recursing so grid
/// size never threatens the call stack. The stack is reused between calls.
#[derive(Debug, Default)]
pub struct GridGenerator {
    stack: Vec<Frame>,
}

#[derive(Debug)]
struct Frame {
    room: Point,
    directions: [Direction; 4],
    next: usize,
}

impl Frame {
    fn shuffled<R: Rng + ?Sized>(room: Point, rng: &mut R) -> Self {
        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        Self {
            room,
            directions,
            next: 0,
        }
    }

    fn advance(&mut self) -> Option<Direction> {
        let direction = self.directions.get(self.next).copied()?;
        self.next += 1;
        Some(direction)
    }
}

impl GridGenerator {
    /// Creates a new grid generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Carves a `width` x `height` maze rooted at [`Point::START`].
    ///
    /// Directions are shuffled once when a room is entered and tried in that
    /// order, so the random draws match a depth-first recursion exactly.
    pub fn generate<R: Rng + ?Sized>(&mut self, width: u32, height: u32, rng: &mut R) -> Carving {
        let mut grid = Grid::filled(width, height, false);
        let mut tree = SpanningTree::new(width, height);

        self.stack.clear();
        if tree.insert_root(Point::START) {
            open(&mut grid, Point::START);
            self.stack.push(Frame::shuffled(Point::START, rng));
        }

        while let Some(frame) = self.stack.last_mut() {
            let room = frame.room;
            let Some(direction) = frame.advance() else {
                let _ = self.stack.pop();
                continue;
            };

            let Some(far) = room.step(direction, 2, width, height) else {
                continue;
            };
            if tree.contains(far) {
                continue;
            }
            let Some(corridor) = room.step(direction, 1, width, height) else {
                continue;
            };

            if tree.attach(corridor, room).is_none() || tree.attach(far, corridor).is_none() {
                continue;
            }
            open(&mut grid, corridor);
            open(&mut grid, far);
            self.stack.push(Frame::shuffled(far, rng));
        }

        Carving { grid, tree }
    }
}

fn open(grid: &mut Grid<bool>, point: Point) {
    if let Some(cell) = grid.get_mut(point) {
        *cell = true;
    }
}

#[cfg(test)]
mod tests {
    use math_maze_core::Point;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::GridGenerator;

    #[test]
    fn single_cell_grid_holds_only_the_start() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let carving = GridGenerator::new().generate(1, 1, &mut rng);
        assert_eq!(carving.tree().len(), 1);
        assert_eq!(carving.grid().get(Point::START), Some(&true));
    }

    #[test]
    fn empty_grid_carves_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let carving = GridGenerator::new().generate(0, 0, &mut rng);
        assert!(carving.tree().is_empty());
        assert!(carving.grid().is_empty());
    }

    #[test]
    fn three_by_three_opens_every_room_and_no_pillar() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let carving = GridGenerator::new().generate(3, 3, &mut rng);
        for room in [Point::new(0, 0), Point::new(2, 0), Point::new(0, 2), Point::new(2, 2)] {
            assert!(carving.tree().contains(room), "room {room} not carved");
        }
        assert!(!carving.tree().contains(Point::new(1, 1)));
        assert_eq!(carving.tree().len(), 7);
    }
}
