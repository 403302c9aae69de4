#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that labels every maze tile with an arithmetic fact.
//!
//! Tiles are visited in raster order. Each one draws its operator from a
//! shuffled per-partition schedule, its wanted parity from whether it lies on
//! the solution path, and finally a fact whose result has that parity while
//! differing from the facts already placed on its neighbours.

mod candidates;
mod memo;
mod sequence;

use std::time::Instant;

use math_maze_core::{CellFact, Grid, NumberRange, OperandTriple, OperationType, Point, Tile};
use rand::Rng;
use thiserror::Error;

use crate::{
    candidates::{pick_product, product_triples, sample_sum, SamplingBudget, TileConstraints},
    memo::NeighborMemo,
    sequence::OperationSequence,
};

/// Default cap on rejection-sampling draws for a single tile.
pub const DEFAULT_MAX_SAMPLING_ATTEMPTS: u32 = 10_000;

/// Tunables of the cell populator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PopulationConfig {
    max_sampling_attempts: u32,
}

impl PopulationConfig {
    /// Creates a configuration; zero attempts is raised to one.
    #[must_use]
    pub const fn new(max_sampling_attempts: u32) -> Self {
        let max_sampling_attempts = if max_sampling_attempts == 0 {
            1
        } else {
            max_sampling_attempts
        };
        Self {
            max_sampling_attempts,
        }
    }

    /// Upper bound of operand draws per addition or subtraction tile.
    #[must_use]
    pub const fn max_sampling_attempts(&self) -> u32 {
        self.max_sampling_attempts
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SAMPLING_ATTEMPTS)
    }
}

/// Everything the populator needs to label one carved maze.
#[derive(Clone, Copy, Debug)]
pub struct PopulationRequest<'a> {
    /// Carved grid; `true` marks open cells.
    pub grid: &'a Grid<bool>,
    /// Solution path from the start to `endpoint`.
    pub path: &'a [Point],
    /// Last cell of the solution path.
    pub endpoint: Point,
    /// Operands are drawn from this range.
    pub numbers_range: NumberRange,
    /// Operation family of the maze.
    pub operation: OperationType,
    /// Whether path tiles evaluate to even numbers.
    pub path_type_even: bool,
    /// Facts that should be placed before falling back to random ones.
    pub must_include: &'a [CellFact],
    /// Instant after which labelling gives up.
    pub deadline: Option<Instant>,
}

/// Failures raised while labelling tiles.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PopulationError {
    /// The path does not run from the start to the endpoint over open cells.
    #[error("path must run from the start to {endpoint} over open cells of the grid")]
    MalformedPath {
        /// Endpoint the path was expected to reach.
        endpoint: Point,
    },
    /// Every product candidate was excluded for a tile.
    #[error("no multiplication or division fits tile {cell}")]
    NoCandidates {
        /// Tile that could not be labelled.
        cell: Point,
    },
    /// The numbers range holds no operand.
    #[error("numbers range {range} is empty")]
    EmptyRange {
        /// Range that was requested.
        range: NumberRange,
    },
    /// The deadline passed while labelling.
    #[error("deadline passed while labelling tile {cell}")]
    DeadlineExceeded {
        /// Tile being labelled when the deadline was noticed.
        cell: Point,
    },
    /// Rejection sampling gave up on a tile.
    #[error("no addition or subtraction found for tile {cell} after {attempts} draws")]
    SamplingExhausted {
        /// Tile that could not be labelled.
        cell: Point,
        /// Number of draws performed.
        attempts: u32,
    },
}

impl PopulationError {
    /// Reports whether a fresh random draw may succeed where this one failed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NoCandidates { .. } | Self::SamplingExhausted { .. }
        )
    }
}

/// Labelled tiles produced by the populator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Population {
    tiles: Grid<Tile>,
    unplaced: Vec<CellFact>,
}

impl Population {
    /// Labelled tiles, blank at the start and the endpoint.
    #[must_use]
    pub const fn tiles(&self) -> &Grid<Tile> {
        &self.tiles
    }

    /// Requested facts that found no fitting tile.
    #[must_use]
    pub fn unplaced(&self) -> &[CellFact] {
        &self.unplaced
    }

    /// Rendered expression of every tile.
    #[must_use]
    pub fn expressions(&self) -> Grid<String> {
        self.tiles.map(|_, tile| tile.expression())
    }

    /// Splits the population into its tiles and unplaced facts.
    #[must_use]
    pub fn into_parts(self) -> (Grid<Tile>, Vec<CellFact>) {
        (self.tiles, self.unplaced)
    }
}

/// Pure system that fills a carved maze with arithmetic facts.
#[derive(Debug, Default)]
pub struct CellPopulator {
    config: PopulationConfig,
    products: Vec<OperandTriple>,
    products_range: Option<NumberRange>,
}

impl CellPopulator {
    /// Creates a populator with the provided configuration.
    #[must_use]
    pub fn new(config: PopulationConfig) -> Self {
        Self {
            config,
            products: Vec::new(),
            products_range: None,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> PopulationConfig {
        self.config
    }

    /// Labels every tile except the start and the endpoint.
    pub fn populate<R: Rng + ?Sized>(
        &mut self,
        request: &PopulationRequest<'_>,
        rng: &mut R,
    ) -> Result<Population, PopulationError> {
        let grid = request.grid;
        let endpoint = request.endpoint;
        let on_path = path_mask(request)?;
        if request.numbers_range.is_empty() {
            return Err(PopulationError::EmptyRange {
                range: request.numbers_range,
            });
        }
        let budget = SamplingBudget {
            max_attempts: self.config.max_sampling_attempts(),
            deadline: request.deadline,
        };

        let path_length = request.path.len() - 2;
        let maze_length = grid.len() - request.path.len();
        let mut path_kinds = OperationSequence::shuffled(path_length, request.operation, rng);
        let mut maze_kinds = OperationSequence::shuffled(maze_length, request.operation, rng);

        if request.operation.involves_product() {
            self.prepare_products(request.numbers_range);
        }

        let mut memo = NeighborMemo::new(grid.width(), grid.height());
        let mut pending: Vec<CellFact> = request.must_include.to_vec();
        let mut tiles = Grid::filled(grid.width(), grid.height(), Tile::Start);

        for cell in grid.points() {
            let tile = if cell == Point::START {
                Tile::Start
            } else if cell == endpoint {
                Tile::End
            } else {
                if budget.expired() {
                    return Err(PopulationError::DeadlineExceeded { cell });
                }
                let on_path = on_path.get(cell).copied().unwrap_or(false);
                let kinds = if on_path {
                    &mut path_kinds
                } else {
                    &mut maze_kinds
                };
                let first = kinds
                    .next()
                    .ok_or(PopulationError::MalformedPath { endpoint })?;

                let neighbours = memo.neighbours(cell);
                let constraints = TileConstraints {
                    cell,
                    range: request.numbers_range,
                    operator: request.operation.operator(first),
                    wanted_even: request.path_type_even == on_path,
                    neighbours: &neighbours,
                };

                let fact = match take_pending(&mut pending, &constraints) {
                    Some(fact) => fact,
                    None if request.operation.involves_product() => {
                        pick_product(&self.products, &constraints, rng)?
                    }
                    None => sample_sum(&constraints, budget, rng)?,
                };
                memo.record(cell, fact.triple());
                Tile::Fact(fact)
            };

            if let Some(slot) = tiles.get_mut(cell) {
                *slot = tile;
            }
        }

        if !pending.is_empty() {
            let unplaced: Vec<String> = pending.iter().map(CellFact::to_string).collect();
            tracing::warn!(?unplaced, "requested facts found no fitting tile");
        }
        tracing::debug!(
            width = grid.width(),
            height = grid.height(),
            path_length,
            placed = request.must_include.len() - pending.len(),
            "tiles populated"
        );

        Ok(Population {
            tiles,
            unplaced: pending,
        })
    }

    fn prepare_products(&mut self, range: NumberRange) {
        if self.products_range != Some(range) {
            self.products = product_triples(range);
            self.products_range = Some(range);
        }
    }
}

/// Marks the path cells after checking the path is anchored and carved.
fn path_mask(request: &PopulationRequest<'_>) -> Result<Grid<bool>, PopulationError> {
    let malformed = PopulationError::MalformedPath {
        endpoint: request.endpoint,
    };
    let grid = request.grid;
    let anchored = request.path.len() >= 2
        && request.path.first() == Some(&Point::START)
        && request.path.last() == Some(&request.endpoint);
    if !anchored {
        return Err(malformed);
    }

    let mut mask = Grid::filled(grid.width(), grid.height(), false);
    for &point in request.path {
        if grid.get(point) != Some(&true) {
            return Err(malformed);
        }
        match mask.get_mut(point) {
            Some(slot) if !*slot => *slot = true,
            _ => return Err(malformed),
        }
    }
    Ok(mask)
}

/// Removes and returns the first pending fact the tile admits.
fn take_pending(pending: &mut Vec<CellFact>, constraints: &TileConstraints<'_>) -> Option<CellFact> {
    let position = pending.iter().position(|fact| constraints.admits(fact))?;
    Some(pending.remove(position))
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use math_maze_core::{CellFact, Grid, NumberRange, OperationType, Point, Tile};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{CellPopulator, PopulationConfig, PopulationError, PopulationRequest};

    /// 3x3 grid carved along the top row and down the right column.
    fn hooked() -> (Grid<bool>, Vec<Point>) {
        let path = vec![
            Point::START,
            Point::new(1, 0),
            Point::new(2, 0),
            Point::new(2, 1),
            Point::new(2, 2),
        ];
        let grid = Grid::from_fn(3, 3, |point| path.contains(&point) || point.x() == 0);
        (grid, path)
    }

    fn request<'a>(
        grid: &'a Grid<bool>,
        path: &'a [Point],
        operation: OperationType,
        must_include: &'a [CellFact],
    ) -> PopulationRequest<'a> {
        PopulationRequest {
            grid,
            path,
            endpoint: Point::new(2, 2),
            numbers_range: NumberRange::new(1, 10),
            operation,
            path_type_even: true,
            must_include,
            deadline: None,
        }
    }

    #[test]
    fn start_and_end_stay_blank() {
        let (grid, path) = hooked();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let population = CellPopulator::default()
            .populate(&request(&grid, &path, OperationType::Addition, &[]), &mut rng)
            .expect("populated");

        assert_eq!(population.tiles().get(Point::START), Some(&Tile::Start));
        assert_eq!(population.tiles().get(Point::new(2, 2)), Some(&Tile::End));
        let labelled = population
            .tiles()
            .iter()
            .filter(|(_, tile)| tile.fact().is_some())
            .count();
        assert_eq!(labelled, 7);
    }

    #[test]
    fn path_must_reach_the_endpoint() {
        let (grid, path) = hooked();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let error = CellPopulator::default()
            .populate(
                &request(&grid, &path[..4], OperationType::Addition, &[]),
                &mut rng,
            )
            .unwrap_err();
        assert_eq!(
            error,
            PopulationError::MalformedPath {
                endpoint: Point::new(2, 2),
            }
        );
        assert!(!error.is_retryable());
    }

    #[test]
    fn path_through_a_wall_is_rejected() {
        let (grid, _) = hooked();
        let path = [
            Point::START,
            Point::new(1, 0),
            Point::new(1, 1),
            Point::new(2, 1),
            Point::new(2, 2),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let error = CellPopulator::default()
            .populate(&request(&grid, &path, OperationType::Addition, &[]), &mut rng)
            .unwrap_err();
        assert!(matches!(error, PopulationError::MalformedPath { .. }));
    }

    #[test]
    fn fitting_request_lands_on_the_first_admitting_tile() {
        let (grid, path) = hooked();
        // (1, 0) is the first labelled tile and lies on the even path.
        let wanted = [CellFact::sum(3, 5)];
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let population = CellPopulator::default()
            .populate(&request(&grid, &path, OperationType::Addition, &wanted), &mut rng)
            .expect("populated");

        assert_eq!(
            population.tiles().get(Point::new(1, 0)),
            Some(&Tile::Fact(CellFact::sum(3, 5)))
        );
        assert!(population.unplaced().is_empty());
    }

    #[test]
    fn out_of_range_requests_are_left_unplaced() {
        let (grid, path) = hooked();
        let wanted = [
            CellFact::parse("3 - 9").expect("valid"),
            CellFact::parse("97 - 1").expect("valid"),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let population = CellPopulator::default()
            .populate(&request(&grid, &path, OperationType::Subtraction, &wanted), &mut rng)
            .expect("populated");
        assert_eq!(population.unplaced(), &wanted);
    }

    #[test]
    fn passed_deadline_stops_at_the_first_labelled_tile() {
        let (grid, path) = hooked();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let error = CellPopulator::default()
            .populate(
                &PopulationRequest {
                    deadline: Some(Instant::now()),
                    ..request(&grid, &path, OperationType::Multiplication, &[])
                },
                &mut rng,
            )
            .unwrap_err();
        assert_eq!(
            error,
            PopulationError::DeadlineExceeded {
                cell: Point::new(1, 0),
            }
        );
        assert!(!error.is_retryable());
    }

    #[test]
    fn empty_numbers_range_is_rejected() {
        let (grid, path) = hooked();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let error = CellPopulator::default()
            .populate(
                &PopulationRequest {
                    numbers_range: NumberRange::new(4, 2),
                    ..request(&grid, &path, OperationType::Division, &[])
                },
                &mut rng,
            )
            .unwrap_err();
        assert_eq!(
            error,
            PopulationError::EmptyRange {
                range: NumberRange::new(4, 2),
            }
        );
    }

    #[test]
    fn zero_sampling_attempts_are_raised_to_one() {
        assert_eq!(PopulationConfig::new(0).max_sampling_attempts(), 1);
        assert_eq!(PopulationConfig::default().max_sampling_attempts(), 10_000);
    }
}
