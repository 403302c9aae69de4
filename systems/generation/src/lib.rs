#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Orchestrates carving, endpoint selection and population into a finished maze.
//!
//! Layouts whose path misses the requested length are carved again up to a
//! configured number of times before the last one is accepted. Population
//! failures caused by exhausted constraints restart the whole pipeline with
//! the random source advanced, again up to a configured number of times. An
//! optional deadline bounds the whole run, population included.

use std::{
    ops::RangeInclusive,
    time::{Duration, Instant},
};

use math_maze_core::{CellFact, Grid, Maze, NumberRange, OperationType};
use math_maze_system_cell_population::{
    CellPopulator, PopulationConfig, PopulationError, PopulationRequest,
    DEFAULT_MAX_SAMPLING_ATTEMPTS,
};
use math_maze_system_endpoint_selection::{EndpointChoice, EndpointSelector, LayoutError, Selection};
use math_maze_system_grid_generation::GridGenerator;
use rand::Rng;
use thiserror::Error;

/// Default number of layouts carved while chasing the requested length.
pub const DEFAULT_MAX_LAYOUT_ATTEMPTS: u32 = 10;
/// Default number of full pipeline runs when population fails.
pub const DEFAULT_MAX_POPULATION_ATTEMPTS: u32 = 3;

/// Retry bounds and deadline of the generation pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
    max_layout_attempts: u32,
    max_population_attempts: u32,
    max_sampling_attempts: u32,
    deadline: Option<Duration>,
}

impl GenerationConfig {
    /// Creates a configuration without a deadline. Zero attempts are raised to one.
    #[must_use]
    pub const fn new(
        max_layout_attempts: u32,
        max_population_attempts: u32,
        max_sampling_attempts: u32,
    ) -> Self {
        Self {
            max_layout_attempts: at_least_one(max_layout_attempts),
            max_population_attempts: at_least_one(max_population_attempts),
            max_sampling_attempts: at_least_one(max_sampling_attempts),
            deadline: None,
        }
    }

    /// Returns the configuration with the provided wall-clock budget.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Layouts carved before the corner fallback is accepted.
    #[must_use]
    pub const fn max_layout_attempts(&self) -> u32 {
        self.max_layout_attempts
    }

    /// Full pipeline runs before a population failure is reported.
    #[must_use]
    pub const fn max_population_attempts(&self) -> u32 {
        self.max_population_attempts
    }

    /// Operand draws per addition or subtraction tile.
    #[must_use]
    pub const fn max_sampling_attempts(&self) -> u32 {
        self.max_sampling_attempts
    }

    /// Wall-clock budget of one generation, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_LAYOUT_ATTEMPTS,
            DEFAULT_MAX_POPULATION_ATTEMPTS,
            DEFAULT_MAX_SAMPLING_ATTEMPTS,
        )
    }
}

const fn at_least_one(value: u32) -> u32 {
    if value == 0 {
        1
    } else {
        value
    }
}

/// Parameters of a single maze, already validated by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeRequest {
    /// Number of columns; odd.
    pub width: u32,
    /// Number of rows; odd.
    pub height: u32,
    /// Operands are drawn from this range.
    pub numbers_range: NumberRange,
    /// Operation family printed on the tiles.
    pub operation: OperationType,
    /// Whether path tiles evaluate to even numbers.
    pub path_type_even: bool,
    /// Shortest acceptable number of labelled path tiles.
    pub min_length: u32,
    /// Longest acceptable number of labelled path tiles.
    pub max_length: u32,
    /// Facts to re-surface, typically ones previously answered incorrectly.
    pub must_include: Vec<CellFact>,
}

impl MazeRequest {
    /// Acceptable path lengths in cells, counting the blank start and end tiles.
    #[must_use]
    pub fn length_range(&self) -> RangeInclusive<usize> {
        (self.min_length as usize + 2)..=(self.max_length as usize + 2)
    }
}

/// A finished maze together with how it was obtained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedMaze {
    maze: Maze,
    unplaced: Vec<CellFact>,
    choice: EndpointChoice,
    layout_attempts: u32,
    population_attempts: u32,
}

impl GeneratedMaze {
    /// The labelled maze.
    #[must_use]
    pub const fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Requested facts that found no fitting tile.
    #[must_use]
    pub fn unplaced(&self) -> &[CellFact] {
        &self.unplaced
    }

    /// Rule that produced the endpoint of the accepted layout.
    #[must_use]
    pub const fn choice(&self) -> EndpointChoice {
        self.choice
    }

    /// Layouts carved during the successful pipeline run.
    #[must_use]
    pub const fn layout_attempts(&self) -> u32 {
        self.layout_attempts
    }

    /// Pipeline runs performed, including the successful one.
    #[must_use]
    pub const fn population_attempts(&self) -> u32 {
        self.population_attempts
    }

    /// Consumes the result, keeping only the maze.
    #[must_use]
    pub fn into_maze(self) -> Maze {
        self.maze
    }
}

/// Failures raised while generating a maze.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The endpoint could not be resolved.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// Population failed in a way a retry cannot fix.
    #[error(transparent)]
    Population(#[from] PopulationError),
    /// Every pipeline run ended in a constraint-exhaustion failure.
    #[error("population failed after {attempts} attempts")]
    PopulationAttemptsExhausted {
        /// Pipeline runs performed.
        attempts: u32,
        /// Failure of the last run.
        #[source]
        source: PopulationError,
    },
    /// The wall-clock budget ran out.
    #[error("generation exceeded its {deadline:?} deadline")]
    DeadlineExceeded {
        /// Budget that was exceeded.
        deadline: Duration,
    },
}

struct Layout {
    grid: Grid<bool>,
    selection: Selection,
    attempts: u32,
}

/// Pipeline that turns a [`MazeRequest`] into a labelled [`Maze`].
#[derive(Debug)]
pub struct Generation {
    config: GenerationConfig,
    carver: GridGenerator,
    selector: EndpointSelector,
    populator: CellPopulator,
}

impl Default for Generation {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}

impl Generation {
    /// Creates the pipeline with the provided configuration.
    #[must_use]
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            carver: GridGenerator::new(),
            selector: EndpointSelector::new(),
            populator: CellPopulator::new(PopulationConfig::new(config.max_sampling_attempts())),
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> GenerationConfig {
        self.config
    }

    /// Generates one maze, drawing all randomness from `rng`.
    pub fn generate<R: Rng + ?Sized>(
        &mut self,
        request: &MazeRequest,
        rng: &mut R,
    ) -> Result<GeneratedMaze, GenerationError> {
        let started = Instant::now();
        let deadline = self
            .config
            .deadline()
            .and_then(|deadline| started.checked_add(deadline));
        let mut population_attempts = 0;

        loop {
            population_attempts += 1;
            let layout = self.lay_out(request, started, rng)?;
            let population = self.populator.populate(
                &PopulationRequest {
                    grid: &layout.grid,
                    path: layout.selection.path(),
                    endpoint: layout.selection.endpoint(),
                    numbers_range: request.numbers_range,
                    operation: request.operation,
                    path_type_even: request.path_type_even,
                    must_include: &request.must_include,
                    deadline,
                },
                rng,
            );
            self.check_deadline(started)?;

            match population {
                Ok(population) => {
                    let choice = layout.selection.choice();
                    let (endpoint, path) = layout.selection.into_parts();
                    let (tiles, unplaced) = population.into_parts();
                    tracing::info!(
                        width = request.width,
                        height = request.height,
                        operation = ?request.operation,
                        path_length = path.len(),
                        %endpoint,
                        ?choice,
                        layout_attempts = layout.attempts,
                        population_attempts,
                        "maze generated"
                    );

                    let maze = Maze::new(
                        request.numbers_range,
                        request.operation,
                        request.path_type_even,
                        tiles,
                        endpoint,
                        path,
                    );
                    return Ok(GeneratedMaze {
                        maze,
                        unplaced,
                        choice,
                        layout_attempts: layout.attempts,
                        population_attempts,
                    });
                }
                Err(error) if !error.is_retryable() => return Err(error.into()),
                Err(error) if population_attempts >= self.config.max_population_attempts() => {
                    return Err(GenerationError::PopulationAttemptsExhausted {
                        attempts: population_attempts,
                        source: error,
                    });
                }
                Err(error) => {
                    tracing::warn!(%error, population_attempts, "population failed, regenerating");
                }
            }
        }
    }

    /// Carves layouts until the path length fits or the attempts run out.
    fn lay_out<R: Rng + ?Sized>(
        &mut self,
        request: &MazeRequest,
        started: Instant,
        rng: &mut R,
    ) -> Result<Layout, GenerationError> {
        let length_range = request.length_range();
        let mut attempts = 0;

        loop {
            attempts += 1;
            self.check_deadline(started)?;

            let (grid, tree) = self
                .carver
                .generate(request.width, request.height, rng)
                .into_parts();
            let selection = self.selector.select(&tree, &length_range)?;

            let fits = length_range.contains(&selection.path().len());
            if fits || attempts >= self.config.max_layout_attempts() {
                if !fits {
                    tracing::debug!(
                        attempts,
                        path_length = selection.path().len(),
                        "accepting layout outside the requested length"
                    );
                }
                return Ok(Layout {
                    grid,
                    selection,
                    attempts,
                });
            }
        }
    }

    fn check_deadline(&self, started: Instant) -> Result<(), GenerationError> {
        match self.config.deadline() {
            Some(deadline) if started.elapsed() >= deadline => {
                Err(GenerationError::DeadlineExceeded { deadline })
            }
            _ => Ok(()),
        }
    }
}
