#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that grades a solver's answers and traced path against a maze.

use math_maze_core::{CellFact, Grid, Maze, Point};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A solver's answers and traced path for one maze.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    answers: Grid<Option<i64>>,
    path: Vec<Point>,
}

impl Submission {
    /// Creates a submission; `None` marks a tile left unanswered.
    #[must_use]
    pub fn new(answers: Grid<Option<i64>>, path: Vec<Point>) -> Self {
        Self { answers, path }
    }

    /// Answer written on every tile.
    #[must_use]
    pub const fn answers(&self) -> &Grid<Option<i64>> {
        &self.answers
    }

    /// Cells the solver marked as the path.
    #[must_use]
    pub fn path(&self) -> &[Point] {
        &self.path
    }
}

/// Grading of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileAssessment {
    fact: Option<CellFact>,
    answer: Option<i64>,
    expected: Option<i64>,
    on_solver_path: bool,
    on_maze_path: bool,
}

impl TileAssessment {
    /// Fact printed on the tile; `None` for the start and end tiles.
    #[must_use]
    pub const fn fact(&self) -> Option<&CellFact> {
        self.fact.as_ref()
    }

    /// Answer the solver gave, ignored on blank tiles.
    #[must_use]
    pub const fn answer(&self) -> Option<i64> {
        self.answer
    }

    /// Value of the printed expression.
    #[must_use]
    pub const fn expected(&self) -> Option<i64> {
        self.expected
    }

    /// Whether the solver marked the tile as part of the path.
    #[must_use]
    pub const fn on_solver_path(&self) -> bool {
        self.on_solver_path
    }

    /// Whether the tile lies on the maze's solution path.
    #[must_use]
    pub const fn on_maze_path(&self) -> bool {
        self.on_maze_path
    }

    /// `Some(true)` for a right answer, `Some(false)` for a wrong one, `None` if unanswered.
    #[must_use]
    pub fn is_correct(&self) -> Option<bool> {
        match (self.answer, self.expected) {
            (Some(answer), Some(expected)) => Some(answer == expected),
            _ => None,
        }
    }
}

/// Totals over every tile of a submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Answered tiles whose answer matched the expression.
    pub correct: u32,
    /// Answered tiles whose answer did not match.
    pub incorrect: u32,
    /// Labelled tiles on both paths.
    pub correct_path: u32,
    /// Tiles marked by the solver that are off the solution path.
    pub wrong_path: u32,
    /// Solution path tiles the solver did not mark.
    pub missed_path: u32,
}

/// Graded submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Assessment {
    tiles: Grid<TileAssessment>,
    summary: Summary,
    incorrect: Vec<CellFact>,
}

impl Assessment {
    /// Per-tile grading.
    #[must_use]
    pub const fn tiles(&self) -> &Grid<TileAssessment> {
        &self.tiles
    }

    /// Totals of the grading.
    #[must_use]
    pub const fn summary(&self) -> Summary {
        self.summary
    }

    /// Distinct facts answered incorrectly, in raster order.
    ///
    /// The list is suitable as the facts a follow-up maze should re-surface.
    #[must_use]
    pub fn incorrect_facts(&self) -> &[CellFact] {
        &self.incorrect
    }
}

/// Reasons a submission cannot be graded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AssessmentError {
    /// The answers grid does not cover the maze.
    #[error("answers are {width}x{height} but the maze is {maze_width}x{maze_height}")]
    DimensionMismatch {
        /// Columns of the maze.
        maze_width: u32,
        /// Rows of the maze.
        maze_height: u32,
        /// Columns of the answers grid.
        width: u32,
        /// Rows of the answers grid.
        height: u32,
    },
    /// The traced path leaves the maze.
    #[error("path point {point} lies outside the maze")]
    PathOutOfBounds {
        /// Offending point.
        point: Point,
    },
}

/// Pure system that grades submissions.
#[derive(Debug, Default)]
pub struct Assessor;

impl Assessor {
    /// Creates a new assessor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Grades `submission` against `maze`.
    pub fn assess(&self, maze: &Maze, submission: &Submission) -> Result<Assessment, AssessmentError> {
        let answers = submission.answers();
        if answers.width() != maze.width() || answers.height() != maze.height() {
            return Err(AssessmentError::DimensionMismatch {
                maze_width: maze.width(),
                maze_height: maze.height(),
                width: answers.width(),
                height: answers.height(),
            });
        }

        let maze_path = path_mask(maze, maze.path())?;
        let solver_path = path_mask(maze, submission.path())?;
        let mut summary = Summary::default();
        let mut incorrect = Vec::new();

        let tiles = maze.tiles().map(|point, tile| {
            let on_solver_path = solver_path.get(point).copied().unwrap_or(false);
            let on_maze_path = maze_path.get(point).copied().unwrap_or(false);
            let fact = tile.fact().copied();

            match (on_solver_path, on_maze_path) {
                (true, false) => summary.wrong_path += 1,
                (false, true) => summary.missed_path += 1,
                (true, true) if fact.is_some() => summary.correct_path += 1,
                _ => {}
            }

            let answer = fact.and(answers.get(point).copied().flatten());
            let assessment = TileAssessment {
                fact,
                answer,
                expected: fact.map(|fact| fact.value()),
                on_solver_path,
                on_maze_path,
            };

            match assessment.is_correct() {
                Some(true) => summary.correct += 1,
                Some(false) => {
                    summary.incorrect += 1;
                    if let Some(fact) = fact {
                        if !incorrect.contains(&fact) {
                            incorrect.push(fact);
                        }
                    }
                }
                None => {}
            }
            assessment
        });

        tracing::debug!(
            correct = summary.correct,
            incorrect = summary.incorrect,
            correct_path = summary.correct_path,
            wrong_path = summary.wrong_path,
            missed_path = summary.missed_path,
            "submission assessed"
        );

        Ok(Assessment {
            tiles,
            summary,
            incorrect,
        })
    }
}

fn path_mask(maze: &Maze, path: &[Point]) -> Result<Grid<bool>, AssessmentError> {
    let mut mask = Grid::filled(maze.width(), maze.height(), false);
    for &point in path {
        let slot = mask
            .get_mut(point)
            .ok_or(AssessmentError::PathOutOfBounds { point })?;
        *slot = true;
    }
    Ok(mask)
}
