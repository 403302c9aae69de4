#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates math mazes and grades solved ones.
//!
//! Results are printed to stdout as JSON; logs go to stderr.

mod request;
mod settings;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use math_maze_core::{CellFact, Maze, OperationType};
use math_maze_system_assessment::{Assessor, Submission};
use math_maze_system_generation::{Generation, GenerationConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{de::DeserializeOwned, Serialize};
use tracing_subscriber::EnvFilter;

use crate::request::RawRequest;

#[derive(Parser)]
#[command(name = "math-maze")]
#[command(about = "Generate arithmetic mazes whose path is revealed by parity")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Generate a maze and print it as JSON
    Generate(GenerateArgs),
    /// Grade a solved maze and print the assessment as JSON
    Check {
        /// Maze JSON previously printed by `generate`
        #[arg(long)]
        maze: PathBuf,
        /// Solution JSON with `answers` rows and the traced `path`
        #[arg(long)]
        answers: PathBuf,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Number of columns; odd, 11 to 49
    #[arg(long, default_value_t = 11)]
    width: u32,
    /// Number of rows; odd, 11 to 49
    #[arg(long, default_value_t = 11)]
    height: u32,
    #[arg(long, default_value_t = 1)]
    numbers_start: u32,
    #[arg(long, default_value_t = 10)]
    numbers_end: u32,
    /// One of ADDITION, SUBTRACTION, BOTH_ADDITION_AND_SUBTRACTION,
    /// MULTIPLICATION, DIVISION, BOTH_MULTIPLICATION_AND_DIVISION
    #[arg(long, default_value_t = OperationType::Addition)]
    operation: OperationType,
    /// Whether path tiles evaluate to even numbers
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    path_type_even: bool,
    /// Shortest acceptable path, in labelled tiles
    #[arg(long)]
    min_length: Option<u32>,
    /// Longest acceptable path, in labelled tiles
    #[arg(long)]
    max_length: Option<u32>,
    /// Seed of the random source; drawn from the OS when absent
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file with a `[generation]` table
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON array of expressions to re-surface, such as `["3 * 4"]`
    #[arg(long)]
    must_include: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Generate(args) => generate(args),
        Action::Check { maze, answers } => check(&maze, &answers),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn generate(args: GenerateArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => settings::load(path)?,
        None => GenerationConfig::default(),
    };
    let must_include: Vec<CellFact> = match &args.must_include {
        Some(path) => read_json(path, "must-include list")?,
        None => Vec::new(),
    };

    let request = RawRequest {
        width: args.width,
        height: args.height,
        numbers_start: args.numbers_start,
        numbers_end: args.numbers_end,
        operation: args.operation,
        path_type_even: args.path_type_even,
        min_length: args.min_length,
        max_length: args.max_length,
        must_include,
    }
    .validate()
    .context("invalid maze request")?;

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, operation = %request.operation, "generating maze");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let generated = Generation::new(config)
        .generate(&request, &mut rng)
        .context("maze generation failed")?;

    print_json(generated.maze())
}

fn check(maze_path: &Path, answers_path: &Path) -> Result<()> {
    let maze: Maze = read_json(maze_path, "maze")?;
    let submission: Submission = read_json(answers_path, "solution")?;
    let assessment = Assessor::new()
        .assess(&maze, &submission)
        .context("solution does not fit the maze")?;

    let summary = assessment.summary();
    tracing::info!(
        correct = summary.correct,
        incorrect = summary.incorrect,
        missed_path = summary.missed_path,
        "solution checked"
    );
    print_json(&assessment)
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} at {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {what} at {}", path.display()))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).context("failed to write json")?;
    writeln!(out)?;
    Ok(())
}
