//! Optional TOML file tuning the generation pipeline.
//!
//! ```toml
//! [generation]
//! max_layout_attempts = 10
//! max_population_attempts = 3
//! max_sampling_attempts = 10000
//! deadline_ms = 2000
//! ```

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use math_maze_system_generation::GenerationConfig;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default)]
    generation: GenerationTable,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GenerationTable {
    max_layout_attempts: Option<u32>,
    max_population_attempts: Option<u32>,
    max_sampling_attempts: Option<u32>,
    deadline_ms: Option<u64>,
}

/// Reads the pipeline configuration from `path`.
pub(crate) fn load(path: &Path) -> Result<GenerationConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid settings in {}", path.display()))
}

fn parse(contents: &str) -> Result<GenerationConfig> {
    let file: SettingsFile =
        toml::from_str(contents).context("failed to parse settings toml contents")?;
    let table = file.generation;
    let defaults = GenerationConfig::default();

    for (name, value) in [
        ("max_layout_attempts", table.max_layout_attempts),
        ("max_population_attempts", table.max_population_attempts),
        ("max_sampling_attempts", table.max_sampling_attempts),
    ] {
        if value == Some(0) {
            bail!("`{name}` must be at least 1");
        }
    }

    let config = GenerationConfig::new(
        table
            .max_layout_attempts
            .unwrap_or(defaults.max_layout_attempts()),
        table
            .max_population_attempts
            .unwrap_or(defaults.max_population_attempts()),
        table
            .max_sampling_attempts
            .unwrap_or(defaults.max_sampling_attempts()),
    );
    Ok(config.with_deadline(table.deadline_ms.map(Duration::from_millis)))
}
