//! Previewer configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `skyrun.ron` file (if exists)
//! 3. Environment variables prefixed with `SKYRUN_`
//!
//! Example environment variable: `SKYRUN_RUN__TRIGGER_DISTANCE=2400`
//!
//! Command-line flags are applied on top by `main`.

use anyhow::{Context, Result, anyhow};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use skyrun_core::world::LevelGenConfig;
use std::path::Path;

/// Main previewer configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub preview: PreviewConfig,
}

/// Simulated play session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Master seed; random when unset
    #[serde(default)]
    pub seed: Option<u64>,
    /// How far the simulated player walks, in pixels
    pub distance: f64,
    /// Keep the frontier at least this far ahead of the player
    pub trigger_distance: f64,
    /// Player step between streaming checks, in pixels
    pub step: f64,
    /// Level preset: default, dense, sparse, hazardous
    pub preset: String,
    /// RON level config; overrides `preset`
    #[serde(default)]
    pub level_file: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            distance: 8000.0,
            trigger_distance: 1600.0,
            step: 200.0,
            preset: "default".to_string(),
            level_file: None,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Print the level as text
    pub ascii: bool,
    /// Widest text render, in tile columns
    pub ascii_max_columns: u32,
    /// Write a RON dump of the level here
    #[serde(default)]
    pub export_path: Option<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            ascii: false,
            ascii_max_columns: 160,
            export_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `skyrun.ron` file (if exists)
    /// 3. Environment variables prefixed with `SKYRUN_` (highest priority)
    pub fn load() -> Result<Self> {
        Self::load_from("skyrun")
    }

    /// Same as [`load`](Self::load) with a different file name (no extension)
    pub fn load_from(file_name: &str) -> Result<Self> {
        Self::load_layered(file_name, environment())
    }

    fn load_layered(file_name: &str, environment: Environment) -> Result<Self> {
        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("run.distance", 8000.0)?
            .set_default("run.trigger_distance", 1600.0)?
            .set_default("run.step", 200.0)?
            .set_default("run.preset", "default")?
            .set_default("preview.ascii", false)?
            .set_default("preview.ascii_max_columns", 160_i64)?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name(file_name)
                    .format(config::FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (SKYRUN_RUN__SEED, etc.)
            .add_source(environment);

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Resolve the level generation config: level file first, then preset
    pub fn level_config(&self) -> Result<LevelGenConfig> {
        match &self.run.level_file {
            Some(path) => load_level_file(Path::new(path)),
            None => LevelGenConfig::preset(&self.run.preset).ok_or_else(|| {
                anyhow!(
                    "Unknown preset '{}' (available: {})",
                    self.run.preset,
                    LevelGenConfig::PRESET_NAMES.join(", ")
                )
            }),
        }
    }
}

/// `SKYRUN_` prefix, `__` between nested keys
fn environment() -> Environment {
    Environment::with_prefix("SKYRUN")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Read and validate a RON level config
pub fn load_level_file(path: &Path) -> Result<LevelGenConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read level config {}", path.display()))?;
    LevelGenConfig::from_ron(&source)
        .with_context(|| format!("Invalid level config {}", path.display()))
}
