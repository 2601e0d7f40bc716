//! Level generation configuration - serializable parameters for the generator
//!
//! Every constant the generator uses lives here so presets can be stored as
//! RON files and tweaked without recompiling. The seed is NOT part of the
//! config: same config + different seed = different level.

use crate::world::structure::StructureWeights;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Complete level generation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelGenConfig {
    /// Display name for this configuration
    pub name: String,

    /// Tile grid and vertical ladder
    pub tiles: TileParams,

    /// Chunk streaming
    pub chunks: ChunkParams,

    /// Hazard-free start area
    pub spawn: SpawnParams,

    /// Biome segment lengths
    pub biomes: BiomeParams,

    /// Structure shapes, spacing and selection weights
    pub structures: StructureParams,
}

/// Tile grid and vertical ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileParams {
    /// Edge length of one square tile (default: 70)
    pub tile_size: f64,
    /// Y of the floor row's tile centres (default: 650)
    pub floor_y: f64,
    /// Height of the thin top-surface hitbox on floors and platforms (default: 20)
    pub surface_thickness: f64,
    /// Number of ladder levels including ground (default: 6)
    pub level_count: u32,
    /// Vertical distance between ladder levels in tiles (default: 1)
    pub level_step_tiles: u32,
}

/// Chunk streaming parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkParams {
    /// Width of one generated slice (default: 800)
    pub chunk_width: f64,
    /// Distance kept free of structures at both chunk edges (default: 70)
    pub edge_margin: f64,
    /// Chunks generated by `generate_world` after the spawn zone (default: 5)
    pub prime_chunks: u32,
    /// Reseed the RNG from (seed, chunk_x) before each chunk (default: true)
    pub deterministic_chunks: bool,
}

/// Spawn zone parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnParams {
    /// Width of the hazard-free spawn floor (default: 500)
    pub spawn_width: f64,
    /// Height in tiles of the decorative edge pillars (default: 3)
    pub pillar_height: u32,
}

/// Biome segment lengths in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeParams {
    /// Shortest segment (default: 1500)
    pub segment_min: u32,
    /// Longest segment (default: 3000)
    pub segment_max: u32,
}

/// Inclusive integer range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

/// Structure shapes and spacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureParams {
    /// Relative selection weights
    pub weights: StructureWeights,
    /// Floating platform width in tiles (default: 2..=4)
    pub platform_width: IntRange,
    /// Ladder levels a floating platform may use (default: 1..=5)
    pub platform_levels: IntRange,
    /// Staircase length in steps (default: 4..=7)
    pub staircase_steps: IntRange,
    /// Pillar wall height in tiles (default: 3..=6)
    pub pillar_height: IntRange,
    /// Width of the platform on top of a pillar (default: 3)
    pub pillar_platform_width: u32,
    /// Spike trap width in tiles (default: 2..=4)
    pub spike_width: IntRange,
    /// Cursor jump for a gap in pixels (default: 140..=280)
    pub gap_span: IntRange,
    /// Spacing after platforms and spike traps (default: 140)
    pub platform_spacing: f64,
    /// Spacing after staircases and pillars (default: 210)
    pub structure_spacing: f64,
}

/// Reasons a configuration is rejected
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} range is empty: {min}..={max}")]
    EmptyRange {
        field: &'static str,
        min: i32,
        max: i32,
    },

    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        min: i32,
        value: i32,
    },

    #[error("platform levels {min}..={max} must lie within 1..={top}")]
    LevelsOutsideLadder { min: i32, max: i32, top: i32 },

    #[error("chunk width {chunk_width} leaves no room inside edge margin {edge_margin}")]
    ChunkTooNarrow { chunk_width: f64, edge_margin: f64 },

    #[error("structure weights must be non-negative and not all zero")]
    InvalidWeights,

    #[error("failed to parse level config: {0}")]
    Parse(String),
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for LevelGenConfig {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            tiles: TileParams::default(),
            chunks: ChunkParams::default(),
            spawn: SpawnParams::default(),
            biomes: BiomeParams::default(),
            structures: StructureParams::default(),
        }
    }
}

impl Default for TileParams {
    fn default() -> Self {
        Self {
            tile_size: 70.0,
            floor_y: 650.0,
            surface_thickness: 20.0,
            level_count: 6,
            level_step_tiles: 1,
        }
    }
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            chunk_width: 800.0,
            edge_margin: 70.0,
            prime_chunks: 5,
            deterministic_chunks: true,
        }
    }
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            spawn_width: 500.0,
            pillar_height: 3,
        }
    }
}

impl Default for BiomeParams {
    fn default() -> Self {
        Self {
            segment_min: 1500,
            segment_max: 3000,
        }
    }
}

impl Default for StructureParams {
    fn default() -> Self {
        Self {
            weights: StructureWeights::default(),
            platform_width: IntRange::new(2, 4),
            platform_levels: IntRange::new(1, 5),
            staircase_steps: IntRange::new(4, 7),
            pillar_height: IntRange::new(3, 6),
            pillar_platform_width: 3,
            spike_width: IntRange::new(2, 4),
            gap_span: IntRange::new(140, 280),
            platform_spacing: 140.0,
            structure_spacing: 210.0,
        }
    }
}

// ============================================================================
// Derived geometry
// ============================================================================

impl LevelGenConfig {
    /// Highest ladder level (ground is 0)
    pub fn top_level(&self) -> i32 {
        self.tiles.level_count as i32 - 1
    }

    /// Vertical distance between two ladder levels
    pub fn level_step(&self) -> f64 {
        self.tiles.level_step_tiles as f64 * self.tiles.tile_size
    }

    /// Tile-centre Y of `level`; levels above the ladder extrapolate upward
    pub fn level_y(&self, level: i32) -> f64 {
        self.tiles.floor_y - level as f64 * self.level_step()
    }

    /// Y recorded for every spike hazard
    pub fn hazard_y(&self) -> f64 {
        self.tiles.floor_y - self.tiles.tile_size / 2.0
    }

    /// Floor tiles needed to cover `width` without a gap
    pub fn tiles_across(&self, width: f64) -> u32 {
        (width / self.tiles.tile_size).ceil().max(0.0) as u32
    }

    // ========================================================================
    // Validation and serialization
    // ========================================================================

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("tiles.tile_size", self.tiles.tile_size),
            ("tiles.surface_thickness", self.tiles.surface_thickness),
            ("chunks.chunk_width", self.chunks.chunk_width),
            ("spawn.spawn_width", self.spawn.spawn_width),
        ];
        for (field, value) in positive {
            // Written so NaN fails too
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if self.chunks.edge_margin < 0.0 || self.chunks.chunk_width <= 2.0 * self.chunks.edge_margin
        {
            return Err(ConfigError::ChunkTooNarrow {
                chunk_width: self.chunks.chunk_width,
                edge_margin: self.chunks.edge_margin,
            });
        }

        if self.tiles.level_count < 2 {
            return Err(ConfigError::TooSmall {
                field: "tiles.level_count",
                min: 2,
                value: self.tiles.level_count as i32,
            });
        }
        if self.tiles.level_step_tiles < 1 {
            return Err(ConfigError::TooSmall {
                field: "tiles.level_step_tiles",
                min: 1,
                value: 0,
            });
        }

        if self.biomes.segment_min < 1 || self.biomes.segment_min > self.biomes.segment_max {
            return Err(ConfigError::EmptyRange {
                field: "biomes.segment",
                min: self.biomes.segment_min as i32,
                max: self.biomes.segment_max as i32,
            });
        }

        let s = &self.structures;
        let ranges = [
            ("structures.platform_width", s.platform_width, 1),
            ("structures.platform_levels", s.platform_levels, 1),
            ("structures.staircase_steps", s.staircase_steps, 1),
            ("structures.pillar_height", s.pillar_height, 1),
            ("structures.spike_width", s.spike_width, 1),
            ("structures.gap_span", s.gap_span, 1),
        ];
        for (field, range, min) in ranges {
            if range.is_empty() {
                return Err(ConfigError::EmptyRange {
                    field,
                    min: range.min,
                    max: range.max,
                });
            }
            if range.min < min {
                return Err(ConfigError::TooSmall {
                    field,
                    min,
                    value: range.min,
                });
            }
        }

        let top = self.top_level();
        if s.platform_levels.max > top {
            return Err(ConfigError::LevelsOutsideLadder {
                min: s.platform_levels.min,
                max: s.platform_levels.max,
                top,
            });
        }

        if s.pillar_platform_width < 1 {
            return Err(ConfigError::TooSmall {
                field: "structures.pillar_platform_width",
                min: 1,
                value: 0,
            });
        }

        let weights_ok = s.weights.table().iter().all(|(_, w)| *w >= 0.0) && s.weights.total() > 0.0;
        if !weights_ok {
            return Err(ConfigError::InvalidWeights);
        }

        Ok(())
    }

    /// Parse and validate a RON document
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Look up a preset by name (case-insensitive)
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(Self::default()),
            "dense" => Some(Self::preset_dense()),
            "sparse" => Some(Self::preset_sparse()),
            "hazardous" => Some(Self::preset_hazardous()),
            _ => None,
        }
    }

    pub const PRESET_NAMES: [&'static str; 4] = ["default", "dense", "sparse", "hazardous"];
}

// ============================================================================
// Preset helpers
// ============================================================================

impl LevelGenConfig {
    /// Tighter spacing and fewer gaps
    pub fn preset_dense() -> Self {
        Self {
            name: "Dense".to_string(),
            structures: StructureParams {
                weights: StructureWeights {
                    gap: 0.05,
                    ..StructureWeights::default()
                },
                platform_spacing: 70.0,
                structure_spacing: 140.0,
                ..StructureParams::default()
            },
            ..Self::default()
        }
    }

    /// Wide spacing, mostly platforms and gaps
    pub fn preset_sparse() -> Self {
        Self {
            name: "Sparse".to_string(),
            structures: StructureParams {
                weights: StructureWeights {
                    floating_platform: 0.35,
                    staircase: 0.10,
                    pillar_platform: 0.10,
                    gap: 0.35,
                    spike_trap: 0.10,
                },
                platform_spacing: 210.0,
                structure_spacing: 280.0,
                gap_span: IntRange::new(210, 350),
                ..StructureParams::default()
            },
            ..Self::default()
        }
    }

    /// Spike traps twice as likely, wider traps
    pub fn preset_hazardous() -> Self {
        Self {
            name: "Hazardous".to_string(),
            structures: StructureParams {
                weights: StructureWeights {
                    spike_trap: 0.30,
                    gap: 0.10,
                    ..StructureWeights::default()
                },
                spike_width: IntRange::new(3, 4),
                ..StructureParams::default()
            },
            ..Self::default()
        }
    }
}
