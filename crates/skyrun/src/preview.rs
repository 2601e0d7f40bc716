//! Preview outputs - a recording tile sink, text rendering and RON export

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skyrun_core::world::biome::biome_texture_keys;
use skyrun_core::world::occupancy::column_of;
use skyrun_core::world::{
    GenerationStats, HazardRecord, LevelGenConfig, SPIKE_TEXTURE, Tile, TileRole, TileSink,
    WorldSnapshot,
};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Tile sink that records tiles and knows which textures a renderer has
#[derive(Debug, Default)]
pub struct PreviewSink {
    textures: HashSet<String>,
    tiles: Vec<Tile>,
}

impl PreviewSink {
    /// Sink that knows every biome texture plus the spike sprite
    pub fn with_level_textures() -> Self {
        Self::with_textures(biome_texture_keys().chain([SPIKE_TEXTURE]))
    }

    pub fn with_textures<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            textures: keys.into_iter().map(str::to_string).collect(),
            tiles: Vec::new(),
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn into_tiles(self) -> Vec<Tile> {
        self.tiles
    }
}

impl TileSink for PreviewSink {
    fn spawn_tile(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    fn has_texture(&self, key: &str) -> bool {
        self.textures.contains(key)
    }
}

fn glyph(role: TileRole) -> char {
    match role {
        TileRole::Floor | TileRole::SpikeBase => '=',
        TileRole::Platform => '-',
        TileRole::Step => '#',
        TileRole::Wall => '|',
        TileRole::Spikes => '^',
    }
}

/// Render tiles in `[from_x, to_x)` as text, one character per tile column
///
/// The top row is the highest occupied level, the bottom row the floor.
pub fn render_ascii(tiles: &[Tile], config: &LevelGenConfig, from_x: f64, to_x: f64) -> String {
    let tile_size = config.tiles.tile_size;
    let first = column_of(from_x, tile_size);
    let last = column_of(to_x, tile_size);
    if last <= first {
        return String::new();
    }

    // Later tiles win, so spike bases cover the floor row under a trap
    let mut cells: BTreeMap<(i32, i32), char> = BTreeMap::new();
    for tile in tiles {
        let column = column_of(tile.x - tile_size / 2.0, tile_size);
        if column < first || column >= last {
            continue;
        }
        let level = ((config.tiles.floor_y - tile.y) / config.level_step()).round() as i32;
        cells.insert((level, column), glyph(tile.role));
    }

    let top = cells
        .keys()
        .map(|(level, _)| *level)
        .max()
        .unwrap_or(0)
        .max(config.top_level());

    let mut out = String::new();
    for level in (0..=top).rev() {
        let row: String = (first..last)
            .map(|column| cells.get(&(level, column)).copied().unwrap_or(' '))
            .collect();
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}

/// Everything the previewer produced, as written by `--export`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelExport {
    pub config_name: String,
    pub seed: u64,
    pub frontier: f64,
    pub snapshot: WorldSnapshot,
    pub stats: GenerationStats,
    pub missing_textures: Vec<String>,
    pub tiles: Vec<Tile>,
    pub hazards: Vec<HazardRecord>,
}

impl LevelExport {
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize level export")
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let text = self.to_ron()?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write level export {}", path.display()))?;
        log::info!(
            "Exported {} tiles and {} hazards to {}",
            self.tiles.len(),
            self.hazards.len(),
            path.display()
        );
        Ok(())
    }
}
