//! Chunk generation - one fixed-width slice of the level

use crate::world::biome::{BiomeManager, BiomeSwitch, BiomeType};
use crate::world::levelgen_config::LevelGenConfig;
use crate::world::occupancy::OccupancyGrid;
use crate::world::rng::SeededRng;
use crate::world::stats::GenerationStats;
use crate::world::structure_placement::StructurePlacer;
use crate::world::tile::{HazardSink, Hitbox, LevelSinks, Tile, TileRole, TileSink};

/// Mutable generation state shared by every chunk of one level
#[derive(Debug, Clone)]
pub struct LevelState {
    pub rng: SeededRng,
    pub biome: BiomeManager,
    pub occupancy: OccupancyGrid,
    pub stats: GenerationStats,
}

impl LevelState {
    pub fn new(config: &LevelGenConfig, seed: u64) -> Self {
        Self::with_rng(config, SeededRng::new(seed))
    }

    /// Use an already constructed RNG (lets tests inject a known stream)
    pub fn with_rng(config: &LevelGenConfig, rng: SeededRng) -> Self {
        Self {
            rng,
            biome: BiomeManager::new(&config.biomes),
            occupancy: OccupancyGrid::new(),
            stats: GenerationStats::default(),
        }
    }
}

/// What one chunk produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkSummary {
    pub start_x: f64,
    pub end_x: f64,
    pub floor_tiles: u32,
    pub placed: u32,
    pub skipped: u32,
    /// Skipped because a cell was already claimed
    pub collisions: u32,
    pub hazards: u32,
    /// Biome the floor was laid with
    pub biome: BiomeType,
    pub biome_switch: Option<BiomeSwitch>,
}

/// Fills one chunk: floor row, biome advance, then structures
pub struct ChunkGenerator<'a> {
    config: &'a LevelGenConfig,
}

impl<'a> ChunkGenerator<'a> {
    pub fn new(config: &'a LevelGenConfig) -> Self {
        Self { config }
    }

    pub fn generate<T: TileSink, H: HazardSink>(
        &self,
        start_x: f64,
        state: &mut LevelState,
        sinks: &mut LevelSinks<T, H>,
    ) -> ChunkSummary {
        let chunk_width = self.config.chunks.chunk_width;
        let end_x = start_x + chunk_width;

        if self.config.chunks.deterministic_chunks {
            state.rng.reseed_for_chunk(start_x);
        }
        // A chunk generated before generate_world still gets a drawn biome
        state.biome.ensure_assigned(&mut state.rng);

        // Step 1: continuous floor in the current biome
        let biome = state.biome.current();
        let floor_tiles = self.lay_floor(start_x, chunk_width, biome, sinks);

        // Step 2: biome bookkeeping; structures below use the new biome
        let biome_switch = state.biome.advance(chunk_width, &mut state.rng);
        if biome_switch.is_some() {
            state.stats.biome_switches += 1;
        }

        // Step 3: structures until the cursor reaches the right margin
        let placed_before = state.stats.total_placed();
        let skipped_before = state.stats.total_skipped();
        let collisions_before = state.stats.collisions;
        let hazards_before = state.stats.hazards;

        let placer = StructurePlacer::new(self.config);
        let margin = self.config.chunks.edge_margin;
        let mut cursor = start_x + margin;
        while cursor < end_x - margin {
            let outcome = placer.place_next(cursor, end_x, state, sinks);
            // Never stall on a zero advance
            cursor = outcome.next_cursor.max(cursor + self.config.tiles.tile_size);
        }

        state.stats.chunks += 1;
        state.stats.floor_tiles += floor_tiles;

        let summary = ChunkSummary {
            start_x,
            end_x,
            floor_tiles,
            placed: state.stats.total_placed() - placed_before,
            skipped: state.stats.total_skipped() - skipped_before,
            collisions: state.stats.collisions - collisions_before,
            hazards: state.stats.hazards - hazards_before,
            biome,
            biome_switch,
        };
        log::trace!("Chunk {:?}", summary);
        summary
    }

    /// Emit floor tiles across `[start_x, start_x + width)` with no gaps
    pub fn lay_floor<T: TileSink, H: HazardSink>(
        &self,
        start_x: f64,
        width: f64,
        biome: BiomeType,
        sinks: &mut LevelSinks<T, H>,
    ) -> u32 {
        let tile_size = self.config.tiles.tile_size;
        let count = self.config.tiles_across(width);
        let texture = biome.textures().floor;

        for i in 0..count {
            sinks.emit(Tile {
                x: start_x + i as f64 * tile_size + tile_size / 2.0,
                y: self.config.tiles.floor_y,
                texture_key: texture.to_string(),
                biome,
                role: TileRole::Floor,
                hitbox: Hitbox::top_surface(tile_size, self.config.tiles.surface_thickness),
            });
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tile::HazardRecord;

    fn generate(seed: u64, start_x: f64) -> (ChunkSummary, Vec<Tile>, Vec<HazardRecord>) {
        let config = LevelGenConfig::default();
        let mut state = LevelState::new(&config, seed);
        let mut sinks = LevelSinks::new(Vec::new(), Vec::new());
        let summary = ChunkGenerator::new(&config).generate(start_x, &mut state, &mut sinks);
        let (tiles, hazards) = sinks.into_inner();
        (summary, tiles, hazards)
    }

    #[test]
    fn test_floor_row_at_origin() {
        let (summary, tiles, _) = generate(42, 0.0);
        assert_eq!(summary.floor_tiles, 12);

        let floor: Vec<f64> = tiles
            .iter()
            .filter(|t| t.role == TileRole::Floor)
            .map(|t| t.x)
            .collect();
        let expected: Vec<f64> = (0..12).map(|i| 35.0 + 70.0 * i as f64).collect();
        assert_eq!(floor, expected);
        assert!(floor.iter().all(|x| x - 35.0 < 800.0));
    }

    #[test]
    fn test_floor_hitbox_is_thin() {
        let (_, tiles, _) = generate(1, 0.0);
        for tile in tiles.iter().filter(|t| t.role == TileRole::Floor) {
            assert_eq!(tile.y, 650.0);
            assert_eq!(tile.hitbox.size.x, 70.0);
            assert!(tile.hitbox.size.y < 70.0);
            assert_eq!(tile.hitbox.offset.y, 0.0);
        }
    }

    #[test]
    fn test_structures_stay_inside_chunk() {
        for seed in 0..30 {
            let (_, tiles, hazards) = generate(seed, 1300.0);
            for tile in tiles.iter().filter(|t| t.role != TileRole::Floor) {
                let left = tile.x - 35.0;
                assert!(left >= 1300.0 + 70.0, "seed {}: tile at {}", seed, left);
                assert!(left + 70.0 <= 2100.0, "seed {}: tile at {}", seed, left);
            }
            for hazard in &hazards {
                assert!(hazard.x + hazard.width <= 2100.0);
                assert_eq!(hazard.y, 615.0);
            }
        }
    }

    #[test]
    fn test_lone_chunk_draws_its_biome() {
        let config = LevelGenConfig::default();
        let mut state = LevelState::new(&config, 17);
        assert!(!state.biome.is_assigned());

        let mut sinks = LevelSinks::new(Vec::<Tile>::new(), Vec::<HazardRecord>::new());
        ChunkGenerator::new(&config).generate(0.0, &mut state, &mut sinks);

        assert!(state.biome.is_assigned());
        let drawn = state.biome.segment().remaining_length;
        assert!((1500..=3000).contains(&drawn));
        // The first segment is drawn, not the configured maximum
        let lengths: Vec<u32> = (0..20)
            .map(|seed| {
                let mut state = LevelState::new(&config, seed);
                let mut sinks = LevelSinks::new(Vec::<Tile>::new(), Vec::<HazardRecord>::new());
                ChunkGenerator::new(&config).generate(0.0, &mut state, &mut sinks);
                state.biome.segment().remaining_length
            })
            .collect();
        assert!(lengths.iter().any(|len| *len != 3000));
    }

    #[test]
    fn test_same_seed_same_chunk() {
        let (a_summary, a_tiles, a_hazards) = generate(1234, 0.0);
        let (b_summary, b_tiles, b_hazards) = generate(1234, 0.0);
        assert_eq!(a_summary, b_summary);
        assert_eq!(a_tiles, b_tiles);
        assert_eq!(a_hazards, b_hazards);
    }

    #[test]
    fn test_summary_counts_match_stats() {
        let config = LevelGenConfig::default();
        let mut state = LevelState::new(&config, 5);
        let mut sinks = LevelSinks::new(Vec::<Tile>::new(), Vec::<HazardRecord>::new());
        let generator = ChunkGenerator::new(&config);

        let first = generator.generate(0.0, &mut state, &mut sinks);
        let second = generator.generate(800.0, &mut state, &mut sinks);

        assert_eq!(state.stats.chunks, 2);
        assert_eq!(state.stats.floor_tiles, 24);
        assert_eq!(state.stats.total_placed(), first.placed + second.placed);
        assert_eq!(state.stats.hazards as usize, sinks.hazards_emitted());
        assert!(first.placed + first.skipped > 0);
    }
}
