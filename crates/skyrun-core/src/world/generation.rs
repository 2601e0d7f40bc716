use crate::world::biome::BiomeManager;
use crate::world::chunk_generator::{ChunkGenerator, ChunkSummary, LevelState};
use crate::world::levelgen_config::LevelGenConfig;
use crate::world::occupancy::{OccupancyGrid, column_of};
use crate::world::persistence::{SNAPSHOT_VERSION, WorldSnapshot};
use crate::world::rng::SeededRng;
use crate::world::stats::GenerationStats;
use crate::world::tile::{HazardSink, Hitbox, LevelSinks, Tile, TileRole, TileSink};

/// Streaming level generator
///
/// Builds the hazard-free spawn zone once, then extends the level chunk by
/// chunk as the caller's streaming driver asks for more. Tiles go to the
/// `TileSink`, spike hazards to the `HazardSink`; both stay owned by the
/// caller when passed as `&mut`.
///
/// The frontier setters are not validated. Moving the frontier backwards makes
/// the next `generate_chunk` calls rebuild floor over existing geometry; that
/// is the caller's decision to make.
pub struct WorldGenerator<T: TileSink, H: HazardSink> {
    config: LevelGenConfig,
    state: LevelState,
    sinks: LevelSinks<T, H>,
    /// Next X that has not been generated yet
    world_generation_x: f64,
    /// Frontier after the most recent batch
    last_generated_x: f64,
}

impl<T: TileSink, H: HazardSink> WorldGenerator<T, H> {
    /// Create a generator with the default configuration
    ///
    /// `seed: None` draws a random master seed.
    pub fn new(tiles: T, hazards: H, seed: Option<u64>) -> Self {
        Self::from_config(tiles, hazards, seed, LevelGenConfig::default())
    }

    /// Create a generator from a configuration
    ///
    /// An invalid configuration is logged and replaced by the defaults;
    /// generation itself never fails.
    pub fn from_config(tiles: T, hazards: H, seed: Option<u64>, config: LevelGenConfig) -> Self {
        let rng = seed.map_or_else(SeededRng::from_entropy, SeededRng::new);
        Self::with_rng(tiles, hazards, rng, config)
    }

    /// Create a generator around an existing RNG
    pub fn with_rng(tiles: T, hazards: H, rng: SeededRng, config: LevelGenConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!(
                    "Level config '{}' rejected ({}), falling back to defaults",
                    config.name,
                    e
                );
                LevelGenConfig::default()
            }
        };

        log::debug!(
            "WorldGenerator seed={} config='{}'",
            rng.seed(),
            config.name
        );

        Self {
            state: LevelState::with_rng(&config, rng),
            sinks: LevelSinks::new(tiles, hazards),
            config,
            world_generation_x: 0.0,
            last_generated_x: 0.0,
        }
    }

    /// Build the spawn zone and prime the stream. Returns the frontier X.
    ///
    /// Meant to be called once per level.
    pub fn generate_world(&mut self) -> f64 {
        self.state.biome.assign_initial(&mut self.state.rng);
        self.build_spawn_zone();

        self.world_generation_x = self.config.spawn.spawn_width;
        for _ in 0..self.config.chunks.prime_chunks {
            self.generate_chunk(self.world_generation_x);
            self.world_generation_x += self.config.chunks.chunk_width;
        }
        self.last_generated_x = self.world_generation_x;

        log::info!(
            "Generated world: seed={} frontier={} structures={} hazards={}",
            self.seed(),
            self.world_generation_x,
            self.state.stats.total_placed(),
            self.state.stats.hazards
        );

        self.world_generation_x
    }

    /// Hazard-free floor over `[0, spawn_width)` with a wall pillar at each edge
    fn build_spawn_zone(&mut self) {
        let spawn_width = self.config.spawn.spawn_width;
        let tile_size = self.config.tiles.tile_size;
        let biome = self.state.biome.current();

        let floor_tiles =
            ChunkGenerator::new(&self.config).lay_floor(0.0, spawn_width, biome, &mut self.sinks);
        self.state.stats.floor_tiles += floor_tiles;

        let right_edge = (spawn_width - tile_size).max(0.0);
        for x_left in [0.0, right_edge] {
            let column = column_of(x_left, tile_size);
            for level in 1..=self.config.spawn.pillar_height as i32 {
                // Both edges land on one column when the spawn is a single tile wide
                if !self.state.occupancy.claim(column, level) {
                    continue;
                }
                self.sinks.emit(Tile {
                    x: x_left + tile_size / 2.0,
                    y: self.config.level_y(level),
                    texture_key: biome.textures().wall.to_string(),
                    biome,
                    role: TileRole::Wall,
                    hitbox: Hitbox::full(tile_size),
                });
            }
        }

        log::debug!(
            "Spawn zone: {} floor tiles over [0, {}) in {}",
            floor_tiles,
            spawn_width,
            biome.name()
        );
    }

    /// Generate one chunk starting at `start_x`
    ///
    /// Does not move the frontier; the streaming driver does that through
    /// [`set_world_generation_x`](Self::set_world_generation_x) or uses
    /// [`ensure_ahead`](Self::ensure_ahead).
    pub fn generate_chunk(&mut self, start_x: f64) -> ChunkSummary {
        ChunkGenerator::new(&self.config).generate(start_x, &mut self.state, &mut self.sinks)
    }

    /// Generate chunks at the frontier until it is `trigger_distance` ahead of
    /// `player_x`. Returns the number of chunks generated.
    pub fn ensure_ahead(&mut self, player_x: f64, trigger_distance: f64) -> usize {
        let mut generated = 0;
        while self.world_generation_x - player_x < trigger_distance {
            let next_x = self.world_generation_x + self.config.chunks.chunk_width;
            if next_x <= self.world_generation_x {
                log::warn!(
                    "Frontier x={} cannot advance by {} px, stopping",
                    self.world_generation_x,
                    self.config.chunks.chunk_width
                );
                break;
            }
            self.generate_chunk(self.world_generation_x);
            self.world_generation_x = next_x;
            generated += 1;
        }
        if generated > 0 {
            self.last_generated_x = self.world_generation_x;
            log::debug!(
                "Streamed {} chunk(s), frontier now {}",
                generated,
                self.world_generation_x
            );
        }
        generated
    }

    // ========================================================================
    // Seed and frontier accessors
    // ========================================================================

    pub fn seed(&self) -> u64 {
        self.state.rng.seed()
    }

    pub fn reseed_for_chunk(&mut self, chunk_x: f64) {
        self.state.rng.reseed_for_chunk(chunk_x);
    }

    pub fn world_generation_x(&self) -> f64 {
        self.world_generation_x
    }

    pub fn set_world_generation_x(&mut self, x: f64) {
        self.world_generation_x = x;
    }

    pub fn last_generated_x(&self) -> f64 {
        self.last_generated_x
    }

    pub fn set_last_generated_x(&mut self, x: f64) {
        self.last_generated_x = x;
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    pub fn config(&self) -> &LevelGenConfig {
        &self.config
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.state.stats
    }

    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.state.occupancy
    }

    pub fn biome(&self) -> &BiomeManager {
        &self.state.biome
    }

    pub fn sinks(&self) -> &LevelSinks<T, H> {
        &self.sinks
    }

    pub fn tiles(&self) -> &T {
        self.sinks.tiles()
    }

    pub fn hazards(&self) -> &H {
        self.sinks.hazards()
    }

    pub fn into_sinks(self) -> (T, H) {
        self.sinks.into_inner()
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            version: SNAPSHOT_VERSION,
            seed: self.seed(),
            world_generation_x: self.world_generation_x,
            last_generated_x: self.last_generated_x,
            biome: self.state.biome.segment(),
            biome_travelled: self.state.biome.travelled(),
        }
    }

    /// Adopt a saved seed, frontier and biome segment
    ///
    /// The occupancy grid is kept as is: restored generators are expected to
    /// continue at the saved frontier, past every previously claimed cell.
    pub fn restore(&mut self, snapshot: &WorldSnapshot) {
        self.state.rng.reseed(snapshot.seed);
        self.world_generation_x = snapshot.world_generation_x;
        self.last_generated_x = snapshot.last_generated_x;
        self.state
            .biome
            .restore(snapshot.biome, snapshot.biome_travelled);
    }
}
