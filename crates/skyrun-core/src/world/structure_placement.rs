//! Structure placement engine with occupancy-aware validation
//!
//! A structure is only emitted if every cell it covers is still free. The
//! check and the claim happen together in
//! [`OccupancyGrid::try_claim_all`](crate::world::occupancy::OccupancyGrid::try_claim_all),
//! so a rejected structure leaves no partial tiles or claims behind. Placed or
//! not, the cursor always moves on by the structure's spacing.

use crate::world::biome::BiomeType;
use crate::world::chunk_generator::LevelState;
use crate::world::levelgen_config::LevelGenConfig;
use crate::world::occupancy::column_of;
use crate::world::structure::Structure;
use crate::world::tile::{
    HazardRecord, HazardSink, Hitbox, LevelSinks, SPIKE_TEXTURE, Tile, TileRole, TileSink,
};

/// Result of one placement attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOutcome {
    pub structure: Structure,
    /// False when the structure collided or ran past the chunk limit
    pub placed: bool,
    pub tiles: usize,
    /// Where the next attempt starts
    pub next_cursor: f64,
}

/// Picks and emits structures along a chunk
pub struct StructurePlacer<'a> {
    config: &'a LevelGenConfig,
}

impl<'a> StructurePlacer<'a> {
    pub fn new(config: &'a LevelGenConfig) -> Self {
        Self { config }
    }

    /// Draw a weighted variant at `cursor` and try to place it
    ///
    /// # Arguments
    /// * `cursor` - Left edge of the structure in world X
    /// * `limit` - Right edge nothing may extend past (the chunk end)
    /// * `state` - RNG, biome, occupancy and stats of the level
    /// * `sinks` - Tile and hazard outputs
    pub fn place_next<T: TileSink, H: HazardSink>(
        &self,
        cursor: f64,
        limit: f64,
        state: &mut LevelState,
        sinks: &mut LevelSinks<T, H>,
    ) -> PlacementOutcome {
        let params = &self.config.structures;
        let kind = params.weights.pick(state.rng.next_float());
        let structure = Structure::roll(kind, &mut state.rng, params, self.config.top_level());
        self.place(structure, cursor, limit, state, sinks)
    }

    /// Place an already chosen structure at `cursor`
    pub fn place<T: TileSink, H: HazardSink>(
        &self,
        structure: Structure,
        cursor: f64,
        limit: f64,
        state: &mut LevelState,
        sinks: &mut LevelSinks<T, H>,
    ) -> PlacementOutcome {
        let params = &self.config.structures;
        let tile_size = self.config.tiles.tile_size;
        let kind = structure.kind();
        let next_cursor = cursor + structure.advance(tile_size, params);

        let skipped = PlacementOutcome {
            structure,
            placed: false,
            tiles: 0,
            next_cursor,
        };

        if let Structure::Gap { span } = structure {
            log::trace!("Gap of {} px at x={}", span, cursor);
            state.stats.record_placed(kind);
            return PlacementOutcome {
                placed: true,
                ..skipped
            };
        }

        let width = structure.columns(params) as f64 * tile_size;
        if cursor + width > limit {
            log::trace!(
                "Skipping {} at x={}: {} px past chunk limit {}",
                kind.name(),
                cursor,
                cursor + width - limit,
                limit
            );
            state.stats.record_skipped(kind);
            return skipped;
        }

        let origin_column = column_of(cursor, tile_size);
        let cells = structure.footprint(origin_column, params, self.config.top_level());
        if !state.occupancy.try_claim_all(&cells) {
            log::trace!(
                "Skipping {} at column {}: cells already claimed",
                kind.name(),
                origin_column
            );
            state.stats.record_skipped(kind);
            state.stats.collisions += 1;
            return skipped;
        }

        let tiles = self.emit(structure, cursor, state.biome.current(), sinks);
        if let Structure::SpikeTrap { width } = structure {
            sinks.add_hazard(HazardRecord {
                x: cursor,
                y: self.config.hazard_y(),
                width: width as f64 * tile_size,
            });
            state.stats.hazards += 1;
        }

        state.stats.record_placed(kind);
        log::trace!("Placed {:?} at x={} ({} tiles)", structure, cursor, tiles);

        PlacementOutcome {
            structure,
            placed: true,
            tiles,
            next_cursor,
        }
    }

    /// Emit the tiles of a structure whose cells are already claimed
    fn emit<T: TileSink, H: HazardSink>(
        &self,
        structure: Structure,
        cursor: f64,
        biome: BiomeType,
        sinks: &mut LevelSinks<T, H>,
    ) -> usize {
        let tile_size = self.config.tiles.tile_size;
        let thickness = self.config.tiles.surface_thickness;
        let textures = biome.textures();
        let x_of = |column: u32| cursor + column as f64 * tile_size;
        let mut count = 0;

        let mut push = |x_left: f64, level: i32, texture: &str, role: TileRole, hitbox: Hitbox| {
            sinks.emit(Tile {
                x: x_left + tile_size / 2.0,
                y: self.config.level_y(level),
                texture_key: texture.to_string(),
                biome,
                role,
                hitbox,
            });
            count += 1;
        };

        match structure {
            Structure::FloatingPlatform { width, level } => {
                for i in 0..width {
                    push(
                        x_of(i),
                        level,
                        textures.platform,
                        TileRole::Platform,
                        Hitbox::top_surface(tile_size, thickness),
                    );
                }
            }
            Structure::Staircase {
                steps,
                start_level,
                ascending,
            } => {
                for i in 0..steps {
                    let level =
                        Structure::step_level(start_level, ascending, i, self.config.top_level());
                    push(
                        x_of(i),
                        level,
                        textures.platform,
                        TileRole::Step,
                        Hitbox::full(tile_size),
                    );
                }
            }
            Structure::PillarPlatform { height, top_level } => {
                let params = &self.config.structures;
                let wall_x = x_of(Structure::pillar_column(params) as u32);
                for level in 1..=height as i32 {
                    push(
                        wall_x,
                        level,
                        textures.wall,
                        TileRole::Wall,
                        Hitbox::full(tile_size),
                    );
                }
                for i in 0..params.pillar_platform_width {
                    push(
                        x_of(i),
                        top_level,
                        textures.platform,
                        TileRole::Platform,
                        Hitbox::top_surface(tile_size, thickness),
                    );
                }
            }
            Structure::SpikeTrap { width } => {
                for i in 0..width {
                    push(
                        x_of(i),
                        0,
                        textures.floor,
                        TileRole::SpikeBase,
                        Hitbox::full(tile_size),
                    );
                    push(
                        x_of(i),
                        1,
                        SPIKE_TEXTURE,
                        TileRole::Spikes,
                        Hitbox::bottom_half(tile_size),
                    );
                }
            }
            Structure::Gap { .. } => {}
        }

        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::structure::StructureKind;

    fn setup() -> (LevelGenConfig, LevelState, LevelSinks<Vec<Tile>, Vec<HazardRecord>>) {
        let config = LevelGenConfig::default();
        let state = LevelState::new(&config, 42);
        let sinks = LevelSinks::new(Vec::new(), Vec::new());
        (config, state, sinks)
    }

    #[test]
    fn test_spike_trap_at_1000() {
        let (config, mut state, mut sinks) = setup();
        let placer = StructurePlacer::new(&config);

        let outcome = placer.place(
            Structure::SpikeTrap { width: 3 },
            1000.0,
            2000.0,
            &mut state,
            &mut sinks,
        );
        assert!(outcome.placed);

        let (tiles, hazards) = sinks.into_inner();
        assert_eq!(
            hazards,
            vec![HazardRecord {
                x: 1000.0,
                y: 615.0,
                width: 210.0
            }]
        );

        let supports: Vec<&Tile> = tiles
            .iter()
            .filter(|t| t.role == TileRole::SpikeBase)
            .collect();
        assert_eq!(supports.len(), 3);
        let xs: Vec<f64> = supports.iter().map(|t| t.x).collect();
        assert_eq!(xs, vec![1035.0, 1105.0, 1175.0]);
        assert!(supports.iter().all(|t| t.y == 650.0));

        let spikes = tiles.iter().filter(|t| t.role == TileRole::Spikes).count();
        assert_eq!(spikes, 3);

        // Ground cells 14..=16 are now taken
        for column in 14..17 {
            assert!(!state.occupancy.is_free(column, 0));
        }
        assert_eq!(state.stats.hazards, 1);
    }

    #[test]
    fn test_conflict_skips_without_partial_claims() {
        let (config, mut state, mut sinks) = setup();
        let placer = StructurePlacer::new(&config);

        // Column 16 ground already belongs to something else
        state.occupancy.claim(16, 0);
        let claimed_before = state.occupancy.len();

        let outcome = placer.place(
            Structure::SpikeTrap { width: 3 },
            1000.0,
            2000.0,
            &mut state,
            &mut sinks,
        );

        assert!(!outcome.placed);
        assert_eq!(outcome.tiles, 0);
        assert_eq!(outcome.next_cursor, 1000.0 + 210.0 + config.structures.platform_spacing);
        assert_eq!(state.occupancy.len(), claimed_before);
        assert!(state.occupancy.is_free(14, 0));
        assert_eq!(sinks.tiles_emitted(), 0);
        assert_eq!(sinks.hazards_emitted(), 0);
        assert_eq!(state.stats.skipped_of(StructureKind::SpikeTrap), 1);
        assert_eq!(state.stats.collisions, 1);
    }

    #[test]
    fn test_structure_past_limit_is_skipped() {
        let (config, mut state, mut sinks) = setup();
        let placer = StructurePlacer::new(&config);

        let outcome = placer.place(
            Structure::FloatingPlatform { width: 4, level: 2 },
            700.0,
            800.0,
            &mut state,
            &mut sinks,
        );
        assert!(!outcome.placed);
        assert!(state.occupancy.is_empty());
        assert!(outcome.next_cursor > 800.0);
        assert_eq!(state.stats.collisions, 0);
    }

    #[test]
    fn test_floating_platform_tiles() {
        let (config, mut state, mut sinks) = setup();
        let placer = StructurePlacer::new(&config);

        let outcome = placer.place(
            Structure::FloatingPlatform { width: 2, level: 3 },
            140.0,
            800.0,
            &mut state,
            &mut sinks,
        );
        assert!(outcome.placed);
        assert_eq!(outcome.tiles, 2);

        let (tiles, hazards) = sinks.into_inner();
        assert!(hazards.is_empty());
        assert_eq!(tiles[0].x, 175.0);
        assert_eq!(tiles[1].x, 245.0);
        assert!(tiles.iter().all(|t| t.y == 440.0));
        assert!(tiles.iter().all(|t| t.hitbox.size.y == 20.0));
        assert!(!state.occupancy.is_free(2, 3));
        assert!(!state.occupancy.is_free(3, 3));
    }

    #[test]
    fn test_pillar_tiles() {
        let (config, mut state, mut sinks) = setup();
        let placer = StructurePlacer::new(&config);

        let outcome = placer.place(
            Structure::PillarPlatform {
                height: 4,
                top_level: 5,
            },
            0.0,
            800.0,
            &mut state,
            &mut sinks,
        );
        assert!(outcome.placed);
        assert_eq!(outcome.tiles, 7);

        let (tiles, _) = sinks.into_inner();
        let walls: Vec<&Tile> = tiles.iter().filter(|t| t.role == TileRole::Wall).collect();
        assert_eq!(walls.len(), 4);
        assert!(walls.iter().all(|t| t.x == 105.0));
        let tops = tiles
            .iter()
            .filter(|t| t.role == TileRole::Platform && t.y == config.level_y(5))
            .count();
        assert_eq!(tops, 3);
    }

    #[test]
    fn test_gap_advances_only() {
        let (config, mut state, mut sinks) = setup();
        let placer = StructurePlacer::new(&config);

        let outcome = placer.place(
            Structure::Gap { span: 175.0 },
            300.0,
            800.0,
            &mut state,
            &mut sinks,
        );
        assert!(outcome.placed);
        assert_eq!(outcome.next_cursor, 475.0);
        assert_eq!(sinks.tiles_emitted(), 0);
        assert!(state.occupancy.is_empty());
    }

    #[test]
    fn test_place_next_is_deterministic() {
        let config = LevelGenConfig::default();
        let run = || {
            let mut state = LevelState::new(&config, 9);
            let mut sinks = LevelSinks::new(Vec::<Tile>::new(), Vec::<HazardRecord>::new());
            let placer = StructurePlacer::new(&config);
            let mut cursor = 70.0;
            let mut kinds = Vec::new();
            while cursor < 5000.0 {
                let outcome = placer.place_next(cursor, 5000.0, &mut state, &mut sinks);
                kinds.push(outcome.structure);
                cursor = outcome.next_cursor;
            }
            kinds
        };
        assert_eq!(run(), run());
    }
}
