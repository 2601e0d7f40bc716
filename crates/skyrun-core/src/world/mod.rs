//! Level generation - seed, biomes, occupancy and streamed chunks

pub mod biome;
pub mod chunk_generator;
pub mod generation;
pub mod levelgen_config;
pub mod occupancy;
pub mod persistence;
pub mod rng;
pub mod stats;
pub mod structure;
pub mod structure_placement;
pub mod tile;

pub use biome::{BiomeManager, BiomeSegment, BiomeSwitch, BiomeTextures, BiomeType};
pub use chunk_generator::{ChunkGenerator, ChunkSummary, LevelState};
pub use generation::WorldGenerator;
pub use levelgen_config::{
    BiomeParams, ChunkParams, ConfigError, IntRange, LevelGenConfig, SpawnParams,
    StructureParams, TileParams,
};
pub use occupancy::{OccupancyCell, OccupancyGrid};
pub use persistence::{SnapshotError, WorldSnapshot};
pub use rng::SeededRng;
pub use stats::GenerationStats;
pub use structure::{Structure, StructureKind, StructureWeights};
pub use structure_placement::{PlacementOutcome, StructurePlacer};
pub use tile::{
    HazardRecord, HazardSink, Hitbox, LevelSinks, MISSING_TEXTURE, SPIKE_TEXTURE, Tile,
    TileGroup, TileRole, TileSink,
};
