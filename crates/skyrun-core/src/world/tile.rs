//! Tile descriptors and the sinks that receive them
//!
//! The generator never builds bodies itself. It hands [`Tile`]s to a
//! [`TileSink`] (the render/physics side) and [`HazardRecord`]s to a
//! [`HazardSink`], and keeps no reference to either afterwards.

use crate::world::biome::BiomeType;
use ahash::AHashSet;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Texture used when the sink reports a key it cannot render
pub const MISSING_TEXTURE: &str = "missing";

/// Texture of the spike row on top of a spike trap
pub const SPIKE_TEXTURE: &str = "spikes";

/// Collidable group a tile is added to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileGroup {
    Platforms,
    Hazards,
}

/// What a tile is part of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileRole {
    /// Continuous ground row
    Floor,
    /// Floating platform or the top of a pillar
    Platform,
    /// One staircase step
    Step,
    /// Pillar or spawn-edge wall segment
    Wall,
    /// Ground tile beneath a spike row
    SpikeBase,
    /// The spike row itself
    Spikes,
}

impl TileRole {
    pub fn group(self) -> TileGroup {
        match self {
            TileRole::Spikes => TileGroup::Hazards,
            _ => TileGroup::Platforms,
        }
    }
}

/// Collision box relative to the tile's sprite bounds (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub size: DVec2,
    pub offset: DVec2,
}

impl Hitbox {
    /// Whole tile is solid
    pub fn full(tile_size: f64) -> Self {
        Self {
            size: DVec2::splat(tile_size),
            offset: DVec2::ZERO,
        }
    }

    /// Thin strip along the top surface; lets the player jump up through it
    pub fn top_surface(tile_size: f64, thickness: f64) -> Self {
        Self {
            size: DVec2::new(tile_size, thickness.min(tile_size)),
            offset: DVec2::ZERO,
        }
    }

    /// Lower half of the tile (spikes sit on the ground below them)
    pub fn bottom_half(tile_size: f64) -> Self {
        Self {
            size: DVec2::new(tile_size, tile_size / 2.0),
            offset: DVec2::new(0.0, tile_size / 2.0),
        }
    }
}

/// One emitted unit of level geometry. `x`/`y` are the tile centre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub x: f64,
    pub y: f64,
    pub texture_key: String,
    pub biome: BiomeType,
    pub role: TileRole,
    pub hitbox: Hitbox,
}

impl Tile {
    pub fn group(&self) -> TileGroup {
        self.role.group()
    }
}

/// Geometry of a spike trap, consumed by hazard detection and AI sensors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardRecord {
    /// Left edge of the trap
    pub x: f64,
    /// Floor surface minus half a tile
    pub y: f64,
    pub width: f64,
}

/// Render/physics collaborator that turns tiles into bodies
pub trait TileSink {
    fn spawn_tile(&mut self, tile: Tile);

    /// Whether `key` can be drawn. Unknown keys are replaced, not fatal.
    fn has_texture(&self, _key: &str) -> bool {
        true
    }
}

/// Caller-owned, append-only hazard list
pub trait HazardSink {
    fn add_hazard(&mut self, hazard: HazardRecord);
}

impl TileSink for Vec<Tile> {
    fn spawn_tile(&mut self, tile: Tile) {
        self.push(tile);
    }
}

impl HazardSink for Vec<HazardRecord> {
    fn add_hazard(&mut self, hazard: HazardRecord) {
        self.push(hazard);
    }
}

impl<T: TileSink + ?Sized> TileSink for &mut T {
    fn spawn_tile(&mut self, tile: Tile) {
        (**self).spawn_tile(tile)
    }

    fn has_texture(&self, key: &str) -> bool {
        (**self).has_texture(key)
    }
}

impl<H: HazardSink + ?Sized> HazardSink for &mut H {
    fn add_hazard(&mut self, hazard: HazardRecord) {
        (**self).add_hazard(hazard)
    }
}

/// Both output channels of a level, plus missing-texture bookkeeping
#[derive(Debug)]
pub struct LevelSinks<T, H> {
    tiles: T,
    hazards: H,
    missing_textures: AHashSet<String>,
    tiles_emitted: usize,
    hazards_emitted: usize,
}

impl<T: TileSink, H: HazardSink> LevelSinks<T, H> {
    pub fn new(tiles: T, hazards: H) -> Self {
        Self {
            tiles,
            hazards,
            missing_textures: AHashSet::new(),
            tiles_emitted: 0,
            hazards_emitted: 0,
        }
    }

    /// Hand a tile to the sink, swapping in [`MISSING_TEXTURE`] if needed
    pub fn emit(&mut self, mut tile: Tile) {
        if !self.tiles.has_texture(&tile.texture_key) {
            if self.missing_textures.insert(tile.texture_key.clone()) {
                log::warn!(
                    "Texture '{}' not found, using '{}' instead",
                    tile.texture_key,
                    MISSING_TEXTURE
                );
            }
            tile.texture_key = MISSING_TEXTURE.to_string();
        }
        self.tiles.spawn_tile(tile);
        self.tiles_emitted += 1;
    }

    pub fn add_hazard(&mut self, hazard: HazardRecord) {
        self.hazards.add_hazard(hazard);
        self.hazards_emitted += 1;
    }

    pub fn tiles(&self) -> &T {
        &self.tiles
    }

    pub fn hazards(&self) -> &H {
        &self.hazards
    }

    pub fn tiles_emitted(&self) -> usize {
        self.tiles_emitted
    }

    pub fn hazards_emitted(&self) -> usize {
        self.hazards_emitted
    }

    /// Texture keys that had to be replaced so far
    pub fn missing_textures(&self) -> impl Iterator<Item = &str> {
        self.missing_textures.iter().map(String::as_str)
    }

    pub fn into_inner(self) -> (T, H) {
        (self.tiles, self.hazards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink that only knows one texture
    struct PickySink {
        known: &'static str,
        tiles: Vec<Tile>,
    }

    impl TileSink for PickySink {
        fn spawn_tile(&mut self, tile: Tile) {
            self.tiles.push(tile);
        }

        fn has_texture(&self, key: &str) -> bool {
            key == self.known
        }
    }

    fn tile(texture: &str) -> Tile {
        Tile {
            x: 35.0,
            y: 650.0,
            texture_key: texture.to_string(),
            biome: BiomeType::Stone,
            role: TileRole::Floor,
            hitbox: Hitbox::top_surface(70.0, 20.0),
        }
    }

    #[test]
    fn test_missing_texture_falls_back() {
        let sink = PickySink {
            known: "stone_floor",
            tiles: Vec::new(),
        };
        let mut sinks = LevelSinks::new(sink, Vec::<HazardRecord>::new());

        sinks.emit(tile("stone_floor"));
        sinks.emit(tile("lava_floor"));
        sinks.emit(tile("lava_floor"));

        let (sink, _) = sinks.into_inner();
        assert_eq!(sink.tiles.len(), 3, "generation must not stop");
        assert_eq!(sink.tiles[0].texture_key, "stone_floor");
        assert_eq!(sink.tiles[1].texture_key, MISSING_TEXTURE);
        assert_eq!(sink.tiles[2].texture_key, MISSING_TEXTURE);
    }

    #[test]
    fn test_missing_textures_reported_once() {
        let sink = PickySink {
            known: "none",
            tiles: Vec::new(),
        };
        let mut sinks = LevelSinks::new(sink, Vec::<HazardRecord>::new());
        sinks.emit(tile("a"));
        sinks.emit(tile("a"));
        sinks.emit(tile("b"));

        let mut missing: Vec<&str> = sinks.missing_textures().collect();
        missing.sort();
        assert_eq!(missing, vec!["a", "b"]);
        assert_eq!(sinks.tiles_emitted(), 3);
    }

    #[test]
    fn test_borrowed_sinks_append() {
        let mut tiles: Vec<Tile> = Vec::new();
        let mut hazards: Vec<HazardRecord> = vec![HazardRecord {
            x: 0.0,
            y: 0.0,
            width: 70.0,
        }];

        {
            let mut sinks = LevelSinks::new(&mut tiles, &mut hazards);
            sinks.emit(tile("stone_floor"));
            sinks.add_hazard(HazardRecord {
                x: 1000.0,
                y: 615.0,
                width: 210.0,
            });
            assert_eq!(sinks.hazards_emitted(), 1);
        }

        assert_eq!(tiles.len(), 1);
        // Existing entries are kept; the list is only appended to
        assert_eq!(hazards.len(), 2);
        assert_eq!(hazards[1].width, 210.0);
    }

    #[test]
    fn test_hitboxes() {
        let full = Hitbox::full(70.0);
        assert_eq!(full.size, DVec2::splat(70.0));

        let top = Hitbox::top_surface(70.0, 20.0);
        assert_eq!(top.size, DVec2::new(70.0, 20.0));
        assert_eq!(top.offset, DVec2::ZERO);

        let spikes = Hitbox::bottom_half(70.0);
        assert_eq!(spikes.size.y + spikes.offset.y, 70.0);
    }

    #[test]
    fn test_role_groups() {
        assert_eq!(TileRole::Spikes.group(), TileGroup::Hazards);
        assert_eq!(TileRole::SpikeBase.group(), TileGroup::Platforms);
        assert_eq!(TileRole::Floor.group(), TileGroup::Platforms);
    }
}
