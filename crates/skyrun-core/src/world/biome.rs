//! Biome segments - which texture theme is active along the run

use crate::world::levelgen_config::BiomeParams;
use crate::world::rng::SeededRng;
use serde::{Deserialize, Serialize};

/// Types of biomes in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiomeType {
    Metal,
    Stone,
    Dirt,
}

impl BiomeType {
    pub const ALL: [BiomeType; 3] = [BiomeType::Metal, BiomeType::Stone, BiomeType::Dirt];

    pub fn name(self) -> &'static str {
        match self {
            BiomeType::Metal => "Metal",
            BiomeType::Stone => "Stone",
            BiomeType::Dirt => "Dirt",
        }
    }

    /// The two biomes a segment can switch to from `self`
    pub fn others(self) -> [BiomeType; 2] {
        match self {
            BiomeType::Metal => [BiomeType::Stone, BiomeType::Dirt],
            BiomeType::Stone => [BiomeType::Metal, BiomeType::Dirt],
            BiomeType::Dirt => [BiomeType::Metal, BiomeType::Stone],
        }
    }

    pub fn textures(self) -> BiomeTextures {
        BiomeTextures::for_biome(self)
    }
}

/// Texture keys for the three tile roles of a biome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiomeTextures {
    pub floor: &'static str,
    pub platform: &'static str,
    pub wall: &'static str,
}

impl BiomeTextures {
    pub const fn for_biome(biome: BiomeType) -> Self {
        match biome {
            BiomeType::Metal => Self {
                floor: "metal_floor",
                platform: "metal_platform",
                wall: "metal_wall",
            },
            BiomeType::Stone => Self {
                floor: "stone_floor",
                platform: "stone_platform",
                wall: "stone_wall",
            },
            BiomeType::Dirt => Self {
                floor: "dirt_floor",
                platform: "dirt_platform",
                wall: "dirt_wall",
            },
        }
    }
}

/// Every texture key a biome can hand out (9 keys)
pub fn biome_texture_keys() -> impl Iterator<Item = &'static str> {
    BiomeType::ALL.into_iter().flat_map(|biome| {
        let t = biome.textures();
        [t.floor, t.platform, t.wall]
    })
}

/// Active biome plus the distance left before it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomeSegment {
    pub biome: BiomeType,
    pub remaining_length: u32,
}

/// Emitted when a segment runs out and a new biome takes over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiomeSwitch {
    pub from: BiomeType,
    pub to: BiomeType,
    pub segment_length: u32,
}

/// Tracks the current biome segment and switches when it is used up
#[derive(Debug, Clone)]
pub struct BiomeManager {
    segment: BiomeSegment,
    /// Horizontal distance covered since the last switch
    travelled: f64,
    /// Whether the first segment has been drawn
    assigned: bool,
    min_length: u32,
    max_length: u32,
    switches: u32,
}

impl BiomeManager {
    pub fn new(params: &BiomeParams) -> Self {
        Self {
            segment: BiomeSegment {
                biome: BiomeType::Metal,
                remaining_length: params.segment_max,
            },
            travelled: 0.0,
            assigned: false,
            min_length: params.segment_min,
            max_length: params.segment_max,
            switches: 0,
        }
    }

    /// Pick the starting biome and the length of the first segment
    pub fn assign_initial(&mut self, rng: &mut SeededRng) {
        let biome = rng
            .pick(&BiomeType::ALL)
            .copied()
            .unwrap_or(BiomeType::Metal);
        self.segment = BiomeSegment {
            biome,
            remaining_length: self.draw_length(rng),
        };
        self.travelled = 0.0;
        self.assigned = true;
        log::debug!(
            "Initial biome {} for {} px",
            biome.name(),
            self.segment.remaining_length
        );
    }

    /// Draw the first segment unless that already happened
    pub fn ensure_assigned(&mut self, rng: &mut SeededRng) {
        if !self.assigned {
            self.assign_initial(rng);
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned
    }

    /// Add covered distance; switches biome once the segment is exhausted
    pub fn advance(&mut self, distance: f64, rng: &mut SeededRng) -> Option<BiomeSwitch> {
        self.travelled += distance;
        if self.travelled < self.segment.remaining_length as f64 {
            return None;
        }

        let from = self.segment.biome;
        let to = rng
            .pick(&from.others())
            .copied()
            .unwrap_or(from.others()[0]);
        let segment_length = self.draw_length(rng);

        self.segment = BiomeSegment {
            biome: to,
            remaining_length: segment_length,
        };
        self.travelled = 0.0;
        self.switches += 1;

        log::debug!(
            "Biome switch {} -> {} (next segment {} px)",
            from.name(),
            to.name(),
            segment_length
        );

        Some(BiomeSwitch {
            from,
            to,
            segment_length,
        })
    }

    fn draw_length(&self, rng: &mut SeededRng) -> u32 {
        rng.next_int(self.min_length as i32, self.max_length as i32) as u32
    }

    pub fn current(&self) -> BiomeType {
        self.segment.biome
    }

    pub fn segment(&self) -> BiomeSegment {
        self.segment
    }

    pub fn travelled(&self) -> f64 {
        self.travelled
    }

    pub fn switches(&self) -> u32 {
        self.switches
    }

    /// Restore a previously saved segment (see `WorldSnapshot`)
    pub fn restore(&mut self, segment: BiomeSegment, travelled: f64) {
        self.segment = segment;
        self.travelled = travelled;
        self.assigned = true;
    }

    pub fn floor_tile_id(&self) -> &'static str {
        self.segment.biome.textures().floor
    }

    pub fn platform_tile_id(&self) -> &'static str {
        self.segment.biome.textures().platform
    }

    pub fn wall_tile_id(&self) -> &'static str {
        self.segment.biome.textures().wall
    }
}
