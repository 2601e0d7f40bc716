//! Structure variants, their footprints and the weighted selection table

use crate::world::levelgen_config::{IntRange, StructureParams};
use crate::world::occupancy::OccupancyCell;
use crate::world::rng::SeededRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Occupancy cells of one structure (largest footprint is a 6-tall pillar: 9 cells)
pub type Footprint = SmallVec<[OccupancyCell; 16]>;

/// Variant tag, used for selection and statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    FloatingPlatform,
    Staircase,
    PillarPlatform,
    Gap,
    SpikeTrap,
}

impl StructureKind {
    pub const ALL: [StructureKind; 5] = [
        StructureKind::FloatingPlatform,
        StructureKind::Staircase,
        StructureKind::PillarPlatform,
        StructureKind::Gap,
        StructureKind::SpikeTrap,
    ];

    pub fn index(self) -> usize {
        match self {
            StructureKind::FloatingPlatform => 0,
            StructureKind::Staircase => 1,
            StructureKind::PillarPlatform => 2,
            StructureKind::Gap => 3,
            StructureKind::SpikeTrap => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StructureKind::FloatingPlatform => "floating platform",
            StructureKind::Staircase => "staircase",
            StructureKind::PillarPlatform => "pillar platform",
            StructureKind::Gap => "gap",
            StructureKind::SpikeTrap => "spike trap",
        }
    }
}

/// Relative weights of the five variants
///
/// Weights need not sum to 1; [`StructureWeights::pick`] normalizes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureWeights {
    pub floating_platform: f64,
    pub staircase: f64,
    pub pillar_platform: f64,
    pub gap: f64,
    pub spike_trap: f64,
}

impl Default for StructureWeights {
    fn default() -> Self {
        Self {
            floating_platform: 0.30,
            staircase: 0.20,
            pillar_platform: 0.20,
            gap: 0.15,
            spike_trap: 0.15,
        }
    }
}

impl StructureWeights {
    pub fn table(&self) -> [(StructureKind, f64); 5] {
        [
            (StructureKind::FloatingPlatform, self.floating_platform),
            (StructureKind::Staircase, self.staircase),
            (StructureKind::PillarPlatform, self.pillar_platform),
            (StructureKind::Gap, self.gap),
            (StructureKind::SpikeTrap, self.spike_trap),
        ]
    }

    pub fn total(&self) -> f64 {
        self.table().iter().map(|(_, w)| w.max(0.0)).sum()
    }

    /// Map `r` in [0, 1) onto a variant by cumulative-weight search
    pub fn pick(&self, r: f64) -> StructureKind {
        let table = self.table();
        let target = r.clamp(0.0, 1.0) * self.total();

        let mut cumulative = 0.0;
        for (kind, weight) in table {
            let weight = weight.max(0.0);
            cumulative += weight;
            if weight > 0.0 && target < cumulative {
                return kind;
            }
        }

        // r rounding up to the total lands on the last enabled variant
        table
            .iter()
            .rev()
            .find(|(_, w)| *w > 0.0)
            .map(|(kind, _)| *kind)
            .unwrap_or(StructureKind::Gap)
    }
}

/// One placed gameplay feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Structure {
    FloatingPlatform {
        width: u32,
        level: i32,
    },
    /// One level per step, capped at the ladder top (the rest forms a landing)
    Staircase {
        steps: u32,
        start_level: i32,
        ascending: bool,
    },
    /// Wall on the middle column (levels 1..=height), platform on `top_level`
    PillarPlatform {
        height: u32,
        top_level: i32,
    },
    Gap {
        span: f64,
    },
    SpikeTrap {
        width: u32,
    },
}

fn draw(rng: &mut SeededRng, range: IntRange) -> i32 {
    rng.next_int(range.min, range.max)
}

impl Structure {
    /// Draw the dimensions of a `kind` structure
    pub fn roll(
        kind: StructureKind,
        rng: &mut SeededRng,
        params: &StructureParams,
        top_level: i32,
    ) -> Self {
        match kind {
            StructureKind::FloatingPlatform => Structure::FloatingPlatform {
                width: draw(rng, params.platform_width) as u32,
                level: draw(rng, params.platform_levels).clamp(1, top_level),
            },
            StructureKind::Staircase => {
                let steps = draw(rng, params.staircase_steps) as u32;
                let ascending = rng.chance(0.5);
                let start_level = if ascending {
                    1
                } else {
                    (steps as i32).min(top_level)
                };
                Structure::Staircase {
                    steps,
                    start_level,
                    ascending,
                }
            }
            StructureKind::PillarPlatform => {
                let height = draw(rng, params.pillar_height) as u32;
                Structure::PillarPlatform {
                    height,
                    top_level: height as i32 + 1,
                }
            }
            StructureKind::Gap => Structure::Gap {
                span: draw(rng, params.gap_span) as f64,
            },
            StructureKind::SpikeTrap => Structure::SpikeTrap {
                width: draw(rng, params.spike_width) as u32,
            },
        }
    }

    pub fn kind(&self) -> StructureKind {
        match self {
            Structure::FloatingPlatform { .. } => StructureKind::FloatingPlatform,
            Structure::Staircase { .. } => StructureKind::Staircase,
            Structure::PillarPlatform { .. } => StructureKind::PillarPlatform,
            Structure::Gap { .. } => StructureKind::Gap,
            Structure::SpikeTrap { .. } => StructureKind::SpikeTrap,
        }
    }

    /// Width in tile columns
    pub fn columns(&self, params: &StructureParams) -> u32 {
        match *self {
            Structure::FloatingPlatform { width, .. } => width,
            Structure::Staircase { steps, .. } => steps,
            Structure::PillarPlatform { .. } => params.pillar_platform_width,
            Structure::Gap { .. } => 0,
            Structure::SpikeTrap { width } => width,
        }
    }

    /// Level of staircase step `i`
    pub fn step_level(start_level: i32, ascending: bool, i: u32, top_level: i32) -> i32 {
        if ascending {
            (start_level + i as i32).min(top_level)
        } else {
            (start_level - i as i32).max(1)
        }
    }

    /// Column a pillar's wall stands on, relative to the structure origin
    pub fn pillar_column(params: &StructureParams) -> i32 {
        (params.pillar_platform_width / 2) as i32
    }

    /// Every cell the structure occupies when its first tile is in `origin_column`
    pub fn footprint(
        &self,
        origin_column: i32,
        params: &StructureParams,
        top_level: i32,
    ) -> Footprint {
        let mut cells = Footprint::new();
        match *self {
            Structure::FloatingPlatform { width, level } => {
                for i in 0..width as i32 {
                    cells.push(OccupancyCell::new(origin_column + i, level));
                }
            }
            Structure::Staircase {
                steps,
                start_level,
                ascending,
            } => {
                for i in 0..steps {
                    let level = Self::step_level(start_level, ascending, i, top_level);
                    cells.push(OccupancyCell::new(origin_column + i as i32, level));
                }
            }
            Structure::PillarPlatform { height, top_level } => {
                let wall_column = origin_column + Self::pillar_column(params);
                for level in 1..=height as i32 {
                    cells.push(OccupancyCell::new(wall_column, level));
                }
                for i in 0..params.pillar_platform_width as i32 {
                    cells.push(OccupancyCell::new(origin_column + i, top_level));
                }
            }
            Structure::Gap { .. } => {}
            Structure::SpikeTrap { width } => {
                // Support row on the ground plus the spike row above it
                for i in 0..width as i32 {
                    cells.push(OccupancyCell::new(origin_column + i, 0));
                    cells.push(OccupancyCell::new(origin_column + i, 1));
                }
            }
        }
        cells
    }

    /// Cursor advance after this structure, placed or skipped
    pub fn advance(&self, tile_size: f64, params: &StructureParams) -> f64 {
        let footprint = self.columns(params) as f64 * tile_size;
        match self {
            Structure::FloatingPlatform { .. } | Structure::SpikeTrap { .. } => {
                footprint + params.platform_spacing
            }
            Structure::Staircase { .. } | Structure::PillarPlatform { .. } => {
                footprint + params.structure_spacing
            }
            Structure::Gap { span } => *span,
        }
    }
}
