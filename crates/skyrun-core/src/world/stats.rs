//! Generation statistics

use crate::world::structure::StructureKind;
use serde::{Deserialize, Serialize};

/// Running counters for one level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Chunks generated, including the priming batch
    pub chunks: u32,
    pub floor_tiles: u32,
    /// Placed structures, indexed by [`StructureKind::index`]
    pub placed: [u32; 5],
    /// Structures dropped because a cell was taken or they did not fit
    pub skipped: [u32; 5],
    /// Skips caused by a cell another structure already holds
    pub collisions: u32,
    pub hazards: u32,
    pub biome_switches: u32,
}

impl GenerationStats {
    pub fn record_placed(&mut self, kind: StructureKind) {
        self.placed[kind.index()] += 1;
    }

    pub fn record_skipped(&mut self, kind: StructureKind) {
        self.skipped[kind.index()] += 1;
    }

    pub fn placed_of(&self, kind: StructureKind) -> u32 {
        self.placed[kind.index()]
    }

    pub fn skipped_of(&self, kind: StructureKind) -> u32 {
        self.skipped[kind.index()]
    }

    pub fn total_placed(&self) -> u32 {
        self.placed.iter().sum()
    }

    pub fn total_skipped(&self) -> u32 {
        self.skipped.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = GenerationStats::default();
        stats.record_placed(StructureKind::Staircase);
        stats.record_placed(StructureKind::Staircase);
        stats.record_placed(StructureKind::Gap);
        stats.record_skipped(StructureKind::SpikeTrap);

        assert_eq!(stats.placed_of(StructureKind::Staircase), 2);
        assert_eq!(stats.placed_of(StructureKind::FloatingPlatform), 0);
        assert_eq!(stats.skipped_of(StructureKind::SpikeTrap), 1);
        assert_eq!(stats.total_placed(), 3);
        assert_eq!(stats.total_skipped(), 1);
    }
}
