//! Serializable level state - enough to rebuild a level without its geometry

use crate::world::biome::BiomeSegment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Seed and frontier of a level (RON format)
///
/// Peers that share a snapshot and a config regenerate identical chunks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub version: u32,
    pub seed: u64,
    pub world_generation_x: f64,
    pub last_generated_x: f64,
    pub biome: BiomeSegment,
    /// Distance covered in the current biome segment
    #[serde(default)]
    pub biome_travelled: f64,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] ron::Error),

    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("unsupported snapshot version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
}

impl WorldSnapshot {
    pub fn to_ron(&self) -> Result<String, SnapshotError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn from_ron(source: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = ron::from_str(source)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::biome::BiomeType;

    fn snapshot() -> WorldSnapshot {
        WorldSnapshot {
            version: SNAPSHOT_VERSION,
            seed: 987_654_321,
            world_generation_x: 4500.0,
            last_generated_x: 4500.0,
            biome: BiomeSegment {
                biome: BiomeType::Stone,
                remaining_length: 2100,
            },
            biome_travelled: 800.0,
        }
    }

    #[test]
    fn test_ron_round_trip() {
        let original = snapshot();
        let text = original.to_ron().expect("Failed to serialize");
        let parsed = WorldSnapshot::from_ron(&text).expect("Failed to deserialize");
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_rejects_other_versions() {
        let mut future = snapshot();
        future.version = SNAPSHOT_VERSION + 1;
        let text = future.to_ron().unwrap();

        match WorldSnapshot::from_ron(&text) {
            Err(SnapshotError::Version { found, expected }) => {
                assert_eq!(found, SNAPSHOT_VERSION + 1);
                assert_eq!(expected, SNAPSHOT_VERSION);
            }
            other => panic!("expected version error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            WorldSnapshot::from_ron("not a snapshot"),
            Err(SnapshotError::Parse(_))
        ));
    }
}
