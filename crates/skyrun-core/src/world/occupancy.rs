//! Occupancy grid - which (column, level) cells structures have claimed

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// Composite key of one grid cell
///
/// `column` is the absolute tile column (`floor(x / tile_size)`), `level` the
/// index on the vertical ladder (0 = ground).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OccupancyCell {
    pub column: i32,
    pub level: i32,
}

impl OccupancyCell {
    pub const fn new(column: i32, level: i32) -> Self {
        Self { column, level }
    }
}

/// Absolute tile column containing world X coordinate `x`
pub fn column_of(x: f64, tile_size: f64) -> i32 {
    (x / tile_size).floor() as i32
}

/// Append-only set of claimed cells
///
/// Cells are never released; the grid lives as long as the level does.
#[derive(Debug, Clone, Default)]
pub struct OccupancyGrid {
    cells: AHashSet<OccupancyCell>,
}

impl OccupancyGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_free(&self, column: i32, level: i32) -> bool {
        !self.contains(OccupancyCell::new(column, level))
    }

    pub fn contains(&self, cell: OccupancyCell) -> bool {
        self.cells.contains(&cell)
    }

    /// Claim a single cell. Returns false if it was already taken.
    pub fn claim(&mut self, column: i32, level: i32) -> bool {
        self.cells.insert(OccupancyCell::new(column, level))
    }

    /// Claim every cell or none of them
    ///
    /// All cells are checked before the first one is inserted, so a failed
    /// call leaves the grid untouched.
    pub fn try_claim_all(&mut self, cells: &[OccupancyCell]) -> bool {
        if cells.iter().any(|cell| !self.is_free(cell.column, cell.level)) {
            return false;
        }
        self.cells.extend(cells.iter().copied());
        true
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OccupancyCell> {
        self.cells.iter()
    }
}
