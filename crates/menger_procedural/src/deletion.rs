//! # Deletion Tables
//!
//! A deletion table names the cells of a 3×3×3 cube that are carved away at
//! every recursion level.
//!
//! ## Cell Numbering
//!
//! Cells are numbered row-major over `(x, y, z)`, `z` fastest:
//!
//! ```text
//! index = 9x + 3y + z        (x, y, z in 0..3)
//!
//! x = 0        x = 1        x = 2
//!  0  1  2      9 10 11     18 19 20
//!  3  4  5     12 13 14     21 22 23
//!  6  7  8     15 16 17     24 25 26
//! ```
//!
//! The classic Menger sponge removes the centre (13) and the six face
//! centres (4, 10, 12, 14, 16, 22).

use std::fmt;

use menger_core::VoxelGrid;

use crate::error::{SpongeError, SpongeResult};

/// Number of cells in the base cube.
pub const PATTERN_CELLS: usize = 27;

/// Largest valid deletion index.
pub const MAX_DELETION_INDEX: i64 = 26;

/// Cells removed by the classic Menger sponge.
pub const MENGER_INDICES: [u8; 7] = [4, 10, 12, 13, 14, 16, 22];

/// The eight corners, added on top of [`MENGER_INDICES`] for the star variant.
pub const CORNER_INDICES: [u8; 8] = [0, 2, 6, 8, 18, 20, 24, 26];

/// Set of carved cells, one bit per cell.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DeletionTable {
    mask: u32,
}

impl DeletionTable {
    /// Deletes nothing: every depth is a solid cube.
    pub const EMPTY: Self = Self { mask: 0 };

    /// Builds a table from raw indices.
    ///
    /// Duplicates are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SpongeError::DeletionIndexOutOfRange`] for the first entry
    /// outside `0..=26`.
    pub fn new<I, T>(indices: I) -> SpongeResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<i64>,
    {
        let mut mask = 0u32;
        for index in indices {
            let index = index.into();
            if !(0..=MAX_DELETION_INDEX).contains(&index) {
                return Err(SpongeError::DeletionIndexOutOfRange { index });
            }
            mask |= 1 << index;
        }
        Ok(Self { mask })
    }

    const fn from_indices(indices: &[u8]) -> Self {
        let mut mask = 0u32;
        let mut i = 0;
        while i < indices.len() {
            mask |= 1 << indices[i];
            i += 1;
        }
        Self { mask }
    }

    /// The classic Menger sponge.
    #[must_use]
    pub const fn menger() -> Self {
        Self::from_indices(&MENGER_INDICES)
    }

    /// Menger sponge with the corners removed as well.
    #[must_use]
    pub const fn menger_star() -> Self {
        Self {
            mask: Self::menger().mask | Self::from_indices(&CORNER_INDICES).mask,
        }
    }

    /// Returns true if cell `index` is carved.
    #[inline]
    #[must_use]
    pub const fn contains(self, index: usize) -> bool {
        index < PATTERN_CELLS && self.mask & (1 << index) != 0
    }

    /// Number of carved cells.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.mask.count_ones() as usize
    }

    /// Returns true if nothing is carved.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.mask == 0
    }

    /// Carved indices in ascending order.
    pub fn indices(self) -> impl Iterator<Item = usize> {
        (0..PATTERN_CELLS).filter(move |&i| self.contains(i))
    }

    /// Derives the 3×3×3 occupancy pattern.
    #[must_use]
    pub fn base_pattern(self) -> BasePattern {
        let mut cells = [true; PATTERN_CELLS];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = !self.contains(i);
        }
        BasePattern { cells }
    }
}

impl fmt::Debug for DeletionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.indices()).finish()
    }
}

impl fmt::Display for DeletionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 3×3×3 occupancy derived from a [`DeletionTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BasePattern {
    cells: [bool; PATTERN_CELLS],
}

impl BasePattern {
    /// Returns true if sub-cube `(i, j, k)` is kept.
    #[inline]
    #[must_use]
    pub const fn is_occupied(&self, i: usize, j: usize, k: usize) -> bool {
        i < 3 && j < 3 && k < 3 && self.cells[9 * i + 3 * j + k]
    }

    /// Kept sub-cubes as `[i, j, k]`, in cell order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &kept)| kept)
            .map(|(n, _)| [n / 9, (n / 3) % 3, n % 3])
    }

    /// Number of kept sub-cubes.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&kept| kept).count()
    }

    /// The pattern as a mono grid of side 3.
    #[must_use]
    pub fn to_grid(&self) -> VoxelGrid {
        let mut grid = VoxelGrid::empty(3);
        for [i, j, k] in self.occupied_cells() {
            grid.set(i, j, k, VoxelGrid::SOLID);
        }
        grid
    }
}

impl Default for BasePattern {
    fn default() -> Self {
        DeletionTable::EMPTY.base_pattern()
    }
}
