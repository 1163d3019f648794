//! # Voxel Grid
//!
//! Cubic voxel storage used for every sponge level.
//!
//! ## Layout
//!
//! Cells live in one flat `Vec<u8>`, row-major over `(x, y, z)` with `z`
//! fastest:
//!
//! ```text
//! index = (x * side + y) * side + z
//! ```
//!
//! This is the same order the 27-cell deletion table uses, so cell `13` of
//! a 3×3×3 grid is `(1, 1, 1)`.
//!
//! A value of `0` is empty. Any other value is a palette index.

/// Cubic grid of palette indices.
#[derive(Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    /// Edge length in voxels.
    side: usize,
    /// Cell data (indexed as `(x * side + y) * side + z`).
    cells: Vec<u8>,
}

impl VoxelGrid {
    /// Value of an empty cell.
    pub const EMPTY: u8 = 0;

    /// Value of an occupied cell in mono output (palette index 1).
    pub const SOLID: u8 = 1;

    /// Creates an all-empty grid.
    #[must_use]
    pub fn empty(side: usize) -> Self {
        Self::filled(side, Self::EMPTY)
    }

    /// Creates a grid with every cell set to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `side³` overflows `usize`. Sizes read from untrusted input
    /// go through [`try_filled`](Self::try_filled).
    #[must_use]
    pub fn filled(side: usize, value: u8) -> Self {
        Self::try_filled(side, value).unwrap_or_else(|| panic!("grid side {side} overflows usize"))
    }

    /// Like [`filled`](Self::filled), returning `None` if `side³` overflows.
    #[must_use]
    pub fn try_filled(side: usize, value: u8) -> Option<Self> {
        let len = side.checked_mul(side)?.checked_mul(side)?;
        Some(Self {
            side,
            cells: vec![value; len],
        })
    }

    /// The depth-0 sponge: a single solid cell.
    #[must_use]
    pub fn unit() -> Self {
        Self::filled(1, Self::SOLID)
    }

    /// Wraps an existing cell buffer.
    ///
    /// Returns `None` if `cells.len()` is not `side³`.
    #[must_use]
    pub fn from_cells(side: usize, cells: Vec<u8>) -> Option<Self> {
        let expected = side.checked_mul(side)?.checked_mul(side)?;
        (cells.len() == expected).then_some(Self { side, cells })
    }

    /// Edge length in voxels.
    #[inline]
    #[must_use]
    pub const fn side(&self) -> usize {
        self.side
    }

    /// Total number of cells (`side³`).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true for a zero-sized grid.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Raw cell data.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Flat index of `(x, y, z)`. Caller guarantees bounds.
    #[inline]
    #[must_use]
    pub const fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (x * self.side + y) * self.side + z
    }

    #[inline]
    const fn in_bounds(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.side && y < self.side && z < self.side
    }

    /// Gets a cell. Out-of-bounds reads are empty.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u8 {
        if self.in_bounds(x, y, z) {
            self.cells[self.index(x, y, z)]
        } else {
            Self::EMPTY
        }
    }

    /// Sets a cell. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: u8) {
        if self.in_bounds(x, y, z) {
            let idx = self.index(x, y, z);
            self.cells[idx] = value;
        }
    }

    /// Returns true if the cell holds a non-zero value.
    #[inline]
    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize, z: usize) -> bool {
        self.get(x, y, z) != Self::EMPTY
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != Self::EMPTY).count()
    }

    /// Largest value stored in the grid.
    #[must_use]
    pub fn max_value(&self) -> u8 {
        self.cells.iter().copied().max().unwrap_or(Self::EMPTY)
    }

    /// Iterates over occupied cells as `([x, y, z], value)`.
    pub fn occupied(&self) -> impl Iterator<Item = ([usize; 3], u8)> + '_ {
        let side = self.side;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != Self::EMPTY)
            .map(move |(i, &v)| ([i / (side * side), (i / side) % side, i % side], v))
    }

    /// Copies `block` into this grid with its origin at `origin`.
    ///
    /// # Panics
    ///
    /// Panics if the block does not fit inside this grid at `origin`.
    pub fn blit(&mut self, block: &Self, origin: [usize; 3]) {
        self.blit_with(block, origin, |v| v);
    }

    /// Like [`blit`](Self::blit), passing every copied non-empty value
    /// through `map`. Empty cells stay empty.
    ///
    /// # Panics
    ///
    /// Panics if the block does not fit inside this grid at `origin`.
    pub fn blit_with<F: Fn(u8) -> u8>(&mut self, block: &Self, origin: [usize; 3], map: F) {
        let s = block.side;
        let [ox, oy, oz] = origin;
        assert!(
            ox + s <= self.side && oy + s <= self.side && oz + s <= self.side,
            "block of side {s} does not fit at {origin:?} in grid of side {}",
            self.side
        );

        // Each (x, y) row of the block is a contiguous z-run in both buffers.
        for x in 0..s {
            for y in 0..s {
                let src = block.index(x, y, 0);
                let dst = self.index(ox + x, oy + y, oz);
                let run = &block.cells[src..src + s];
                for (out, &v) in self.cells[dst..dst + s].iter_mut().zip(run) {
                    *out = if v == Self::EMPTY { Self::EMPTY } else { map(v) };
                }
            }
        }
    }

    /// Cell-wise complement: empty cells become [`SOLID`](Self::SOLID),
    /// occupied cells become empty.
    #[must_use]
    pub fn complement(&self) -> Self {
        Self {
            side: self.side,
            cells: self
                .cells
                .iter()
                .map(|&v| if v == Self::EMPTY { Self::SOLID } else { Self::EMPTY })
                .collect(),
        }
    }

    /// Drops the first `cut` layers along each axis.
    ///
    /// The result has side `side - cut`; a `cut` of `side` or more yields a
    /// zero-sized grid.
    #[must_use]
    pub fn trim_leading(&self, cut: usize) -> Self {
        let side = self.side.saturating_sub(cut);
        let mut out = Self::empty(side);
        for x in 0..side {
            for y in 0..side {
                let src = self.index(x + cut, y + cut, cut);
                let dst = out.index(x, y, 0);
                out.cells[dst..dst + side].copy_from_slice(&self.cells[src..src + side]);
            }
        }
        out
    }
}

impl std::fmt::Debug for VoxelGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelGrid")
            .field("side", &self.side)
            .field("occupied", &self.occupied_count())
            .finish()
    }
}
