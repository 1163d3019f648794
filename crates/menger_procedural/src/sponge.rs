//! # Sponge Generator
//!
//! Turns a [`DeletionTable`] and a depth into a voxel grid.
//!
//! ## Expansion
//!
//! ```text
//! depth 0:  [1]
//! depth d:  for each (i, j, k) of the base pattern
//!             kept    -> copy of depth d-1 at (i·s, j·s, k·s)
//!             carved  -> empty s×s×s block
//!           where s = 3^(d-1)
//! ```
//!
//! ## Memoization
//!
//! The generator keeps exactly one result, `(depth, grid)`. Asking for the
//! same depth again reuses it; any other depth rebuilds from depth 0 up.
//! Changing the deletion table or the shading drops it.
//!
//! The inverse is derived from the memoized forward grid and is not cached.

use std::path::{Path, PathBuf};

use menger_core::{Palette, Rgba, VoxelGrid, DEFAULT_OCCUPIED_COLOR};
use menger_vox::{VoxWriter, VoxelExporter};
use serde::{Deserialize, Serialize};

use crate::deletion::{BasePattern, DeletionTable};
use crate::depth::Depth;
use crate::error::{SpongeError, SpongeResult};

/// How occupied voxels are coloured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shading {
    /// Every occupied voxel uses palette index 1.
    #[default]
    Mono,
    /// Each expansion brightens the copies placed at `k > 0` by one shade.
    Leveled,
}

/// Grid memoized for one depth.
#[derive(Clone, Debug)]
struct CachedGrid {
    depth: Depth,
    grid: VoxelGrid,
}

/// Memoized result of the last computation.
///
/// Either empty (nothing computed, or invalidated) or valid for one depth,
/// built from the current table and shading.
#[derive(Clone, Debug, Default)]
pub struct CacheState {
    entry: Option<CachedGrid>,
}

impl CacheState {
    /// Depth of the cached grid, if any.
    #[must_use]
    pub fn depth(&self) -> Option<Depth> {
        self.entry.as_ref().map(|e| e.depth)
    }

    /// Returns true if a grid is cached.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.entry.is_some()
    }

    /// Cached grid, if any.
    #[must_use]
    pub fn grid(&self) -> Option<&VoxelGrid> {
        self.entry.as_ref().map(|e| &e.grid)
    }

    /// Returns the grid for `depth`, running `compute` on a miss.
    fn get_or_compute<F: FnOnce() -> VoxelGrid>(&mut self, depth: Depth, compute: F) -> &VoxelGrid {
        if self.depth() != Some(depth) {
            // Free the stale grid before building the new one.
            self.entry = None;
        }
        &self
            .entry
            .get_or_insert_with(|| CachedGrid {
                depth,
                grid: compute(),
            })
            .grid
    }

    fn invalidate(&mut self) {
        self.entry = None;
    }
}

/// Recursive sponge builder with a single-entry cache.
///
/// Generic over the exporter so tests can record exports instead of
/// writing files.
pub struct SpongeGenerator<E = VoxWriter> {
    /// Carved cells.
    table: DeletionTable,
    /// Occupancy derived from `table`.
    pattern: BasePattern,
    /// Voxel colouring.
    shading: Shading,
    /// Occupied colour (palette index 1).
    color: Rgba,
    /// Last result.
    cache: CacheState,
    /// Where finished grids go.
    exporter: E,
    /// Full rebuilds performed so far.
    rebuilds: u64,
}

impl Default for SpongeGenerator<VoxWriter> {
    fn default() -> Self {
        Self::new()
    }
}

impl SpongeGenerator<VoxWriter> {
    /// Creates a generator that writes `.vox` files.
    ///
    /// The deletion table starts empty.
    #[must_use]
    pub fn new() -> Self {
        Self::with_exporter(VoxWriter)
    }
}

impl<E: VoxelExporter> SpongeGenerator<E> {
    /// Creates a generator with a custom exporter.
    #[must_use]
    pub fn with_exporter(exporter: E) -> Self {
        Self {
            table: DeletionTable::EMPTY,
            pattern: BasePattern::default(),
            shading: Shading::Mono,
            color: DEFAULT_OCCUPIED_COLOR,
            cache: CacheState::default(),
            exporter,
            rebuilds: 0,
        }
    }

    /// Sets the deletion table (builder style).
    #[must_use]
    pub fn with_table(mut self, table: DeletionTable) -> Self {
        self.set_table(table);
        self
    }

    /// Sets the shading (builder style).
    #[must_use]
    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.set_shading(shading);
        self
    }

    /// Sets the occupied colour (builder style).
    #[must_use]
    pub const fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Current deletion table.
    #[inline]
    #[must_use]
    pub const fn deletion_table(&self) -> DeletionTable {
        self.table
    }

    /// Base pattern derived from the current table.
    #[inline]
    #[must_use]
    pub const fn base_pattern(&self) -> &BasePattern {
        &self.pattern
    }

    /// Current shading.
    #[inline]
    #[must_use]
    pub const fn shading(&self) -> Shading {
        self.shading
    }

    /// Current occupied colour.
    #[inline]
    #[must_use]
    pub const fn color(&self) -> Rgba {
        self.color
    }

    /// Memoization state.
    #[inline]
    #[must_use]
    pub const fn cache(&self) -> &CacheState {
        &self.cache
    }

    /// Number of full rebuilds since construction.
    #[inline]
    #[must_use]
    pub const fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// The exporter.
    #[inline]
    #[must_use]
    pub const fn exporter(&self) -> &E {
        &self.exporter
    }

    /// Mutable access to the exporter.
    #[inline]
    pub fn exporter_mut(&mut self) -> &mut E {
        &mut self.exporter
    }

    /// Replaces the deletion table from raw indices.
    ///
    /// Duplicates are ignored; an empty collection deletes nothing. On
    /// success the memoized result is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SpongeError::DeletionIndexOutOfRange`] if any entry lies
    /// outside `0..=26`. The current table and cache are left untouched.
    pub fn set_deletion_table<I, T>(&mut self, lut: I) -> SpongeResult<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<i64>,
    {
        let table = DeletionTable::new(lut)?;
        self.set_table(table);
        Ok(())
    }

    /// Replaces the deletion table and drops the memoized result.
    pub fn set_table(&mut self, table: DeletionTable) {
        self.table = table;
        self.pattern = table.base_pattern();
        self.cache.invalidate();
        tracing::debug!("Deletion table set to {}", table);
    }

    /// Changes the shading. Drops the memoized result if it differs.
    pub fn set_shading(&mut self, shading: Shading) {
        if self.shading != shading {
            self.shading = shading;
            self.cache.invalidate();
        }
    }

    /// Changes the occupied colour. Grids are unaffected.
    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    /// Palette for a grid of the given depth under the current shading.
    #[must_use]
    pub fn palette(&self, depth: Depth) -> Palette {
        match self.shading {
            Shading::Mono => Palette::mono(self.color),
            Shading::Leveled => {
                let levels = usize::try_from(depth.get()).unwrap_or(usize::MAX);
                Palette::leveled(self.color, levels.saturating_add(1))
            }
        }
    }

    /// Last memoized output.
    #[must_use]
    pub fn last_output(&self) -> Option<(Depth, &VoxelGrid)> {
        self.cache.entry.as_ref().map(|e| (e.depth, &e.grid))
    }

    /// Computes (or reuses) the sponge for `depth` without exporting.
    ///
    /// # Errors
    ///
    /// Returns [`SpongeError::InvalidDepth`] for negative depths and
    /// [`SpongeError::GridTooLarge`] when the cell count overflows.
    pub fn grid(&mut self, depth: i64) -> SpongeResult<&VoxelGrid> {
        let depth = Depth::new(depth)?;
        Ok(self.ensure(depth))
    }

    /// Computes (or reuses) the sponge for `depth` and exports it.
    ///
    /// The file is written through the exporter with the palette for the
    /// current shading. `.vox` is appended when `path` has no extension.
    ///
    /// # Errors
    ///
    /// - [`SpongeError::InvalidDepth`] / [`SpongeError::GridTooLarge`]
    ///   before any computation.
    /// - [`SpongeError::Export`] if the exporter fails. The grid has been
    ///   memoized by then: [`grid`](Self::grid) or
    ///   [`last_output`](Self::last_output) return it without recomputation.
    pub fn output<P: AsRef<Path>>(&mut self, depth: i64, path: P) -> SpongeResult<&VoxelGrid> {
        let depth = Depth::new(depth)?;
        let palette = self.palette(depth);
        let path = path.as_ref();

        let Self {
            table,
            pattern,
            shading,
            cache,
            exporter,
            rebuilds,
            ..
        } = self;
        let grid = cache.get_or_compute(depth, || {
            *rebuilds += 1;
            build(pattern, *table, depth, *shading)
        });

        export(exporter, grid, &palette, path)?;
        Ok(grid)
    }

    /// Computes the complement of the sponge for `depth` without exporting.
    ///
    /// # Errors
    ///
    /// Same depth errors as [`grid`](Self::grid).
    pub fn inverse_grid(&mut self, depth: i64) -> SpongeResult<VoxelGrid> {
        Ok(self.grid(depth)?.complement())
    }

    /// Computes the complement of the sponge for `depth` and exports it.
    ///
    /// Every voxel carved away becomes occupied and vice versa. The forward
    /// grid is obtained through the grid-only path, so exactly one file is
    /// written per call. The inverse is always exported with the mono
    /// palette.
    ///
    /// # Errors
    ///
    /// Same as [`output`](Self::output). On export failure the inverse
    /// rides along in the error, see [`SpongeError::into_grid`].
    pub fn inverse_output<P: AsRef<Path>>(&mut self, depth: i64, path: P) -> SpongeResult<VoxelGrid> {
        let inverse = self.inverse_grid(depth)?;
        let palette = Palette::mono(self.color);
        export_owned(&mut self.exporter, inverse, &palette, path.as_ref())
    }

    /// Removes the first `cut` layers along each axis of the last output.
    ///
    /// Exports the result when `path` is given.
    ///
    /// # Errors
    ///
    /// - [`SpongeError::NothingToSlice`] before the first output.
    /// - [`SpongeError::InvalidSlice`] if `cut` is not smaller than the side.
    /// - [`SpongeError::Export`] if the exporter fails, carrying the sliced
    ///   grid.
    pub fn sliced(&mut self, cut: usize, path: Option<&Path>) -> SpongeResult<VoxelGrid> {
        let (depth, grid) = self.last_output().ok_or(SpongeError::NothingToSlice)?;
        let side = grid.side();
        if cut >= side {
            return Err(SpongeError::InvalidSlice { cut, side });
        }

        let sliced = grid.trim_leading(cut);
        match path {
            Some(path) => {
                let palette = self.palette(depth);
                export_owned(&mut self.exporter, sliced, &palette, path)
            }
            None => Ok(sliced),
        }
    }

    fn ensure(&mut self, depth: Depth) -> &VoxelGrid {
        let Self {
            table,
            pattern,
            shading,
            cache,
            rebuilds,
            ..
        } = self;
        cache.get_or_compute(depth, || {
            *rebuilds += 1;
            build(pattern, *table, depth, *shading)
        })
    }
}

/// Builds the sponge for `depth` from scratch.
fn build(pattern: &BasePattern, table: DeletionTable, depth: Depth, shading: Shading) -> VoxelGrid {
    let grid = match depth.parent() {
        None => VoxelGrid::unit(),
        Some(parent) => expand(pattern, &build(pattern, table, parent, shading), shading),
    };
    if depth.get() > 0 {
        tracing::debug!(
            "Expanded {} to depth {} (side {}, {} voxels)",
            table,
            depth,
            grid.side(),
            grid.occupied_count()
        );
    }
    grid
}

/// One expansion step: places `child` in every kept cell of `pattern`.
fn expand(pattern: &BasePattern, child: &VoxelGrid, shading: Shading) -> VoxelGrid {
    let s = child.side();
    let mut grid = VoxelGrid::empty(s * 3);

    for [i, j, k] in pattern.occupied_cells() {
        let origin = [i * s, j * s, k * s];
        match shading {
            Shading::Leveled if k > 0 => grid.blit_with(child, origin, |v| v.saturating_add(1)),
            _ => grid.blit(child, origin),
        }
    }
    grid
}

fn export<E: VoxelExporter>(
    exporter: &mut E,
    grid: &VoxelGrid,
    palette: &Palette,
    path: &Path,
) -> SpongeResult<PathBuf> {
    let written = exporter
        .export(grid, palette, path)
        .map_err(|source| SpongeError::Export {
            path: path.to_path_buf(),
            source,
            grid: None,
        })?;
    tracing::info!(
        "Exported sponge to {} (side {}, {} voxels)",
        written.display(),
        grid.side(),
        grid.occupied_count()
    );
    Ok(written)
}

/// Exports a grid the cache does not hold, handing it back on failure.
fn export_owned<E: VoxelExporter>(
    exporter: &mut E,
    grid: VoxelGrid,
    palette: &Palette,
    path: &Path,
) -> SpongeResult<VoxelGrid> {
    match export(exporter, &grid, palette, path) {
        Ok(_) => Ok(grid),
        Err(SpongeError::Export { path, source, .. }) => Err(SpongeError::Export {
            path,
            source,
            grid: Some(Box::new(grid)),
        }),
        Err(e) => Err(e),
    }
}
