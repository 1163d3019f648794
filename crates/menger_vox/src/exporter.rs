//! # Exporter Interface
//!
//! The sponge generator never writes files itself. It hands a fully
//! materialized grid, a palette and a destination to a [`VoxelExporter`].
//!
//! ```text
//! menger_procedural:     menger_vox:
//! ┌──────────────────┐   ┌──────────────────────┐
//! │ SpongeGenerator  │ → │ impl VoxelExporter   │
//! └──────────────────┘   └──────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use menger_core::{Palette, VoxelGrid};

use crate::error::VoxResult;

/// File extension appended to paths that carry none.
pub const VOX_EXTENSION: &str = "vox";

/// Persists finished grids.
pub trait VoxelExporter {
    /// Writes `grid` with `palette` to a file derived from `path`.
    ///
    /// Returns the path actually written.
    ///
    /// # Errors
    ///
    /// Returns error if the grid cannot be encoded or written.
    fn export(&mut self, grid: &VoxelGrid, palette: &Palette, path: &Path) -> VoxResult<PathBuf>;
}

impl<E: VoxelExporter + ?Sized> VoxelExporter for &mut E {
    fn export(&mut self, grid: &VoxelGrid, palette: &Palette, path: &Path) -> VoxResult<PathBuf> {
        (**self).export(grid, palette, path)
    }
}

/// Appends `.vox` when `path` has no extension.
#[must_use]
pub fn with_vox_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(VOX_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_appended() {
        assert_eq!(with_vox_extension(Path::new("out/menger")), PathBuf::from("out/menger.vox"));
    }

    #[test]
    fn test_existing_extension_kept() {
        assert_eq!(with_vox_extension(Path::new("sponge.vox")), PathBuf::from("sponge.vox"));
        assert_eq!(with_vox_extension(Path::new("sponge.bin")), PathBuf::from("sponge.bin"));
    }
}
