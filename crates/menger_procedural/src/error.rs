//! # Sponge Error Types
//!
//! All errors that can occur while configuring, generating or exporting a
//! sponge.

use std::path::PathBuf;

use menger_core::VoxelGrid;
use menger_vox::VoxError;
use thiserror::Error;

/// Errors that can occur in the sponge generator.
#[derive(Error, Debug)]
pub enum SpongeError {
    /// Deletion table entry outside the 27-cell cube.
    #[error("deletion index {index} outside 0..=26")]
    DeletionIndexOutOfRange {
        /// The offending entry.
        index: i64,
    },

    /// Negative recursion depth.
    #[error("invalid depth {0}: depth must be non-negative")]
    InvalidDepth(i64),

    /// Depth whose cell count cannot be addressed.
    #[error("depth {depth} needs more than usize::MAX cells")]
    GridTooLarge {
        /// The requested depth.
        depth: i64,
    },

    /// The exporter failed. Nothing computed is lost: the forward grid
    /// stays memoized, derived grids travel with the error.
    #[error("failed to export {}: {source}", path.display())]
    Export {
        /// Destination requested by the caller.
        path: PathBuf,
        /// Underlying exporter error.
        #[source]
        source: VoxError,
        /// Derived grid (inverse, sliced) that was not written. `None` for
        /// forward output, which is still in the generator's cache.
        grid: Option<Box<VoxelGrid>>,
    },

    /// `sliced` was called before any sponge was generated.
    #[error("nothing to slice: no sponge has been generated yet")]
    NothingToSlice,

    /// Slice would remove the whole grid.
    #[error("cannot slice {cut} layers from a grid of side {side}")]
    InvalidSlice {
        /// Layers requested.
        cut: usize,
        /// Side of the last generated grid.
        side: usize,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SpongeError {
    /// Grid computed before a failed export, if it was not memoized.
    #[must_use]
    pub fn grid(&self) -> Option<&VoxelGrid> {
        match self {
            Self::Export { grid, .. } => grid.as_deref(),
            _ => None,
        }
    }

    /// Takes the grid out of a failed export.
    #[must_use]
    pub fn into_grid(self) -> Option<VoxelGrid> {
        match self {
            Self::Export { grid, .. } => grid.map(|g| *g),
            _ => None,
        }
    }
}

/// Result type for sponge operations.
pub type SpongeResult<T> = Result<T, SpongeError>;
