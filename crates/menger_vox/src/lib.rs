//! # MENGER VOX
//!
//! MagicaVoxel `.vox` support for the sponge generator.
//!
//! ## VOX Format Reference
//!
//! ```text
//! VOX File Structure:
//! ├── "VOX " (4 bytes) - Magic number
//! ├── Version (4 bytes) - File version (150)
//! └── MAIN Chunk
//!     ├── SIZE Chunk - Model dimensions
//!     ├── XYZI Chunk - Voxel data
//!     └── RGBA Chunk - Palette (optional)
//! ```
//!
//! Voxel coordinates are single bytes, so a model side is capped at 256.
//!
//! ## Example
//!
//! ```rust,ignore
//! use menger_core::{Palette, VoxelGrid};
//! use menger_vox::{VoxelExporter, VoxLoader, VoxWriter};
//!
//! let written = VoxWriter.export(&VoxelGrid::unit(), &Palette::default(), "cube".as_ref())?;
//! let file = VoxLoader::load(written)?;
//! assert_eq!(file.voxel_count(), 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod exporter;
pub mod loader;
pub mod writer;

pub use error::{VoxError, VoxResult};
pub use exporter::{with_vox_extension, VoxelExporter, VOX_EXTENSION};
pub use loader::{VoxFile, VoxLoader};
pub use writer::{VoxVoxel, VoxWriter};

/// VOX file magic number.
pub const VOX_MAGIC: [u8; 4] = *b"VOX ";

/// VOX version written by [`VoxWriter`].
pub const VOX_VERSION: u32 = 150;

/// Largest model side a VOX file can address.
pub const MAX_MODEL_SIDE: usize = 256;
