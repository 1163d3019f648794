//! # MENGER Procedural Generation
//!
//! Deterministic Menger-sponge generation at arbitrary depth.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same deletion table and depth always produce the same grid
//! 2. **Recursive**: Depth `d` is 27 copies-or-holes of depth `d - 1`
//! 3. **Memoized**: The last `(depth, grid)` is kept until the table, shading or depth changes
//! 4. **Exporter-agnostic**: Files are written through `menger_vox::VoxelExporter`
//!
//! ## Core Components
//!
//! - `DeletionTable`: Which of the 27 sub-cubes are carved
//! - `SpongeGenerator`: Expansion, memoization, inverse and slicing
//! - `SpongeConfig`: TOML-driven run parameters
//! - `SharedSpongeGenerator`: Mutex-guarded handle for multi-threaded callers
//!
//! ## Example
//!
//! ```rust,ignore
//! use menger_procedural::{DeletionTable, SpongeGenerator};
//!
//! let mut menger = SpongeGenerator::new().with_table(DeletionTable::menger());
//!
//! let grid = menger.output(3, "menger_pattern.vox")?;
//! assert_eq!(grid.side(), 27);
//! assert_eq!(grid.occupied_count(), 8000);
//!
//! let holes = menger.inverse_output(3, "menger_holes.vox")?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod deletion;
pub mod depth;
pub mod error;
pub mod shared;
pub mod sponge;

pub use config::SpongeConfig;
pub use deletion::{BasePattern, DeletionTable, MAX_DELETION_INDEX, PATTERN_CELLS};
pub use depth::Depth;
pub use error::{SpongeError, SpongeResult};
pub use shared::SharedSpongeGenerator;
pub use sponge::{CacheState, Shading, SpongeGenerator};
