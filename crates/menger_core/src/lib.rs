//! # MENGER Core
//!
//! Storage types shared by the sponge generator and the `.vox` exporter.
//!
//! - `VoxelGrid`: cubic flat buffer of palette indices
//! - `Palette` / `Rgba`: 256-entry colour table, index 0 empty

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod grid;
pub mod palette;

pub use grid::VoxelGrid;
pub use palette::{Palette, Rgba, DEFAULT_OCCUPIED_COLOR, PALETTE_SIZE, SHADE_STEP};
