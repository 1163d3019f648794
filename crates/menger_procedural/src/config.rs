//! # Sponge Configuration
//!
//! Generation parameters loaded from TOML. Every field has a default, so an
//! empty file yields a depth-3 solid cube written to `menger.vox`.
//!
//! ```toml
//! depth = 3
//! deletion_table = [4, 10, 12, 13, 14, 16, 22]
//! shading = "leveled"
//! color = [81, 168, 221]
//! output = "out/menger.vox"
//! inverse = false
//! slice = 2
//! ```

use std::path::{Path, PathBuf};

use menger_core::{Rgba, DEFAULT_OCCUPIED_COLOR};
use serde::{Deserialize, Serialize};

use crate::deletion::DeletionTable;
use crate::error::{SpongeError, SpongeResult};
use crate::sponge::{Shading, SpongeGenerator};

/// Parameters for one generation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpongeConfig {
    /// Recursion depth.
    pub depth: i64,
    /// Carved cell indices (0..=26).
    pub deletion_table: Vec<i64>,
    /// Voxel colouring.
    pub shading: Shading,
    /// Occupied colour as `[r, g, b]`.
    pub color: Rgba,
    /// Destination file.
    pub output: PathBuf,
    /// Export the complement instead of the sponge.
    pub inverse: bool,
    /// Also export the sponge with this many leading layers removed.
    pub slice: Option<usize>,
}

impl Default for SpongeConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            deletion_table: Vec::new(),
            shading: Shading::Mono,
            color: DEFAULT_OCCUPIED_COLOR,
            output: PathBuf::from("menger.vox"),
            inverse: false,
            slice: None,
        }
    }
}

impl SpongeConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SpongeError::InvalidConfig`] on malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> SpongeResult<Self> {
        toml::from_str(text).map_err(|e| SpongeError::InvalidConfig(e.to_string()))
    }

    /// Loads a config file.
    ///
    /// # Errors
    ///
    /// Returns [`SpongeError::InvalidConfig`] if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> SpongeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SpongeError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Validated deletion table.
    ///
    /// # Errors
    ///
    /// Returns [`SpongeError::DeletionIndexOutOfRange`] for bad entries.
    pub fn table(&self) -> SpongeResult<DeletionTable> {
        DeletionTable::new(self.deletion_table.iter().copied())
    }

    /// Builds a `.vox`-writing generator from this config.
    ///
    /// # Errors
    ///
    /// Returns [`SpongeError::DeletionIndexOutOfRange`] for bad entries.
    pub fn build_generator(&self) -> SpongeResult<SpongeGenerator> {
        Ok(SpongeGenerator::new()
            .with_table(self.table()?)
            .with_shading(self.shading)
            .with_color(self.color))
    }
}
