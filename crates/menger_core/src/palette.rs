//! Voxel colour palette.
//!
//! Every occupied voxel stores an 8-bit palette index. Index 0 is always
//! empty, so a palette carries 255 usable colours.
//!
//! Two layouts are produced:
//! - **Mono**: index 1 holds the occupied colour.
//! - **Leveled**: index `1 + k` holds the occupied colour brightened by
//!   `k * SHADE_STEP` per channel, one entry per recursion level.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Number of palette entries (including the empty slot).
pub const PALETTE_SIZE: usize = 256;

/// Per-channel brightness added for each shade level.
pub const SHADE_STEP: u8 = 9;

/// Colour used for occupied voxels unless configured otherwise.
pub const DEFAULT_OCCUPIED_COLOR: Rgba = Rgba::opaque(81, 168, 221);

/// Palette entry, laid out exactly as in a `.vox` RGBA chunk.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255).
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black, used for the empty slot.
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    /// Creates an opaque colour.
    #[inline]
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Returns this colour brightened by `shade * SHADE_STEP` per channel.
    #[must_use]
    pub const fn shaded(self, shade: u8) -> Self {
        let delta = shade.saturating_mul(SHADE_STEP);
        Self {
            r: self.r.saturating_add(delta),
            g: self.g.saturating_add(delta),
            b: self.b.saturating_add(delta),
            a: self.a,
        }
    }
}

impl From<[u8; 3]> for Rgba {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::opaque(r, g, b)
    }
}

impl From<Rgba> for [u8; 3] {
    fn from(c: Rgba) -> Self {
        [c.r, c.g, c.b]
    }
}

/// 256-entry palette; index 0 is the empty slot.
#[derive(Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgba; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self::mono(DEFAULT_OCCUPIED_COLOR)
    }
}

impl Palette {
    /// Palette with `color` at index 1.
    ///
    /// Unused entries are opaque black so stray indices stay visible.
    #[must_use]
    pub fn mono(color: Rgba) -> Self {
        let mut colors = [Rgba::opaque(0, 0, 0); PALETTE_SIZE];
        colors[0] = Rgba::TRANSPARENT;
        colors[1] = color;
        Self { colors }
    }

    /// Palette with `levels` shades of `base` at indices `1..=levels`.
    ///
    /// Index `1 + k` is `base.shaded(k)`. Levels beyond 255 are clamped.
    #[must_use]
    pub fn leveled(base: Rgba, levels: usize) -> Self {
        let mut palette = Self::mono(base);
        let levels = levels.min(PALETTE_SIZE - 1);
        for (shade, slot) in palette.colors[1..=levels].iter_mut().enumerate() {
            // `levels` is clamped to 255, so `shade` fits in u8.
            *slot = base.shaded(u8::try_from(shade).unwrap_or(u8::MAX));
        }
        palette
    }

    /// Gets colour at index.
    #[inline]
    #[must_use]
    pub fn get(&self, index: u8) -> Rgba {
        self.colors[index as usize]
    }

    /// Sets colour at index. Index 0 stays transparent.
    #[inline]
    pub fn set(&mut self, index: u8, color: Rgba) {
        if index != 0 {
            self.colors[index as usize] = color;
        }
    }

    /// All entries.
    #[inline]
    #[must_use]
    pub fn colors(&self) -> &[Rgba; PALETTE_SIZE] {
        &self.colors
    }

    /// Entries as raw RGBA bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Palette")
            .field("occupied", &self.colors[1])
            .finish_non_exhaustive()
    }
}
