//! Recursion depth.
//!
//! A sponge of depth `d` has side `3^d` and `27^d` cells. Depth is the only
//! resource knob: memory grows 27× per level.

use std::fmt;

use crate::error::{SpongeError, SpongeResult};

/// Validated recursion depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Depth(u32);

impl Depth {
    /// The single solid cell.
    pub const ZERO: Self = Self(0);

    /// Validates a caller-supplied depth.
    ///
    /// # Errors
    ///
    /// - [`SpongeError::InvalidDepth`] if `depth` is negative.
    /// - [`SpongeError::GridTooLarge`] if `27^depth` overflows `usize`.
    pub fn new(depth: i64) -> SpongeResult<Self> {
        if depth < 0 {
            return Err(SpongeError::InvalidDepth(depth));
        }
        u32::try_from(depth)
            .ok()
            .filter(|&d| 27usize.checked_pow(d).is_some())
            .map(Self)
            .ok_or(SpongeError::GridTooLarge { depth })
    }

    /// Raw depth value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// One level shallower, or `None` at depth 0.
    #[inline]
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self.0 {
            0 => None,
            d => Some(Self(d - 1)),
        }
    }

    /// Grid side length, `3^depth`.
    #[inline]
    #[must_use]
    pub const fn side(self) -> usize {
        3usize.pow(self.0)
    }

    /// Total cells, `27^depth`.
    #[inline]
    #[must_use]
    pub const fn cell_count(self) -> usize {
        27usize.pow(self.0)
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
