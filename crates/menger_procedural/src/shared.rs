//! Thread-safe generator handle.
//!
//! Generation stays single-threaded. The handle only lets several threads
//! share one generator: the mutex makes the memoized result write-once per
//! depth, so concurrent requests for the same depth trigger one rebuild.

use std::path::Path;
use std::sync::Arc;

use menger_core::VoxelGrid;
use menger_vox::{VoxWriter, VoxelExporter};
use parking_lot::Mutex;

use crate::error::SpongeResult;
use crate::sponge::SpongeGenerator;

/// Clonable handle to a [`SpongeGenerator`] behind a mutex.
pub struct SharedSpongeGenerator<E = VoxWriter> {
    inner: Arc<Mutex<SpongeGenerator<E>>>,
}

impl<E> Clone for SharedSpongeGenerator<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: VoxelExporter> SharedSpongeGenerator<E> {
    /// Wraps a generator.
    #[must_use]
    pub fn new(generator: SpongeGenerator<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(generator)),
        }
    }

    /// Runs `f` with exclusive access to the generator.
    pub fn with<R>(&self, f: impl FnOnce(&mut SpongeGenerator<E>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// See [`SpongeGenerator::set_deletion_table`].
    ///
    /// # Errors
    ///
    /// Returns error if any index lies outside `0..=26`.
    pub fn set_deletion_table<I, T>(&self, lut: I) -> SpongeResult<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<i64>,
    {
        self.inner.lock().set_deletion_table(lut)
    }

    /// See [`SpongeGenerator::grid`]. Returns a copy of the grid.
    ///
    /// # Errors
    ///
    /// Returns error for invalid depths.
    pub fn grid(&self, depth: i64) -> SpongeResult<VoxelGrid> {
        self.inner.lock().grid(depth).cloned()
    }

    /// See [`SpongeGenerator::output`]. Returns a copy of the grid.
    ///
    /// # Errors
    ///
    /// Returns error for invalid depths or export failure.
    pub fn output<P: AsRef<Path>>(&self, depth: i64, path: P) -> SpongeResult<VoxelGrid> {
        self.inner.lock().output(depth, path).cloned()
    }

    /// See [`SpongeGenerator::inverse_output`].
    ///
    /// # Errors
    ///
    /// Returns error for invalid depths or export failure.
    pub fn inverse_output<P: AsRef<Path>>(&self, depth: i64, path: P) -> SpongeResult<VoxelGrid> {
        self.inner.lock().inverse_output(depth, path)
    }

    /// Number of full rebuilds performed by the shared generator.
    #[must_use]
    pub fn rebuilds(&self) -> u64 {
        self.inner.lock().rebuilds()
    }
}
