//! # Sponge Property Tests
//!
//! Structural guarantees of the generator, checked against an in-memory
//! exporter that records every grid handed to it.

use std::path::{Path, PathBuf};

use menger_core::{Palette, VoxelGrid};
use menger_procedural::{DeletionTable, SpongeError, SpongeGenerator};
use menger_vox::{VoxError, VoxResult, VoxelExporter};

/// Keeps every export in memory.
#[derive(Default)]
struct RecordingExporter {
    exports: Vec<(PathBuf, VoxelGrid)>,
}

impl VoxelExporter for RecordingExporter {
    fn export(&mut self, grid: &VoxelGrid, _palette: &Palette, path: &Path) -> VoxResult<PathBuf> {
        self.exports.push((path.to_path_buf(), grid.clone()));
        Ok(path.to_path_buf())
    }
}

/// Rejects every export.
struct FailingExporter;

impl VoxelExporter for FailingExporter {
    fn export(&mut self, _grid: &VoxelGrid, _palette: &Palette, _path: &Path) -> VoxResult<PathBuf> {
        Err(VoxError::Io(std::io::Error::other("disk full")))
    }
}

fn generator() -> SpongeGenerator<RecordingExporter> {
    SpongeGenerator::with_exporter(RecordingExporter::default())
}

/// Test: side is 3^d and cell count 27^d for every depth.
#[test]
fn test_grid_dimensions_follow_depth() {
    let mut gen = generator();
    gen.set_deletion_table([4, 10, 12, 13, 14, 16, 22]).unwrap();

    for depth in 0..=4u32 {
        let grid = gen.output(i64::from(depth), "dims").unwrap();
        assert_eq!(grid.side(), 3usize.pow(depth));
        assert_eq!(grid.len(), 27usize.pow(depth));
    }
}

/// Test: depth 0 is a solid unit cube whatever the table says.
#[test]
fn test_depth_zero_is_solid_unit() {
    let mut gen = generator();
    for lut in [vec![], vec![13], (0..27).collect::<Vec<i32>>()] {
        gen.set_deletion_table(lut).unwrap();
        let grid = gen.output(0, "unit").unwrap();
        assert_eq!(grid.len(), 1);
        assert!(grid.is_occupied(0, 0, 0));
    }
}

/// Test: an empty table produces a full cube at every depth.
#[test]
fn test_empty_table_is_solid() {
    let mut gen = generator();
    for depth in 0..=3 {
        let grid = gen.output(depth, "solid").unwrap();
        assert_eq!(grid.occupied_count(), grid.len());
    }
}

/// Test: inverse is the exact cell-wise complement of the sponge.
#[test]
fn test_inverse_is_complement() {
    let mut gen = generator().with_table(DeletionTable::menger_star());

    for depth in 0..=3 {
        let forward = gen.output(depth, "fwd").unwrap().clone();
        let inverse = gen.inverse_output(depth, "inv").unwrap();

        assert_eq!(inverse.side(), forward.side());
        for (f, i) in forward.cells().iter().zip(inverse.cells()) {
            assert_eq!(*i, 1 - *f);
        }
    }
}

/// Test: repeated output without table changes is bitwise identical.
#[test]
fn test_output_is_idempotent() {
    let mut gen = generator().with_table(DeletionTable::menger());
    let first = gen.output(3, "a").unwrap().clone();
    let second = gen.output(3, "b").unwrap().clone();

    assert_eq!(first, second);
    assert_eq!(gen.rebuilds(), 1);
    // The export step still runs both times.
    assert_eq!(gen.exporter().exports.len(), 2);
}

/// Test: a new table at the same depth is never served from the stale cache.
#[test]
fn test_table_change_is_not_stale() {
    let mut gen = generator();
    let solid = gen.output(2, "before").unwrap().clone();
    assert_eq!(solid.occupied_count(), 729);

    gen.set_deletion_table([13]).unwrap();
    let carved = gen.output(2, "after").unwrap();

    assert_eq!(carved.occupied_count(), 26 * 26);
    assert!(!carved.is_occupied(4, 4, 4));
    assert_eq!(gen.rebuilds(), 2);
}

/// Test: indices outside 0..=26 are configuration errors.
#[test]
fn test_out_of_range_table_rejected() {
    let mut gen = generator();
    assert!(matches!(
        gen.set_deletion_table([27]),
        Err(SpongeError::DeletionIndexOutOfRange { index: 27 })
    ));
    assert!(matches!(
        gen.set_deletion_table([-1]),
        Err(SpongeError::DeletionIndexOutOfRange { index: -1 })
    ));
    assert!(gen.deletion_table().is_empty());
}

/// Test: negative depth fails before any work or export.
#[test]
fn test_negative_depth_rejected() {
    let mut gen = generator();
    assert!(matches!(gen.output(-1, "x"), Err(SpongeError::InvalidDepth(-1))));
    assert!(matches!(gen.inverse_output(-1, "x"), Err(SpongeError::InvalidDepth(-1))));
    assert_eq!(gen.rebuilds(), 0);
    assert!(gen.exporter().exports.is_empty());
}

/// Test: centre-only deletion, depth 1 and depth 2 structure.
#[test]
fn test_centre_deletion_structure() {
    let mut gen = generator();
    gen.set_deletion_table([13]).unwrap();

    let level1 = gen.output(1, "c1").unwrap().clone();
    assert_eq!(level1, gen.base_pattern().to_grid());
    assert_eq!(level1.occupied_count(), 26);
    assert!(!level1.is_occupied(1, 1, 1));

    let level2 = gen.output(2, "c2").unwrap().clone();
    assert_eq!(level2.len(), 729);

    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                let kept = (i, j, k) != (1, 1, 1);
                for x in 0..3 {
                    for y in 0..3 {
                        for z in 0..3 {
                            let v = level2.get(i * 3 + x, j * 3 + y, k * 3 + z);
                            let expected = if kept { level1.get(x, y, z) } else { 0 };
                            assert_eq!(v, expected, "block ({i}, {j}, {k}) cell ({x}, {y}, {z})");
                        }
                    }
                }
            }
        }
    }
}

/// Test: inverse writes exactly one file, and it holds the inverse.
#[test]
fn test_inverse_exports_once() {
    let mut gen = generator().with_table(DeletionTable::menger());
    let inverse = gen.inverse_output(2, "holes").unwrap();

    let exports = &gen.exporter().exports;
    assert_eq!(exports.len(), 1);
    assert_eq!(exports[0].0, PathBuf::from("holes"));
    assert_eq!(exports[0].1, inverse);
    assert_eq!(inverse.occupied_count(), 729 - 400);
}

/// Test: a failed inverse export still hands back the computed inverse.
#[test]
fn test_inverse_kept_after_export_failure() {
    let mut gen = SpongeGenerator::with_exporter(FailingExporter).with_table(DeletionTable::menger());

    let err = gen.inverse_output(2, "holes").unwrap_err();
    assert!(matches!(&err, SpongeError::Export { source: VoxError::Io(_), .. }));

    let inverse = err.grid().cloned().unwrap();
    assert_eq!(inverse.occupied_count(), 729 - 400);
    assert!(inverse.is_occupied(4, 4, 4));
    assert_eq!(inverse, gen.inverse_grid(2).unwrap());

    // The forward grid is still memoized alongside.
    let (depth, forward) = gen.last_output().unwrap();
    assert_eq!(depth.get(), 2);
    assert_eq!(forward.occupied_count(), 400);
    assert_eq!(gen.rebuilds(), 1);
}
