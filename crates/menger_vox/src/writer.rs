//! MagicaVoxel VOX File Writer
//!
//! Encodes a [`VoxelGrid`] plus [`Palette`] as a single-model `.vox` file.
//!
//! ## Layout Written
//!
//! ```text
//! "VOX " | 150
//! MAIN (0 content bytes, children below)
//! ├── SIZE  x, y, z            (3 × u32)
//! ├── XYZI  count, records     (u32 + count × [x, y, z, index])
//! └── RGBA  palette            (256 × [r, g, b, a])
//! ```
//!
//! RGBA entry `i` in the file is palette index `i + 1`; the final entry is
//! unused and written as zeros.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};
use menger_core::{Palette, VoxelGrid, PALETTE_SIZE};

use crate::error::{VoxError, VoxResult};
use crate::exporter::{with_vox_extension, VoxelExporter};
use crate::{MAX_MODEL_SIDE, VOX_MAGIC, VOX_VERSION};

/// Size of a chunk header (id, content size, children size).
const CHUNK_HEADER_SIZE: usize = 12;

/// One voxel record as stored in the XYZI chunk.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct VoxVoxel {
    /// X position.
    pub x: u8,
    /// Y position.
    pub y: u8,
    /// Z position.
    pub z: u8,
    /// Color index (palette reference).
    pub color_index: u8,
}

/// Writes grids as `.vox` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoxWriter;

impl VoxWriter {
    /// Creates a writer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Encodes a grid and palette into VOX bytes.
    ///
    /// # Errors
    ///
    /// Returns [`VoxError::ModelTooLarge`] if the grid side exceeds 256.
    pub fn encode(grid: &VoxelGrid, palette: &Palette) -> VoxResult<Vec<u8>> {
        let side = grid.side();
        if side > MAX_MODEL_SIDE {
            return Err(VoxError::ModelTooLarge {
                side,
                max: MAX_MODEL_SIDE,
            });
        }

        // Bounds checked above, so every coordinate fits in a byte.
        let voxels: Vec<VoxVoxel> = grid
            .occupied()
            .map(|([x, y, z], color_index)| VoxVoxel {
                x: x as u8,
                y: y as u8,
                z: z as u8,
                color_index,
            })
            .collect();

        let size_content = 12;
        let xyzi_content = 4 + voxels.len() * 4;
        let rgba_content = PALETTE_SIZE * 4;
        let children = (CHUNK_HEADER_SIZE + size_content)
            + (CHUNK_HEADER_SIZE + xyzi_content)
            + (CHUNK_HEADER_SIZE + rgba_content);

        let mut buf = Vec::with_capacity(8 + CHUNK_HEADER_SIZE + children);
        buf.extend_from_slice(&VOX_MAGIC);
        put_u32(&mut buf, VOX_VERSION);

        put_chunk_header(&mut buf, *b"MAIN", 0, children)?;

        put_chunk_header(&mut buf, *b"SIZE", size_content, 0)?;
        for _ in 0..3 {
            put_len(&mut buf, side)?;
        }

        put_chunk_header(&mut buf, *b"XYZI", xyzi_content, 0)?;
        put_len(&mut buf, voxels.len())?;
        buf.extend_from_slice(bytemuck::cast_slice(&voxels));

        put_chunk_header(&mut buf, *b"RGBA", rgba_content, 0)?;
        // Skip the empty slot: file entry i is palette index i + 1.
        buf.extend_from_slice(&palette.as_bytes()[4..]);
        buf.extend_from_slice(&[0u8; 4]);

        Ok(buf)
    }

    /// Encodes and writes a grid to `path`.
    ///
    /// # Errors
    ///
    /// Returns error if the grid cannot be encoded or the file cannot be written.
    pub fn write(grid: &VoxelGrid, palette: &Palette, path: &Path) -> VoxResult<()> {
        let bytes = Self::encode(grid, palette)?;

        let mut file = File::create(path)?;
        file.write_all(&bytes)?;

        tracing::debug!(
            "Wrote {} ({} bytes, side {}, {} voxels)",
            path.display(),
            bytes.len(),
            grid.side(),
            grid.occupied_count()
        );
        Ok(())
    }
}

impl VoxelExporter for VoxWriter {
    fn export(&mut self, grid: &VoxelGrid, palette: &Palette, path: &Path) -> VoxResult<PathBuf> {
        let path = with_vox_extension(path);
        Self::write(grid, palette, &path)?;
        Ok(path)
    }
}

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn put_len(buf: &mut Vec<u8>, value: usize) -> VoxResult<()> {
    let value = u32::try_from(value)
        .map_err(|_| VoxError::InvalidChunk(format!("length {value} does not fit in u32")))?;
    put_u32(buf, value);
    Ok(())
}

fn put_chunk_header(buf: &mut Vec<u8>, id: [u8; 4], content: usize, children: usize) -> VoxResult<()> {
    buf.extend_from_slice(&id);
    put_len(buf, content)?;
    put_len(buf, children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_header() {
        let bytes = VoxWriter::encode(&VoxelGrid::unit(), &Palette::default()).unwrap();
        assert_eq!(&bytes[0..4], b"VOX ");
        assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 150);
        assert_eq!(&bytes[8..12], b"MAIN");
        // Header + MAIN header + SIZE + XYZI with one voxel + RGBA
        assert_eq!(bytes.len(), 8 + 12 + (12 + 12) + (12 + 8) + (12 + 1024));
    }

    #[test]
    fn test_encode_voxel_record() {
        let mut grid = VoxelGrid::empty(3);
        grid.set(2, 0, 1, 5);
        let bytes = VoxWriter::encode(&grid, &Palette::default()).unwrap();

        // XYZI starts after magic, version, MAIN header and SIZE chunk
        let xyzi = 8 + 12 + 24;
        assert_eq!(&bytes[xyzi..xyzi + 4], b"XYZI");
        assert_eq!(&bytes[xyzi + 12..xyzi + 16], &1u32.to_le_bytes());
        assert_eq!(&bytes[xyzi + 16..xyzi + 20], &[2, 0, 1, 5]);
    }

    #[test]
    fn test_encode_rejects_oversized() {
        let grid = VoxelGrid::empty(257);
        let err = VoxWriter::encode(&grid, &Palette::default()).unwrap_err();
        assert!(matches!(err, VoxError::ModelTooLarge { side: 257, max: 256 }));
    }

    #[test]
    fn test_encode_empty_grid() {
        let bytes = VoxWriter::encode(&VoxelGrid::empty(3), &Palette::default()).unwrap();
        let xyzi = 8 + 12 + 24;
        assert_eq!(&bytes[xyzi + 12..xyzi + 16], &0u32.to_le_bytes());
    }
}
