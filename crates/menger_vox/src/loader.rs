//! MagicaVoxel VOX File Loader
//!
//! Parser for the RIFF-style `.vox` format produced by [`VoxWriter`].
//! Used to verify exported sponges and by the CLI's `--verify` flag.
//!
//! Unknown chunks are skipped, so files saved back from MagicaVoxel (which
//! adds `nTRN`, `MATL` and friends) still load.
//!
//! [`VoxWriter`]: crate::VoxWriter

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use menger_core::{Palette, Rgba, VoxelGrid};

use crate::error::{VoxError, VoxResult};
use crate::writer::VoxVoxel;
use crate::{MAX_MODEL_SIDE, VOX_MAGIC};

/// Content size of a SIZE chunk (three u32).
const SIZE_CONTENT: u32 = 12;

/// Content size of an RGBA chunk (256 entries).
const RGBA_CONTENT: u32 = 1024;

/// Parsed VOX file (first model only).
#[derive(Debug, Clone)]
pub struct VoxFile {
    /// Model width (X).
    pub size_x: u32,
    /// Model height (Y).
    pub size_y: u32,
    /// Model depth (Z).
    pub size_z: u32,
    /// All voxels.
    pub voxels: Vec<VoxVoxel>,
    /// Color palette.
    pub palette: Palette,
}

impl VoxFile {
    /// Returns the number of voxels.
    #[inline]
    #[must_use]
    pub fn voxel_count(&self) -> usize {
        self.voxels.len()
    }

    /// Rebuilds a cubic grid from the voxel records.
    ///
    /// # Errors
    ///
    /// Returns error if the model is not a cube, is larger than
    /// [`MAX_MODEL_SIDE`], or a voxel lies outside it.
    pub fn to_grid(&self) -> VoxResult<VoxelGrid> {
        if self.size_x != self.size_y || self.size_y != self.size_z {
            return Err(VoxError::InvalidChunk(format!(
                "model is {}x{}x{}, expected a cube",
                self.size_x, self.size_y, self.size_z
            )));
        }

        let side = usize::try_from(self.size_x)
            .ok()
            .filter(|&side| side <= MAX_MODEL_SIDE)
            .ok_or_else(|| {
                VoxError::InvalidChunk(format!(
                    "model side {} exceeds the VOX limit of {MAX_MODEL_SIDE}",
                    self.size_x
                ))
            })?;
        let mut grid = VoxelGrid::empty(side);
        for v in &self.voxels {
            let (x, y, z) = (v.x as usize, v.y as usize, v.z as usize);
            if x >= side || y >= side || z >= side {
                return Err(VoxError::InvalidChunk(format!(
                    "voxel ({x}, {y}, {z}) outside model of side {side}"
                )));
            }
            grid.set(x, y, z, v.color_index);
        }
        Ok(grid)
    }
}

/// VOX file loader.
pub struct VoxLoader;

impl VoxLoader {
    /// Loads a VOX file from disk.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or has invalid format.
    pub fn load<P: AsRef<Path>>(path: P) -> VoxResult<VoxFile> {
        let file = File::open(path.as_ref())?;
        let mut reader = io::BufReader::new(file);

        Self::parse(&mut reader)
    }

    /// Loads a VOX file from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns error if data has invalid format.
    pub fn load_from_bytes(data: &[u8]) -> VoxResult<VoxFile> {
        let mut cursor = io::Cursor::new(data);
        Self::parse(&mut cursor)
    }

    /// Parses VOX data from a reader.
    fn parse<R: Read + Seek>(reader: &mut R) -> VoxResult<VoxFile> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;

        if magic != VOX_MAGIC {
            return Err(VoxError::InvalidFormat(format!(
                "Expected 'VOX ', got '{}'",
                String::from_utf8_lossy(&magic)
            )));
        }

        // 150 is what we write; MagicaVoxel itself writes up to 200.
        let version = Self::read_u32(reader)?;
        if !(150..=200).contains(&version) {
            return Err(VoxError::UnsupportedVersion(version));
        }

        let main_id = Self::read_chunk_id(reader)?;
        if main_id != *b"MAIN" {
            return Err(VoxError::InvalidFormat("Expected MAIN chunk".to_string()));
        }

        let main_content_size = Self::read_u32(reader)?;
        let main_children_size = Self::read_u32(reader)?;
        reader.seek(SeekFrom::Current(i64::from(main_content_size)))?;

        let mut size = None;
        let mut voxels = None;
        let mut palette = Palette::default();

        let end_pos = reader.stream_position()? + u64::from(main_children_size);

        while reader.stream_position()? < end_pos {
            let chunk_id = Self::read_chunk_id(reader)?;
            let content_size = Self::read_u32(reader)?;
            let children_size = Self::read_u32(reader)?;

            match &chunk_id {
                // Only the first model is kept.
                b"SIZE" if size.is_none() => {
                    if content_size != SIZE_CONTENT {
                        return Err(VoxError::InvalidChunk(format!(
                            "SIZE chunk holds {content_size} bytes, expected {SIZE_CONTENT}"
                        )));
                    }
                    size = Some((
                        Self::read_u32(reader)?,
                        Self::read_u32(reader)?,
                        Self::read_u32(reader)?,
                    ));
                    reader.seek(SeekFrom::Current(i64::from(children_size)))?;
                }
                b"XYZI" if voxels.is_none() => {
                    if content_size < 4 {
                        return Err(VoxError::InvalidChunk("XYZI chunk too short".to_string()));
                    }
                    let num_voxels = Self::read_u32(reader)?;
                    // Checked before allocating: the count comes from the file.
                    if u64::from(content_size) != 4 + u64::from(num_voxels) * 4 {
                        return Err(VoxError::InvalidChunk(format!(
                            "XYZI chunk holds {content_size} bytes for {num_voxels} voxels"
                        )));
                    }
                    let len = u64::from(content_size) - 4;
                    if reader.stream_position()? + len > end_pos {
                        return Err(VoxError::InvalidChunk(
                            "XYZI chunk runs past MAIN".to_string(),
                        ));
                    }
                    let len = usize::try_from(len)
                        .map_err(|_| VoxError::InvalidChunk("XYZI chunk too large".to_string()))?;
                    let mut raw = vec![0u8; len];
                    reader.read_exact(&mut raw)?;
                    voxels = Some(
                        raw.chunks_exact(4)
                            .map(|c| VoxVoxel {
                                x: c[0],
                                y: c[1],
                                z: c[2],
                                color_index: c[3],
                            })
                            .collect::<Vec<_>>(),
                    );
                    reader.seek(SeekFrom::Current(i64::from(children_size)))?;
                }
                b"RGBA" => {
                    if content_size != RGBA_CONTENT {
                        return Err(VoxError::InvalidChunk(format!(
                            "RGBA chunk holds {content_size} bytes, expected {RGBA_CONTENT}"
                        )));
                    }
                    for i in 1..=255u8 {
                        let mut c = [0u8; 4];
                        reader.read_exact(&mut c)?;
                        palette.set(i, Rgba { r: c[0], g: c[1], b: c[2], a: c[3] });
                    }
                    // Skip the last entry
                    let _ = Self::read_u32(reader)?;
                    reader.seek(SeekFrom::Current(i64::from(children_size)))?;
                }
                _ => {
                    let skip = i64::from(content_size) + i64::from(children_size);
                    reader.seek(SeekFrom::Current(skip))?;
                }
            }
        }

        let (size_x, size_y, size_z) = size.ok_or(VoxError::MissingChunk("SIZE"))?;
        if size_x == 0 || size_y == 0 || size_z == 0 {
            return Err(VoxError::InvalidChunk("zero-sized model".to_string()));
        }
        let voxels = voxels.ok_or(VoxError::MissingChunk("XYZI"))?;

        Ok(VoxFile {
            size_x,
            size_y,
            size_z,
            voxels,
            palette,
        })
    }

    /// Reads a little-endian u32.
    fn read_u32<R: Read>(reader: &mut R) -> VoxResult<u32> {
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Reads a 4-byte chunk ID.
    fn read_chunk_id<R: Read>(reader: &mut R) -> VoxResult<[u8; 4]> {
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VoxWriter;

    #[test]
    fn test_load_from_bytes_invalid() {
        let result = VoxLoader::load_from_bytes(b"invalid data");
        assert!(matches!(result, Err(VoxError::InvalidFormat(_))));
    }

    #[test]
    fn test_unsupported_version() {
        let mut bytes = b"VOX ".to_vec();
        bytes.extend_from_slice(&99u32.to_le_bytes());
        let result = VoxLoader::load_from_bytes(&bytes);
        assert!(matches!(result, Err(VoxError::UnsupportedVersion(99))));
    }

    #[test]
    fn test_missing_size_chunk() {
        let mut bytes = b"VOX ".to_vec();
        bytes.extend_from_slice(&150u32.to_le_bytes());
        bytes.extend_from_slice(b"MAIN");
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let result = VoxLoader::load_from_bytes(&bytes);
        assert!(matches!(result, Err(VoxError::MissingChunk("SIZE"))));
    }

    #[test]
    fn test_unknown_chunk_skipped() {
        let mut grid = VoxelGrid::empty(2);
        grid.set(1, 1, 0, 1);
        let bytes = VoxWriter::encode(&grid, &Palette::default()).unwrap();

        // Put a foreign chunk in front of SIZE and grow MAIN's children size.
        let mut extra = b"nTRN".to_vec();
        extra.extend_from_slice(&4u32.to_le_bytes());
        extra.extend_from_slice(&0u32.to_le_bytes());
        extra.extend_from_slice(&[9, 9, 9, 9]);

        let children = u32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        let grown = children + u32::try_from(extra.len()).unwrap();

        let mut patched = bytes[..16].to_vec();
        patched.extend_from_slice(&grown.to_le_bytes());
        patched.extend_from_slice(&extra);
        patched.extend_from_slice(&bytes[20..]);

        let file = VoxLoader::load_from_bytes(&patched).unwrap();
        assert_eq!(file.to_grid().unwrap(), grid);
    }

    /// Builds a VOX file from raw `(id, content)` chunks under MAIN.
    fn vox_bytes(chunks: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
        let mut children = Vec::new();
        for (id, content) in chunks {
            children.extend_from_slice(*id);
            children.extend_from_slice(&u32::try_from(content.len()).unwrap().to_le_bytes());
            children.extend_from_slice(&0u32.to_le_bytes());
            children.extend_from_slice(content);
        }

        let mut bytes = b"VOX ".to_vec();
        bytes.extend_from_slice(&150u32.to_le_bytes());
        bytes.extend_from_slice(b"MAIN");
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&u32::try_from(children.len()).unwrap().to_le_bytes());
        bytes.extend_from_slice(&children);
        bytes
    }

    fn size_content(side: u32) -> Vec<u8> {
        [side; 3].iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn xyzi_content(voxels: &[[u8; 4]]) -> Vec<u8> {
        let mut content = u32::try_from(voxels.len()).unwrap().to_le_bytes().to_vec();
        content.extend(voxels.iter().flatten());
        content
    }

    #[test]
    fn test_short_rgba_chunk_rejected() {
        let bytes = vox_bytes(&[
            (b"SIZE", size_content(2)),
            (b"XYZI", xyzi_content(&[[0, 0, 0, 1]])),
            (b"RGBA", vec![255; 16]),
        ]);
        let result = VoxLoader::load_from_bytes(&bytes);
        assert!(matches!(result, Err(VoxError::InvalidChunk(_))));
    }

    #[test]
    fn test_rgba_before_size_keeps_alignment() {
        let mut palette = vec![0u8; 1024];
        palette[..4].copy_from_slice(&[1, 2, 3, 255]);
        let bytes = vox_bytes(&[
            (b"RGBA", palette),
            (b"SIZE", size_content(2)),
            (b"XYZI", xyzi_content(&[[1, 0, 1, 1]])),
        ]);

        let file = VoxLoader::load_from_bytes(&bytes).unwrap();
        assert_eq!(file.palette.get(1), Rgba::opaque(1, 2, 3));
        assert_eq!(file.voxel_count(), 1);
    }

    #[test]
    fn test_voxel_count_larger_than_chunk_rejected() {
        let mut content = 1_000_000u32.to_le_bytes().to_vec();
        content.extend_from_slice(&[0, 0, 0, 1]);
        let bytes = vox_bytes(&[(b"SIZE", size_content(2)), (b"XYZI", content)]);

        let result = VoxLoader::load_from_bytes(&bytes);
        assert!(matches!(result, Err(VoxError::InvalidChunk(_))));
    }

    #[test]
    fn test_oversized_model_side_rejected() {
        let bytes = vox_bytes(&[
            (b"SIZE", size_content(3_000_000)),
            (b"XYZI", xyzi_content(&[[0, 0, 0, 1]])),
        ]);

        let file = VoxLoader::load_from_bytes(&bytes).unwrap();
        assert!(matches!(file.to_grid(), Err(VoxError::InvalidChunk(_))));
    }

    #[test]
    fn test_largest_side_converts() {
        let bytes = vox_bytes(&[
            (b"SIZE", size_content(256)),
            (b"XYZI", xyzi_content(&[[255, 255, 255, 1]])),
        ]);

        let grid = VoxLoader::load_from_bytes(&bytes).unwrap().to_grid().unwrap();
        assert_eq!(grid.side(), 256);
        assert!(grid.is_occupied(255, 255, 255));
    }

    #[test]
    fn test_non_cubic_rejected() {
        let file = VoxFile {
            size_x: 2,
            size_y: 3,
            size_z: 2,
            voxels: Vec::new(),
            palette: Palette::default(),
        };
        assert!(file.to_grid().is_err());
    }
}
