//! # VOX Error Types

use std::io;

use thiserror::Error;

/// Errors raised while reading or writing `.vox` files.
#[derive(Error, Debug)]
pub enum VoxError {
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Invalid VOX file format.
    #[error("invalid VOX format: {0}")]
    InvalidFormat(String),

    /// Unsupported VOX version.
    #[error("unsupported VOX version: {0}")]
    UnsupportedVersion(u32),

    /// Missing required chunk.
    #[error("missing required chunk: {0}")]
    MissingChunk(&'static str),

    /// Invalid chunk data.
    #[error("invalid chunk: {0}")]
    InvalidChunk(String),

    /// Grid side exceeds what a single VOX model can address.
    #[error("model side {side} exceeds the VOX limit of {max}")]
    ModelTooLarge {
        /// Requested side length.
        side: usize,
        /// Largest side the format accepts.
        max: usize,
    },
}

/// Result type for VOX operations.
pub type VoxResult<T> = Result<T, VoxError>;
