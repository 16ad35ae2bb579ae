//! Error types for divimage

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, DivImageError>;

/// Errors produced while dividing an image or encoding block headers
#[derive(Error, Debug)]
pub enum DivImageError {
    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Header magic number mismatch
    #[error("invalid magic number: expected 0x{expected:08x}, got 0x{actual:08x}")]
    InvalidMagic { expected: u32, actual: u32 },

    /// Version string does not fit the fixed-width header field
    #[error("version string too long: {len} bytes (maximum {max})")]
    VersionTooLong { len: usize, max: usize },

    /// Image would produce more blocks than the header can number
    #[error("image requires {count} blocks, but at most {max} are supported")]
    TooManyBlocks { count: usize, max: usize },

    /// Image too large for the 4-byte offset field
    #[error("image size {size} bytes exceeds the maximum of {max}")]
    ImageTooLarge { size: u64, max: u64 },

    /// Maximum block size leaves no room for payload after the header
    #[error("maximum block size {size} bytes must be larger than the {header}-byte header")]
    BlockSizeTooSmall { size: usize, header: usize },

    /// Malformed block data
    #[error("invalid block data: {0}")]
    InvalidBlockData(String),
}

impl DivImageError {
    /// Create an InvalidMagic error
    pub fn invalid_magic(expected: u32, actual: u32) -> Self {
        Self::InvalidMagic { expected, actual }
    }

    /// Create an InvalidBlockData error
    pub fn invalid_block_data(msg: impl Into<String>) -> Self {
        Self::InvalidBlockData(msg.into())
    }
}
