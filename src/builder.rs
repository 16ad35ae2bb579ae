//! Builder for dividing an image into named block files

use crate::BLOCK_HEADER_SIZE;
use crate::block_header::{BlockHeader, VERSION_FIELD_SIZE};
use crate::error::{DivImageError, Result};
use crate::splitter::{payload_capacity, split_payloads};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Maximum number of blocks addressable by the 1-byte block number
pub const MAX_BLOCKS: usize = u8::MAX as usize;

/// Maximum image size addressable by the 4-byte payload offset
pub const MAX_IMAGE_SIZE: u64 = u32::MAX as u64;

/// One output block: file name, header and payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockFile {
    /// Output file name, `{version}_{number}of{total}`
    pub file_name: String,
    /// Header prepended to the payload
    pub header: BlockHeader,
    /// Raw image bytes belonging to this block
    pub payload: Vec<u8>,
}

impl BlockFile {
    /// Serialize the header followed by the payload
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(BLOCK_HEADER_SIZE + self.payload.len());
        self.header.write_to(&mut bytes)?;
        bytes.write_all(&self.payload)?;
        Ok(bytes)
    }

    /// Parse a block file back into header and payload
    pub fn parse(file_name: impl Into<String>, data: &[u8]) -> Result<Self> {
        let header = BlockHeader::from_bytes(data)?;
        Ok(Self {
            file_name: file_name.into(),
            header,
            payload: data[BLOCK_HEADER_SIZE..].to_vec(),
        })
    }
}

/// Builder dividing an application image into block files
///
/// This struct provides a fluent interface for configuring and dividing
/// an image. `build` is a pure function of the configured data, version
/// string and maximum block size; `write_to_dir` performs the filesystem
/// writes at the boundary.
#[derive(Debug, Clone, Default)]
pub struct SplitBuilder {
    version: String,
    max_block_size: usize,
    data: Vec<u8>,
}

impl SplitBuilder {
    /// Create a new builder with empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application version string
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the maximum block size in kilobytes
    ///
    /// The kilobyte count is multiplied by 1000, not 1024.
    pub fn max_block_size_kb(mut self, kb: usize) -> Self {
        self.max_block_size = kb * 1000;
        self
    }

    /// Set the maximum block size in bytes
    pub fn max_block_size_bytes(mut self, bytes: usize) -> Self {
        self.max_block_size = bytes;
        self
    }

    /// Set the image data
    pub fn data(mut self, data: &[u8]) -> Self {
        self.data = data.to_vec();
        self
    }

    /// Set the image data from a file
    pub fn data_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.data = fs::read(path)?;
        Ok(self)
    }

    /// Get the configured image data
    pub fn get_data(&self) -> &[u8] {
        &self.data
    }

    /// Number of blocks the current configuration will produce
    pub fn block_count(&self) -> Result<usize> {
        let capacity = payload_capacity(self.max_block_size)?;
        Ok(self.data.len().div_ceil(capacity))
    }

    /// Validate the current configuration
    ///
    /// Checks that the block size leaves payload room, the version string
    /// fits the header field, the image fits the 4-byte offset field and
    /// the block count fits the 1-byte block number.
    pub fn validate(&self) -> Result<()> {
        if self.version.len() > VERSION_FIELD_SIZE {
            return Err(DivImageError::VersionTooLong {
                len: self.version.len(),
                max: VERSION_FIELD_SIZE,
            });
        }

        if self.data.len() as u64 > MAX_IMAGE_SIZE {
            return Err(DivImageError::ImageTooLarge {
                size: self.data.len() as u64,
                max: MAX_IMAGE_SIZE,
            });
        }

        let total = self.block_count()?;
        if total > MAX_BLOCKS {
            return Err(DivImageError::TooManyBlocks {
                count: total,
                max: MAX_BLOCKS,
            });
        }

        Ok(())
    }

    /// Divide the image into block files
    ///
    /// Blocks are numbered from 1 and only the final block carries the
    /// last-block flag. Each header records the cumulative payload offset
    /// before its own payload; header bytes are never counted.
    pub fn build(&self) -> Result<Vec<BlockFile>> {
        self.validate()?;

        let payloads = split_payloads(&self.data, self.max_block_size)?;
        let total = payloads.len();

        let mut offset = 0u32;
        let mut blocks = Vec::with_capacity(total);
        for (i, payload) in payloads.iter().enumerate() {
            let number = (i + 1) as u8;
            let header = BlockHeader::new(number, i == total - 1, offset, &self.version);

            offset += payload.len() as u32;

            blocks.push(BlockFile {
                file_name: format!("{}_{}of{}", self.version, number, total),
                header,
                payload: payload.to_vec(),
            });
        }

        Ok(blocks)
    }

    /// Divide the image and write one file per block into a directory
    ///
    /// The directory must already exist. A failure partway through leaves
    /// the blocks written so far in place; there is no rollback.
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let blocks = self.build()?;

        let mut paths = Vec::with_capacity(blocks.len());
        for block in &blocks {
            let path = dir.as_ref().join(&block.file_name);
            fs::write(&path, block.to_bytes()?)?;
            paths.push(path);
        }

        Ok(paths)
    }
}
