//! Splitting an image into block payloads

use crate::BLOCK_HEADER_SIZE;
use crate::error::{DivImageError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Payload capacity of one block for the given maximum block size
///
/// Fails if the maximum block size does not leave room for any payload
/// after the fixed header.
pub fn payload_capacity(max_block_size: usize) -> Result<usize> {
    if max_block_size <= BLOCK_HEADER_SIZE {
        return Err(DivImageError::BlockSizeTooSmall {
            size: max_block_size,
            header: BLOCK_HEADER_SIZE,
        });
    }
    Ok(max_block_size - BLOCK_HEADER_SIZE)
}

/// Split image bytes into ordered block payloads
///
/// Every payload except possibly the last has length exactly
/// `max_block_size - BLOCK_HEADER_SIZE`; the last holds whatever remains.
/// An image whose size is an exact multiple of the capacity produces no
/// empty trailing payload, and an empty image produces no payloads.
pub fn split_payloads(data: &[u8], max_block_size: usize) -> Result<Vec<&[u8]>> {
    let capacity = payload_capacity(max_block_size)?;
    Ok(data.chunks(capacity).collect())
}

/// Read an image file and split its bytes into block payloads
pub fn split_file<P: AsRef<Path>>(path: P, max_block_size: usize) -> Result<Vec<Vec<u8>>> {
    let capacity = payload_capacity(max_block_size)?;
    let mut file = File::open(path)?;

    let mut blocks = Vec::new();
    loop {
        let mut block = vec![0u8; capacity];
        let mut filled = 0;
        while filled < capacity {
            let n = file.read(&mut block[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled == 0 {
            break;
        }

        block.truncate(filled);
        blocks.push(block);

        // A short block means end of file
        if filled < capacity {
            break;
        }
    }

    Ok(blocks)
}
