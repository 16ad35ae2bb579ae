//! # divimage
//!
//! Divides an application image into fixed-size blocks for transfer over a
//! constrained channel such as a bootloader update link.
//!
//! Each block is prefixed with a fixed 42-byte header carrying a magic
//! number, the 1-indexed block number, a last-block flag, the cumulative
//! payload offset within the image and the application version string.
//! Concatenating the payloads of all blocks in ascending block order
//! reproduces the original image byte for byte.
//!
//! ## Example
//!
//! ```rust
//! use divimage::SplitBuilder;
//!
//! let image = vec![0xA5u8; 2500];
//! let blocks = SplitBuilder::new()
//!     .version("1.2.3")
//!     .max_block_size_kb(1)
//!     .data(&image)
//!     .build()?;
//!
//! assert_eq!(blocks.len(), 3);
//! assert_eq!(blocks[0].file_name, "1.2.3_1of3");
//! # Ok::<(), divimage::DivImageError>(())
//! ```

pub mod block_header;
pub mod builder;
pub mod cli;
pub mod error;
pub mod splitter;

// Re-export main types for convenience
pub use block_header::BlockHeader;
pub use builder::{BlockFile, SplitBuilder};
pub use error::{DivImageError, Result};

/// Current version of the divimage implementation
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Magic number identifying a block header
pub const BLOCK_MAGIC: u32 = 0x424a_d2dc;

/// Size of the fixed block header in bytes
pub const BLOCK_HEADER_SIZE: usize = 42;
