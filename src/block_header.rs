//! Block header structure and serialization

use crate::error::{DivImageError, Result};
use crate::{BLOCK_HEADER_SIZE, BLOCK_MAGIC};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Width of the version string field in the header
pub const VERSION_FIELD_SIZE: usize = 32;

/// Fixed header prepended to every block
///
/// Layout, little-endian with no padding between fields: 4-byte magic,
/// 1-byte block number, 1-byte last-block flag, 4-byte payload offset,
/// 32-byte version string field. 42 bytes total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    /// Magic number (must be BLOCK_MAGIC)
    pub magic: u32,
    /// Block sequence number, starting at 1
    pub number: u8,
    /// Set only on the final block of the image
    pub is_last: bool,
    /// Payload offset of this block within the image, header bytes excluded
    pub offset: u32,
    /// Application version string
    pub version: String,
}

impl BlockHeader {
    /// Create a header for one block
    pub fn new(number: u8, is_last: bool, offset: u32, version: impl Into<String>) -> Self {
        Self {
            magic: BLOCK_MAGIC,
            number,
            is_last,
            offset,
            version: version.into(),
        }
    }

    /// Validate the header
    ///
    /// Checks the magic number and that the version string fits the
    /// fixed-width field. Over-long version strings are rejected rather
    /// than truncated.
    pub fn validate(&self) -> Result<()> {
        if self.magic != BLOCK_MAGIC {
            return Err(DivImageError::invalid_magic(BLOCK_MAGIC, self.magic));
        }

        if self.version.len() > VERSION_FIELD_SIZE {
            return Err(DivImageError::VersionTooLong {
                len: self.version.len(),
                max: VERSION_FIELD_SIZE,
            });
        }

        Ok(())
    }

    /// Serialize the header to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(BLOCK_HEADER_SIZE);
        self.write_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Write the header to a writer
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.validate()?;

        writer.write_u32::<LittleEndian>(self.magic)?;
        writer.write_u8(self.number)?;
        writer.write_u8(self.is_last as u8)?;
        writer.write_u32::<LittleEndian>(self.offset)?;

        // Version string, zero-padded to the fixed field width
        let version_bytes = self.version.as_bytes();
        writer.write_all(version_bytes)?;

        let padding_len = VERSION_FIELD_SIZE - version_bytes.len();
        if padding_len > 0 {
            writer.write_all(&vec![0u8; padding_len])?;
        }

        Ok(())
    }

    /// Deserialize a header from bytes
    ///
    /// The version field is trimmed at its first zero byte.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < BLOCK_HEADER_SIZE {
            return Err(DivImageError::invalid_block_data(format!(
                "header data too short: {} bytes (expected at least {})",
                data.len(),
                BLOCK_HEADER_SIZE
            )));
        }

        let mut cursor = std::io::Cursor::new(data);

        let magic = cursor.read_u32::<LittleEndian>()?;
        let number = cursor.read_u8()?;
        let is_last = cursor.read_u8()? != 0;
        let offset = cursor.read_u32::<LittleEndian>()?;

        let mut version_bytes = vec![0u8; VERSION_FIELD_SIZE];
        cursor.read_exact(&mut version_bytes)?;

        let version_len = version_bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(VERSION_FIELD_SIZE);
        let version = String::from_utf8_lossy(&version_bytes[..version_len]).into_owned();

        let header = Self {
            magic,
            number,
            is_last,
            offset,
            version,
        };

        header.validate()?;
        Ok(header)
    }

    /// Read a header from a reader
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut header_data = vec![0u8; BLOCK_HEADER_SIZE];
        reader.read_exact(&mut header_data)?;
        Self::from_bytes(&header_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_new() {
        let header = BlockHeader::new(1, false, 0, "1.0.0");
        assert_eq!(header.magic, BLOCK_MAGIC);
        assert_eq!(header.number, 1);
        assert!(!header.is_last);
        assert_eq!(header.offset, 0);
        assert_eq!(header.version, "1.0.0");
        assert!(header.validate().is_ok());
    }

    #[test]
    fn test_header_serialization() {
        let header = BlockHeader::new(3, true, 2000, "2.4.1");

        let bytes = header.to_bytes().unwrap();
        assert_eq!(bytes.len(), BLOCK_HEADER_SIZE);

        let parsed = BlockHeader::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_header_field_layout() {
        let header = BlockHeader::new(2, true, 0x01020304, "v1");
        let bytes = header.to_bytes().unwrap();

        assert_eq!(&bytes[0..4], &[0xdc, 0xd2, 0x4a, 0x42]);
        assert_eq!(bytes[4], 2);
        assert_eq!(bytes[5], 1);
        assert_eq!(&bytes[6..10], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[10..12], b"v1");
        assert!(bytes[12..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_header_version_exactly_field_width() {
        let version = "A".repeat(VERSION_FIELD_SIZE);
        let header = BlockHeader::new(1, true, 0, version.clone());
        assert!(header.validate().is_ok());

        let bytes = header.to_bytes().unwrap();
        assert_eq!(bytes.len(), BLOCK_HEADER_SIZE);
        assert_eq!(&bytes[10..42], version.as_bytes());
    }

    #[test]
    fn test_header_version_too_long() {
        let version = "A".repeat(VERSION_FIELD_SIZE + 1);
        let header = BlockHeader::new(1, true, 0, version);

        assert!(matches!(
            header.validate(),
            Err(DivImageError::VersionTooLong { len: 33, max: 32 })
        ));
        // Encoding is refused as well, nothing is silently truncated
        assert!(header.to_bytes().is_err());
    }

    #[test]
    fn test_header_version_multibyte_length_is_in_bytes() {
        // 11 chars, 33 UTF-8 bytes
        let version = "\u{20ac}".repeat(11);
        assert_eq!(version.len(), 33);

        let header = BlockHeader::new(1, true, 0, version);
        assert!(header.validate().is_err());
    }

    #[test]
    fn test_header_invalid_magic() {
        let mut header = BlockHeader::new(1, true, 0, "1.0.0");
        header.magic = 0x12345678;
        assert!(header.validate().is_err());

        let bytes = BlockHeader::new(1, true, 0, "1.0.0").to_bytes().unwrap();
        let mut corrupted = bytes.clone();
        corrupted[0] ^= 0xFF;
        assert!(BlockHeader::from_bytes(&corrupted).is_err());
    }

    #[test]
    fn test_header_from_bytes_too_short() {
        let result = BlockHeader::from_bytes(&[0u8; BLOCK_HEADER_SIZE - 1]);
        assert!(result.is_err());
    }

    #[test]
    fn test_header_is_last_flag() {
        let last = BlockHeader::new(5, true, 4000, "1.0.0").to_bytes().unwrap();
        let not_last = BlockHeader::new(5, false, 4000, "1.0.0").to_bytes().unwrap();

        assert_eq!(last[5], 1);
        assert_eq!(not_last[5], 0);
        assert!(BlockHeader::from_bytes(&last).unwrap().is_last);
        assert!(!BlockHeader::from_bytes(&not_last).unwrap().is_last);
    }

    #[test]
    fn test_header_read_from() {
        let header = BlockHeader::new(1, false, 958, "1.0.0");
        let mut data = header.to_bytes().unwrap();
        data.extend_from_slice(b"payload bytes");

        let mut cursor = std::io::Cursor::new(data);
        let parsed = BlockHeader::read_from(&mut cursor).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(cursor.position(), BLOCK_HEADER_SIZE as u64);
    }
}
