//! Data layout message (type 0x05).
//!
//! Only contiguous storage exists: version u8 | class u8 (1) | reserved u16
//! | address u64 | stored size u64. The stored size is the on-disk byte count,
//! which differs from the logical size when a filter pipeline is present.

use crate::bytes::FieldReader;
use crate::error::FormatError;

const LAYOUT_VERSION: u8 = 1;
const LAYOUT_CLASS_CONTIGUOUS: u8 = 1;

/// Where a dataset's raw bytes live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLayout {
    /// File address of the first byte.
    pub address: u64,
    /// Number of stored bytes.
    pub size: u64,
}

impl DataLayout {
    /// A contiguous layout.
    pub fn contiguous(address: u64, size: u64) -> Self {
        Self { address, size }
    }

    /// Parse a data layout message body.
    pub fn parse(data: &[u8]) -> Result<DataLayout, FormatError> {
        let mut r = FieldReader::new(data);
        let version = r.u8()?;
        if version != LAYOUT_VERSION {
            return Err(FormatError::InvalidMessageVersion {
                msg_type: 0x05,
                version,
            });
        }
        let class = r.u8()?;
        if class != LAYOUT_CLASS_CONTIGUOUS {
            return Err(FormatError::InvalidMessageVersion {
                msg_type: 0x05,
                version: class,
            });
        }
        let _reserved = r.u16()?;
        let address = r.u64()?;
        let size = r.u64()?;
        Ok(DataLayout { address, size })
    }

    /// Serialize to the message body.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(20);
        buf.push(LAYOUT_VERSION);
        buf.push(LAYOUT_CLASS_CONTIGUOUS);
        buf.extend_from_slice(&[0, 0]);
        buf.extend_from_slice(&self.address.to_le_bytes());
        buf.extend_from_slice(&self.size.to_le_bytes());
        buf
    }

    /// Slice the stored bytes out of the whole file image.
    pub fn slice<'a>(&self, file_data: &'a [u8]) -> Result<&'a [u8], FormatError> {
        let start =
            usize::try_from(self.address).map_err(|_| FormatError::InvalidAddress(self.address))?;
        let len = usize::try_from(self.size).map_err(|_| FormatError::InvalidAddress(self.size))?;
        let end = start
            .checked_add(len)
            .ok_or(FormatError::InvalidAddress(self.address))?;
        if end > file_data.len() {
            return Err(FormatError::UnexpectedEof {
                expected: end,
                available: file_data.len(),
            });
        }
        Ok(&file_data[start..end])
    }
}
