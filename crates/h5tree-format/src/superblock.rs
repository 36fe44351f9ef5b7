//! Superblock parsing and serialization.
//!
//! Layout (40 bytes, little-endian):
//!
//! | offset | size | field                    |
//! |--------|------|--------------------------|
//! | 0      | 8    | signature                |
//! | 8      | 1    | version (0)              |
//! | 9      | 1    | offset size (8)          |
//! | 10     | 2    | reserved                 |
//! | 12     | 8    | root object address      |
//! | 20     | 8    | end-of-file address      |
//! | 28     | 8    | object count             |
//! | 36     | 4    | CRC-32 of bytes 0..36    |

use crate::bytes::{ensure_len, FieldReader};
use crate::checksum;
use crate::error::FormatError;
use crate::signature::{check_signature, SIGNATURE};

/// Encoded size of the superblock in bytes.
pub const SUPERBLOCK_SIZE: usize = 40;

/// The only superblock version this crate reads and writes.
pub const SUPERBLOCK_VERSION: u8 = 0;

/// Parsed container superblock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Superblock {
    /// Superblock version.
    pub version: u8,
    /// Address of the root group's object header.
    pub root_address: u64,
    /// Address one past the last byte the container uses.
    pub eof_address: u64,
    /// Number of object headers (groups and datasets, root included).
    pub object_count: u64,
}

impl Superblock {
    /// Create a version-0 superblock.
    pub fn new(root_address: u64, eof_address: u64, object_count: u64) -> Self {
        Self {
            version: SUPERBLOCK_VERSION,
            root_address,
            eof_address,
            object_count,
        }
    }

    /// Parse the superblock at the start of `data`, verifying signature,
    /// version, checksum, and that the recorded addresses fit in `data`.
    pub fn parse(data: &[u8]) -> Result<Superblock, FormatError> {
        check_signature(data)?;
        ensure_len(data, 0, SUPERBLOCK_SIZE)?;

        let mut r = FieldReader::at(data, SIGNATURE.len());
        let version = r.u8()?;
        if version != SUPERBLOCK_VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }
        let offset_size = r.u8()?;
        if offset_size != 8 {
            return Err(FormatError::InvalidOffsetSize(offset_size));
        }
        let _reserved = r.u16()?;
        let root_address = r.u64()?;
        let eof_address = r.u64()?;
        let object_count = r.u64()?;
        let stored = r.u32()?;
        checksum::verify(&data[..SUPERBLOCK_SIZE - 4], stored)?;

        if eof_address > data.len() as u64 {
            return Err(FormatError::UnexpectedEof {
                expected: usize::try_from(eof_address).unwrap_or(usize::MAX),
                available: data.len(),
            });
        }
        if root_address < SUPERBLOCK_SIZE as u64 || root_address >= eof_address {
            return Err(FormatError::InvalidAddress(root_address));
        }

        Ok(Superblock {
            version,
            root_address,
            eof_address,
            object_count,
        })
    }

    /// Serialize to the 40-byte on-disk form.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(SUPERBLOCK_SIZE);
        buf.extend_from_slice(&SIGNATURE);
        buf.push(self.version);
        buf.push(8);
        buf.extend_from_slice(&[0, 0]);
        buf.extend_from_slice(&self.root_address.to_le_bytes());
        buf.extend_from_slice(&self.eof_address.to_le_bytes());
        buf.extend_from_slice(&self.object_count.to_le_bytes());
        let crc = checksum::checksum(&buf);
        buf.extend_from_slice(&crc.to_le_bytes());
        buf
    }
}
