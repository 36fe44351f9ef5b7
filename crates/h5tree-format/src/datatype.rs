//! Datatype message (type 0x04).
//!
//! Eight bytes: class u8 | flags u8 | reserved u16 | element size u32.
//! Flag bit 0 marks a signed integer. All numeric data is little-endian.

use crate::bytes::FieldReader;
use crate::error::FormatError;

/// Encoded size of a datatype message.
pub const DATATYPE_SIZE: usize = 8;

const CLASS_INTEGER: u8 = 0;
const CLASS_FLOAT: u8 = 1;
const CLASS_STRING: u8 = 3;

const FLAG_SIGNED: u8 = 0x01;

/// Broad datatype class, as used to match attributes by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatatypeClass {
    Integer,
    Float,
    String,
}

/// Element type of an attribute value or dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    /// Class 0: two's-complement or unsigned integer of 1, 2, 4 or 8 bytes.
    Integer { size: u32, signed: bool },
    /// Class 1: IEEE 754 float of 4 or 8 bytes.
    Float { size: u32 },
    /// Class 3: fixed-length UTF-8 string of `size` bytes.
    String { size: u32 },
}

impl Datatype {
    /// 64-bit IEEE float.
    pub const F64: Datatype = Datatype::Float { size: 8 };
    /// 32-bit IEEE float.
    pub const F32: Datatype = Datatype::Float { size: 4 };
    /// Signed 32-bit integer.
    pub const I32: Datatype = Datatype::Integer {
        size: 4,
        signed: true,
    };
    /// Signed 64-bit integer.
    pub const I64: Datatype = Datatype::Integer {
        size: 8,
        signed: true,
    };
    /// Unsigned byte.
    pub const U8: Datatype = Datatype::Integer {
        size: 1,
        signed: false,
    };

    /// The datatype class.
    pub fn class(&self) -> DatatypeClass {
        match self {
            Datatype::Integer { .. } => DatatypeClass::Integer,
            Datatype::Float { .. } => DatatypeClass::Float,
            Datatype::String { .. } => DatatypeClass::String,
        }
    }

    /// Size in bytes of one element.
    pub fn element_size(&self) -> u32 {
        match *self {
            Datatype::Integer { size, .. } | Datatype::Float { size } | Datatype::String { size } => {
                size
            }
        }
    }

    fn validate(&self) -> Result<(), FormatError> {
        let (class, size, ok) = match *self {
            Datatype::Integer { size, .. } => (CLASS_INTEGER, size, matches!(size, 1 | 2 | 4 | 8)),
            Datatype::Float { size } => (CLASS_FLOAT, size, matches!(size, 4 | 8)),
            // zero-length strings are legal attribute values
            Datatype::String { size } => (CLASS_STRING, size, true),
        };
        if ok {
            Ok(())
        } else {
            Err(FormatError::InvalidDatatypeSize { class, size })
        }
    }

    /// Parse a datatype message body.
    pub fn parse(data: &[u8]) -> Result<Datatype, FormatError> {
        let mut r = FieldReader::new(data);
        let class = r.u8()?;
        let flags = r.u8()?;
        let _reserved = r.u16()?;
        let size = r.u32()?;
        let dt = match class {
            CLASS_INTEGER => Datatype::Integer {
                size,
                signed: flags & FLAG_SIGNED != 0,
            },
            CLASS_FLOAT => Datatype::Float { size },
            CLASS_STRING => Datatype::String { size },
            other => return Err(FormatError::InvalidDatatypeClass(other)),
        };
        dt.validate()?;
        Ok(dt)
    }

    /// Serialize to the eight-byte message body.
    pub fn serialize(&self) -> Result<Vec<u8>, FormatError> {
        self.validate()?;
        let (class, flags) = match *self {
            Datatype::Integer { signed, .. } => {
                (CLASS_INTEGER, if signed { FLAG_SIGNED } else { 0 })
            }
            Datatype::Float { .. } => (CLASS_FLOAT, 0),
            Datatype::String { .. } => (CLASS_STRING, 0),
        };
        let mut buf = Vec::with_capacity(DATATYPE_SIZE);
        buf.push(class);
        buf.push(flags);
        buf.extend_from_slice(&[0, 0]);
        buf.extend_from_slice(&self.element_size().to_le_bytes());
        Ok(buf)
    }
}
