//! Attribute message (type 0x02): a named scalar value on a group or dataset.
//!
//! Body: version u8 | reserved u8 | name (u16 length + UTF-8)
//!       | datatype (8 bytes) | value length u32 | value bytes.

use byteorder::{ByteOrder, LittleEndian};

use crate::bytes::{put_short_string, FieldReader};
use crate::datatype::{Datatype, DatatypeClass, DATATYPE_SIZE};
use crate::error::FormatError;

const ATTRIBUTE_VERSION: u8 = 1;

/// Parsed attribute message.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeMessage {
    /// Attribute name.
    pub name: String,
    /// Type of the stored value.
    pub datatype: Datatype,
    /// Raw value bytes.
    pub raw_data: Vec<u8>,
}

impl AttributeMessage {
    /// A 64-bit float attribute.
    pub fn from_f64(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            datatype: Datatype::F64,
            raw_data: value.to_le_bytes().to_vec(),
        }
    }

    /// A 32-bit signed integer attribute.
    pub fn from_i32(name: &str, value: i32) -> Self {
        Self {
            name: name.to_string(),
            datatype: Datatype::I32,
            raw_data: value.to_le_bytes().to_vec(),
        }
    }

    /// A UTF-8 string attribute. Empty strings are allowed.
    pub fn from_string(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            datatype: Datatype::String {
                size: value.len() as u32,
            },
            raw_data: value.as_bytes().to_vec(),
        }
    }

    /// The value's datatype class.
    pub fn class(&self) -> DatatypeClass {
        self.datatype.class()
    }

    /// Read as `f64`. Only valid for float attributes.
    pub fn read_as_f64(&self) -> Option<f64> {
        match self.datatype {
            Datatype::Float { size: 8 } if self.raw_data.len() == 8 => {
                Some(LittleEndian::read_f64(&self.raw_data))
            }
            Datatype::Float { size: 4 } if self.raw_data.len() == 4 => {
                Some(LittleEndian::read_f32(&self.raw_data) as f64)
            }
            _ => None,
        }
    }

    /// Read as `i32`. Only valid for integer attributes whose value fits.
    pub fn read_as_i32(&self) -> Option<i32> {
        let Datatype::Integer { size, signed } = self.datatype else {
            return None;
        };
        if self.raw_data.len() != size as usize {
            return None;
        }
        let wide: i128 = match (size, signed) {
            (1, true) => self.raw_data[0] as i8 as i128,
            (1, false) => self.raw_data[0] as i128,
            (2, true) => LittleEndian::read_i16(&self.raw_data) as i128,
            (2, false) => LittleEndian::read_u16(&self.raw_data) as i128,
            (4, true) => LittleEndian::read_i32(&self.raw_data) as i128,
            (4, false) => LittleEndian::read_u32(&self.raw_data) as i128,
            (8, true) => LittleEndian::read_i64(&self.raw_data) as i128,
            (8, false) => LittleEndian::read_u64(&self.raw_data) as i128,
            _ => return None,
        };
        i32::try_from(wide).ok()
    }

    /// Read as a string. Only valid for string attributes; trailing NULs are trimmed.
    pub fn read_as_string(&self) -> Option<String> {
        if self.class() != DatatypeClass::String {
            return None;
        }
        let end = self
            .raw_data
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |p| p + 1);
        String::from_utf8(self.raw_data[..end].to_vec()).ok()
    }

    /// Parse an attribute message body.
    pub fn parse(data: &[u8]) -> Result<AttributeMessage, FormatError> {
        let mut r = FieldReader::new(data);
        let version = r.u8()?;
        if version != ATTRIBUTE_VERSION {
            return Err(FormatError::InvalidMessageVersion {
                msg_type: 0x02,
                version,
            });
        }
        let _reserved = r.u8()?;
        let name = r.short_string()?;
        let datatype = Datatype::parse(r.bytes(DATATYPE_SIZE)?)?;
        let len = r.u32()? as usize;
        let raw_data = r.bytes(len)?.to_vec();
        if len != datatype.element_size() as usize {
            return Err(FormatError::DataSizeMismatch {
                expected: datatype.element_size() as usize,
                actual: len,
            });
        }
        Ok(AttributeMessage {
            name,
            datatype,
            raw_data,
        })
    }

    /// Serialize to the message body.
    pub fn serialize(&self) -> Result<Vec<u8>, FormatError> {
        let len = u32::try_from(self.raw_data.len())
            .map_err(|_| FormatError::FieldOverflow("attribute value"))?;
        let mut buf = Vec::with_capacity(16 + self.name.len() + self.raw_data.len());
        buf.push(ATTRIBUTE_VERSION);
        buf.push(0);
        put_short_string(&mut buf, &self.name)?;
        buf.extend_from_slice(&self.datatype.serialize()?);
        buf.extend_from_slice(&len.to_le_bytes());
        buf.extend_from_slice(&self.raw_data);
        Ok(buf)
    }
}
