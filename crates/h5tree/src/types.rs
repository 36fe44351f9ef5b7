//! Value types for attributes and datasets.

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use h5tree_format::attribute::AttributeMessage;
use h5tree_format::datatype::{Datatype, DatatypeClass};
use h5tree_format::error::FormatError;

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// Type tag of a scalar attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrType {
    F64,
    I32,
    String,
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrType::F64 => write!(f, "f64"),
            AttrType::I32 => write!(f, "i32"),
            AttrType::String => write!(f, "string"),
        }
    }
}

/// A scalar attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    F64(f64),
    I32(i32),
    String(String),
}

impl AttrValue {
    /// The value's type tag.
    pub fn attr_type(&self) -> AttrType {
        match self {
            AttrValue::F64(_) => AttrType::F64,
            AttrValue::I32(_) => AttrType::I32,
            AttrValue::String(_) => AttrType::String,
        }
    }

    pub(crate) fn to_message(&self, name: &str) -> AttributeMessage {
        match self {
            AttrValue::F64(v) => AttributeMessage::from_f64(name, *v),
            AttrValue::I32(v) => AttributeMessage::from_i32(name, *v),
            AttrValue::String(s) => AttributeMessage::from_string(name, s),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::F64(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        AttrValue::I32(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::String(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::String(v)
    }
}

/// Rust types that can be stored as scalar attributes.
pub trait AttrScalar: Sized {
    /// The tag values of this type are stored under.
    const ATTR_TYPE: AttrType;

    /// Extract `Self` from a value with a matching tag; `None` otherwise.
    fn from_value(value: &AttrValue) -> Option<Self>;
}

impl AttrScalar for f64 {
    const ATTR_TYPE: AttrType = AttrType::F64;

    fn from_value(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::F64(v) => Some(*v),
            _ => None,
        }
    }
}

impl AttrScalar for i32 {
    const ATTR_TYPE: AttrType = AttrType::I32;

    fn from_value(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::I32(v) => Some(*v),
            _ => None,
        }
    }
}

impl AttrScalar for String {
    const ATTR_TYPE: AttrType = AttrType::String;

    fn from_value(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// One attribute as stored on a group.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name: String,
    attr_type: AttrType,
    value: Option<AttrValue>,
}

impl Attribute {
    pub(crate) fn from_message(msg: &AttributeMessage) -> Self {
        let (attr_type, value) = match msg.class() {
            DatatypeClass::Float => (AttrType::F64, msg.read_as_f64().map(AttrValue::F64)),
            DatatypeClass::Integer => (AttrType::I32, msg.read_as_i32().map(AttrValue::I32)),
            DatatypeClass::String => (
                AttrType::String,
                msg.read_as_string().map(AttrValue::String),
            ),
        };
        Self {
            name: msg.name.clone(),
            attr_type,
            value,
        }
    }

    /// Attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type tag derived from the stored datatype class.
    pub fn attr_type(&self) -> AttrType {
        self.attr_type
    }

    /// Decoded value, or `None` when the stored bytes do not decode
    /// (for instance a 64-bit integer outside the `i32` range).
    pub fn value(&self) -> Option<&AttrValue> {
        self.value.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

/// Dataset element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    F64,
    F32,
    I32,
    I64,
    U8,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::F64 => write!(f, "f64"),
            DType::F32 => write!(f, "f32"),
            DType::I32 => write!(f, "i32"),
            DType::I64 => write!(f, "i64"),
            DType::U8 => write!(f, "u8"),
        }
    }
}

impl DType {
    /// The on-disk datatype.
    pub fn to_datatype(self) -> Datatype {
        match self {
            DType::F64 => Datatype::F64,
            DType::F32 => Datatype::F32,
            DType::I32 => Datatype::I32,
            DType::I64 => Datatype::I64,
            DType::U8 => Datatype::U8,
        }
    }

    /// Map an on-disk datatype; `None` for types datasets cannot hold.
    pub fn from_datatype(dt: &Datatype) -> Option<DType> {
        match *dt {
            Datatype::F64 => Some(DType::F64),
            Datatype::F32 => Some(DType::F32),
            Datatype::I32 => Some(DType::I32),
            Datatype::I64 => Some(DType::I64),
            Datatype::U8 => Some(DType::U8),
            _ => None,
        }
    }

    /// Element size in bytes.
    pub fn size(self) -> usize {
        match self {
            DType::F64 | DType::I64 => 8,
            DType::F32 | DType::I32 => 4,
            DType::U8 => 1,
        }
    }
}

/// Typed dataset contents.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetData {
    F64(Vec<f64>),
    F32(Vec<f32>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
}

impl DatasetData {
    /// Element type.
    pub fn dtype(&self) -> DType {
        match self {
            DatasetData::F64(_) => DType::F64,
            DatasetData::F32(_) => DType::F32,
            DatasetData::I32(_) => DType::I32,
            DatasetData::I64(_) => DType::I64,
            DatasetData::U8(_) => DType::U8,
        }
    }

    /// Element count.
    pub fn len(&self) -> usize {
        match self {
            DatasetData::F64(v) => v.len(),
            DatasetData::F32(v) => v.len(),
            DatasetData::I32(v) => v.len(),
            DatasetData::I64(v) => v.len(),
            DatasetData::U8(v) => v.len(),
        }
    }

    /// True when there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Little-endian encoding of all elements.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.len() * self.dtype().size()];
        match self {
            DatasetData::F64(v) => LittleEndian::write_f64_into(v, &mut buf),
            DatasetData::F32(v) => LittleEndian::write_f32_into(v, &mut buf),
            DatasetData::I32(v) => LittleEndian::write_i32_into(v, &mut buf),
            DatasetData::I64(v) => LittleEndian::write_i64_into(v, &mut buf),
            DatasetData::U8(v) => buf.copy_from_slice(v),
        }
        buf
    }

    /// Decode `bytes` as `count` elements of `dtype`.
    pub fn from_le_bytes(dtype: DType, count: usize, bytes: &[u8]) -> Result<Self, FormatError> {
        let expected = count.saturating_mul(dtype.size());
        if bytes.len() != expected {
            return Err(FormatError::DataSizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(match dtype {
            DType::F64 => {
                let mut v = vec![0f64; count];
                LittleEndian::read_f64_into(bytes, &mut v);
                DatasetData::F64(v)
            }
            DType::F32 => {
                let mut v = vec![0f32; count];
                LittleEndian::read_f32_into(bytes, &mut v);
                DatasetData::F32(v)
            }
            DType::I32 => {
                let mut v = vec![0i32; count];
                LittleEndian::read_i32_into(bytes, &mut v);
                DatasetData::I32(v)
            }
            DType::I64 => {
                let mut v = vec![0i64; count];
                LittleEndian::read_i64_into(bytes, &mut v);
                DatasetData::I64(v)
            }
            DType::U8 => DatasetData::U8(bytes.to_vec()),
        })
    }
}

impl From<Vec<f64>> for DatasetData {
    fn from(v: Vec<f64>) -> Self {
        DatasetData::F64(v)
    }
}

impl From<Vec<f32>> for DatasetData {
    fn from(v: Vec<f32>) -> Self {
        DatasetData::F32(v)
    }
}

impl From<Vec<i32>> for DatasetData {
    fn from(v: Vec<i32>) -> Self {
        DatasetData::I32(v)
    }
}

impl From<Vec<i64>> for DatasetData {
    fn from(v: Vec<i64>) -> Self {
        DatasetData::I64(v)
    }
}

impl From<Vec<u8>> for DatasetData {
    fn from(v: Vec<u8>) -> Self {
        DatasetData::U8(v)
    }
}

impl From<&[f64]> for DatasetData {
    fn from(v: &[f64]) -> Self {
        DatasetData::F64(v.to_vec())
    }
}
