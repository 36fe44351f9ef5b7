//! Error types for h5tree binary format parsing.

use core::fmt;

/// Errors that can occur when parsing or encoding container format structures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The container magic signature was not found at offset 0.
    SignatureNotFound,
    /// The superblock version is not supported.
    UnsupportedVersion(u8),
    /// Unexpected end of data.
    UnexpectedEof {
        /// Number of bytes expected.
        expected: usize,
        /// Number of bytes actually available.
        available: usize,
    },
    /// Offset size other than 8 bytes.
    InvalidOffsetSize(u8),
    /// Invalid object header signature.
    InvalidObjectHeaderSignature,
    /// Invalid object header version.
    InvalidObjectHeaderVersion(u8),
    /// Object kind byte is neither group nor dataset.
    InvalidObjectKind(u8),
    /// Unknown message type that is marked as must-understand.
    UnsupportedMessage(u8),
    /// Datatype class byte is not one of integer, float or string.
    InvalidDatatypeClass(u8),
    /// Element size not valid for the datatype class.
    InvalidDatatypeSize {
        /// Datatype class byte.
        class: u8,
        /// Element size in bytes.
        size: u32,
    },
    /// Unknown message version.
    InvalidMessageVersion {
        /// Message type the version belongs to.
        msg_type: u8,
        /// The version byte that was found.
        version: u8,
    },
    /// Link name is empty, contains `/`, or is a relative component.
    InvalidLinkName(String),
    /// A name or string value is not valid UTF-8.
    InvalidUtf8,
    /// An address points outside the file.
    InvalidAddress(u64),
    /// Unknown filter id in a filter pipeline.
    UnsupportedFilter(u16),
    /// Filter (compression) failure.
    Filter(String),
    /// Decoded data does not have the size implied by datatype and dataspace.
    DataSizeMismatch {
        /// Expected byte count.
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },
    /// A field value does not fit its on-disk width.
    FieldOverflow(&'static str),
    /// CRC-32 checksum mismatch.
    ChecksumMismatch {
        /// The checksum stored in the file.
        expected: u32,
        /// The checksum we computed.
        computed: u32,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::SignatureNotFound => write!(f, "h5tree signature not found"),
            FormatError::UnsupportedVersion(v) => {
                write!(f, "unsupported superblock version: {v}")
            }
            FormatError::UnexpectedEof {
                expected,
                available,
            } => {
                write!(f, "unexpected EOF: need {expected} bytes, have {available}")
            }
            FormatError::InvalidOffsetSize(s) => {
                write!(f, "invalid offset size: {s} (must be 8)")
            }
            FormatError::InvalidObjectHeaderSignature => {
                write!(f, "invalid object header signature")
            }
            FormatError::InvalidObjectHeaderVersion(v) => {
                write!(f, "invalid object header version: {v}")
            }
            FormatError::InvalidObjectKind(k) => write!(f, "invalid object kind: {k}"),
            FormatError::UnsupportedMessage(id) => {
                write!(f, "unsupported message type {id:#04x} marked as must-understand")
            }
            FormatError::InvalidDatatypeClass(c) => write!(f, "invalid datatype class: {c}"),
            FormatError::InvalidDatatypeSize { class, size } => {
                write!(f, "invalid element size {size} for datatype class {class}")
            }
            FormatError::InvalidMessageVersion { msg_type, version } => {
                write!(f, "invalid version {version} for message type {msg_type:#04x}")
            }
            FormatError::InvalidLinkName(name) => write!(f, "invalid link name: {name:?}"),
            FormatError::InvalidUtf8 => write!(f, "invalid UTF-8 in name or string value"),
            FormatError::InvalidAddress(addr) => {
                write!(f, "address {addr:#x} is outside the file")
            }
            FormatError::UnsupportedFilter(id) => write!(f, "unsupported filter id: {id}"),
            FormatError::Filter(msg) => write!(f, "filter error: {msg}"),
            FormatError::DataSizeMismatch { expected, actual } => {
                write!(f, "data size mismatch: expected {expected} bytes, got {actual}")
            }
            FormatError::FieldOverflow(field) => {
                write!(f, "value too large for on-disk field: {field}")
            }
            FormatError::ChecksumMismatch { expected, computed } => {
                write!(
                    f,
                    "checksum mismatch: expected {expected:#010x}, computed {computed:#010x}"
                )
            }
        }
    }
}

impl std::error::Error for FormatError {}
