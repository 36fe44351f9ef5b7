//! Error types for the container API.

use h5tree_format::error::FormatError;
use h5tree_format::message_type::MessageType;

use crate::types::DType;

/// Errors returned by container, group and dataset operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("container format error: {0}")]
    Format(#[from] FormatError),

    #[error("path not found: {0}")]
    PathNotFound(String),

    #[error("not a group: {0}")]
    NotAGroup(String),

    #[error("not a dataset: {0}")]
    NotADataset(String),

    #[error("link cycle: {0} refers back to one of its ancestors")]
    LinkCycle(String),

    #[error("member already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("container opened read-only: {0}")]
    ReadOnly(String),

    #[error("container is closed")]
    Closed,

    #[error("handle belongs to a different container")]
    ForeignHandle,

    #[error("type mismatch: requested {requested}, dataset holds {actual}")]
    TypeMismatch { requested: DType, actual: DType },

    #[error("unsupported dataset element type: {0}")]
    UnsupportedType(String),

    #[error("index {index} out of range for {count} members")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("shape {shape:?} holds {expected} elements, data has {actual}")]
    ShapeMismatch {
        shape: Vec<u64>,
        expected: u64,
        actual: usize,
    },

    #[error("missing required message: {0:?}")]
    MissingMessage(MessageType),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
