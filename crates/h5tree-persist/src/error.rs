//! Errors raised while resolving destinations and opening containers.
//!
//! These never cross the public orchestrator boundary: [`crate::Writer`] and
//! [`crate::Reader`] log them and report `false`.

/// Persistence-layer error.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("invalid container URI: {0:?}")]
    InvalidUri(String),

    #[error("unsupported URI scheme: {0}")]
    UnsupportedScheme(String),

    #[error(transparent)]
    Container(#[from] h5tree::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
