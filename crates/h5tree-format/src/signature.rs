//! Container file signature (magic bytes) detection.

use crate::error::FormatError;

/// The 8-byte h5tree magic signature: non-ASCII lead byte, `H5T`, CRLF, EOF, LF.
///
/// Differs from HDF5's `\x89HDF\r\n\x1a\n`; h5tree files are
/// not HDF5 files.
pub const SIGNATURE: [u8; 8] = [0x89, b'H', b'5', b'T', b'\r', b'\n', 0x1A, b'\n'];

/// Check that `data` starts with the container signature.
pub fn check_signature(data: &[u8]) -> Result<(), FormatError> {
    if data.len() >= SIGNATURE.len() && data[..SIGNATURE.len()] == SIGNATURE {
        Ok(())
    } else {
        Err(FormatError::SignatureNotFound)
    }
}
