//! Metadata checksum: CRC-32 (IEEE) over superblocks and object headers.

use crate::error::FormatError;

/// Compute the CRC-32 checksum of a byte slice.
pub fn checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Verify `data` against a checksum stored in the file.
pub fn verify(data: &[u8], stored: u32) -> Result<(), FormatError> {
    let computed = checksum(data);
    if computed == stored {
        Ok(())
    } else {
        Err(FormatError::ChecksumMismatch {
            expected: stored,
            computed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_value() {
        // CRC-32/ISO-HDLC check value
        assert_eq!(checksum(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn empty_input() {
        assert_eq!(checksum(b""), 0);
    }

    #[test]
    fn verify_detects_flip() {
        let data = b"object header bytes".to_vec();
        let stored = checksum(&data);
        assert!(verify(&data, stored).is_ok());

        let mut flipped = data.clone();
        flipped[3] ^= 0x01;
        assert!(matches!(
            verify(&flipped, stored),
            Err(FormatError::ChecksumMismatch { expected, .. }) if expected == stored
        ));
    }
}
