//! Little-endian field readers and writers shared by the message parsers.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::FormatError;

pub(crate) fn ensure_len(data: &[u8], pos: usize, needed: usize) -> Result<(), FormatError> {
    match pos.checked_add(needed) {
        Some(end) if end <= data.len() => Ok(()),
        _ => Err(FormatError::UnexpectedEof {
            expected: pos.saturating_add(needed),
            available: data.len(),
        }),
    }
}

/// Sequential reader over a message body.
pub(crate) struct FieldReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub(crate) fn bytes(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        ensure_len(self.data, self.pos, len)?;
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.bytes(1)?[0])
    }

    pub(crate) fn u16(&mut self) -> Result<u16, FormatError> {
        Ok(LittleEndian::read_u16(self.bytes(2)?))
    }

    pub(crate) fn u32(&mut self) -> Result<u32, FormatError> {
        Ok(LittleEndian::read_u32(self.bytes(4)?))
    }

    pub(crate) fn u64(&mut self) -> Result<u64, FormatError> {
        Ok(LittleEndian::read_u64(self.bytes(8)?))
    }

    /// A `u16`-length-prefixed UTF-8 string.
    pub(crate) fn short_string(&mut self) -> Result<String, FormatError> {
        let len = self.u16()? as usize;
        let raw = self.bytes(len)?;
        String::from_utf8(raw.to_vec()).map_err(|_| FormatError::InvalidUtf8)
    }
}

/// Append a `u16`-length-prefixed string.
pub(crate) fn put_short_string(buf: &mut Vec<u8>, s: &str) -> Result<(), FormatError> {
    let len = u16::try_from(s.len()).map_err(|_| FormatError::FieldOverflow("name length"))?;
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fields_in_sequence() {
        let mut data = vec![7u8];
        data.extend_from_slice(&0x1234u16.to_le_bytes());
        data.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        data.extend_from_slice(&42u64.to_le_bytes());
        let mut r = FieldReader::new(&data);
        assert_eq!(r.u8().unwrap(), 7);
        assert_eq!(r.u16().unwrap(), 0x1234);
        assert_eq!(r.u32().unwrap(), 0xDEAD_BEEF);
        assert_eq!(r.u64().unwrap(), 42);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn short_read_is_eof() {
        let mut r = FieldReader::new(&[1, 2, 3]);
        assert_eq!(
            r.u32(),
            Err(FormatError::UnexpectedEof {
                expected: 4,
                available: 3
            })
        );
    }

    #[test]
    fn short_string_roundtrip() {
        let mut buf = Vec::new();
        put_short_string(&mut buf, "Mesh").unwrap();
        let mut r = FieldReader::new(&buf);
        assert_eq!(r.short_string().unwrap(), "Mesh");
    }

    #[test]
    fn short_string_rejects_bad_utf8() {
        let data = [2u8, 0, 0xFF, 0xFE];
        let mut r = FieldReader::new(&data);
        assert_eq!(r.short_string(), Err(FormatError::InvalidUtf8));
    }

    #[test]
    fn ensure_len_overflow_is_eof() {
        assert!(ensure_len(&[0u8; 4], usize::MAX, 2).is_err());
    }
}
