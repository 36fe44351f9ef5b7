//! Object header parsing and serialization.
//!
//! Every group and dataset is one object header:
//!
//! ```text
//! "OBJH" | version u8 | kind u8 | flags u8 | reserved u8
//!        | message count u32 | payload length u32
//! messages: type u8 | flags u8 | reserved u16 | size u32 | data[size]
//! CRC-32 u32 over everything above
//! ```

use crate::bytes::{ensure_len, FieldReader};
use crate::checksum;
use crate::error::FormatError;
use crate::message_type::{MessageType, FLAG_MUST_UNDERSTAND};

/// OBJH signature for object headers.
pub const OBJH_SIGNATURE: [u8; 4] = [b'O', b'B', b'J', b'H'];

/// Object header version written by this crate.
pub const OBJECT_HEADER_VERSION: u8 = 1;

const PREFIX_SIZE: usize = 16;
const MESSAGE_PREFIX_SIZE: usize = 8;

/// What an object header describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A group: carries link and attribute messages.
    Group,
    /// A dataset: carries datatype, dataspace, layout and optional filters.
    Dataset,
}

impl ObjectKind {
    /// Convert the on-disk kind byte.
    pub fn from_u8(value: u8) -> Result<Self, FormatError> {
        match value {
            0 => Ok(ObjectKind::Group),
            1 => Ok(ObjectKind::Dataset),
            other => Err(FormatError::InvalidObjectKind(other)),
        }
    }

    /// The on-disk kind byte.
    pub fn to_u8(self) -> u8 {
        match self {
            ObjectKind::Group => 0,
            ObjectKind::Dataset => 1,
        }
    }
}

/// A single header message.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMessage {
    /// The message type.
    pub msg_type: MessageType,
    /// Message flags byte.
    pub flags: u8,
    /// Raw message data bytes.
    pub data: Vec<u8>,
}

/// Parsed object header.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectHeader {
    /// Group or dataset.
    pub kind: ObjectKind,
    /// Messages in stored order. Unknown optional messages are dropped on parse.
    pub messages: Vec<HeaderMessage>,
}

impl ObjectHeader {
    /// Create an empty header.
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            messages: Vec::new(),
        }
    }

    /// Add a message with default flags (0).
    pub fn add_message(&mut self, msg_type: MessageType, data: Vec<u8>) {
        self.add_message_with_flags(msg_type, data, 0);
    }

    /// Add a message with specific flags.
    pub fn add_message_with_flags(&mut self, msg_type: MessageType, data: Vec<u8>, flags: u8) {
        self.messages.push(HeaderMessage {
            msg_type,
            flags,
            data,
        });
    }

    /// All messages of the given type, in stored order.
    pub fn messages_of(&self, msg_type: MessageType) -> impl Iterator<Item = &HeaderMessage> {
        self.messages.iter().filter(move |m| m.msg_type == msg_type)
    }

    /// The first message of the given type.
    pub fn find_message(&self, msg_type: MessageType) -> Option<&HeaderMessage> {
        self.messages_of(msg_type).next()
    }

    /// Size of the serialized header, checksum included.
    pub fn encoded_len(&self) -> usize {
        let payload: usize = self
            .messages
            .iter()
            .map(|m| MESSAGE_PREFIX_SIZE + m.data.len())
            .sum();
        PREFIX_SIZE + payload + 4
    }

    /// Parse an object header at the given offset in the data buffer.
    pub fn parse(data: &[u8], offset: usize) -> Result<ObjectHeader, FormatError> {
        ensure_len(data, offset, PREFIX_SIZE)?;
        if data[offset..offset + 4] != OBJH_SIGNATURE {
            return Err(FormatError::InvalidObjectHeaderSignature);
        }

        let mut r = FieldReader::at(data, offset + 4);
        let version = r.u8()?;
        if version != OBJECT_HEADER_VERSION {
            return Err(FormatError::InvalidObjectHeaderVersion(version));
        }
        let kind = ObjectKind::from_u8(r.u8()?)?;
        let _flags = r.u8()?;
        let _reserved = r.u8()?;
        let message_count = r.u32()? as usize;
        let payload_len = r.u32()? as usize;

        let payload_start = r.position();
        ensure_len(data, payload_start, payload_len.saturating_add(4))?;
        let payload_end = payload_start + payload_len;

        let stored = u32::from_le_bytes([
            data[payload_end],
            data[payload_end + 1],
            data[payload_end + 2],
            data[payload_end + 3],
        ]);
        checksum::verify(&data[offset..payload_end], stored)?;

        let payload = &data[payload_start..payload_end];
        let mut mr = FieldReader::new(payload);
        // message_count comes from disk; never trust it for preallocation
        let mut messages = Vec::with_capacity(message_count.min(1024));
        for _ in 0..message_count {
            let msg_type = MessageType::from_u8(mr.u8()?);
            let flags = mr.u8()?;
            let _reserved = mr.u16()?;
            let size = mr.u32()? as usize;
            let body = mr.bytes(size)?;

            if let MessageType::Unknown(id) = msg_type {
                if flags & FLAG_MUST_UNDERSTAND != 0 {
                    return Err(FormatError::UnsupportedMessage(id));
                }
                continue;
            }
            messages.push(HeaderMessage {
                msg_type,
                flags,
                data: body.to_vec(),
            });
        }

        Ok(ObjectHeader { kind, messages })
    }

    /// Serialize the complete header (prefix + messages + checksum).
    pub fn serialize(&self) -> Result<Vec<u8>, FormatError> {
        let total = self.encoded_len();
        let payload_len = total - PREFIX_SIZE - 4;
        let message_count = u32::try_from(self.messages.len())
            .map_err(|_| FormatError::FieldOverflow("message count"))?;
        let payload_len =
            u32::try_from(payload_len).map_err(|_| FormatError::FieldOverflow("header payload"))?;

        let mut buf = Vec::with_capacity(total);
        buf.extend_from_slice(&OBJH_SIGNATURE);
        buf.push(OBJECT_HEADER_VERSION);
        buf.push(self.kind.to_u8());
        buf.push(0);
        buf.push(0);
        buf.extend_from_slice(&message_count.to_le_bytes());
        buf.extend_from_slice(&payload_len.to_le_bytes());

        for msg in &self.messages {
            let size = u32::try_from(msg.data.len())
                .map_err(|_| FormatError::FieldOverflow("message size"))?;
            buf.push(msg.msg_type.to_u8());
            buf.push(msg.flags);
            buf.extend_from_slice(&[0, 0]);
            buf.extend_from_slice(&size.to_le_bytes());
            buf.extend_from_slice(&msg.data);
        }

        let crc = checksum::checksum(&buf);
        buf.extend_from_slice(&crc.to_le_bytes());
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_header_roundtrip() {
        let hdr = ObjectHeader::new(ObjectKind::Group);
        let bytes = hdr.serialize().unwrap();
        assert_eq!(bytes.len(), hdr.encoded_len());
        let parsed = ObjectHeader::parse(&bytes, 0).unwrap();
        assert_eq!(parsed.kind, ObjectKind::Group);
        assert!(parsed.messages.is_empty());
    }

    #[test]
    fn two_messages_roundtrip() {
        let mut hdr = ObjectHeader::new(ObjectKind::Dataset);
        hdr.add_message(MessageType::Dataspace, vec![1, 2, 3, 4]);
        hdr.add_message(MessageType::Datatype, vec![5, 6]);
        let bytes = hdr.serialize().unwrap();
        let parsed = ObjectHeader::parse(&bytes, 0).unwrap();
        assert_eq!(parsed, hdr);
        assert_eq!(
            parsed.find_message(MessageType::Datatype).unwrap().data,
            vec![5, 6]
        );
    }

    #[test]
    fn parse_at_offset() {
        let mut hdr = ObjectHeader::new(ObjectKind::Group);
        hdr.add_message(MessageType::Link, vec![9; 20]);
        let mut data = vec![0u8; 100];
        data.extend_from_slice(&hdr.serialize().unwrap());
        assert_eq!(ObjectHeader::parse(&data, 100).unwrap(), hdr);
    }

    #[test]
    fn unknown_optional_message_skipped() {
        let mut hdr = ObjectHeader::new(ObjectKind::Group);
        hdr.add_message(MessageType::Unknown(0x40), vec![1, 2]);
        hdr.add_message(MessageType::Link, vec![3]);
        let parsed = ObjectHeader::parse(&hdr.serialize().unwrap(), 0).unwrap();
        assert_eq!(parsed.messages.len(), 1);
        assert_eq!(parsed.messages[0].msg_type, MessageType::Link);
    }

    #[test]
    fn unknown_must_understand_message_rejected() {
        let mut hdr = ObjectHeader::new(ObjectKind::Group);
        hdr.add_message_with_flags(MessageType::Unknown(0x41), vec![], FLAG_MUST_UNDERSTAND);
        let err = ObjectHeader::parse(&hdr.serialize().unwrap(), 0).unwrap_err();
        assert_eq!(err, FormatError::UnsupportedMessage(0x41));
    }

    #[test]
    fn bad_signature() {
        let mut bytes = ObjectHeader::new(ObjectKind::Group).serialize().unwrap();
        bytes[0] = b'X';
        assert_eq!(
            ObjectHeader::parse(&bytes, 0),
            Err(FormatError::InvalidObjectHeaderSignature)
        );
    }

    #[test]
    fn bad_kind() {
        let mut bytes = ObjectHeader::new(ObjectKind::Group).serialize().unwrap();
        bytes[5] = 9;
        assert_eq!(
            ObjectHeader::parse(&bytes, 0),
            Err(FormatError::InvalidObjectKind(9))
        );
    }

    #[test]
    fn corrupted_payload_fails_checksum() {
        let mut hdr = ObjectHeader::new(ObjectKind::Group);
        hdr.add_message(MessageType::Attribute, vec![0xAA; 16]);
        let mut bytes = hdr.serialize().unwrap();
        bytes[30] ^= 0x10;
        assert!(matches!(
            ObjectHeader::parse(&bytes, 0),
            Err(FormatError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn truncated_header() {
        let mut hdr = ObjectHeader::new(ObjectKind::Group);
        hdr.add_message(MessageType::Link, vec![1; 40]);
        let bytes = hdr.serialize().unwrap();
        assert!(matches!(
            ObjectHeader::parse(&bytes[..bytes.len() - 10], 0),
            Err(FormatError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn large_message() {
        let mut hdr = ObjectHeader::new(ObjectKind::Group);
        hdr.add_message(MessageType::Attribute, vec![0x5A; 70_000]);
        let parsed = ObjectHeader::parse(&hdr.serialize().unwrap(), 0).unwrap();
        assert_eq!(parsed.messages[0].data.len(), 70_000);
    }
}
