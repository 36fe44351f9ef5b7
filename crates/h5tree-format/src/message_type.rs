//! Object header message type identifiers.

/// Header message types understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Link from a group to a child object (0x01).
    Link,
    /// Scalar attribute (0x02).
    Attribute,
    /// Dataset shape (0x03).
    Dataspace,
    /// Dataset element type (0x04).
    Datatype,
    /// Dataset raw-data location (0x05).
    DataLayout,
    /// Dataset filter chain (0x06).
    FilterPipeline,
    /// Any other id; skipped on read unless flagged must-understand.
    Unknown(u8),
}

/// Message flag: readers that do not know the type must fail.
pub const FLAG_MUST_UNDERSTAND: u8 = 0x08;

impl MessageType {
    /// Convert a raw type byte to a `MessageType`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0x01 => MessageType::Link,
            0x02 => MessageType::Attribute,
            0x03 => MessageType::Dataspace,
            0x04 => MessageType::Datatype,
            0x05 => MessageType::DataLayout,
            0x06 => MessageType::FilterPipeline,
            other => MessageType::Unknown(other),
        }
    }

    /// The raw type byte.
    pub fn to_u8(self) -> u8 {
        match self {
            MessageType::Link => 0x01,
            MessageType::Attribute => 0x02,
            MessageType::Dataspace => 0x03,
            MessageType::Datatype => 0x04,
            MessageType::DataLayout => 0x05,
            MessageType::FilterPipeline => 0x06,
            MessageType::Unknown(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_roundtrip() {
        for id in 1u8..=6 {
            let mt = MessageType::from_u8(id);
            assert!(!matches!(mt, MessageType::Unknown(_)));
            assert_eq!(mt.to_u8(), id);
        }
    }

    #[test]
    fn unknown_id_preserved() {
        assert_eq!(MessageType::from_u8(0x42), MessageType::Unknown(0x42));
        assert_eq!(MessageType::Unknown(0x42).to_u8(), 0x42);
    }
}
