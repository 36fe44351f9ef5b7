//! Link message (type 0x01): a named edge from a group to a child object.
//!
//! Body: version u8 | target kind u8 | name (u16 length + UTF-8) | target address u64.

use crate::bytes::{put_short_string, FieldReader};
use crate::error::FormatError;
use crate::object_header::ObjectKind;

const LINK_VERSION: u8 = 1;

/// Parsed link message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMessage {
    /// Child name, unique within the parent group.
    pub name: String,
    /// Kind of the object the link points at.
    pub target_kind: ObjectKind,
    /// Address of the target object header.
    pub address: u64,
}

/// Check that `name` can be used as a link name.
///
/// Names must be non-empty, must not contain `/`, and must not be `.` or `..`.
pub fn validate_link_name(name: &str) -> Result<(), FormatError> {
    if name.is_empty() || name.contains('/') || name == "." || name == ".." {
        return Err(FormatError::InvalidLinkName(name.to_string()));
    }
    Ok(())
}

impl LinkMessage {
    /// Create a link message.
    pub fn new(name: impl Into<String>, target_kind: ObjectKind, address: u64) -> Self {
        Self {
            name: name.into(),
            target_kind,
            address,
        }
    }

    /// Parse a link message body.
    pub fn parse(data: &[u8]) -> Result<LinkMessage, FormatError> {
        let mut r = FieldReader::new(data);
        let version = r.u8()?;
        if version != LINK_VERSION {
            return Err(FormatError::InvalidMessageVersion {
                msg_type: 0x01,
                version,
            });
        }
        let target_kind = ObjectKind::from_u8(r.u8()?)?;
        let name = r.short_string()?;
        validate_link_name(&name)?;
        let address = r.u64()?;
        Ok(LinkMessage {
            name,
            target_kind,
            address,
        })
    }

    /// Serialize to the message body.
    pub fn serialize(&self) -> Result<Vec<u8>, FormatError> {
        validate_link_name(&self.name)?;
        let mut buf = Vec::with_capacity(12 + self.name.len());
        buf.push(LINK_VERSION);
        buf.push(self.target_kind.to_u8());
        put_short_string(&mut buf, &self.name)?;
        buf.extend_from_slice(&self.address.to_le_bytes());
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let link = LinkMessage::new("Mesh", ObjectKind::Group, 0x1234);
        let parsed = LinkMessage::parse(&link.serialize().unwrap()).unwrap();
        assert_eq!(parsed, link);
    }

    #[test]
    fn dataset_target() {
        let link = LinkMessage::new("values", ObjectKind::Dataset, 96);
        let parsed = LinkMessage::parse(&link.serialize().unwrap()).unwrap();
        assert_eq!(parsed.target_kind, ObjectKind::Dataset);
    }

    #[test]
    fn unicode_name() {
        let link = LinkMessage::new("Maillage_é", ObjectKind::Group, 40);
        let parsed = LinkMessage::parse(&link.serialize().unwrap()).unwrap();
        assert_eq!(parsed.name, "Maillage_é");
    }

    #[test]
    fn invalid_names_rejected() {
        for bad in ["", "a/b", ".", ".."] {
            assert_eq!(
                validate_link_name(bad),
                Err(FormatError::InvalidLinkName(bad.to_string()))
            );
        }
        assert!(validate_link_name("a.b").is_ok());
        assert!(LinkMessage::new("x/y", ObjectKind::Group, 40)
            .serialize()
            .is_err());
    }

    #[test]
    fn truncated_address() {
        let bytes = LinkMessage::new("abc", ObjectKind::Group, 40)
            .serialize()
            .unwrap();
        assert!(LinkMessage::parse(&bytes[..bytes.len() - 3]).is_err());
    }
}
