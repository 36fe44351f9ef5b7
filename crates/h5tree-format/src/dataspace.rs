//! Dataspace message (type 0x03): version u8 | rank u8 | reserved u16 | dims u64 * rank.

use crate::bytes::FieldReader;
use crate::error::FormatError;

const DATASPACE_VERSION: u8 = 1;

/// Dataset shape. Rank 0 is a scalar holding one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataspace {
    /// Current dimension sizes, slowest-varying first.
    pub dimensions: Vec<u64>,
}

impl Dataspace {
    /// A simple dataspace with the given dimensions.
    pub fn simple(dimensions: &[u64]) -> Self {
        Self {
            dimensions: dimensions.to_vec(),
        }
    }

    /// A scalar dataspace.
    pub fn scalar() -> Self {
        Self {
            dimensions: Vec::new(),
        }
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    /// Total element count, or `None` on overflow.
    pub fn num_elements(&self) -> Option<u64> {
        self.dimensions
            .iter()
            .try_fold(1u64, |acc, &d| acc.checked_mul(d))
    }

    /// Parse a dataspace message body.
    pub fn parse(data: &[u8]) -> Result<Dataspace, FormatError> {
        let mut r = FieldReader::new(data);
        let version = r.u8()?;
        if version != DATASPACE_VERSION {
            return Err(FormatError::InvalidMessageVersion {
                msg_type: 0x03,
                version,
            });
        }
        let rank = r.u8()? as usize;
        let _reserved = r.u16()?;
        let mut dimensions = Vec::with_capacity(rank);
        for _ in 0..rank {
            dimensions.push(r.u64()?);
        }
        Ok(Dataspace { dimensions })
    }

    /// Serialize to the message body.
    pub fn serialize(&self) -> Result<Vec<u8>, FormatError> {
        let rank =
            u8::try_from(self.rank()).map_err(|_| FormatError::FieldOverflow("dataspace rank"))?;
        let mut buf = Vec::with_capacity(4 + 8 * self.rank());
        buf.push(DATASPACE_VERSION);
        buf.push(rank);
        buf.extend_from_slice(&[0, 0]);
        for d in &self.dimensions {
            buf.extend_from_slice(&d.to_le_bytes());
        }
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_2d() {
        let ds = Dataspace::simple(&[3, 4]);
        let parsed = Dataspace::parse(&ds.serialize().unwrap()).unwrap();
        assert_eq!(parsed.dimensions, vec![3, 4]);
        assert_eq!(parsed.num_elements(), Some(12));
    }

    #[test]
    fn scalar_has_one_element() {
        let ds = Dataspace::scalar();
        let parsed = Dataspace::parse(&ds.serialize().unwrap()).unwrap();
        assert_eq!(parsed.rank(), 0);
        assert_eq!(parsed.num_elements(), Some(1));
    }

    #[test]
    fn zero_extent() {
        assert_eq!(Dataspace::simple(&[0, 5]).num_elements(), Some(0));
    }

    #[test]
    fn overflow_detected() {
        assert_eq!(Dataspace::simple(&[u64::MAX, 2]).num_elements(), None);
    }

    #[test]
    fn bad_version() {
        let data = [9u8, 0, 0, 0];
        assert_eq!(
            Dataspace::parse(&data),
            Err(FormatError::InvalidMessageVersion {
                msg_type: 0x03,
                version: 9
            })
        );
    }

    #[test]
    fn truncated_dims() {
        let data = [1u8, 2, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0];
        assert!(Dataspace::parse(&data).is_err());
    }
}
