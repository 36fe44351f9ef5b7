//! Filter pipeline message (type 0x06) and the deflate filter.
//!
//! Body: version u8 | filter count u8 | reserved u16, then per filter:
//! id u16 | flags u16 | client value count u16 | client values u32 * n.

use std::io::{Read, Write};

use crate::bytes::FieldReader;
use crate::error::FormatError;

const PIPELINE_VERSION: u8 = 1;

/// Filter id for zlib deflate. Client value 0 is the compression level.
pub const FILTER_DEFLATE: u16 = 1;

/// One filter in a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDescription {
    pub id: u16,
    pub flags: u16,
    pub client_data: Vec<u32>,
}

/// Ordered chain of filters applied to raw data on write and reversed on read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterPipeline {
    pub filters: Vec<FilterDescription>,
}

impl FilterPipeline {
    /// A pipeline with a single deflate filter at `level` (clamped to 0..=9).
    pub fn deflate(level: u32) -> Self {
        Self {
            filters: vec![FilterDescription {
                id: FILTER_DEFLATE,
                flags: 0,
                client_data: vec![level.min(9)],
            }],
        }
    }

    /// True when no filters are configured.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Parse a filter pipeline message body.
    pub fn parse(data: &[u8]) -> Result<FilterPipeline, FormatError> {
        let mut r = FieldReader::new(data);
        let version = r.u8()?;
        if version != PIPELINE_VERSION {
            return Err(FormatError::InvalidMessageVersion {
                msg_type: 0x06,
                version,
            });
        }
        let count = r.u8()? as usize;
        let _reserved = r.u16()?;
        let mut filters = Vec::with_capacity(count);
        for _ in 0..count {
            let id = r.u16()?;
            let flags = r.u16()?;
            let n = r.u16()? as usize;
            let mut client_data = Vec::with_capacity(n);
            for _ in 0..n {
                client_data.push(r.u32()?);
            }
            filters.push(FilterDescription {
                id,
                flags,
                client_data,
            });
        }
        Ok(FilterPipeline { filters })
    }

    /// Serialize to the message body.
    pub fn serialize(&self) -> Result<Vec<u8>, FormatError> {
        let count = u8::try_from(self.filters.len())
            .map_err(|_| FormatError::FieldOverflow("filter count"))?;
        let mut buf = vec![PIPELINE_VERSION, count, 0, 0];
        for f in &self.filters {
            let n = u16::try_from(f.client_data.len())
                .map_err(|_| FormatError::FieldOverflow("filter client data"))?;
            buf.extend_from_slice(&f.id.to_le_bytes());
            buf.extend_from_slice(&f.flags.to_le_bytes());
            buf.extend_from_slice(&n.to_le_bytes());
            for v in &f.client_data {
                buf.extend_from_slice(&v.to_le_bytes());
            }
        }
        Ok(buf)
    }

    /// Run raw data forward through every filter.
    pub fn apply(&self, data: &[u8]) -> Result<Vec<u8>, FormatError> {
        let mut buf = data.to_vec();
        for f in &self.filters {
            buf = match f.id {
                FILTER_DEFLATE => {
                    let level = f.client_data.first().copied().unwrap_or(6);
                    deflate_compress(&buf, level)?
                }
                other => return Err(FormatError::UnsupportedFilter(other)),
            };
        }
        Ok(buf)
    }

    /// Undo the pipeline, last filter first.
    ///
    /// No stage may decode to more than `max_len` bytes; a stream that
    /// would is rejected with [`FormatError::DataSizeMismatch`] without
    /// being inflated further.
    pub fn reverse(&self, data: &[u8], max_len: usize) -> Result<Vec<u8>, FormatError> {
        let mut buf = data.to_vec();
        for f in self.filters.iter().rev() {
            buf = match f.id {
                FILTER_DEFLATE => deflate_decompress(&buf, max_len)?,
                other => return Err(FormatError::UnsupportedFilter(other)),
            };
        }
        Ok(buf)
    }
}

fn deflate_compress(data: &[u8], level: u32) -> Result<Vec<u8>, FormatError> {
    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::new(level.min(9)));
    encoder
        .write_all(data)
        .map_err(|e| FormatError::Filter(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| FormatError::Filter(e.to_string()))
}

fn deflate_decompress(data: &[u8], max_len: usize) -> Result<Vec<u8>, FormatError> {
    let limit = u64::try_from(max_len)
        .map_err(|_| FormatError::FieldOverflow("decoded length"))?
        .saturating_add(1);
    let mut decoder = flate2::read::ZlibDecoder::new(data).take(limit);
    let mut result = Vec::new();
    decoder
        .read_to_end(&mut result)
        .map_err(|e| FormatError::Filter(e.to_string()))?;
    if result.len() > max_len {
        return Err(FormatError::DataSizeMismatch {
            expected: max_len,
            actual: result.len(),
        });
    }
    Ok(result)
}
