//! Dataset handles.

use h5tree_format::error::FormatError;

use crate::container::Container;
use crate::error::{Error, Result};
use crate::member::ObjectId;
use crate::record::DatasetRecord;
use crate::types::{DType, DatasetData};

/// A handle to a dataset inside an open [`Container`].
#[derive(Debug, Clone)]
pub struct Dataset<'c> {
    container: &'c Container,
    id: ObjectId,
    name: String,
    full_name: String,
}

impl<'c> Dataset<'c> {
    pub(crate) fn new(container: &'c Container, id: ObjectId, name: &str, full_name: String) -> Self {
        Self {
            container,
            id,
            name: name.to_string(),
            full_name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn container(&self) -> &'c Container {
        self.container
    }

    /// Element type.
    pub fn dtype(&self) -> Result<DType> {
        let ds = self.record()?;
        DType::from_datatype(&ds.datatype)
            .ok_or_else(|| Error::UnsupportedType(format!("{:?}", ds.datatype)))
    }

    /// Dimensions, slowest-varying first.
    pub fn shape(&self) -> Result<Vec<u64>> {
        Ok(self.record()?.dataspace.dimensions)
    }

    /// Total element count.
    pub fn len(&self) -> Result<usize> {
        let n = self
            .record()?
            .dataspace
            .num_elements()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(FormatError::FieldOverflow("dataset element count"))?;
        Ok(n)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Read all elements in their stored type.
    pub fn read_data(&self) -> Result<DatasetData> {
        let dtype = self.dtype()?;
        let count = self.len()?;
        let bytes = self.container.dataset_bytes(self.id, &self.full_name)?;
        Ok(DatasetData::from_le_bytes(dtype, count, &bytes)?)
    }

    /// Read as `f64`. Fails with [`Error::TypeMismatch`] for other element types.
    pub fn read_f64(&self) -> Result<Vec<f64>> {
        match self.read_typed(DType::F64)? {
            DatasetData::F64(v) => Ok(v),
            other => Err(mismatch(DType::F64, &other)),
        }
    }

    pub fn read_f32(&self) -> Result<Vec<f32>> {
        match self.read_typed(DType::F32)? {
            DatasetData::F32(v) => Ok(v),
            other => Err(mismatch(DType::F32, &other)),
        }
    }

    pub fn read_i32(&self) -> Result<Vec<i32>> {
        match self.read_typed(DType::I32)? {
            DatasetData::I32(v) => Ok(v),
            other => Err(mismatch(DType::I32, &other)),
        }
    }

    pub fn read_i64(&self) -> Result<Vec<i64>> {
        match self.read_typed(DType::I64)? {
            DatasetData::I64(v) => Ok(v),
            other => Err(mismatch(DType::I64, &other)),
        }
    }

    pub fn read_u8(&self) -> Result<Vec<u8>> {
        match self.read_typed(DType::U8)? {
            DatasetData::U8(v) => Ok(v),
            other => Err(mismatch(DType::U8, &other)),
        }
    }

    /// True when the stored bytes pass through a filter pipeline.
    pub fn is_compressed(&self) -> Result<bool> {
        Ok(!self.record()?.pipeline.is_empty())
    }

    fn read_typed(&self, requested: DType) -> Result<DatasetData> {
        let actual = self.dtype()?;
        if actual != requested {
            return Err(Error::TypeMismatch { requested, actual });
        }
        self.read_data()
    }

    fn record(&self) -> Result<DatasetRecord> {
        self.container
            .record(self.id)?
            .dataset
            .clone()
            .ok_or_else(|| Error::NotADataset(self.full_name.clone()))
    }
}

fn mismatch(requested: DType, data: &DatasetData) -> Error {
    Error::TypeMismatch {
        requested,
        actual: data.dtype(),
    }
}
