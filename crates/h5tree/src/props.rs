//! Property lists for opening containers and creating datasets.

/// Default cap on the convenience member list of a group.
pub const DEFAULT_MAX_MEMBERS: usize = 1000;

/// Container access properties.
#[derive(Debug, Clone)]
pub struct AccessProps {
    /// Maximum number of entries [`crate::Group::member_list`] loads.
    ///
    /// Groups with more members are silently truncated in that list. The
    /// indexed API on [`crate::Container`] is unaffected.
    pub max_members: usize,
    /// Memory-map files opened read-only (requires the `mmap` feature).
    pub use_mmap: bool,
}

impl Default for AccessProps {
    fn default() -> Self {
        Self {
            max_members: DEFAULT_MAX_MEMBERS,
            use_mmap: cfg!(feature = "mmap"),
        }
    }
}

impl AccessProps {
    /// Create default access properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the member list cap.
    pub fn max_members(mut self, n: usize) -> Self {
        self.max_members = n;
        self
    }

    /// Enable or disable memory mapping for read-only opens.
    pub fn mmap(mut self, enabled: bool) -> Self {
        self.use_mmap = enabled;
        self
    }
}

/// Dataset creation properties.
#[derive(Debug, Clone, Default)]
pub struct DatasetProps {
    /// Dataset dimensions. Defaults to one dimension of the element count.
    pub shape: Option<Vec<u64>>,
    /// Deflate compression level (0-9).
    pub deflate_level: Option<u32>,
}

impl DatasetProps {
    /// Create default dataset creation properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dataset shape.
    pub fn shape(mut self, dims: &[u64]) -> Self {
        self.shape = Some(dims.to_vec());
        self
    }

    /// Set deflate compression level (0-9).
    pub fn deflate(mut self, level: u32) -> Self {
        self.deflate_level = Some(level);
        self
    }
}
