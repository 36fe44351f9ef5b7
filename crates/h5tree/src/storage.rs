//! Backing bytes for read-only containers: an owned buffer or a memory map.

use std::fs;
use std::io;
use std::path::Path;

#[cfg(feature = "mmap")]
use memmap2::Mmap;

/// Whole-file byte image.
pub(crate) enum FileData {
    Owned(Vec<u8>),
    #[cfg(feature = "mmap")]
    Mmap { _file: fs::File, map: Mmap },
}

impl FileData {
    /// Read the file fully into memory.
    pub(crate) fn read(path: &Path) -> io::Result<Self> {
        Ok(FileData::Owned(fs::read(path)?))
    }

    /// Map the file read-only.
    #[cfg(feature = "mmap")]
    pub(crate) fn map(path: &Path) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        // SAFETY: read-only mapping; the container is not modified by this
        // process while a read-only handle is open.
        let map = unsafe { Mmap::map(&file)? };
        Ok(FileData::Mmap { _file: file, map })
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        match self {
            FileData::Owned(v) => v,
            #[cfg(feature = "mmap")]
            FileData::Mmap { map, .. } => map,
        }
    }

    pub(crate) fn is_mmap(&self) -> bool {
        match self {
            FileData::Owned(_) => false,
            #[cfg(feature = "mmap")]
            FileData::Mmap { .. } => true,
        }
    }
}

impl std::fmt::Debug for FileData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileData")
            .field("len", &self.as_bytes().len())
            .field("mmap", &self.is_mmap())
            .finish()
    }
}
