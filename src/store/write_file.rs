//! Unmapped random-access file writer.
//!
//! Backs `create_empty`: a zero-length file has no valid mapping target, so
//! new files are grown through this plain descriptor wrapper before a
//! [`crate::store::LineFile`] can take over.

use std::fs::{File, OpenOptions};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use crate::store::error::StoreError;

/// Plain read/write file without a mapping.
pub struct WriteFile {
    file: File,
    path: PathBuf,
}

impl WriteFile {
    /// Creates or truncates `path` with read/write access.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|error| StoreError::io(&error))?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current file length.
    pub fn length(&self) -> Result<u64, StoreError> {
        Ok(self
            .file
            .metadata()
            .map_err(|error| StoreError::io(&error))?
            .len())
    }

    /// Truncates or extends the file.
    pub fn set_length(&self, new_length: u64) -> Result<(), StoreError> {
        self.file
            .set_len(new_length)
            .map_err(|error| StoreError::io(&error))
    }

    /// Reads at an absolute offset.
    pub fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize, StoreError> {
        self.file
            .read_at(buf, offset)
            .map_err(|error| StoreError::io(&error))
    }

    /// Writes at an absolute offset.
    pub fn write_at(&self, buf: &[u8], offset: u64) -> Result<usize, StoreError> {
        self.file
            .write_at(buf, offset)
            .map_err(|error| StoreError::io(&error))
    }

    /// Flushes file contents to stable storage.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.file
            .sync_all()
            .map_err(|error| StoreError::io(&error))
    }
}
