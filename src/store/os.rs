//! File-open collaborators for the byte store.

use std::fs;
use std::path::Path;

use crate::store::error::StoreError;
use crate::store::file::LineFile;
use crate::store::write_file::WriteFile;

/// Returns whether `path` names an existing regular file.
pub fn exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path.as_ref())
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

/// Returns whether `path` names an existing directory.
pub fn directory_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path.as_ref())
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}

/// Opens an existing file as a read-only store with a private map.
pub fn open_read_only(path: impl AsRef<Path>) -> Result<LineFile, StoreError> {
    LineFile::open(path, false)
}

/// Opens an existing file as a writable store with a shared map.
pub fn open_read_write(path: impl AsRef<Path>) -> Result<LineFile, StoreError> {
    LineFile::open(path, true)
}

/// Creates (or truncates) an empty file with read/write access.
///
/// A zero-length file cannot be mapped, so the result is an unmapped
/// [`WriteFile`] rather than a store.
pub fn create_empty(path: impl AsRef<Path>) -> Result<WriteFile, StoreError> {
    WriteFile::create(path)
}
