//! Error contracts for the line-addressable byte store.

use std::error::Error;
use std::fmt;

/// Failures surfaced by store open, mapping, and addressing operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The path does not name an existing regular file.
    NotFound { path: String },
    /// The file is zero-length and has no valid mapping target.
    EmptyFile { path: String },
    /// Creating or replacing the memory map failed.
    MapFailed { message: String },
    /// An offset or coordinate fell outside the mapped buffer.
    OutOfRange { position: u64, length: u64 },
    /// A line/column pair does not address any byte in the buffer.
    NoSuchLineColumn { line: u64, column: u64 },
    /// An underlying file-system operation failed.
    Io { message: String },
}

impl StoreError {
    /// Wraps an I/O error with its display text preserved.
    pub(crate) fn io(error: &std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }

    /// Wraps a mapping failure with its display text preserved.
    pub(crate) fn map_failed(error: &std::io::Error) -> Self {
        Self::MapFailed {
            message: error.to_string(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "file not found: {path}"),
            Self::EmptyFile { path } => {
                write!(f, "cannot map zero-length file: {path}")
            }
            Self::MapFailed { message } => write!(f, "memory map failed: {message}"),
            Self::OutOfRange { position, length } => {
                write!(f, "position {position} out of range for length {length}")
            }
            Self::NoSuchLineColumn { line, column } => {
                write!(f, "no byte at line {line}, column {column}")
            }
            Self::Io { message } => write!(f, "i/o failure: {message}"),
        }
    }
}

impl Error for StoreError {}
