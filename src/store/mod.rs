//! Line-addressable byte store over memory-mapped files.

pub mod error;
pub mod file;
pub mod os;
pub mod write_file;

pub use error::StoreError;
pub use file::{LineFile, EOB_SENTINEL};
pub use write_file::WriteFile;
