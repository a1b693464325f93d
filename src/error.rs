use std::path::PathBuf;

use thiserror::Error as ThisError;

/// Errors that can occur while building or driving a logger
#[derive(ThisError, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The configured log path does not name a file.
    #[error("Invalid log filename: {0:?}")]
    InvalidFilename(PathBuf),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
