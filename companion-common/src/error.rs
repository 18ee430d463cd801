//! Common error types for the companion services

use thiserror::Error;

use crate::dates::DateFormatError;

/// Common result type for companion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the companion crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A date string matched no known layout or named an impossible day
    #[error(transparent)]
    DateFormat(#[from] DateFormatError),
}
