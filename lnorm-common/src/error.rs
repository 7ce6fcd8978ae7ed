//! Common error types for lnorm

use thiserror::Error;

/// Common result type for lnorm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the lnorm crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings loading, parsing or writing error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
