//! Error types for dissect-core.
//!
//! This module provides structured error types for the fallible parts of the
//! crate:
//!
//! - [`enum@Error`] - Main error enum that wraps all error types
//! - [`BufferError`] - Bounds-checked packet buffer reads
//! - [`ConfigError`] - Column format specifiers and display preferences
//!
//! Malformed option regions are *not* errors: the walker reports them as
//! [`Diagnostic`](crate::options::Diagnostic) values inside its result.

use thiserror::Error;

/// Main error type for dissect-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Read outside the captured bytes of a packet buffer
    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),

    /// Invalid column or display configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from bounds-checked packet buffer reads.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// The requested span is not entirely inside the captured data
    #[error("read of {len} bytes at offset {offset} exceeds captured length {captured}")]
    OutOfBounds {
        offset: usize,
        len: usize,
        captured: usize,
    },
}

/// Errors parsing column and display preferences.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Unrecognized `%`-style column format specifier
    #[error("unknown column format: {spec}")]
    UnknownColumnFormat { spec: String },

    /// Unrecognized timestamp display format name
    #[error("unknown timestamp format: {name}")]
    UnknownTimestampFormat { name: String },

    /// Unrecognized timestamp precision name
    #[error("unknown timestamp precision: {name}")]
    UnknownTimestampPrecision { name: String },

    /// A column capacity that cannot hold any text
    #[error("column capacity for {what} must be non-zero")]
    ZeroCapacity { what: &'static str },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
