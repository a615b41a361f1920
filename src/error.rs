//! Unified error types for postpack.
//!
//! This module provides a single [`PostpackError`] enum that covers all
//! error cases in the library. Per-line ingestion failures are NOT errors:
//! they become [`DiscardReason`](crate::extract::DiscardReason) entries in
//! the batch report and never cross the batch boundary. The variants here
//! are the caller-level failures — I/O, output serialization, invalid
//! query dates, unknown layout/format names.
//!
//! # Error Handling Philosophy
//!
//! - **Library users** get typed errors they can match on
//! - **Application users** get clear, actionable error messages
//! - **Developers** get source error chains for debugging

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for postpack operations.
///
/// # Example
///
/// ```rust
/// use postpack::error::Result;
/// use postpack::Record;
///
/// fn my_function() -> Result<Vec<Record>> {
///     // ... operations that may fail
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, PostpackError>;

/// The error type for all postpack operations.
///
/// Each variant contains context about what went wrong and, where
/// applicable, the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PostpackError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input file doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing output)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A name or value doesn't match the expected structure.
    ///
    /// This occurs when:
    /// - An unknown layout name is requested
    /// - An output path has an unrecognized extension
    /// - An output format's feature is not enabled
    #[error("Invalid {what}: {message}")]
    InvalidFormat {
        /// What was being interpreted (e.g., "layout", "output")
        what: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// Invalid date in a search query.
    ///
    /// Date bounds expect YYYY-MM-DD format.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// UTF-8 encoding error.
    ///
    /// Occurs when produced output is not valid UTF-8.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[cfg(feature = "json-output")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl From<std::string::FromUtf8Error> for PostpackError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        PostpackError::Utf8 {
            context: "output conversion".to_string(),
            source: err,
        }
    }
}

impl PostpackError {
    /// Creates an invalid format error.
    pub fn invalid_format(what: &'static str, message: impl Into<String>) -> Self {
        PostpackError::InvalidFormat {
            what,
            message: message.into(),
        }
    }

    /// Creates an invalid date error for query bounds.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        PostpackError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }
}
