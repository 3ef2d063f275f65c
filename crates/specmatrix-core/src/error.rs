//! Error types for matrix loading, source handling and export plumbing.
//!
//! The grouping and totals transformations are total functions and never
//! produce these errors; everything here concerns the I/O that surrounds them.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised around the matrix core.
///
/// # Examples
///
/// ```rust
/// use specmatrix_core::MatrixError;
///
/// let error = MatrixError::NoSourceFiles;
/// assert_eq!(error.to_string(), "No source files selected");
/// ```
#[derive(Error, Debug)]
pub enum MatrixError {
    /// File I/O error while reading sources or writing results.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    ///
    /// Raised when a saved matrix result cannot be parsed or written.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The source file extension does not map to a MIME type the
    /// generation service accepts.
    #[error("Unsupported source file: {}", .0.display())]
    UnsupportedSource(PathBuf),

    /// No API credential was provided, stored, or found in the environment.
    #[error("No API key configured")]
    MissingCredential,

    /// Generation was requested without any source file.
    #[error("No source files selected")]
    NoSourceFiles,

    /// Writing the office document failed.
    #[error("Export error: {0}")]
    ExportError(String),
}

/// Type alias for [`Result<T, MatrixError>`].
pub type Result<T> = std::result::Result<T, MatrixError>;
