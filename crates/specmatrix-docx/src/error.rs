use thiserror::Error;

/// Errors from writing an export file.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The office package could not be assembled.
    #[error("Failed to write DOCX package: {0}")]
    Package(String),
}

/// Type alias for [`Result<T, ExportError>`].
pub type Result<T> = std::result::Result<T, ExportError>;
