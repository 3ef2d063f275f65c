//! Source documents sent to the generation service.
//!
//! A source is a local image or PDF of an existing exam matrix, or a
//! template whose layout the generated matrix should follow. Files are read
//! whole and base64-encoded for inline transport.

use crate::error::{MatrixError, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Role of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Matrix to analyse
    MatrixSource,
    /// Layout sample to imitate
    TemplateSource,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MatrixSource => write!(f, "matrix"),
            Self::TemplateSource => write!(f, "template"),
        }
    }
}

/// A local file selected for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: SourceKind,
    pub mime_type: &'static str,
    /// Size in bytes at load time
    pub size: u64,
}

/// Inline payload as sent to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePayload {
    pub mime_type: String,
    /// Standard base64 of the file content
    pub data: String,
}

impl SourceFile {
    /// Check the file exists and detect its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::UnsupportedSource`] for unknown extensions and
    /// [`MatrixError::IoError`] when the file cannot be read.
    pub fn load(path: impl AsRef<Path>, kind: SourceKind) -> Result<Self> {
        let path = path.as_ref();
        let mime_type =
            mime_type_for(path).ok_or_else(|| MatrixError::UnsupportedSource(path.to_path_buf()))?;
        let size = fs::metadata(path)?.len();

        Ok(Self {
            path: path.to_path_buf(),
            kind,
            mime_type,
            size,
        })
    }

    /// Read and encode the file.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::IoError`] when the file cannot be read.
    pub fn payload(&self) -> Result<FilePayload> {
        let bytes = fs::read(&self.path)?;
        log::debug!(
            "encoding {} ({}, {})",
            self.path.display(),
            self.mime_type,
            format_file_size(bytes.len() as u64)
        );
        Ok(FilePayload {
            mime_type: self.mime_type.to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        })
    }

    /// File name for listings.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |name| name.to_string_lossy().to_string(),
        )
    }
}

/// MIME type accepted by the service for a file extension.
#[must_use]
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Human-readable size with a 1024 base, e.g. `"1.5 KB"`.
///
/// ```
/// use specmatrix_core::source::format_file_size;
///
/// assert_eq!(format_file_size(0), "0 Bytes");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mime_detection() {
        assert_eq!(mime_type_for(Path::new("a.PDF")), Some("application/pdf"));
        assert_eq!(mime_type_for(Path::new("scan.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("scan.JPG")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("notes.txt")), None);
        assert_eq!(mime_type_for(Path::new("README")), None);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2 MB");
        assert_eq!(format_file_size(1_288_490_189), "1.2 GB");
    }

    #[test]
    fn test_load_and_encode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.png");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"hello").unwrap();

        let source = SourceFile::load(&path, SourceKind::MatrixSource).unwrap();
        assert_eq!(source.mime_type, "image/png");
        assert_eq!(source.size, 5);
        assert_eq!(source.display_name(), "matrix.png");

        let payload = source.payload().unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.data, "aGVsbG8=");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "x").unwrap();

        let err = SourceFile::load(&path, SourceKind::MatrixSource).unwrap_err();
        assert!(matches!(err, MatrixError::UnsupportedSource(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SourceFile::load("/nonexistent/matrix.pdf", SourceKind::TemplateSource)
            .unwrap_err();
        assert!(matches!(err, MatrixError::IoError(_)));
    }
}
