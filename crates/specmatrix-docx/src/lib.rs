//! # specmatrix-docx
//!
//! Word export of an exam specification matrix.
//!
//! The export has a borderless title block, the heading lines and the main
//! table: three header rows, one body row per content row with the topic
//! cell vertically merged across its group, and three summary rows.
//!
//! ```no_run
//! use specmatrix_core::{MatrixData, MatrixView};
//!
//! # fn example(data: MatrixData) -> specmatrix_docx::Result<()> {
//! let view = MatrixView::new(data);
//! let path = specmatrix_docx::export_to_path(&view, "out")?;
//! println!("saved {}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod layout;
pub mod writer;

pub use error::{ExportError, Result};
pub use layout::{build_document, ExportCell, ExportDocument, ExportTable, VMerge};
pub use writer::write_docx;

use specmatrix_core::{MatrixData, MatrixView};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Fixed prefix of exported file names.
pub const FILE_PREFIX: &str = "Ma_Tran_Dac_Ta";

/// File name for an export, e.g. `Ma_Tran_Dac_Ta_Toán 8_8.docx`.
///
/// Path separators and other characters not allowed in file names are
/// replaced with `-`.
///
/// ```
/// use specmatrix_core::MatrixData;
/// use specmatrix_docx::export_file_name;
///
/// let data = MatrixData {
///     subject: "Toán 8".to_string(),
///     grade: "8".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(export_file_name(&data), "Ma_Tran_Dac_Ta_Toán 8_8.docx");
/// ```
#[must_use]
pub fn export_file_name(data: &MatrixData) -> String {
    let clean = |part: &str| -> String {
        part.trim()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
                c if c.is_control() => '-',
                c => c,
            })
            .collect()
    };
    format!(
        "{FILE_PREFIX}_{}_{}.docx",
        clean(&data.subject),
        clean(&data.grade)
    )
}

/// Serialize `view` into DOCX bytes.
///
/// # Errors
///
/// Returns [`ExportError::Package`] when the package cannot be assembled.
pub fn export_bytes(view: &MatrixView) -> Result<Vec<u8>> {
    let document = ExportDocument::from_view(view);
    let mut buffer = Cursor::new(Vec::new());
    write_docx(&document, &mut buffer)?;
    Ok(buffer.into_inner())
}

/// Export `view` into `dir` under [`export_file_name`] and return the path.
///
/// The whole document is built in memory first, so a failure never leaves a
/// partially written file behind.
///
/// # Errors
///
/// Returns an error when the package cannot be assembled or the directory
/// cannot be created or written.
pub fn export_to_path(view: &MatrixView, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let bytes = export_bytes(view)?;
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = dir.join(export_file_name(view.data()));
    fs::write(&path, &bytes)?;
    log::info!("exported {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}
