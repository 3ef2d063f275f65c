//! # specmatrix-core
//!
//! Data model and table logic for exam specification matrices.
//!
//! A matrix is a flat, ordered list of content rows, each tagged with a
//! topic and carrying eight question counters (four cognitive levels times
//! two question types). This crate turns that list into what a table needs:
//!
//! 1. [`topic_spans`] - vertical grouping of consecutive same-topic rows for
//!    merged topic cells, with [`group_markers`] as the start/continue view
//!    used by the document export
//! 2. [`compute_totals`] - per-column sums for the summary rows
//!
//! Both are pure functions over the row slice and are recomputed whenever a
//! new result arrives ([`MatrixView`]).
//!
//! ## Example
//!
//! ```
//! use specmatrix_core::{MatrixData, MatrixRow, MatrixView};
//!
//! let row = |topic: &str, recognition_tn| MatrixRow {
//!     topic: topic.to_string(),
//!     recognition_tn,
//!     ..Default::default()
//! };
//! let data = MatrixData {
//!     rows: vec![row("Số hữu tỉ", 2.0), row("Số hữu tỉ", 1.0), row("Hình học", 3.0)],
//!     ..Default::default()
//! };
//!
//! let view = MatrixView::new(data);
//! assert_eq!(view.spans(), &[2, 0, 1]);
//! assert_eq!(view.totals().recognition_tn, 6.0);
//! ```
//!
//! ## Modules
//!
//! - [`model`] - rows, summary, result and requested configuration
//! - [`grouping`] - topic spans and merge markers
//! - [`totals`] - aggregate column totals
//! - [`presentation`] - zero-as-blank cell text
//! - [`reconcile`] - optional checks of the reported summary
//! - [`render`] - terminal and HTML output
//! - [`source`] - source files and their inline payloads

pub mod error;
pub mod grouping;
pub mod labels;
pub mod model;
pub mod presentation;
pub mod reconcile;
pub mod render;
pub mod source;
pub mod totals;
pub mod view;

pub use error::{MatrixError, Result};
pub use grouping::{group_markers, topic_groups, topic_spans, GroupMarker, TopicGroup};
pub use model::{
    CognitiveLevel, LevelConfig, MatrixConfig, MatrixData, MatrixRow, MatrixSummary, QuestionType,
};
pub use reconcile::{reconcile, Discrepancy};
pub use source::{FilePayload, SourceFile, SourceKind};
pub use totals::{compute_totals, AggregateTotals};
pub use view::MatrixView;
