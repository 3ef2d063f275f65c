//! Topic grouping for merged table cells.
//!
//! Consecutive rows with an identical `topic` form one visual group. The
//! first row of a group owns a cell spanning the whole run; the remaining
//! rows of the run suppress their topic cell.
//!
//! Grouping is computed once here and consumed by every output path: the
//! terminal and HTML renderers read [`topic_spans`] directly, the document
//! export reads the equivalent [`group_markers`]. Both views are derived from
//! the same pass, so they always agree.
//!
//! ## Rules
//!
//! - Row order is significant and never changed.
//! - Topics compare by exact string equality (case and whitespace included).
//! - Only adjacent rows merge: topics `A, B, A` give three separate groups.
//!
//! ## Example
//!
//! ```
//! use specmatrix_core::{topic_spans, MatrixRow};
//!
//! let rows: Vec<MatrixRow> = ["A", "A", "B", "A"]
//!     .iter()
//!     .map(|topic| MatrixRow { topic: (*topic).to_string(), ..Default::default() })
//!     .collect();
//!
//! assert_eq!(topic_spans(&rows), vec![2, 0, 1, 1]);
//! ```

use crate::model::MatrixRow;

/// Vertical merge state of a row's topic cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupMarker {
    /// The row opens a new merged region.
    Start,
    /// The row continues the region opened by an earlier row.
    Continue,
}

impl GroupMarker {
    /// Whether the row owns its topic cell.
    #[inline]
    #[must_use]
    pub const fn is_start(self) -> bool {
        matches!(self, Self::Start)
    }
}

/// A contiguous run of rows sharing one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicGroup<'a> {
    pub topic: &'a str,
    /// Index of the owning row
    pub start: usize,
    /// Number of rows in the run (always at least 1)
    pub len: usize,
}

/// Compute the topic span of every row.
///
/// The owner of each contiguous same-topic run gets the run length; every
/// other row in the run gets 0. The spans always sum to `rows.len()`.
#[must_use = "computes topic spans"]
pub fn topic_spans(rows: &[MatrixRow]) -> Vec<usize> {
    spans_by(rows, |row| row.topic.as_str())
}

/// Run-length spans over any key.
///
/// Single forward pass; `owner` tracks the index of the current run's first
/// item and is moved whenever the key differs from the previous item's.
#[must_use = "computes run-length spans"]
pub fn spans_by<'a, T, K, F>(items: &'a [T], key: F) -> Vec<usize>
where
    K: PartialEq,
    F: Fn(&'a T) -> K,
{
    let mut spans = vec![0; items.len()];
    let mut owner = 0;
    let mut previous: Option<K> = None;

    for (index, item) in items.iter().enumerate() {
        let current = key(item);
        if previous.as_ref() != Some(&current) {
            owner = index;
        }
        spans[owner] += 1;
        previous = Some(current);
    }

    spans
}

/// Start/continue markers for the topic column.
///
/// A row starts a region exactly when its span is positive.
#[must_use = "computes vertical merge markers"]
pub fn group_markers(rows: &[MatrixRow]) -> Vec<GroupMarker> {
    markers_from_spans(&topic_spans(rows))
}

/// Convert precomputed spans into start/continue markers.
#[must_use]
pub fn markers_from_spans(spans: &[usize]) -> Vec<GroupMarker> {
    spans
        .iter()
        .map(|&span| {
            if span > 0 {
                GroupMarker::Start
            } else {
                GroupMarker::Continue
            }
        })
        .collect()
}

/// List the contiguous topic runs in row order.
#[must_use = "collects topic groups"]
pub fn topic_groups(rows: &[MatrixRow]) -> Vec<TopicGroup<'_>> {
    topic_spans(rows)
        .into_iter()
        .enumerate()
        .filter(|&(_, span)| span > 0)
        .map(|(start, len)| TopicGroup {
            topic: rows[start].topic.as_str(),
            start,
            len,
        })
        .collect()
}
