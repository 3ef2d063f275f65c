//! A generation result together with its derived views.

use crate::grouping::{markers_from_spans, topic_spans, GroupMarker};
use crate::model::{MatrixData, MatrixRow};
use crate::totals::{compute_totals, AggregateTotals};

/// One displayed matrix: the result as received plus spans and totals.
///
/// The view is built in one step from a complete [`MatrixData`] and is never
/// patched afterwards. A new generation result produces a new view.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixView {
    data: MatrixData,
    spans: Vec<usize>,
    totals: AggregateTotals,
}

impl MatrixView {
    #[must_use]
    pub fn new(data: MatrixData) -> Self {
        let spans = topic_spans(&data.rows);
        let totals = compute_totals(&data.rows);
        log::debug!(
            "matrix view: {} rows, {} topic groups, {} questions",
            data.rows.len(),
            spans.iter().filter(|&&span| span > 0).count(),
            totals.grand_total()
        );
        Self {
            data,
            spans,
            totals,
        }
    }

    #[inline]
    #[must_use]
    pub const fn data(&self) -> &MatrixData {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn spans(&self) -> &[usize] {
        &self.spans
    }

    #[inline]
    #[must_use]
    pub const fn totals(&self) -> &AggregateTotals {
        &self.totals
    }

    /// Vertical merge markers for the topic column.
    #[must_use]
    pub fn markers(&self) -> Vec<GroupMarker> {
        markers_from_spans(&self.spans)
    }

    /// Rows paired with their topic span, in original order.
    pub fn rows_with_spans(&self) -> impl Iterator<Item = (&MatrixRow, usize)> + '_ {
        self.data.rows.iter().zip(self.spans.iter().copied())
    }

    /// Give back the underlying result.
    #[must_use]
    pub fn into_data(self) -> MatrixData {
        self.data
    }
}

impl From<MatrixData> for MatrixView {
    fn from(data: MatrixData) -> Self {
        Self::new(data)
    }
}
