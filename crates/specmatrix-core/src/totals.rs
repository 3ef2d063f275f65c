//! Aggregate question totals per cognitive level and question type.
//!
//! Totals are a plain fold over the rows. Values are summed as received:
//! negative, fractional or otherwise anomalous counters propagate into the
//! totals rather than being rejected or clamped. Sums are `f64`, so the fold
//! cannot fail for any input; a magnitude beyond `f64::MAX` saturates to
//! infinity.

use crate::model::{CognitiveLevel, MatrixRow, QuestionType};
use serde::{Deserialize, Serialize};

/// Column sums over all rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateTotals {
    pub recognition_tn: f64,
    pub recognition_tl: f64,
    pub understanding_tn: f64,
    pub understanding_tl: f64,
    pub application_tn: f64,
    pub application_tl: f64,
    pub high_application_tn: f64,
    pub high_application_tl: f64,
}

impl AggregateTotals {
    /// Sum for one level and question type.
    #[inline]
    #[must_use = "returns the column total"]
    pub const fn get(&self, level: CognitiveLevel, question_type: QuestionType) -> f64 {
        match (level, question_type) {
            (CognitiveLevel::Recognition, QuestionType::MultipleChoice) => self.recognition_tn,
            (CognitiveLevel::Recognition, QuestionType::FreeResponse) => self.recognition_tl,
            (CognitiveLevel::Understanding, QuestionType::MultipleChoice) => self.understanding_tn,
            (CognitiveLevel::Understanding, QuestionType::FreeResponse) => self.understanding_tl,
            (CognitiveLevel::Application, QuestionType::MultipleChoice) => self.application_tn,
            (CognitiveLevel::Application, QuestionType::FreeResponse) => self.application_tl,
            (CognitiveLevel::HighApplication, QuestionType::MultipleChoice) => {
                self.high_application_tn
            }
            (CognitiveLevel::HighApplication, QuestionType::FreeResponse) => {
                self.high_application_tl
            }
        }
    }

    /// Both question types of a level combined.
    #[inline]
    #[must_use]
    pub fn level_total(&self, level: CognitiveLevel) -> f64 {
        self.get(level, QuestionType::MultipleChoice) + self.get(level, QuestionType::FreeResponse)
    }

    /// Sum of all eight columns.
    #[must_use]
    pub fn grand_total(&self) -> f64 {
        CognitiveLevel::ALL
            .iter()
            .map(|&level| self.level_total(level))
            .sum()
    }

    /// Add one row's counters.
    #[must_use = "returns the accumulated totals"]
    pub fn add_row(self, row: &MatrixRow) -> Self {
        Self {
            recognition_tn: self.recognition_tn + row.recognition_tn,
            recognition_tl: self.recognition_tl + row.recognition_tl,
            understanding_tn: self.understanding_tn + row.understanding_tn,
            understanding_tl: self.understanding_tl + row.understanding_tl,
            application_tn: self.application_tn + row.application_tn,
            application_tl: self.application_tl + row.application_tl,
            high_application_tn: self.high_application_tn + row.high_application_tn,
            high_application_tl: self.high_application_tl + row.high_application_tl,
        }
    }
}

/// Fold all rows into column totals. Empty input gives all zeros.
///
/// # Examples
///
/// ```
/// use specmatrix_core::{compute_totals, MatrixRow};
///
/// let rows: Vec<MatrixRow> = [2.0, 0.0, 1.5]
///     .iter()
///     .map(|&n| MatrixRow { recognition_tn: n, ..Default::default() })
///     .collect();
///
/// assert_eq!(compute_totals(&rows).recognition_tn, 3.5);
/// ```
#[must_use = "computes aggregate totals"]
pub fn compute_totals(rows: &[MatrixRow]) -> AggregateTotals {
    rows.iter()
        .fold(AggregateTotals::default(), AggregateTotals::add_row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(counts: [f64; 8]) -> MatrixRow {
        MatrixRow {
            recognition_tn: counts[0],
            recognition_tl: counts[1],
            understanding_tn: counts[2],
            understanding_tl: counts[3],
            application_tn: counts[4],
            application_tl: counts[5],
            high_application_tn: counts[6],
            high_application_tl: counts[7],
            ..Default::default()
        }
    }

    fn recognition(value: f64) -> MatrixRow {
        row([value, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
    }

    #[test]
    fn test_empty_rows() {
        let totals = compute_totals(&[]);
        assert_eq!(totals, AggregateTotals::default());
        assert_eq!(totals.grand_total(), 0.0);
    }

    #[test]
    fn test_fields_are_independent() {
        let rows = vec![
            row([1.0, 0.0, 2.0, 0.0, 0.0, 1.0, 0.0, 0.0]),
            row([3.0, 1.0, 0.0, 2.0, 0.0, 3.0, 0.0, 1.0]),
        ];
        let totals = compute_totals(&rows);

        assert_eq!(totals.recognition_tn, 4.0);
        assert_eq!(totals.recognition_tl, 1.0);
        assert_eq!(totals.understanding_tn, 2.0);
        assert_eq!(totals.understanding_tl, 2.0);
        assert_eq!(totals.application_tn, 0.0);
        assert_eq!(totals.application_tl, 4.0);
        assert_eq!(totals.high_application_tn, 0.0);
        assert_eq!(totals.high_application_tl, 1.0);
        assert_eq!(totals.level_total(CognitiveLevel::Recognition), 5.0);
        assert_eq!(totals.grand_total(), 14.0);
    }

    #[test]
    fn test_negative_values_propagate() {
        let rows = vec![recognition(2.0), recognition(-5.0)];
        assert_eq!(compute_totals(&rows).recognition_tn, -3.0);
    }

    #[test]
    fn test_fractional_values_are_summed_as_received() {
        let rows: Vec<MatrixRow> =
            serde_json::from_str(r#"[{"recognition_tn": 1.5}, {"recognition_tn": 1.5}]"#).unwrap();
        assert_eq!(compute_totals(&rows).recognition_tn, 3.0);
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let rows: Vec<MatrixRow> = serde_json::from_str(&format!(
            r#"[{{"recognition_tn": {}}}, {{"recognition_tn": 1}}, {{"recognition_tl": {}}}]"#,
            i64::MAX,
            i64::MIN
        ))
        .unwrap();
        let totals = compute_totals(&rows);

        assert!(totals.recognition_tn > 9.2e18);
        assert!(totals.recognition_tl < -9.2e18);
        assert!(totals.grand_total().is_finite());
    }

    #[test]
    fn test_values_beyond_f64_range_saturate() {
        let rows = vec![recognition(f64::MAX), recognition(f64::MAX), recognition(f64::MAX)];
        let totals = compute_totals(&rows);

        assert_eq!(totals.recognition_tn, f64::INFINITY);
        assert_eq!(totals.level_total(CognitiveLevel::Recognition), f64::INFINITY);
        assert_eq!(totals.grand_total(), f64::INFINITY);
    }

    #[test]
    fn test_get_matches_row_accessor() {
        let rows = vec![row([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0])];
        let totals = compute_totals(&rows);
        for level in CognitiveLevel::ALL {
            for question_type in QuestionType::ALL {
                assert_eq!(
                    totals.get(level, question_type),
                    rows[0].count(level, question_type)
                );
            }
        }
    }
}
