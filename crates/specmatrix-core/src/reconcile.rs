//! Cross-checks between computed totals, reported summary and the request.
//!
//! The summary returned by the generation service is displayed as received.
//! [`reconcile`] only reports where it disagrees with the counted rows or
//! with the requested distribution; callers decide whether to surface it.

use crate::model::{CognitiveLevel, MatrixConfig, MatrixSummary, QuestionType};
use crate::totals::AggregateTotals;
use std::fmt;

/// Tolerance for comparing reported percentages.
const PERCENT_TOLERANCE: f64 = 0.5;

/// One disagreement found by [`reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub enum Discrepancy {
    /// The reported per-level total differs from the counted rows.
    SummaryTotal {
        level: CognitiveLevel,
        counted: f64,
        reported: f64,
    },
    /// The counted rows differ from the requested question count.
    RequestedCount {
        level: CognitiveLevel,
        question_type: QuestionType,
        counted: f64,
        requested: u32,
    },
    /// A combined percentage is not the sum of its two levels.
    CombinedPercent {
        label: &'static str,
        reported: f64,
        expected: f64,
    },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SummaryTotal {
                level,
                counted,
                reported,
            } => write!(
                f,
                "{level}: summary reports {reported} questions, rows add up to {counted}"
            ),
            Self::RequestedCount {
                level,
                question_type,
                counted,
                requested,
            } => write!(
                f,
                "{level} {}: requested {requested}, rows add up to {counted}",
                question_type.label()
            ),
            Self::CombinedPercent {
                label,
                reported,
                expected,
            } => write!(
                f,
                "{label} percentage is {reported}%, levels add up to {expected}%"
            ),
        }
    }
}

/// Compare computed totals with the reported summary and, when given, the
/// requested configuration.
///
/// Counts are compared exactly, fractional ones included.
#[allow(clippy::float_cmp)]
#[must_use = "returns the discrepancies found"]
pub fn reconcile(
    totals: &AggregateTotals,
    summary: &MatrixSummary,
    config: Option<&MatrixConfig>,
) -> Vec<Discrepancy> {
    let mut found = Vec::new();

    for level in CognitiveLevel::ALL {
        let counted = totals.level_total(level);
        let reported = summary.total(level);
        if counted != reported {
            found.push(Discrepancy::SummaryTotal {
                level,
                counted,
                reported,
            });
        }
    }

    if let Some(config) = config {
        for level in CognitiveLevel::ALL {
            for question_type in QuestionType::ALL {
                let counted = totals.get(level, question_type);
                let requested = config.level(level).count(question_type);
                if counted != f64::from(requested) {
                    found.push(Discrepancy::RequestedCount {
                        level,
                        question_type,
                        counted,
                        requested,
                    });
                }
            }
        }
    }

    let basic = summary.percent_recognition + summary.percent_understanding;
    if (summary.general_percent_basic - basic).abs() > PERCENT_TOLERANCE {
        found.push(Discrepancy::CombinedPercent {
            label: "basic",
            reported: summary.general_percent_basic,
            expected: basic,
        });
    }

    let advanced = summary.percent_application + summary.percent_high_application;
    if (summary.general_percent_advanced - advanced).abs() > PERCENT_TOLERANCE {
        found.push(Discrepancy::CombinedPercent {
            label: "advanced",
            reported: summary.general_percent_advanced,
            expected: advanced,
        });
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LevelConfig, MatrixRow};
    use crate::totals::compute_totals;

    fn consistent_summary() -> MatrixSummary {
        MatrixSummary {
            total_recognition: 9.0,
            total_understanding: 7.0,
            total_application: 4.0,
            total_high_application: 1.0,
            percent_recognition: 30.0,
            percent_understanding: 40.0,
            percent_application: 20.0,
            percent_high_application: 10.0,
            general_percent_basic: 70.0,
            general_percent_advanced: 30.0,
        }
    }

    fn matching_rows() -> Vec<MatrixRow> {
        vec![
            MatrixRow {
                recognition_tn: 8.0,
                recognition_tl: 1.0,
                understanding_tn: 4.0,
                ..Default::default()
            },
            MatrixRow {
                understanding_tl: 3.0,
                application_tl: 4.0,
                high_application_tl: 1.0,
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_consistent_result_has_no_discrepancies() {
        let totals = compute_totals(&matching_rows());
        let found = reconcile(&totals, &consistent_summary(), Some(&MatrixConfig::default()));
        assert!(found.is_empty(), "unexpected: {found:?}");
    }

    #[test]
    fn test_summary_total_mismatch() {
        let totals = compute_totals(&matching_rows());
        let mut summary = consistent_summary();
        summary.total_application = 6.0;

        let found = reconcile(&totals, &summary, None);
        assert_eq!(
            found,
            vec![Discrepancy::SummaryTotal {
                level: CognitiveLevel::Application,
                counted: 4.0,
                reported: 6.0,
            }]
        );
        assert_eq!(
            found[0].to_string(),
            "application: summary reports 6 questions, rows add up to 4"
        );
    }

    #[test]
    fn test_requested_count_mismatch() {
        let totals = compute_totals(&matching_rows());
        let mut config = MatrixConfig::default();
        config.high_application = LevelConfig::new(10, 1, 1);

        let found = reconcile(&totals, &consistent_summary(), Some(&config));
        assert_eq!(found.len(), 1);
        assert!(matches!(
            found[0],
            Discrepancy::RequestedCount {
                level: CognitiveLevel::HighApplication,
                question_type: QuestionType::MultipleChoice,
                requested: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_combined_percent_mismatch() {
        let totals = compute_totals(&matching_rows());
        let mut summary = consistent_summary();
        summary.general_percent_advanced = 25.0;

        let found = reconcile(&totals, &summary, None);
        assert_eq!(found.len(), 1);
        assert!(found[0].to_string().starts_with("advanced percentage is 25%"));
    }

    #[test]
    fn test_fractional_rows_are_reported_as_counted() {
        let rows = vec![MatrixRow {
            recognition_tn: 1.5,
            ..Default::default()
        }];
        let summary = MatrixSummary {
            total_recognition: 1.0,
            ..consistent_summary()
        };

        let found = reconcile(&compute_totals(&rows), &summary, None);
        assert_eq!(
            found[0].to_string(),
            "recognition: summary reports 1 questions, rows add up to 1.5"
        );
    }
}
