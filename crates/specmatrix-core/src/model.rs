//! Data model for exam specification matrices.
//!
//! This module defines the structures exchanged with the generation service
//! and consumed by the renderers and the document export:
//!
//! - [`CognitiveLevel`] / [`QuestionType`] - the two axes of the counter grid
//! - [`MatrixRow`] - one examinable content unit with eight counters
//! - [`MatrixSummary`] - percentages reported by the generation service
//! - [`MatrixData`] - header metadata, rows and summary of one result
//! - [`LevelConfig`] / [`MatrixConfig`] - the requested distribution
//!
//! Field names on the wire follow the generation schema (`recognition_tn`,
//! `understanding_tl`, ...), where `tn` is multiple choice and `tl` is free
//! response.

use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Cognitive level of a question, in fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CognitiveLevel {
    /// Recall of facts (Nhận biết)
    Recognition,
    /// Explaining and interpreting (Thông hiểu)
    Understanding,
    /// Applying knowledge to familiar situations (Vận dụng)
    Application,
    /// Applying knowledge to new situations (Vận dụng cao)
    HighApplication,
}

impl CognitiveLevel {
    /// All levels in the order they appear as table columns.
    pub const ALL: [Self; 4] = [
        Self::Recognition,
        Self::Understanding,
        Self::Application,
        Self::HighApplication,
    ];

    /// Column group heading used in rendered and exported tables.
    #[inline]
    #[must_use = "returns the level heading"]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Recognition => "NHẬN BIẾT",
            Self::Understanding => "THÔNG HIỂU",
            Self::Application => "VẬN DỤNG",
            Self::HighApplication => "VẬN DỤNG CAO",
        }
    }

    /// Short heading for narrow terminal output.
    #[inline]
    #[must_use = "returns the level abbreviation"]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Recognition => "NB",
            Self::Understanding => "TH",
            Self::Application => "VD",
            Self::HighApplication => "VDC",
        }
    }

    /// Identifier used in configuration files and on the command line.
    #[inline]
    #[must_use = "returns the level key"]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Recognition => "recognition",
            Self::Understanding => "understanding",
            Self::Application => "application",
            Self::HighApplication => "high_application",
        }
    }
}

impl std::fmt::Display for CognitiveLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Question format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Trắc nghiệm (TN)
    MultipleChoice,
    /// Tự luận (TL)
    FreeResponse,
}

impl QuestionType {
    /// Both types in column order.
    pub const ALL: [Self; 2] = [Self::MultipleChoice, Self::FreeResponse];

    /// Leaf column heading.
    #[inline]
    #[must_use = "returns the question type heading"]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MultipleChoice => "TN",
            Self::FreeResponse => "TL",
        }
    }
}

/// One examinable content unit of the matrix.
///
/// Counters are kept exactly as the generation service sent them. The schema
/// declares them as NUMBER, so negative and fractional values are possible
/// and are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    /// Display-only ordinal; the service sends either a string or a number.
    #[serde(default, deserialize_with = "deserialize_label")]
    pub tt: String,
    /// Grouping key for merged topic cells
    #[serde(default)]
    pub topic: String,
    /// Knowledge content description
    #[serde(default)]
    pub content: String,
    /// Assessment requirement text
    #[serde(default)]
    pub assessment_level: String,
    #[serde(default, deserialize_with = "deserialize_count", serialize_with = "serialize_count")]
    pub recognition_tn: f64,
    #[serde(default, deserialize_with = "deserialize_count", serialize_with = "serialize_count")]
    pub recognition_tl: f64,
    #[serde(default, deserialize_with = "deserialize_count", serialize_with = "serialize_count")]
    pub understanding_tn: f64,
    #[serde(default, deserialize_with = "deserialize_count", serialize_with = "serialize_count")]
    pub understanding_tl: f64,
    #[serde(default, deserialize_with = "deserialize_count", serialize_with = "serialize_count")]
    pub application_tn: f64,
    #[serde(default, deserialize_with = "deserialize_count", serialize_with = "serialize_count")]
    pub application_tl: f64,
    #[serde(default, deserialize_with = "deserialize_count", serialize_with = "serialize_count")]
    pub high_application_tn: f64,
    #[serde(default, deserialize_with = "deserialize_count", serialize_with = "serialize_count")]
    pub high_application_tl: f64,
    /// Free-form remark
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MatrixRow {
    /// Read one of the eight counters.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use specmatrix_core::{CognitiveLevel, MatrixRow, QuestionType};
    ///
    /// let row = MatrixRow { understanding_tl: 2.0, ..Default::default() };
    /// assert_eq!(row.count(CognitiveLevel::Understanding, QuestionType::FreeResponse), 2.0);
    /// assert_eq!(row.count(CognitiveLevel::Recognition, QuestionType::MultipleChoice), 0.0);
    /// ```
    #[inline]
    #[must_use = "returns the counter value"]
    pub const fn count(&self, level: CognitiveLevel, question_type: QuestionType) -> f64 {
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
}

/// Totals and percentages as reported by the generation service.
///
/// These figures are displayed as received; see [`crate::reconcile`] for the
/// optional comparison against locally computed totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixSummary {
    #[serde(deserialize_with = "deserialize_count", serialize_with = "serialize_count")]
    pub total_recognition: f64,
    #[serde(deserialize_with = "deserialize_count", serialize_with = "serialize_count")]
    pub total_understanding: f64,
    #[serde(deserialize_with = "deserialize_count", serialize_with = "serialize_count")]
    pub total_application: f64,
    #[serde(deserialize_with = "deserialize_count", serialize_with = "serialize_count")]
    pub total_high_application: f64,
    pub percent_recognition: f64,
    pub percent_understanding: f64,
    pub percent_application: f64,
    pub percent_high_application: f64,
    /// Recognition + understanding
    pub general_percent_basic: f64,
    /// Application + high application
    pub general_percent_advanced: f64,
}

impl MatrixSummary {
    /// Reported question total for a level.
    #[inline]
    #[must_use = "returns the reported total"]
    pub const fn total(&self, level: CognitiveLevel) -> f64 {
        match level {
            CognitiveLevel::Recognition => self.total_recognition,
            CognitiveLevel::Understanding => self.total_understanding,
            CognitiveLevel::Application => self.total_application,
            CognitiveLevel::HighApplication => self.total_high_application,
        }
    }

    /// Reported percentage for a level.
    #[inline]
    #[must_use = "returns the reported percentage"]
    pub const fn percent(&self, level: CognitiveLevel) -> f64 {
        match level {
            CognitiveLevel::Recognition => self.percent_recognition,
            CognitiveLevel::Understanding => self.percent_understanding,
            CognitiveLevel::Application => self.percent_application,
            CognitiveLevel::HighApplication => self.percent_high_application,
        }
    }
}

/// A complete generation result: header metadata, rows and summary.
///
/// `rows` and `summary` are required; a response without them is malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixData {
    /// Supervising department (Phòng/Sở GD&ĐT)
    #[serde(default)]
    pub department_name: String,
    #[serde(default)]
    pub school_name: String,
    /// Original title of the source matrix
    #[serde(default)]
    pub title: String,
    /// Exam period, e.g. "GIỮA HỌC KỲ I"
    #[serde(default)]
    pub exam_name: String,
    #[serde(default)]
    pub school_year: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub grade: String,
    /// Exam duration, e.g. "90 phút"
    #[serde(default)]
    pub time: String,
    pub rows: Vec<MatrixRow>,
    pub summary: MatrixSummary,
}

/// Requested share and question counts for one cognitive level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Score share in percent
    pub percent: u32,
    /// Number of multiple-choice questions
    pub multiple_choice: u32,
    /// Number of free-response questions
    pub free_response: u32,
}

impl LevelConfig {
    #[must_use]
    pub const fn new(percent: u32, multiple_choice: u32, free_response: u32) -> Self {
        Self {
            percent,
            multiple_choice,
            free_response,
        }
    }

    /// Requested count for a question type.
    #[inline]
    #[must_use = "returns the requested count"]
    pub const fn count(&self, question_type: QuestionType) -> u32 {
        match question_type {
            QuestionType::MultipleChoice => self.multiple_choice,
            QuestionType::FreeResponse => self.free_response,
        }
    }
}

impl std::str::FromStr for LevelConfig {
    type Err = String;

    /// Parse `PERCENT,MC,FR`, e.g. `30,8,1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(format!(
                "invalid level '{s}'. Expected PERCENT,MULTIPLE_CHOICE,FREE_RESPONSE (e.g. 30,8,1)"
            ));
        }

        let parse = |value: &str| {
            value
                .parse::<u32>()
                .map_err(|_| format!("invalid number '{value}' in level '{s}'"))
        };

        Ok(Self::new(parse(parts[0])?, parse(parts[1])?, parse(parts[2])?))
    }
}

/// Requested question distribution across the four levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    pub recognition: LevelConfig,
    pub understanding: LevelConfig,
    pub application: LevelConfig,
    pub high_application: LevelConfig,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            recognition: LevelConfig::new(30, 8, 1),
            understanding: LevelConfig::new(40, 4, 3),
            application: LevelConfig::new(20, 0, 4),
            high_application: LevelConfig::new(10, 0, 1),
        }
    }
}

impl MatrixConfig {
    #[inline]
    #[must_use]
    pub const fn level(&self, level: CognitiveLevel) -> &LevelConfig {
        match level {
            CognitiveLevel::Recognition => &self.recognition,
            CognitiveLevel::Understanding => &self.understanding,
            CognitiveLevel::Application => &self.application,
            CognitiveLevel::HighApplication => &self.high_application,
        }
    }

    pub fn level_mut(&mut self, level: CognitiveLevel) -> &mut LevelConfig {
        match level {
            CognitiveLevel::Recognition => &mut self.recognition,
            CognitiveLevel::Understanding => &mut self.understanding,
            CognitiveLevel::Application => &mut self.application,
            CognitiveLevel::HighApplication => &mut self.high_application,
        }
    }

    #[must_use]
    pub fn total_percent(&self) -> u32 {
        CognitiveLevel::ALL
            .iter()
            .map(|&level| self.level(level).percent)
            .sum()
    }

    #[must_use]
    pub fn total_multiple_choice(&self) -> u32 {
        CognitiveLevel::ALL
            .iter()
            .map(|&level| self.level(level).multiple_choice)
            .sum()
    }

    #[must_use]
    pub fn total_free_response(&self) -> u32 {
        CognitiveLevel::ALL
            .iter()
            .map(|&level| self.level(level).free_response)
            .sum()
    }

    /// Check the percentages add up to 100.
    ///
    /// An unbalanced distribution is still sent to the service; the returned
    /// message is only advisory.
    #[must_use = "returns a warning message for unbalanced percentages"]
    pub fn validate(&self) -> Option<String> {
        let total = self.total_percent();
        if total == 100 {
            return None;
        }
        let message = format!("level percentages sum to {total}%, expected 100%");
        warn!("{message}");
        Some(message)
    }
}

fn deserialize_label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number for row label, found {other}"
        ))),
    }
}

// Counters are declared as NUMBER in the response schema, so floats and
// numeric strings show up in practice. Anything else is a contract violation.
fn deserialize_count<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0.0),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom(format!("count out of range: {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| {
                serde::de::Error::custom(format!("expected a question count, found \"{s}\""))
            }),
        other => Err(serde::de::Error::custom(format!(
            "expected a question count, found {other}"
        ))),
    }
}

/// Largest magnitude below which every whole `f64` is an exact integer.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

// Whole counts are written as JSON integers so saved results read like the
// service output; everything else keeps its fractional part.
#[allow(clippy::trivially_copy_pass_by_ref, clippy::cast_possible_truncation, clippy::float_cmp)]
fn serialize_count<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() < EXACT_INTEGER_LIMIT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_label_accepts_number_and_string() {
        let row: MatrixRow = serde_json::from_str(r#"{"tt": 3, "topic": "A"}"#).unwrap();
        assert_eq!(row.tt, "3");

        let row: MatrixRow = serde_json::from_str(r#"{"tt": "1.2", "topic": "A"}"#).unwrap();
        assert_eq!(row.tt, "1.2");
    }

    #[test]
    fn test_missing_counters_default_to_zero() {
        let row: MatrixRow = serde_json::from_str(r#"{"topic": "A"}"#).unwrap();
        for level in CognitiveLevel::ALL {
            for question_type in QuestionType::ALL {
                assert_eq!(row.count(level, question_type), 0.0);
            }
        }
    }

    #[test]
    fn test_anomalous_counters_are_kept() {
        let row: MatrixRow = serde_json::from_str(
            r#"{"topic": "A", "recognition_tn": -2, "application_tl": 2.7, "understanding_tn": "4"}"#,
        )
        .unwrap();
        assert_eq!(row.recognition_tn, -2.0);
        assert_eq!(row.application_tl, 2.7);
        assert_eq!(row.understanding_tn, 4.0);
    }

    #[test]
    fn test_fractional_counters_are_not_truncated() {
        let row: MatrixRow =
            serde_json::from_str(r#"{"topic": "A", "recognition_tn": 1.5, "recognition_tl": "0.25"}"#)
                .unwrap();
        assert_eq!(row.recognition_tn, 1.5);
        assert_eq!(row.recognition_tl, 0.25);
    }

    #[test]
    fn test_extreme_counters_are_accepted() {
        let row: MatrixRow = serde_json::from_str(&format!(
            r#"{{"topic": "A", "recognition_tn": {}, "recognition_tl": {:e}}}"#,
            i64::MAX,
            f64::MAX
        ))
        .unwrap();
        assert!(row.recognition_tn > 9.2e18);
        assert_eq!(row.recognition_tl, f64::MAX);
    }

    #[test]
    fn test_non_finite_counter_string_is_rejected() {
        for text in ["NaN", "inf", "-infinity"] {
            let json = format!(r#"{{"topic": "A", "recognition_tn": "{text}"}}"#);
            let result: Result<MatrixRow, _> = serde_json::from_str(&json);
            assert!(result.is_err(), "{text} accepted");
        }
    }

    #[test]
    fn test_whole_counters_serialize_as_integers() {
        let row = MatrixRow {
            topic: "A".to_string(),
            recognition_tn: 3.0,
            understanding_tl: 1.5,
            ..Default::default()
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["recognition_tn"], serde_json::json!(3));
        assert_eq!(json["understanding_tl"], serde_json::json!(1.5));

        let back: MatrixRow = serde_json::from_value(json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn test_non_numeric_counter_is_rejected() {
        let result: Result<MatrixRow, _> =
            serde_json::from_str(r#"{"topic": "A", "recognition_tn": "many"}"#);
        assert!(result.is_err());

        let result: Result<MatrixRow, _> =
            serde_json::from_str(r#"{"topic": "A", "recognition_tn": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_matrix_data_requires_rows_and_summary() {
        let result: Result<MatrixData, _> = serde_json::from_str(r#"{"subject": "Toán 8"}"#);
        assert!(result.is_err());

        let data: MatrixData =
            serde_json::from_str(r#"{"subject": "Toán 8", "rows": [], "summary": {}}"#).unwrap();
        assert_eq!(data.subject, "Toán 8");
        assert!(data.school_name.is_empty());
        assert!(data.rows.is_empty());
    }

    #[test]
    fn test_default_config_distribution() {
        let config = MatrixConfig::default();
        assert_eq!(config.total_percent(), 100);
        assert_eq!(config.total_multiple_choice(), 12);
        assert_eq!(config.total_free_response(), 9);
        assert!(config.validate().is_none());
    }

    #[test]
    fn test_unbalanced_config_warns() {
        let mut config = MatrixConfig::default();
        config.level_mut(CognitiveLevel::HighApplication).percent = 20;
        let warning = config.validate().unwrap();
        assert!(warning.contains("110%"));
    }

    #[test]
    fn test_level_config_from_str() {
        assert_eq!(
            "30,8,1".parse::<LevelConfig>().unwrap(),
            LevelConfig::new(30, 8, 1)
        );
        assert_eq!(
            " 20 , 0 , 4 ".parse::<LevelConfig>().unwrap(),
            LevelConfig::new(20, 0, 4)
        );
        assert!("30,8".parse::<LevelConfig>().is_err());
        assert!("30,x,1".parse::<LevelConfig>().is_err());
        assert!("-1,0,0".parse::<LevelConfig>().is_err());
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(CognitiveLevel::HighApplication.key(), "high_application");
        assert_eq!(CognitiveLevel::Application.abbreviation(), "VD");
        assert_eq!(QuestionType::FreeResponse.label(), "TL");
        assert_eq!(format!("{}", CognitiveLevel::Recognition), "recognition");
    }
}
