//! Response classification against recorded response shapes.

use specmatrix_gemini::wire::GenerateContentResponse;
use specmatrix_gemini::{interpret_response, GenerationError};

fn response(json: &str) -> GenerateContentResponse {
    serde_json::from_str(json).expect("fixture must deserialize")
}

fn with_text(text: &str, finish_reason: &str) -> GenerateContentResponse {
    let body = serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": finish_reason
        }],
        "usageMetadata": { "promptTokenCount": 1200, "candidatesTokenCount": 340 }
    });
    serde_json::from_value(body).expect("fixture must deserialize")
}

const MATRIX: &str = r#"{
  "school_name": "TRƯỜNG THCS VÕ VĂN KIỆT",
  "subject": "TOÁN 8",
  "grade": "8",
  "rows": [
    {"tt": 1, "topic": "Đa thức", "content": "Đơn thức", "assessment_level": "Nhận biết", "recognition_tn": 2},
    {"tt": "2", "topic": "Đa thức", "content": "Phép cộng", "assessment_level": "Thông hiểu", "understanding_tl": 1.0}
  ],
  "summary": {"total_recognition": 2, "percent_recognition": 30, "general_percent_basic": 70}
}"#;

#[test]
fn test_plain_json_parses() {
    let data = interpret_response(&with_text(MATRIX, "STOP")).unwrap();
    assert_eq!(data.rows.len(), 2);
    assert_eq!(data.rows[0].tt, "1");
    assert_eq!(data.rows[1].understanding_tl, 1.0);
    assert_eq!(data.summary.total_recognition, 2.0);
    assert!((data.summary.general_percent_basic - 70.0).abs() < f64::EPSILON);
    assert_eq!(data.title, "");
}

#[test]
fn test_fenced_json_parses() {
    let fenced = format!("```json\n{MATRIX}\n```");
    let data = interpret_response(&with_text(&fenced, "STOP")).unwrap();
    assert_eq!(data.subject, "TOÁN 8");
}

#[test]
fn test_text_split_across_parts_is_joined() {
    let (head, tail) = MATRIX.split_at(40);
    let body = serde_json::json!({
        "candidates": [{
            "content": { "parts": [
                { "text": "thinking about rows", "thought": true },
                { "text": head },
                { "text": tail }
            ]},
            "finishReason": "STOP"
        }]
    });
    let parsed: GenerateContentResponse = serde_json::from_value(body).unwrap();
    let data = interpret_response(&parsed).unwrap();
    assert_eq!(data.rows.len(), 2);
}

#[test]
fn test_empty_text_with_max_tokens_is_truncated() {
    let err = interpret_response(&with_text("", "MAX_TOKENS")).unwrap_err();
    assert!(matches!(err, GenerationError::Truncated { partial: false }));
}

#[test]
fn test_cut_json_with_max_tokens_is_partial_truncation() {
    let cut = &MATRIX[..MATRIX.len() / 2];
    let err = interpret_response(&with_text(cut, "MAX_TOKENS")).unwrap_err();
    assert!(matches!(err, GenerationError::Truncated { partial: true }));
}

#[test]
fn test_other_finish_reason_without_text_is_refused() {
    let err = interpret_response(&with_text("", "RECITATION")).unwrap_err();
    match err {
        GenerationError::Refused(reason) => assert_eq!(reason, "RECITATION"),
        other => panic!("expected Refused, got {other:?}"),
    }
}

#[test]
fn test_safety_finish_is_filtered() {
    let err = interpret_response(&with_text("", "SAFETY")).unwrap_err();
    assert!(matches!(err, GenerationError::ContentFiltered { .. }));
}

#[test]
fn test_blocked_prompt_is_filtered() {
    let err =
        interpret_response(&response(r#"{"promptFeedback":{"blockReason":"OTHER"}}"#)).unwrap_err();
    match err {
        GenerationError::ContentFiltered { reason } => assert_eq!(reason, "OTHER"),
        other => panic!("expected ContentFiltered, got {other:?}"),
    }
}

#[test]
fn test_no_candidates_is_empty_response() {
    let err = interpret_response(&response("{}")).unwrap_err();
    assert!(matches!(err, GenerationError::EmptyResponse));
}

#[test]
fn test_stop_without_text_is_empty_response() {
    let err = interpret_response(&with_text("   ", "STOP")).unwrap_err();
    assert!(matches!(err, GenerationError::EmptyResponse));
}

#[test]
fn test_prose_is_malformed() {
    let err = interpret_response(&with_text("Xin lỗi, tôi không thể.", "STOP")).unwrap_err();
    assert!(matches!(err, GenerationError::MalformedJson(_)));
}

#[test]
fn test_missing_rows_is_malformed() {
    let err = interpret_response(&with_text(r#"{"summary":{}}"#, "STOP")).unwrap_err();
    assert!(matches!(err, GenerationError::MalformedJson(_)));
}

#[test]
fn test_non_numeric_counter_is_malformed() {
    let text = r#"{"rows":[{"topic":"A","recognition_tn":"many"}],"summary":{}}"#;
    let err = interpret_response(&with_text(text, "STOP")).unwrap_err();
    assert!(matches!(err, GenerationError::MalformedJson(_)));
}
