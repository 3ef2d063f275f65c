//! Structured-output schema for matrix responses.

use serde_json::{json, Map, Value};

const ROW_COUNTERS: [(&str, &str); 8] = [
    ("recognition_tn", "Số câu TN Nhận biết"),
    ("recognition_tl", "Số câu TL Nhận biết"),
    ("understanding_tn", "Số câu TN Thông hiểu"),
    ("understanding_tl", "Số câu TL Thông hiểu"),
    ("application_tn", "Số câu TN Vận dụng"),
    ("application_tl", "Số câu TL Vận dụng"),
    ("high_application_tn", "Số câu TN Vận dụng cao"),
    ("high_application_tl", "Số câu TL Vận dụng cao"),
];

const SUMMARY_NUMBERS: [&str; 8] = [
    "total_recognition",
    "total_understanding",
    "total_application",
    "total_high_application",
    "percent_recognition",
    "percent_understanding",
    "percent_application",
    "percent_high_application",
];

fn string(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn number(description: Option<&str>) -> Value {
    match description {
        Some(description) => json!({ "type": "NUMBER", "description": description }),
        None => json!({ "type": "NUMBER" }),
    }
}

/// Response schema in the service's OpenAPI subset.
///
/// Mirrors the fields of [`specmatrix_core::MatrixData`]; only `rows` and
/// `summary` are required.
#[must_use]
pub fn response_schema() -> Value {
    let mut row = Map::new();
    row.insert("tt".into(), string("Số thứ tự"));
    row.insert("topic".into(), string("Chủ đề"));
    row.insert(
        "content".into(),
        string("Nội dung kiến thức, mỗi dòng một nội dung cụ thể"),
    );
    row.insert(
        "assessment_level".into(),
        string("Mức độ đánh giá (Nhận biết/Thông hiểu/Vận dụng/Vận dụng cao)"),
    );
    for (name, description) in ROW_COUNTERS {
        row.insert(name.into(), number(Some(description)));
    }

    let mut summary = Map::new();
    for name in SUMMARY_NUMBERS {
        summary.insert(name.into(), number(None));
    }
    summary.insert(
        "general_percent_basic".into(),
        number(Some("Tổng % Nhận biết + Thông hiểu")),
    );
    summary.insert(
        "general_percent_advanced".into(),
        number(Some("Tổng % Vận dụng + Vận dụng cao")),
    );

    json!({
        "type": "OBJECT",
        "properties": {
            "department_name": string("Tên cơ quan chủ quản hoặc Phòng GD&ĐT"),
            "school_name": string("Tên trường"),
            "title": string("Tiêu đề gốc của ma trận đề"),
            "exam_name": string("Tên kỳ kiểm tra (VD: GIỮA HỌC KỲ I)"),
            "school_year": string("Năm học (VD: 2025 - 2026)"),
            "subject": string("Môn học (VD: TOÁN 8)"),
            "grade": string("Khối lớp"),
            "time": string("Thời gian làm bài (VD: 90 phút)"),
            "rows": {
                "type": "ARRAY",
                "items": { "type": "OBJECT", "properties": row }
            },
            "summary": { "type": "OBJECT", "properties": summary }
        },
        "required": ["rows", "summary"]
    })
}
