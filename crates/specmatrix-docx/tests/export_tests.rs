//! End-to-end export: build, pack, reopen the package and inspect the XML.

use specmatrix_core::{MatrixData, MatrixRow, MatrixSummary, MatrixView};
use specmatrix_docx::{export_bytes, export_file_name, export_to_path};
use std::io::{Cursor, Read};

fn sample() -> MatrixView {
    let row = |tt: &str, topic: &str, content: &str, recognition_tn, understanding_tl| MatrixRow {
        tt: tt.to_string(),
        topic: topic.to_string(),
        content: content.to_string(),
        assessment_level: "Nhận biết".to_string(),
        recognition_tn,
        understanding_tl,
        ..Default::default()
    };

    MatrixView::new(MatrixData {
        school_name: "TRƯỜNG THCS VÕ VĂN KIỆT".to_string(),
        exam_name: "Giữa học kỳ I".to_string(),
        school_year: "2025 - 2026".to_string(),
        subject: "Toán 8".to_string(),
        grade: "8".to_string(),
        time: "90 phút".to_string(),
        rows: vec![
            row("1", "Đa thức", "Đơn thức", 2.0, 0.0),
            row("2", "Đa thức", "Đa thức nhiều biến", 1.0, 1.0),
            row("3", "Hằng đẳng thức", "Bình phương của một tổng", 0.0, 2.0),
        ],
        summary: MatrixSummary {
            percent_recognition: 30.0,
            percent_understanding: 40.0,
            general_percent_basic: 70.0,
            general_percent_advanced: 30.0,
            ..Default::default()
        },
        ..Default::default()
    })
}

fn document_xml(bytes: Vec<u8>) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

#[test]
fn test_package_contains_merged_table() {
    let xml = document_xml(export_bytes(&sample()).unwrap());

    assert!(xml.contains("vMerge"));
    assert!(xml.contains("restart"));
    assert!(xml.contains("continue"));
    assert!(xml.contains("gridSpan"));
    assert!(xml.contains("E0F2FE"));
    assert!(xml.contains("landscape"));
}

#[test]
fn test_package_contains_text() {
    let xml = document_xml(export_bytes(&sample()).unwrap());

    assert!(xml.contains("SỐ CÂU HỎI THEO MỨC ĐỘ NHẬN THỨC"));
    assert!(xml.contains("VẬN DỤNG CAO"));
    assert!(xml.contains("BẢN ĐẶC TẢ ĐỀ KIỂM TRA ĐÁNH GIÁ GIỮA HỌC KỲ I"));
    assert!(xml.contains("MÔN: TOÁN 8"));
    assert!(xml.contains("Bình phương của một tổng"));
    assert!(xml.contains("TỈ LỆ CHUNG"));
    assert!(xml.contains("70%"));
}

#[test]
fn test_export_to_path_writes_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("exports");
    let view = sample();

    let path = export_to_path(&view, &out).unwrap();

    assert_eq!(path, out.join("Ma_Tran_Dac_Ta_Toán 8_8.docx"));
    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        export_file_name(view.data())
    );
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"PK"));
    assert!(document_xml(bytes).contains("Đa thức"));
}

#[test]
fn test_empty_matrix_still_exports() {
    let view = MatrixView::new(MatrixData::default());
    let xml = document_xml(export_bytes(&view).unwrap());
    assert!(xml.contains("TỔNG"));
    assert!(xml.contains("PHÒNG GIÁO DỤC VÀ ĐÀO TẠO"));
}
