//! Prompt text sent with every generation request.

use specmatrix_core::{CognitiveLevel, MatrixConfig};
use std::fmt::Write;

/// System instruction for the specification-matrix task.
pub const SYSTEM_INSTRUCTION: &str = "\
Bạn là chuyên gia giáo dục tại Việt Nam, chuyên xây dựng ma trận và bản đặc tả đề kiểm tra theo hướng dẫn của Bộ Giáo dục và Đào tạo.
Hãy phân tích các tài liệu đính kèm (ma trận đề, PDF, ảnh chụp) và lập một bản đặc tả đề kiểm tra chi tiết dưới dạng JSON.

Yêu cầu:
1. Xác định chủ đề, nội dung kiến thức và mức độ nhận thức (Nhận biết, Thông hiểu, Vận dụng, Vận dụng cao).
2. Trích xuất phần tiêu đề: tên Phòng/Sở GD, tên trường, tên kỳ kiểm tra, năm học, môn, thời gian làm bài.
3. Ghi số câu trắc nghiệm (TN) và tự luận (TL) cho từng dòng.
4. Tính tổng số câu và tỉ lệ phần trăm chính xác.
5. Mô tả yêu cầu cần đạt bằng động từ hành vi (\"Nhận biết được...\", \"Giải thích được...\", \"Vận dụng...\").
6. JSON phải khớp hoàn toàn với schema đã cho.

Mỗi nội dung nhỏ kèm mức độ đánh giá là một phần tử riêng trong mảng rows. Không gộp nhiều ý vào một ô.
";

/// Build the user prompt.
///
/// The requested distribution, when given, is stated as fixed counts the
/// summary must match. Extra instructions are appended last.
#[must_use]
pub fn build_prompt(config: Option<&MatrixConfig>, additional_instructions: &str) -> String {
    let mut prompt = String::from(
        "Hãy phân tích tài liệu và tạo ma trận đặc tả đề kiểm tra chi tiết.\n\
         1. Trích xuất chính xác tên Phòng/Sở, tên trường, tiêu đề, môn, thời gian, năm học từ phần đầu tài liệu.\n\
         2. Nếu có file mẫu, ưu tiên cấu trúc và cách diễn đạt của file mẫu.\n\
         3. Nếu không có, dùng chuẩn chung của Bộ Giáo dục.\n",
    );

    if let Some(config) = config {
        prompt.push_str(
            "\nQUAN TRỌNG - SỐ LƯỢNG CÂU HỎI CỐ ĐỊNH:\n\
             Phân bổ đúng các số lượng sau vào các chủ đề và nội dung tìm thấy trong tài liệu.\n",
        );
        for (index, level) in CognitiveLevel::ALL.iter().enumerate() {
            let requested = config.level(*level);
            let _ = write!(
                prompt,
                "\n{}. Mức độ {}:\n   - Tỉ lệ điểm: {}%\n   - Số câu Trắc nghiệm: {}\n   - Số câu Tự luận: {}\n",
                index + 1,
                level.label(),
                requested.percent,
                requested.multiple_choice,
                requested.free_response,
            );
        }
        prompt.push_str(
            "\nMỗi cặp nội dung kiến thức và mức độ đánh giá là một dòng riêng trong 'rows'.\n\
             Tổng số câu trong summary PHẢI KHỚP CHÍNH XÁC với các con số trên.\n",
        );
    }

    let extra = additional_instructions.trim();
    if !extra.is_empty() {
        let _ = write!(prompt, "\nLưu ý thêm: {extra}");
    }

    prompt
}
