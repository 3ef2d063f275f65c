//! Fixed table headings used by the renderers and the document export.

pub const COLUMN_SEQUENCE: &str = "TT";
pub const COLUMN_TOPIC: &str = "CHỦ ĐỀ";
pub const COLUMN_CONTENT: &str = "NỘI DUNG";
pub const COLUMN_ASSESSMENT: &str = "MỨC ĐỘ ĐÁNH GIÁ";

/// Heading spanning the eight counter columns.
pub const COUNTS_HEADING: &str = "SỐ CÂU HỎI THEO MỨC ĐỘ NHẬN THỨC";

pub const ROW_TOTAL: &str = "TỔNG";
pub const ROW_PERCENT: &str = "TỈ LỆ %";
pub const ROW_GENERAL_PERCENT: &str = "TỈ LỆ CHUNG";

/// Number of descriptive columns before the counters.
pub const LEADING_COLUMNS: usize = 4;

/// Number of counter columns (4 levels x 2 question types).
pub const COUNT_COLUMNS: usize = 8;
