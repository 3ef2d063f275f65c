//! Document layout, independent of the office library.
//!
//! [`build_document`] decides every cell, span and merge marker; the writer
//! only maps this structure onto `docx-rs` calls.

use specmatrix_core::labels::{
    COLUMN_ASSESSMENT, COLUMN_CONTENT, COLUMN_SEQUENCE, COLUMN_TOPIC, COUNTS_HEADING,
    COUNT_COLUMNS, LEADING_COLUMNS, ROW_GENERAL_PERCENT, ROW_PERCENT, ROW_TOTAL,
};
use specmatrix_core::presentation::{count_cell, general_percent_cell, percent_cell};
use specmatrix_core::{
    AggregateTotals, CognitiveLevel, GroupMarker, MatrixData, MatrixView, QuestionType,
};

pub const DEFAULT_DEPARTMENT: &str = "PHÒNG GIÁO DỤC VÀ ĐÀO TẠO";
pub const DEFAULT_SCHOOL: &str = "TRƯỜNG ....................";
pub const DEFAULT_TITLE: &str = "MA TRẬN ĐỀ THAM KHẢO KIỂM TRA";
pub const DEFAULT_EXAM_NAME: &str = "GIỮA KỲ/CUỐI KỲ";
pub const FOOTER_TEXT: &str = "Bản đặc tả đề kiểm tra được tạo bằng specmatrix";

/// Body text size in half-points (13pt).
pub const BODY_SIZE: usize = 26;
const HEADING_SIZE: usize = 32;
const SUBHEADING_SIZE: usize = 28;
const FOOTER_SIZE: usize = 20;

/// Widths of the header-row columns, in percent of the table width.
const LEADING_WIDTHS: [usize; LEADING_COLUMNS] = [5, 10, 15, 20];
const COUNTS_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// Vertical merge marker of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VMerge {
    /// First cell of a merged region
    Restart,
    /// Covered by the region started above
    Continue,
}

impl From<GroupMarker> for VMerge {
    fn from(marker: GroupMarker) -> Self {
        if marker.is_start() {
            Self::Restart
        } else {
            Self::Continue
        }
    }
}

/// A single-run paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportParagraph {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Half-points
    pub size: usize,
    pub align: Align,
    /// Gray text
    pub muted: bool,
    /// Spacing before and after, in twips
    pub spacing: Option<(u32, u32)>,
}

impl ExportParagraph {
    fn centered(text: impl Into<String>, size: usize) -> Self {
        Self {
            text: text.into(),
            size,
            align: Align::Center,
            ..Default::default()
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportCell {
    /// Each line becomes its own paragraph
    pub text: String,
    pub col_span: usize,
    pub v_merge: Option<VMerge>,
    pub bold: bool,
    pub shaded: bool,
    pub align: Align,
    /// Percent of table width
    pub width_pct: Option<usize>,
}

impl ExportCell {
    fn body(text: impl Into<String>, align: Align) -> Self {
        Self {
            text: text.into(),
            col_span: 1,
            align,
            ..Default::default()
        }
    }

    /// Bold, centered, shaded.
    fn header(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            col_span: 1,
            bold: true,
            shaded: true,
            align: Align::Center,
            ..Default::default()
        }
    }

    fn span(mut self, col_span: usize) -> Self {
        self.col_span = col_span;
        self
    }

    fn merge(mut self, v_merge: VMerge) -> Self {
        self.v_merge = Some(v_merge);
        self
    }

    fn width(mut self, pct: usize) -> Self {
        self.width_pct = Some(pct);
        self
    }

    fn bolded(mut self) -> Self {
        self.bold = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportTable {
    pub rows: Vec<Vec<ExportCell>>,
    pub borders: bool,
}

impl ExportTable {
    /// Grid columns covered by a row.
    #[must_use]
    pub fn row_width(&self, index: usize) -> usize {
        self.rows
            .get(index)
            .map_or(0, |row| row.iter().map(|cell| cell.col_span).sum())
    }
}

/// Borderless two-column block above the heading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TitleBlock {
    pub left: Vec<ExportParagraph>,
    pub right: Vec<ExportParagraph>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportDocument {
    pub title_block: TitleBlock,
    pub headings: Vec<ExportParagraph>,
    pub table: ExportTable,
    pub footer: ExportParagraph,
}

impl ExportDocument {
    /// Layout for a computed view.
    #[must_use]
    pub fn from_view(view: &MatrixView) -> Self {
        build_document(view.data(), view.totals(), &view.markers())
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

/// Lay out the export document.
///
/// `markers` must have one entry per row; a missing marker is treated as
/// the start of a new group.
#[must_use]
pub fn build_document(
    data: &MatrixData,
    totals: &AggregateTotals,
    markers: &[GroupMarker],
) -> ExportDocument {
    ExportDocument {
        title_block: title_block(data),
        headings: headings(data),
        table: main_table(data, totals, markers),
        footer: ExportParagraph {
            muted: true,
            ..ExportParagraph::centered(FOOTER_TEXT, FOOTER_SIZE).italic()
        },
    }
}

fn title_block(data: &MatrixData) -> TitleBlock {
    TitleBlock {
        left: vec![
            ExportParagraph::centered(or_default(&data.department_name, DEFAULT_DEPARTMENT), BODY_SIZE)
                .bold(),
            ExportParagraph::centered(or_default(&data.school_name, DEFAULT_SCHOOL), BODY_SIZE)
                .bold(),
        ],
        right: vec![
            ExportParagraph::centered(or_default(&data.title, DEFAULT_TITLE), BODY_SIZE).bold(),
            ExportParagraph::centered(format!("MÔN: {}", data.subject.to_uppercase()), BODY_SIZE)
                .bold(),
            ExportParagraph::centered(format!("Thời gian làm bài: {}", data.time), BODY_SIZE)
                .italic(),
        ],
    }
}

fn headings(data: &MatrixData) -> Vec<ExportParagraph> {
    let exam_name = if data.exam_name.trim().is_empty() {
        DEFAULT_EXAM_NAME.to_string()
    } else {
        data.exam_name.to_uppercase()
    };

    vec![
        ExportParagraph {
            spacing: Some((200, 100)),
            ..ExportParagraph::centered(
                format!("BẢN ĐẶC TẢ ĐỀ KIỂM TRA ĐÁNH GIÁ {exam_name}"),
                HEADING_SIZE,
            )
            .bold()
        },
        ExportParagraph {
            spacing: Some((0, 400)),
            ..ExportParagraph::centered(
                format!("Môn: {} - Năm học: {}", data.subject, data.school_year),
                SUBHEADING_SIZE,
            )
            .bold()
        },
    ]
}

fn main_table(data: &MatrixData, totals: &AggregateTotals, markers: &[GroupMarker]) -> ExportTable {
    let leading = [
        COLUMN_SEQUENCE,
        COLUMN_TOPIC,
        COLUMN_CONTENT,
        COLUMN_ASSESSMENT,
    ];
    let mut rows = Vec::with_capacity(data.rows.len() + 6);

    // Leading headings span the three header rows as a vertical merge
    let mut first: Vec<ExportCell> = leading
        .iter()
        .zip(LEADING_WIDTHS)
        .map(|(label, width)| ExportCell::header(*label).merge(VMerge::Restart).width(width))
        .collect();
    first.push(
        ExportCell::header(COUNTS_HEADING)
            .span(COUNT_COLUMNS)
            .width(COUNTS_WIDTH),
    );
    rows.push(first);

    let continued = || {
        (0..LEADING_COLUMNS).map(|_| ExportCell::header("").merge(VMerge::Continue))
    };

    let mut second: Vec<ExportCell> = continued().collect();
    second.extend(
        CognitiveLevel::ALL
            .iter()
            .map(|level| ExportCell::header(level.label()).span(2)),
    );
    rows.push(second);

    let mut third: Vec<ExportCell> = continued().collect();
    for _ in CognitiveLevel::ALL {
        third.extend(
            QuestionType::ALL
                .iter()
                .map(|question_type| ExportCell::header(question_type.label())),
        );
    }
    rows.push(third);

    for (index, row) in data.rows.iter().enumerate() {
        let marker = markers.get(index).copied().unwrap_or(GroupMarker::Start);
        let mut cells = vec![
            ExportCell::body(row.tt.clone(), Align::Center),
            ExportCell::body(row.topic.clone(), Align::Left).merge(marker.into()),
            ExportCell::body(row.content.clone(), Align::Left),
            ExportCell::body(row.assessment_level.clone(), Align::Left),
        ];
        for level in CognitiveLevel::ALL {
            for question_type in QuestionType::ALL {
                cells.push(ExportCell::body(
                    count_cell(row.count(level, question_type)),
                    Align::Center,
                ));
            }
        }
        rows.push(cells);
    }

    let mut total_row = vec![ExportCell::header(ROW_TOTAL).span(LEADING_COLUMNS)];
    for level in CognitiveLevel::ALL {
        for question_type in QuestionType::ALL {
            total_row.push(ExportCell::body(
                count_cell(totals.get(level, question_type)),
                Align::Center,
            ));
        }
    }
    rows.push(total_row);

    let mut percent_row = vec![ExportCell::header(ROW_PERCENT).span(LEADING_COLUMNS)];
    percent_row.extend(CognitiveLevel::ALL.iter().map(|&level| {
        ExportCell::body(percent_cell(data.summary.percent(level)), Align::Center).span(2)
    }));
    rows.push(percent_row);

    rows.push(vec![
        ExportCell::header(ROW_GENERAL_PERCENT).span(LEADING_COLUMNS),
        ExportCell::body(
            general_percent_cell(data.summary.general_percent_basic),
            Align::Center,
        )
        .span(4)
        .bolded(),
        ExportCell::body(
            general_percent_cell(data.summary.general_percent_advanced),
            Align::Center,
        )
        .span(4)
        .bolded(),
    ]);

    ExportTable {
        rows,
        borders: true,
    }
}
