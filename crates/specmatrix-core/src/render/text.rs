//! Terminal rendering as an aligned pipe table.
//!
//! Column widths use the unicode display width so Vietnamese diacritics and
//! CJK text line up in a monospace terminal. The topic text appears only on
//! the first row of each group.

use crate::labels::{
    COLUMN_ASSESSMENT, COLUMN_CONTENT, COLUMN_SEQUENCE, COLUMN_TOPIC, COUNT_COLUMNS,
    LEADING_COLUMNS, ROW_GENERAL_PERCENT, ROW_PERCENT, ROW_TOTAL,
};
use crate::model::{CognitiveLevel, QuestionType};
use crate::presentation::{count_cell, general_percent_cell, percent_cell};
use crate::view::MatrixView;
use unicode_width::UnicodeWidthStr;

const TOTAL_COLUMNS: usize = LEADING_COLUMNS + COUNT_COLUMNS;

/// Render the header lines and the matrix table.
#[must_use = "returns the rendered table"]
pub fn render_text(view: &MatrixView) -> String {
    let data = view.data();
    let mut out = String::new();

    for line in heading_lines(view) {
        out.push_str(&line);
        out.push('\n');
    }
    if !out.is_empty() {
        out.push('\n');
    }

    let header = header_row();
    let body: Vec<Vec<String>> = view
        .rows_with_spans()
        .map(|(row, span)| {
            let mut cells = vec![
                single_line(&row.tt),
                if span > 0 {
                    single_line(&row.topic)
                } else {
                    String::new()
                },
                single_line(&row.content),
                single_line(&row.assessment_level),
            ];
            for level in CognitiveLevel::ALL {
                for question_type in QuestionType::ALL {
                    cells.push(count_cell(row.count(level, question_type)));
                }
            }
            cells
        })
        .collect();
    let footer = footer_rows(view);

    let mut widths = [0usize; TOTAL_COLUMNS];
    for row in std::iter::once(&header).chain(&body).chain(&footer) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let separator = separator_line(&widths);
    out.push_str(&format_row(&header, &widths));
    out.push_str(&separator);
    for row in &body {
        out.push_str(&format_row(row, &widths));
    }
    if !data.rows.is_empty() {
        out.push_str(&separator);
    }
    for row in &footer {
        out.push_str(&format_row(row, &widths));
    }

    out
}

fn heading_lines(view: &MatrixView) -> Vec<String> {
    let data = view.data();
    let mut lines = Vec::new();
    if !data.title.is_empty() {
        lines.push(data.title.clone());
    }
    let mut details = Vec::new();
    if !data.subject.is_empty() {
        details.push(format!("Môn: {}", data.subject));
    }
    if !data.school_year.is_empty() {
        details.push(format!("Năm học: {}", data.school_year));
    }
    if !data.time.is_empty() {
        details.push(format!("Thời gian: {}", data.time));
    }
    if !details.is_empty() {
        lines.push(details.join(" - "));
    }
    lines
}

fn header_row() -> Vec<String> {
    let mut cells = vec![
        COLUMN_SEQUENCE.to_string(),
        COLUMN_TOPIC.to_string(),
        COLUMN_CONTENT.to_string(),
        COLUMN_ASSESSMENT.to_string(),
    ];
    for level in CognitiveLevel::ALL {
        for question_type in QuestionType::ALL {
            cells.push(format!(
                "{} {}",
                level.abbreviation(),
                question_type.label()
            ));
        }
    }
    cells
}

fn footer_rows(view: &MatrixView) -> Vec<Vec<String>> {
    let totals = view.totals();
    let summary = &view.data().summary;

    let labelled = |label: &str| {
        let mut cells = vec![String::new(); TOTAL_COLUMNS];
        cells[1] = label.to_string();
        cells
    };

    let mut total_row = labelled(ROW_TOTAL);
    let mut percent_row = labelled(ROW_PERCENT);
    let mut column = LEADING_COLUMNS;
    for level in CognitiveLevel::ALL {
        percent_row[column] = percent_cell(summary.percent(level));
        for question_type in QuestionType::ALL {
            total_row[column] = count_cell(totals.get(level, question_type));
            column += 1;
        }
    }

    let mut general_row = labelled(ROW_GENERAL_PERCENT);
    general_row[LEADING_COLUMNS] = general_percent_cell(summary.general_percent_basic);
    general_row[LEADING_COLUMNS + COUNT_COLUMNS / 2] =
        general_percent_cell(summary.general_percent_advanced);

    vec![total_row, percent_row, general_row]
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (index, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        let padding = " ".repeat(width.saturating_sub(cell.width()));
        if index >= LEADING_COLUMNS {
            line.push_str(&format!(" {padding}{cell} |"));
        } else {
            line.push_str(&format!(" {cell}{padding} |"));
        }
    }
    line.push('\n');
    line
}

fn separator_line(widths: &[usize]) -> String {
    let mut line = String::from("|");
    for &width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('|');
    }
    line.push('\n');
    line
}
