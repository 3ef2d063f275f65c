//! HTML rendering with merged topic cells.
//!
//! The topic cell of a group owner carries `rowspan` equal to its span;
//! rows with a zero span emit no topic cell at all.

use crate::labels::{
    COLUMN_ASSESSMENT, COLUMN_CONTENT, COLUMN_SEQUENCE, COLUMN_TOPIC, COUNTS_HEADING,
    COUNT_COLUMNS, LEADING_COLUMNS, ROW_GENERAL_PERCENT, ROW_PERCENT, ROW_TOTAL,
};
use crate::model::{CognitiveLevel, QuestionType};
use crate::presentation::{count_cell, general_percent_cell, percent_cell};
use crate::view::MatrixView;
use std::fmt::Write;

const STYLE: &str = "table.spec-matrix{border-collapse:collapse;font-family:'Times New Roman',serif}\
.spec-matrix th,.spec-matrix td{border:1px solid #000;padding:4px 8px;vertical-align:middle}\
.spec-matrix th,.spec-matrix tfoot td:first-child{background:#e0f2fe;font-weight:bold;text-align:center}\
.spec-matrix td.count{text-align:center}";

/// Render a standalone HTML page containing the heading and the table.
#[must_use = "returns the rendered page"]
pub fn render_html(view: &MatrixView) -> String {
    let data = view.data();
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape(page_title(view)));
    let _ = writeln!(out, "<style>{STYLE}</style>");
    out.push_str("</head>\n<body>\n");

    if !data.title.is_empty() {
        let _ = writeln!(out, "<h1>{}</h1>", escape(&data.title));
    }
    if !data.subject.is_empty() || !data.school_year.is_empty() {
        let _ = writeln!(
            out,
            "<p>Môn: {} - Năm học: {}</p>",
            escape(&data.subject),
            escape(&data.school_year)
        );
    }

    out.push_str(&render_html_table(view));
    out.push_str("</body>\n</html>\n");
    out
}

/// Render only the `<table>` element.
#[must_use = "returns the rendered table"]
pub fn render_html_table(view: &MatrixView) -> String {
    let mut out = String::from("<table class=\"spec-matrix\">\n<thead>\n");

    out.push_str("<tr>");
    for label in [
        COLUMN_SEQUENCE,
        COLUMN_TOPIC,
        COLUMN_CONTENT,
        COLUMN_ASSESSMENT,
    ] {
        let _ = write!(out, "<th rowspan=\"3\">{}</th>", escape(label));
    }
    let _ = write!(
        out,
        "<th colspan=\"{COUNT_COLUMNS}\">{}</th>",
        escape(COUNTS_HEADING)
    );
    out.push_str("</tr>\n<tr>");
    for level in CognitiveLevel::ALL {
        let _ = write!(out, "<th colspan=\"2\">{}</th>", escape(level.label()));
    }
    out.push_str("</tr>\n<tr>");
    for _ in CognitiveLevel::ALL {
        for question_type in QuestionType::ALL {
            let _ = write!(out, "<th>{}</th>", question_type.label());
        }
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for (row, span) in view.rows_with_spans() {
        out.push_str("<tr>");
        let _ = write!(out, "<td class=\"count\">{}</td>", escape(&row.tt));
        match span {
            0 => {}
            1 => {
                let _ = write!(out, "<td>{}</td>", escape(&row.topic));
            }
            _ => {
                let _ = write!(out, "<td rowspan=\"{span}\">{}</td>", escape(&row.topic));
            }
        }
        let _ = write!(out, "<td>{}</td>", escape(&row.content));
        let _ = write!(out, "<td>{}</td>", escape(&row.assessment_level));
        for level in CognitiveLevel::ALL {
            for question_type in QuestionType::ALL {
                let _ = write!(
                    out,
                    "<td class=\"count\">{}</td>",
                    count_cell(row.count(level, question_type))
                );
            }
        }
        out.push_str("</tr>\n");
    }

    out.push_str("</tbody>\n<tfoot>\n");

    let totals = view.totals();
    let summary = &view.data().summary;

    let _ = write!(
        out,
        "<tr><td colspan=\"{LEADING_COLUMNS}\">{}</td>",
        escape(ROW_TOTAL)
    );
    for level in CognitiveLevel::ALL {
        for question_type in QuestionType::ALL {
            let _ = write!(
                out,
                "<td class=\"count\">{}</td>",
                count_cell(totals.get(level, question_type))
            );
        }
    }
    out.push_str("</tr>\n");

    let _ = write!(
        out,
        "<tr><td colspan=\"{LEADING_COLUMNS}\">{}</td>",
        escape(ROW_PERCENT)
    );
    for level in CognitiveLevel::ALL {
        let _ = write!(
            out,
            "<td class=\"count\" colspan=\"2\">{}</td>",
            percent_cell(summary.percent(level))
        );
    }
    out.push_str("</tr>\n");

    let _ = writeln!(
        out,
        "<tr><td colspan=\"{LEADING_COLUMNS}\">{}</td>\
         <td class=\"count\" colspan=\"4\">{}</td>\
         <td class=\"count\" colspan=\"4\">{}</td></tr>",
        escape(ROW_GENERAL_PERCENT),
        general_percent_cell(summary.general_percent_basic),
        general_percent_cell(summary.general_percent_advanced)
    );

    out.push_str("</tfoot>\n</table>\n");
    out
}

fn page_title(view: &MatrixView) -> &str {
    let data = view.data();
    if data.subject.is_empty() {
        "Ma trận đặc tả"
    } else {
        &data.subject
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("<br>"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatrixData, MatrixRow};

    fn view(topics: &[&str]) -> MatrixView {
        let rows = topics
            .iter()
            .enumerate()
            .map(|(i, topic)| MatrixRow {
                tt: (i + 1).to_string(),
                topic: (*topic).to_string(),
                recognition_tn: 1.0,
                ..Default::default()
            })
            .collect();
        MatrixView::new(MatrixData {
            subject: "Ngữ văn 7".to_string(),
            rows,
            ..Default::default()
        })
    }

    #[test]
    fn test_rowspan_on_group_owner() {
        let html = render_html_table(&view(&["A", "A", "A", "B"]));
        assert!(html.contains("<td rowspan=\"3\">A</td>"));
        assert!(html.contains("<td>B</td>"));
        assert_eq!(html.matches(">A</td>").count(), 1);
    }

    #[test]
    fn test_three_header_rows() {
        let html = render_html_table(&view(&["A"]));
        let thead = html.split("</thead>").next().unwrap();
        assert_eq!(thead.matches("<tr>").count(), 3);
        assert!(thead.contains("<th colspan=\"8\">"));
        assert_eq!(thead.matches("<th colspan=\"2\">").count(), 4);
    }

    #[test]
    fn test_footer_rows() {
        let html = render_html_table(&view(&["A", "B"]));
        let tfoot = html.split("<tfoot>").nth(1).unwrap();
        assert_eq!(tfoot.matches("<tr>").count(), 3);
        // recognition TN total is 2, every other total is blank
        assert!(tfoot.contains("<td class=\"count\">2</td>"));
        assert!(tfoot.contains("0%"));
    }

    #[test]
    fn test_escapes_text() {
        let html = render_html_table(&view(&["<script>"]));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_page_wrapper() {
        let html = render_html(&view(&["A"]));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Ngữ văn 7</title>"));
        assert!(html.ends_with("</html>\n"));
    }
}
