//! `docx-rs` serialization of an [`ExportDocument`].

use crate::error::{ExportError, Result};
use crate::layout::{Align, ExportCell, ExportDocument, ExportParagraph, ExportTable, VMerge};
use docx_rs::{
    AlignmentType, Docx, Footer, LineSpacing, PageMargin, PageOrientationType, Paragraph, Run,
    RunFonts, Shading, Table, TableCell, TableRow, VAlignType, VMergeType, WidthType,
};
use specmatrix_core::labels::{COUNT_COLUMNS, LEADING_COLUMNS};
use std::io::{Seek, Write};

const FONT: &str = "Times New Roman";
const HEADER_FILL: &str = "E0F2FE";
const MUTED_COLOR: &str = "808080";

// A4 landscape, in twips
const PAGE_WIDTH: u32 = 16838;
const PAGE_HEIGHT: u32 = 11906;
const MARGIN: i32 = 1000;

/// Percent of table width per grid column: four leading columns, then eight
/// equal count columns sharing half the table.
const LEADING_GRID_PCT: [f64; LEADING_COLUMNS] = [5.0, 10.0, 15.0, 20.0];
const COUNT_GRID_PCT: f64 = 50.0 / COUNT_COLUMNS as f64;

/// `w:w` for pct widths is in fiftieths of a percent.
const fn pct(percent: usize) -> usize {
    percent * 50
}

fn fonts() -> RunFonts {
    RunFonts::new()
        .ascii(FONT)
        .hi_ansi(FONT)
        .east_asia(FONT)
        .cs(FONT)
}

const fn alignment(align: Align) -> AlignmentType {
    match align {
        Align::Left => AlignmentType::Left,
        Align::Center => AlignmentType::Center,
    }
}

fn run(text: &str, size: usize) -> Run {
    Run::new().add_text(text).size(size).fonts(fonts())
}

fn paragraph(p: &ExportParagraph) -> Paragraph {
    let mut text = run(&p.text, p.size);
    if p.bold {
        text = text.bold();
    }
    if p.italic {
        text = text.italic();
    }
    if p.muted {
        text = text.color(MUTED_COLOR);
    }

    let mut paragraph = Paragraph::new().add_run(text).align(alignment(p.align));
    if let Some((before, after)) = p.spacing {
        paragraph = paragraph.line_spacing(LineSpacing::new().before(before).after(after));
    }
    paragraph
}

fn cell(c: &ExportCell, size: usize) -> TableCell {
    let mut cell = TableCell::new().vertical_align(VAlignType::Center);

    // Continued cells still need one paragraph to be valid
    for line in c.text.split('\n') {
        let mut text = run(line, size);
        if c.bold {
            text = text.bold();
        }
        cell = cell.add_paragraph(Paragraph::new().add_run(text).align(alignment(c.align)));
    }

    if c.col_span > 1 {
        cell = cell.grid_span(c.col_span);
    }
    if let Some(v_merge) = c.v_merge {
        cell = cell.vertical_merge(match v_merge {
            VMerge::Restart => VMergeType::Restart,
            VMerge::Continue => VMergeType::Continue,
        });
    }
    if c.shaded {
        cell = cell.shading(Shading::new().fill(HEADER_FILL));
    }
    if let Some(width) = c.width_pct {
        cell = cell.width(pct(width), WidthType::Pct);
    }
    cell
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn grid() -> Vec<usize> {
    let usable = f64::from(PAGE_WIDTH) - 2.0 * f64::from(MARGIN);
    LEADING_GRID_PCT
        .iter()
        .copied()
        .chain(std::iter::repeat(COUNT_GRID_PCT).take(COUNT_COLUMNS))
        .map(|percent| (usable * percent / 100.0).round() as usize)
        .collect()
}

fn table(t: &ExportTable, size: usize) -> Table {
    let rows = t
        .rows
        .iter()
        .map(|row| TableRow::new(row.iter().map(|c| cell(c, size)).collect()))
        .collect();
    Table::new(rows)
        .set_grid(grid())
        .width(pct(100), WidthType::Pct)
}

fn title_block(document: &ExportDocument) -> Table {
    let column = |paragraphs: &[ExportParagraph], width: usize| {
        paragraphs
            .iter()
            .fold(TableCell::new().width(pct(width), WidthType::Pct), |cell, p| {
                cell.add_paragraph(paragraph(p))
            })
    };

    Table::new(vec![TableRow::new(vec![
        column(&document.title_block.left, 40),
        column(&document.title_block.right, 60),
    ])])
    .width(pct(100), WidthType::Pct)
    .clear_all_border()
}

/// Build the `docx-rs` document.
#[must_use]
pub fn to_docx(document: &ExportDocument) -> Docx {
    let mut docx = Docx::new()
        .page_size(PAGE_WIDTH, PAGE_HEIGHT)
        .page_orient(PageOrientationType::Landscape)
        .page_margin(
            PageMargin::new()
                .top(MARGIN)
                .bottom(MARGIN)
                .left(MARGIN)
                .right(MARGIN),
        )
        .default_fonts(fonts())
        .default_size(crate::layout::BODY_SIZE)
        .add_table(title_block(document))
        .add_paragraph(Paragraph::new());

    for heading in &document.headings {
        docx = docx.add_paragraph(paragraph(heading));
    }

    let mut main = table(&document.table, crate::layout::BODY_SIZE);
    if !document.table.borders {
        main = main.clear_all_border();
    }

    docx.add_table(main)
        .add_paragraph(Paragraph::new())
        .footer(Footer::new().add_paragraph(paragraph(&document.footer)))
}

/// Serialize `document` as a `.docx` package into `writer`.
///
/// # Errors
///
/// Returns [`ExportError::Package`] when the package cannot be written.
pub fn write_docx<W: Write + Seek>(document: &ExportDocument, writer: W) -> Result<()> {
    to_docx(document)
        .build()
        .pack(writer)
        .map_err(|e| ExportError::Package(e.to_string()))
}
