//! XLSX output.
//!
//! Renderers build [`RenderedSheet`]s on the in-memory sheet model; the
//! writer here turns them into one `rust_xlsxwriter` workbook. Cells keep
//! their resolved styles, merges are written before their anchor value, and
//! cells carrying a [`LetterRun`] become two-run rich strings.

pub mod banner;
pub mod format;
pub mod penalty;
pub mod totals;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use rust_xlsxwriter::{Color, ColNum, Format, Workbook, Worksheet};
use tracing::{debug, warn};

use crate::color::hex_to_rgb;
use crate::error::{ProcessingError, Result};
use crate::types::{Cell, CellValue, MergeRange, Sheet, Style};

pub use banner::render_banner;
pub use format::{cell_format, font_format};
pub use penalty::render_penalty;
pub use totals::TotalsBuilder;

/// A cell whose text is a number followed by colored significance letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterRun {
    pub number: String,
    pub letters: String,
}

/// A sheet ready to be written.
#[derive(Debug, Clone, Default)]
pub struct RenderedSheet {
    pub sheet: Sheet,
    /// Rich-text cells keyed by output `(row, col)`.
    pub letter_runs: BTreeMap<(u32, u32), LetterRun>,
}

impl RenderedSheet {
    #[must_use]
    pub fn new(sheet: Sheet) -> Self {
        Self {
            sheet,
            letter_runs: BTreeMap::new(),
        }
    }
}

fn col_num(col: u32) -> Result<ColNum> {
    ColNum::try_from(col).map_err(|_| ProcessingError::CellRef(format!("column index overflow: {col}")))
}

/// Formats derived once per shared style allocation.
#[derive(Default)]
struct FormatCache {
    formats: HashMap<usize, Format>,
    default: Format,
}

impl FormatCache {
    fn get(&mut self, cell: &Cell) -> &Format {
        match &cell.style {
            Some(style) => {
                let key = Arc::as_ptr(&style.0) as usize;
                self.formats.entry(key).or_insert_with(|| cell_format(style))
            }
            None => &self.default,
        }
    }
}

fn write_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u32,
    value: &CellValue,
    format: &Format,
) -> Result<()> {
    let col = col_num(col)?;
    match value {
        CellValue::Number(n) => {
            worksheet.write_number_with_format(row, col, *n, format)?;
        }
        CellValue::Text(s) if !s.is_empty() => {
            worksheet.write_string_with_format(row, col, s, format)?;
        }
        _ => {
            worksheet.write_blank(row, col, format)?;
        }
    }
    Ok(())
}

fn write_letter_run(
    worksheet: &mut Worksheet,
    row: u32,
    col: u32,
    run: &LetterRun,
    style: Option<&Style>,
    cell_fmt: &Format,
    letter_color: Option<Color>,
) -> Result<()> {
    let base = style.map(font_format).unwrap_or_default();
    let mut red = base.clone();
    if let Some(c) = letter_color {
        red = red.set_font_color(c);
    }
    let number = format!("{} ", run.number);
    let fragments: [(&Format, &str); 2] = [(&base, number.as_str()), (&red, run.letters.as_str())];
    worksheet.write_rich_string_with_format(row, col_num(col)?, &fragments, cell_fmt)?;
    Ok(())
}

/// Merges that can be written: overlapping ranges after the first are skipped.
fn writable_merges(sheet: &Sheet) -> Vec<MergeRange> {
    let mut kept: Vec<MergeRange> = Vec::with_capacity(sheet.merges.len());
    for merge in &sheet.merges {
        if merge.is_single_cell() {
            continue;
        }
        if kept.iter().any(|k| k.overlaps(merge)) {
            warn!(sheet = %sheet.name, ?merge, "overlapping merge skipped");
            continue;
        }
        kept.push(*merge);
    }
    kept
}

/// Write one rendered sheet into `worksheet`.
pub fn write_sheet(worksheet: &mut Worksheet, rendered: &RenderedSheet, letter_color: &str) -> Result<()> {
    let sheet = &rendered.sheet;
    worksheet.set_name(&sheet.name)?;
    worksheet.set_screen_gridlines(sheet.show_gridlines);

    for (&col, &width) in &sheet.col_widths {
        worksheet.set_column_width(col_num(col)?, width)?;
    }
    for (&row, &height) in &sheet.row_heights {
        worksheet.set_row_height(row, height)?;
    }

    let letter_color = hex_to_rgb(letter_color).map(Color::RGB);
    let merges = writable_merges(sheet);
    let mut cache = FormatCache::default();

    for merge in &merges {
        let anchor = sheet.cell(merge.start_row, merge.start_col).cloned().unwrap_or_default();
        let fmt = cache.get(&anchor).clone();
        worksheet.merge_range(
            merge.start_row,
            col_num(merge.start_col)?,
            merge.end_row,
            col_num(merge.end_col)?,
            "",
            &fmt,
        )?;
    }

    for (row, col, cell) in sheet.cells() {
        let in_merge = merges.iter().find(|m| m.contains(row, col));
        if in_merge.is_some_and(|m| m.start_row != row || m.start_col != col) {
            continue;
        }
        if cell.value.is_blank() && cell.style.is_none() && in_merge.is_none() {
            continue;
        }
        let fmt = cache.get(cell).clone();
        match rendered.letter_runs.get(&(row, col)) {
            Some(run) => write_letter_run(
                worksheet,
                row,
                col,
                run,
                cell.style.as_deref(),
                &fmt,
                letter_color,
            )?,
            None => write_value(worksheet, row, col, &cell.value, &fmt)?,
        }
    }

    debug!(
        sheet = %sheet.name,
        cells = sheet.cells().count(),
        merges = merges.len(),
        rich = rendered.letter_runs.len(),
        "sheet written"
    );
    Ok(())
}

/// Assemble all rendered sheets, in order, into a workbook.
pub fn build_workbook(sheets: &[RenderedSheet], letter_color: &str) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    for rendered in sheets {
        let worksheet = workbook.add_worksheet();
        write_sheet(worksheet, rendered, letter_color)?;
    }
    Ok(workbook)
}

/// Write `sheets` to an XLSX file at `path`.
pub fn save(sheets: &[RenderedSheet], letter_color: &str, path: &Path) -> Result<()> {
    let mut workbook = build_workbook(sheets, letter_color)?;
    workbook.save(path)?;
    Ok(())
}

/// Serialize `sheets` to XLSX bytes.
pub fn to_bytes(sheets: &[RenderedSheet], letter_color: &str) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(sheets, letter_color)?;
    Ok(workbook.save_to_buffer()?)
}
