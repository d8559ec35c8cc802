//! Worksheet parsing: cells, row heights, column widths, merges and the
//! gridline flag.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::{parse_cell_range, parse_cell_ref_bytes};
use crate::error::Result;
use crate::types::{Cell, CellValue, Sheet, StyleRef};
use crate::xml_helpers::{attr_bool, attr_f64, attr_string, attr_u32};

/// Sheet entry from workbook.xml
pub(super) struct SheetInfo {
    pub name: String,
    pub path: String,
}

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Default,
}

pub(super) fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        _ => CellTypeTag::Default,
    }
}

/// Shared lookup tables for one workbook.
pub(super) struct SheetContext<'a> {
    pub shared_strings: &'a [String],
    pub styles: &'a [Option<StyleRef>],
    pub default_style: Option<&'a StyleRef>,
}

struct PendingCell {
    row: u32,
    col: u32,
    tag: CellTypeTag,
    style_idx: Option<u32>,
    text: Option<String>,
}

fn resolve_value(raw: Option<&str>, tag: CellTypeTag, shared_strings: &[String]) -> CellValue {
    let Some(raw) = raw else {
        return CellValue::Empty;
    };
    match tag {
        CellTypeTag::Shared => raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|idx| shared_strings.get(idx))
            .map_or(CellValue::Empty, |s| CellValue::Text(s.clone())),
        CellTypeTag::Str | CellTypeTag::Inline | CellTypeTag::Error => {
            CellValue::Text(raw.to_string())
        }
        CellTypeTag::Bool => match raw.trim() {
            "1" | "true" => CellValue::Number(1.0),
            "0" | "false" => CellValue::Number(0.0),
            other => CellValue::Text(other.to_string()),
        },
        CellTypeTag::Default => raw
            .trim()
            .parse::<f64>()
            .map_or_else(|_| CellValue::Text(raw.to_string()), CellValue::Number),
    }
}

fn open_cell(e: &BytesStart, current_row: u32, next_col: u32) -> PendingCell {
    let (col, row) = e
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"r")
        .and_then(|a| parse_cell_ref_bytes(&a.value))
        .unwrap_or((next_col, current_row));
    let tag = e
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"t")
        .map_or(CellTypeTag::Default, |a| parse_cell_type_tag(&a.value));
    PendingCell {
        row,
        col,
        tag,
        style_idx: attr_u32(e, b"s"),
        text: None,
    }
}

/// Parse one worksheet part into a [`Sheet`].
#[allow(clippy::too_many_lines)]
pub(super) fn parse_sheet<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    info: &SheetInfo,
    ctx: &SheetContext<'_>,
) -> Result<Sheet> {
    let file = archive.by_name(&info.path)?;
    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut sheet = Sheet::new(info.name.clone());
    let mut buf = Vec::new();

    let mut current_row: u32 = 0;
    let mut next_col: u32 = 0;
    let mut pending: Option<PendingCell> = None;
    // Inside <v>, or <t> under <is>
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            ref event @ (Event::Start(ref e) | Event::Empty(ref e)) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.local_name().as_ref() {
                    b"sheetView" => {
                        if let Some(show) = attr_bool(e, b"showGridLines") {
                            sheet.show_gridlines = show;
                        }
                    }
                    b"row" => {
                        current_row = attr_u32(e, b"r")
                            .map_or(current_row.saturating_add(1), |r| r.saturating_sub(1));
                        next_col = 0;
                        if let Some(ht) = attr_f64(e, b"ht") {
                            sheet.row_heights.insert(current_row, ht);
                        }
                    }
                    b"c" => {
                        let cell = open_cell(e, current_row, next_col);
                        next_col = cell.col.saturating_add(1);
                        if is_empty {
                            finish_cell(&mut sheet, cell, ctx);
                        } else {
                            pending = Some(cell);
                        }
                    }
                    b"v" if pending.is_some() && !is_empty => in_text = true,
                    b"rPh" => in_phonetic = true,
                    b"t" if pending.is_some() && !is_empty && !in_phonetic => in_text = true,
                    b"col" => {
                        let min = attr_u32(e, b"min").unwrap_or(1);
                        let max = attr_u32(e, b"max").unwrap_or(min);
                        if let Some(width) = attr_f64(e, b"width") {
                            // Column spans may run to the 16384th column
                            for col in min..=max.min(min.saturating_add(512)) {
                                sheet.col_widths.insert(col.saturating_sub(1), width);
                            }
                        }
                    }
                    b"mergeCell" => {
                        if let Some(range) =
                            attr_string(e, b"ref").and_then(|r| parse_cell_range(&r))
                        {
                            sheet.add_merge(range);
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) if in_text => {
                if let Some(cell) = pending.as_mut() {
                    cell.text
                        .get_or_insert_with(String::new)
                        .push_str(&e.unescape()?);
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                b"c" => {
                    if let Some(cell) = pending.take() {
                        finish_cell(&mut sheet, cell, ctx);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sheet)
}

fn finish_cell(sheet: &mut Sheet, cell: PendingCell, ctx: &SheetContext<'_>) {
    let value = resolve_value(cell.text.as_deref(), cell.tag, ctx.shared_strings);
    let style = match cell.style_idx {
        Some(idx) => usize::try_from(idx)
            .ok()
            .and_then(|i| ctx.styles.get(i))
            .cloned()
            .flatten(),
        None => ctx.default_style.cloned(),
    };
    if value.is_blank() && style.is_none() {
        return;
    }
    sheet.set_cell(cell.row, cell.col, Cell { value, style });
}
