//! Penalty sheet rendering.

use crate::analysis::PenaltyTable;
use crate::config::LayoutConfig;
use crate::types::{Border, BorderStyle, Cell, CellValue, HAlign, MergeRange, Sheet, Style, StyleRef, VAlign};

use super::RenderedSheet;

const HEADER_LABEL: &str = "Grouped Variable";
const VALUE_FORMAT: &str = "0.00";
/// Blank rows between consecutive tables.
const TABLE_GAP: u32 = 2;

fn header_style(thick_top: bool) -> Style {
    Style {
        bold: Some(true),
        align_h: Some(HAlign::Center),
        border_bottom: Some(Border::black(BorderStyle::Thin)),
        border_top: thick_top.then(|| Border::black(BorderStyle::Thick)),
        ..Style::default()
    }
}

fn body_style(col: u32, last_row: bool) -> Style {
    let mut style = Style::default();
    if col >= 1 {
        style = style.with_rules(
            Some(BorderStyle::Thin),
            Some(if last_row { BorderStyle::Thick } else { BorderStyle::Thin }),
        );
    } else if last_row {
        style.border_bottom = Some(Border::black(BorderStyle::Thick));
    }
    if col >= 2 {
        style.number_format = Some(VALUE_FORMAT.to_string());
    }
    if col == 0 {
        style.align_v = Some(VAlign::Top);
        style.wrap = Some(true);
    }
    style
}

fn u32_of(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Write one table with its header on `start_row`; returns the row after it.
fn write_table(sheet: &mut Sheet, table: &PenaltyTable, start_row: u32) -> u32 {
    let ncols = u32_of(table.samples.len()).saturating_add(2);
    let nrows = u32_of(table.rows.len());
    let last_row = start_row + nrows;

    for col in 0..ncols {
        let value = match col {
            0 => CellValue::Empty,
            1 => CellValue::from(HEADER_LABEL),
            _ => table
                .samples
                .get((col - 2) as usize)
                .map_or(CellValue::Empty, |s| CellValue::from(s.as_str())),
        };
        // the question column only carries the thick rule
        let style = if col == 0 {
            Style {
                border_top: Some(Border::black(BorderStyle::Thick)),
                ..Style::default()
            }
        } else {
            header_style(true)
        };
        sheet.set_cell(start_row, col, Cell::styled(value, StyleRef::new(style)));
    }

    for (i, row) in table.rows.iter().enumerate() {
        let r = start_row + 1 + u32_of(i);
        let is_last = r == last_row;
        for col in 0..ncols {
            let value = match col {
                0 if i == 0 => CellValue::from(table.question.as_str()),
                0 => CellValue::Empty,
                1 => CellValue::from(row.label.as_str()),
                _ => row.values.get((col - 2) as usize).copied().flatten().into(),
            };
            sheet.set_cell(r, col, Cell::styled(value, StyleRef::new(body_style(col, is_last))));
        }
    }

    sheet.add_merge(MergeRange::new(start_row + 1, 0, last_row, 0));
    last_row + 1 + TABLE_GAP
}

/// Lay out `tables` one below the other on a fresh sheet named `name`.
#[must_use]
pub fn render_penalty(name: &str, tables: &[PenaltyTable], layout: &LayoutConfig) -> RenderedSheet {
    let mut sheet = Sheet::new(name);
    sheet.show_gridlines = false;

    let mut start_row = 0;
    for table in tables {
        start_row = write_table(&mut sheet, table, start_row);
    }

    sheet.col_widths.insert(0, layout.penalty_question_width);
    sheet.col_widths.insert(1, layout.penalty_group_width);
    RenderedSheet::new(sheet)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::analysis::PenaltyRow;

    fn table(question: &str) -> PenaltyTable {
        PenaltyTable {
            question: question.into(),
            samples: vec!["S1".into(), "S2".into()],
            rows: vec![
                PenaltyRow {
                    label: "Too little".into(),
                    values: vec![Some(0.2), None],
                },
                PenaltyRow {
                    label: "TOTAL".into(),
                    values: vec![Some(100.0), Some(80.0)],
                },
            ],
        }
    }

    #[test]
    fn tables_stack_with_gap() {
        let out = render_penalty("Penal", &[table("P1"), table("P2")], &LayoutConfig::default());
        let s = &out.sheet;
        assert!(!s.show_gridlines);
        assert_eq!(s.value(0, 1).as_str(), Some("Grouped Variable"));
        assert_eq!(s.value(0, 3).as_str(), Some("S2"));
        assert_eq!(s.value(1, 0).as_str(), Some("P1"));
        assert_eq!(s.value(1, 2), &CellValue::Number(0.2));
        assert_eq!(s.value(1, 3), &CellValue::Empty);
        // two rows, two blank rows, then the next header
        assert_eq!(s.value(5, 1).as_str(), Some("Grouped Variable"));
        assert_eq!(s.value(6, 0).as_str(), Some("P2"));
        assert_eq!(s.merges, vec![MergeRange::new(1, 0, 2, 0), MergeRange::new(6, 0, 7, 0)]);
    }

    #[test]
    fn rules_frame_each_table() {
        let out = render_penalty("Penal", &[table("P1")], &LayoutConfig::default());
        let s = &out.sheet;
        let header = s.style(0, 2).unwrap();
        assert_eq!(header.bold, Some(true));
        assert_eq!(header.border_top.as_ref().unwrap().style, BorderStyle::Thick);
        assert_eq!(header.border_bottom.as_ref().unwrap().style, BorderStyle::Thin);
        let last = s.style(2, 2).unwrap();
        assert_eq!(last.border_bottom.as_ref().unwrap().style, BorderStyle::Thick);
        assert_eq!(last.number_format.as_deref(), Some("0.00"));
        assert_eq!(s.style(1, 0).unwrap().align_v, Some(VAlign::Top));
    }
}
