//! Banner sheet rendering.
//!
//! The output starts as a copy of the source sheet so every untouched cell
//! keeps its look. The combined table is written over it, the first three
//! columns are bolded, the answer-label column B is removed and significance
//! letters become red runs after their percentage.

use tracing::debug;

use crate::analysis::CombinedTable;
use crate::config::LayoutConfig;
use crate::editor::{bold_columns, clear_wrap_from, delete_cols, unmerge_column};
use crate::frame::{Frame, UNNAMED_PREFIX};
use crate::types::{CellValue, Sheet};

use super::{LetterRun, RenderedSheet};

/// Column holding answer labels in the source; dropped from the output.
const LABEL_COL: u32 = 1;
/// Columns bolded before the label column goes.
const BOLD_COLS: std::ops::Range<u32> = 0..3;

fn col_u32(col: usize) -> Option<u32> {
    u32::try_from(col).ok()
}

fn write_table(sheet: &mut Sheet, table: &CombinedTable) {
    for (c, header) in table.headers.iter().enumerate() {
        let Some(col) = col_u32(c) else { continue };
        if !header.contains(UNNAMED_PREFIX) {
            sheet.set_value(0, col, header.as_str());
        }
    }
    for (r, row) in table.rows.iter().enumerate() {
        let sheet_row = Frame::sheet_row(r);
        for (c, value) in row.iter().enumerate() {
            let Some(col) = col_u32(c) else { continue };
            if !value.is_blank() {
                sheet.set_value(sheet_row, col, value.clone());
            }
        }
    }
}

/// Split `"45.00 A,C"` into the number and the letters.
fn letter_run(text: &str) -> Option<LetterRun> {
    let (number, letters) = text.split_once(' ')?;
    let letters = letters.trim();
    (!letters.is_empty()).then(|| LetterRun {
        number: number.to_string(),
        letters: letters.to_string(),
    })
}

fn apply_layout(sheet: &mut Sheet, layout: &LayoutConfig) {
    sheet.col_widths.clear();
    sheet.col_widths.insert(0, layout.label_width);
    sheet.col_widths.insert(1, layout.link_width);
    for col in 2..sheet.col_count() {
        sheet.col_widths.insert(col, layout.data_width);
    }
    for row in 0..sheet.row_count() {
        sheet.row_heights.insert(row, layout.row_height);
    }
}

/// Render the annotated banner over a copy of `source`.
#[must_use]
pub fn render_banner(source: &Sheet, table: &CombinedTable, layout: &LayoutConfig) -> RenderedSheet {
    let mut sheet = source.clone();
    let unmerged = unmerge_column(&mut sheet, LABEL_COL);

    write_table(&mut sheet, table);
    bold_columns(&mut sheet, BOLD_COLS);
    delete_cols(&mut sheet, LABEL_COL, 1);

    let mut rendered = RenderedSheet::new(sheet);
    for &(r, c) in table.letters.keys() {
        let (Some(col), Some(text)) = (
            col_u32(c).and_then(|c| c.checked_sub(1)),
            table.rows.get(r).and_then(|row| row.get(c)).and_then(CellValue::as_str),
        ) else {
            continue;
        };
        if let Some(run) = letter_run(text) {
            rendered.letter_runs.insert((Frame::sheet_row(r), col), run);
        }
    }

    rendered.sheet.set_value(0, 0, CellValue::Empty);
    apply_layout(&mut rendered.sheet, layout);
    clear_wrap_from(&mut rendered.sheet, 1);

    debug!(
        sheet = %rendered.sheet.name,
        unmerged,
        letter_cells = rendered.letter_runs.len(),
        cut_row = table.cut_row,
        "banner rendered"
    );
    rendered
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::{Cell, MergeRange, Style, StyleRef};
    use std::collections::BTreeMap;

    fn source() -> Sheet {
        let mut s = Sheet::new("Banner");
        let fill = StyleRef::new(Style {
            bg_color: Some("#DDEBF7".into()),
            wrap: Some(true),
            ..Style::default()
        });
        s.set_value(0, 0, "Study");
        s.set_value(0, 3, "TOTAL");
        s.set_value(1, 0, "Q1");
        s.set_value(2, 1, "Yes");
        s.set_cell(2, 4, Cell::styled("60", fill));
        s.add_merge(MergeRange::new(1, 1, 2, 1));
        s.add_merge(MergeRange::new(1, 3, 1, 4));
        s
    }

    fn table() -> CombinedTable {
        let mut letters = BTreeMap::new();
        letters.insert((1, 4), "B".to_string());
        CombinedTable {
            headers: vec![
                "Unnamed: 0".into(),
                "Unnamed: 1".into(),
                "Unnamed: 2".into(),
                "TOTAL".into(),
                "Men".into(),
            ],
            rows: vec![
                vec![CellValue::from("Q1"), CellValue::Empty, CellValue::Empty, CellValue::Empty, CellValue::Empty],
                vec![
                    CellValue::Empty,
                    CellValue::from("Yes"),
                    CellValue::from("Yes"),
                    CellValue::from("45.00"),
                    CellValue::from("60.00 B"),
                ],
            ],
            letters,
            cut_row: 2,
        }
    }

    #[test]
    fn label_column_is_dropped_and_letters_shift() {
        let out = render_banner(&source(), &table(), &LayoutConfig::default());
        let s = &out.sheet;
        // A1 cleared, TOTAL header moved from D to C
        assert_eq!(s.value(0, 0), &CellValue::Empty);
        assert_eq!(s.value(0, 2).as_str(), Some("TOTAL"));
        assert_eq!(s.value(2, 1).as_str(), Some("Yes"));
        assert_eq!(s.value(2, 3).as_str(), Some("60.00 B"));
        assert_eq!(
            out.letter_runs.get(&(2, 3)),
            Some(&LetterRun {
                number: "60.00".into(),
                letters: "B".into()
            })
        );
    }

    #[test]
    fn styles_survive_and_layout_is_applied() {
        let layout = LayoutConfig::default();
        let out = render_banner(&source(), &table(), &layout);
        let s = &out.sheet;
        let style = s.style(2, 3).unwrap();
        assert_eq!(style.bg_color.as_deref(), Some("#DDEBF7"));
        assert_eq!(style.wrap, None);
        assert_eq!(s.style(1, 0).unwrap().bold, Some(true));
        assert_eq!(s.col_widths.get(&0), Some(&layout.label_width));
        assert_eq!(s.col_widths.get(&3), Some(&layout.data_width));
        assert_eq!(s.row_heights.len(), 3);
        // the column-B merge is gone; the D:E merge now spans C:D
        assert_eq!(s.merges, vec![MergeRange::new(1, 2, 1, 3)]);
    }

    #[test]
    fn plain_percentages_have_no_run() {
        assert_eq!(letter_run("45.00"), None);
        assert_eq!(
            letter_run("45.00 A,C"),
            Some(LetterRun {
                number: "45.00".into(),
                letters: "A,C".into()
            })
        );
    }
}
