//! Tabular view of a banner sheet.
//!
//! The first sheet row names the columns and every later row is a data row,
//! so data row `i` sits on 0-indexed sheet row `i + 1`. Columns are addressed
//! by position; names only matter for the `TOTAL` column and the unnamed
//! metadata and label columns.

use tracing::debug;

use crate::editor::delete_rows;
use crate::types::{CellValue, Sheet};

/// Header of the whole-sample column.
pub const TOTAL_HEADER: &str = "TOTAL";
/// Prefix given to columns without a header.
pub const UNNAMED_PREFIX: &str = "Unnamed";
/// Column holding question-row markers and Total labels (C).
pub const METADATA_COLUMN: &str = "Unnamed: 2";
/// Column holding answer labels (B).
pub const LABEL_COLUMN: &str = "Unnamed: 1";

static EMPTY: CellValue = CellValue::Empty;

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// The header row was taken from the first data row.
    pub header_promoted: bool,
}

fn header_name(value: &CellValue) -> Option<String> {
    (!value.is_blank()).then(|| value.display())
}

impl Frame {
    /// Build the frame from `sheet`.
    ///
    /// When no header reads `TOTAL`, the first data row becomes the header
    /// row and the sheet's first row is deleted, keeping sheet and frame rows
    /// aligned.
    pub fn from_sheet(sheet: &mut Sheet) -> Self {
        let width = sheet.col_count();
        let last_row = sheet
            .cells()
            .filter(|(_, _, cell)| !cell.value.is_blank())
            .map(|(r, _, _)| r)
            .max();
        let height = last_row.map_or(0, |r| r.saturating_add(1));

        let headers: Vec<String> = (0..width)
            .map(|c| {
                header_name(sheet.value(0, c)).unwrap_or_else(|| format!("{UNNAMED_PREFIX}: {c}"))
            })
            .collect();
        let rows: Vec<Vec<CellValue>> = (1..height).map(|r| sheet.row_values(r, width)).collect();

        let mut frame = Self {
            headers,
            rows,
            header_promoted: false,
        };

        if frame.column(TOTAL_HEADER).is_none() && !frame.rows.is_empty() {
            let first = frame.rows.remove(0);
            let mut unnamed = 0;
            frame.headers = first
                .iter()
                .map(|v| {
                    header_name(v).unwrap_or_else(|| {
                        let name = format!("{UNNAMED_PREFIX}: {unnamed}");
                        unnamed += 1;
                        name
                    })
                })
                .collect();
            frame.header_promoted = true;
            delete_rows(sheet, 0, 1);
            debug!(sheet = %sheet.name, "header row promoted");
        }

        frame
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.headers.is_empty()
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Sheet row (0-indexed) holding data row `row`.
    #[must_use]
    pub fn sheet_row(row: usize) -> u32 {
        u32::try_from(row).map_or(u32::MAX, |r| r.saturating_add(1))
    }
}
