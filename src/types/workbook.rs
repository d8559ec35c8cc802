use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Cell, CellValue, StyleRef, Theme};

static EMPTY: CellValue = CellValue::Empty;

/// Ordered collection of sheets loaded from one file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
    pub theme: Theme,
}

impl Workbook {
    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Merged cell range, 0-indexed and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRange {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl MergeRange {
    #[must_use]
    pub const fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    #[must_use]
    pub const fn is_single_cell(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }

    #[must_use]
    pub const fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.start_row && row <= self.end_row && col >= self.start_col && col <= self.end_col
    }

    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start_row <= other.end_row
            && other.start_row <= self.end_row
            && self.start_col <= other.end_col
            && other.start_col <= self.end_col
    }
}

/// One worksheet: a cell arena keyed by `(row, col)` plus merge records and
/// per-row/per-column dimensions.
///
/// All coordinates are 0-indexed. Widths are in Excel character units,
/// heights in points.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub(crate) cells: BTreeMap<(u32, u32), Cell>,
    pub merges: Vec<MergeRange>,
    pub col_widths: BTreeMap<u32, f64>,
    pub row_heights: BTreeMap<u32, f64>,
    pub show_gridlines: bool,
}

impl Sheet {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            show_gridlines: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    pub fn cell_mut(&mut self, row: u32, col: u32) -> &mut Cell {
        self.cells.entry((row, col)).or_default()
    }

    /// Value at `(row, col)`, `Empty` when the cell does not exist.
    #[must_use]
    pub fn value(&self, row: u32, col: u32) -> &CellValue {
        self.cells.get(&(row, col)).map_or(&EMPTY, |c| &c.value)
    }

    #[must_use]
    pub fn style(&self, row: u32, col: u32) -> Option<&StyleRef> {
        self.cells.get(&(row, col)).and_then(|c| c.style.as_ref())
    }

    /// Overwrite the value, keeping whatever style the cell already has.
    pub fn set_value(&mut self, row: u32, col: u32, value: impl Into<CellValue>) {
        self.cell_mut(row, col).value = value.into();
    }

    pub fn set_cell(&mut self, row: u32, col: u32, cell: Cell) {
        self.cells.insert((row, col), cell);
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, &Cell)> {
        self.cells.iter().map(|(&(r, c), cell)| (r, c, cell))
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = (u32, u32, &mut Cell)> {
        self.cells.iter_mut().map(|(&(r, c), cell)| (r, c, cell))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.values().all(|c| c.value.is_blank())
    }

    /// Number of rows spanned by stored cells (last row index + 1).
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.cells
            .keys()
            .next_back()
            .map_or(0, |&(r, _)| r.saturating_add(1))
    }

    /// Number of columns spanned by stored cells (last column index + 1).
    #[must_use]
    pub fn col_count(&self) -> u32 {
        self.cells
            .keys()
            .map(|&(_, c)| c.saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    /// Values of one row, padded with `Empty` up to `width`.
    #[must_use]
    pub fn row_values(&self, row: u32, width: u32) -> Vec<CellValue> {
        (0..width).map(|c| self.value(row, c).clone()).collect()
    }

    pub fn add_merge(&mut self, range: MergeRange) {
        if !range.is_single_cell() {
            self.merges.push(range);
        }
    }
}
