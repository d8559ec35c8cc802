//! Cross-sheet summary of Total rows.
//!
//! Each rendered banner contributes a block of columns: its name on the first
//! row, then one row per Total row holding the latest question label and the
//! Total figures. Blank figures are flagged, and so are figures that differ
//! from the first banner's figure at the same position.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::TotalsConfig;
use crate::types::{Cell, CellValue, PatternType, Sheet, Style, StyleRef};

use super::RenderedSheet;

/// Label in column B of a rendered banner's Total rows.
const TOTAL_LABEL: &str = "Total";
/// First column copied from a Total row.
const FIRST_VALUE_COL: u32 = 2;

fn fill(color: &str) -> StyleRef {
    StyleRef::new(Style {
        pattern_type: Some(PatternType::Solid),
        bg_color: Some(color.to_string()),
        ..Style::default()
    })
}

/// Figures of one banner keyed by `(row, column within its block)`.
type Figures = BTreeMap<(u32, u32), CellValue>;

pub struct TotalsBuilder {
    config: TotalsConfig,
    sheet: Sheet,
    next_col: u32,
    reference: Option<Figures>,
    missing: StyleRef,
    mismatch: StyleRef,
    mismatches: usize,
}

impl TotalsBuilder {
    #[must_use]
    pub fn new(config: &TotalsConfig) -> Self {
        Self {
            sheet: Sheet::new(config.sheet_name.as_str()),
            next_col: 0,
            reference: None,
            missing: fill(&config.missing_fill),
            mismatch: fill(&config.mismatch_fill),
            mismatches: 0,
            config: config.clone(),
        }
    }

    /// Figures that differed from the first banner so far.
    #[must_use]
    pub const fn mismatches(&self) -> usize {
        self.mismatches
    }

    /// Add the Total rows of one rendered banner sheet.
    pub fn append(&mut self, banner: &Sheet) {
        let base = self.next_col;
        let max_col = banner.col_count();
        self.sheet.set_value(0, base, banner.name.as_str());

        let mut figures = Figures::new();
        let mut index_row = 1;
        for row in 0..banner.row_count() {
            let label = banner.value(row, 0);
            if !label.is_blank() {
                self.sheet.set_value(index_row, base, label.clone());
                continue;
            }
            if banner.value(row, 1).as_str() != Some(TOTAL_LABEL) {
                continue;
            }

            for col in FIRST_VALUE_COL..max_col {
                let rel = col - 1;
                let value = banner.value(row, col);
                let cell = if value.is_blank() {
                    Cell::styled(CellValue::Empty, self.missing.clone())
                } else if self
                    .reference
                    .as_ref()
                    .and_then(|r| r.get(&(index_row, rel)))
                    .is_some_and(|first| !first.same_as(value))
                {
                    self.mismatches += 1;
                    Cell::styled(value.clone(), self.mismatch.clone())
                } else {
                    Cell::new(value.clone())
                };
                self.sheet.set_cell(index_row, base + rel, cell);
                figures.insert((index_row, rel), value.clone());
            }
            index_row += 1;
        }

        debug!(sheet = %banner.name, base, rows = index_row - 1, "totals appended");
        if self.reference.is_none() {
            self.reference = Some(figures);
        }
        self.next_col = base + max_col.max(1);
    }

    fn column_is_empty(&self, col: u32) -> bool {
        (0..self.sheet.row_count()).all(|r| self.sheet.value(r, col).is_blank())
    }

    /// Size the columns and shade the separators between banner blocks.
    #[must_use]
    pub fn finish(mut self) -> RenderedSheet {
        let separator = fill(&self.config.separator_fill);
        let rows = self.sheet.row_count();
        let last_col = self.next_col;

        for col in 0..last_col {
            let width = if !self.column_is_empty(col) {
                self.config.value_width
            } else if col + 1 < last_col && !self.column_is_empty(col + 1) {
                for row in 0..rows {
                    let cell = self.sheet.cell_mut(row, col);
                    cell.style = Some(separator.clone());
                }
                self.config.separator_width
            } else {
                self.config.gap_width
            };
            self.sheet.col_widths.insert(col, width);
        }

        RenderedSheet::new(self.sheet)
    }
}
