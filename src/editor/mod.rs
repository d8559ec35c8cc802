//! In-place edits on the sheet model.
//!
//! `mutation` holds the structural edits (row/column deletion and merge
//! bookkeeping); the helpers here touch cell styles only.

pub mod mutation;

pub use mutation::{
    copy_row_values, delete_cols, delete_rows, remove_merges_where, unmerge_column,
};

use std::ops::Range;

use crate::types::{Sheet, Style, StyleRef};

/// Bold every stored cell in `cols`, keeping its other font attributes.
pub fn bold_columns(sheet: &mut Sheet, cols: Range<u32>) {
    for (_, col, cell) in sheet.cells_mut() {
        if !cols.contains(&col) {
            continue;
        }
        match cell.style.as_mut() {
            Some(style) => style.edit(|s| s.bold = Some(true)),
            None => {
                cell.style = Some(StyleRef::new(Style {
                    bold: Some(true),
                    ..Style::default()
                }));
            }
        }
    }
}

/// Turn text wrapping off for every column from `first_col` on.
pub fn clear_wrap_from(sheet: &mut Sheet, first_col: u32) {
    for (_, col, cell) in sheet.cells_mut() {
        if col < first_col {
            continue;
        }
        if let Some(style) = cell.style.as_mut() {
            if style.wrap.is_some() {
                style.edit(|s| s.wrap = None);
            }
        }
    }
}
