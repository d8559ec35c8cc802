//! Grouped-category ("NETO") consolidation.
//!
//! Banner exports repeat every NETO roll-up row: once in place, and once more
//! further down inside its own small table. The second copy carries the real
//! figures. Consolidation copies those figures up, drops the duplicated table
//! with its merges, and trims trailing rows without content.

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::config::NetoConfig;
use crate::editor::{copy_row_values, delete_rows, remove_merges_where};
use crate::types::Sheet;

/// Column holding NETO markers (B).
const MARKER_COL: u32 = 1;
/// Columns whose emptiness marks a trailing row (C and D).
const CONTENT_COLS: [u32; 2] = [2, 3];

/// What one consolidation pass changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessSummary {
    pub consolidated: usize,
    pub merges_removed: usize,
    pub rows_deleted: u32,
    pub trailing_trimmed: u32,
}

impl PreprocessSummary {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.consolidated == 0
            && self.merges_removed == 0
            && self.rows_deleted == 0
            && self.trailing_trimmed == 0
    }
}

fn neto_marker<'a>(sheet: &'a Sheet, row: u32, config: &NetoConfig) -> Option<&'a str> {
    let label = sheet.value(row, MARKER_COL).as_str()?;
    (label.starts_with(&config.marker) && !config.reserved.iter().any(|r| r == label))
        .then_some(label)
}

fn find_duplicate(sheet: &Sheet, label: &str, after: u32) -> Option<u32> {
    (after + 1..sheet.row_count()).find(|&r| sheet.value(r, MARKER_COL).as_str() == Some(label))
}

/// Consolidate NETO rows of one banner sheet in place.
pub fn consolidate_netos(sheet: &mut Sheet, config: &NetoConfig) -> PreprocessSummary {
    let mut summary = PreprocessSummary::default();
    let width = sheet.col_count();

    // Pass 1: pull figures up from each first duplicate
    let mut pending: HashMap<String, u32> = HashMap::new();
    for row in 0..sheet.row_count() {
        let Some(label) = neto_marker(sheet, row, config).map(ToString::to_string) else {
            continue;
        };
        let counter = pending.entry(label.clone()).or_insert(0);
        if *counter > 0 {
            *counter -= 1;
            continue;
        }
        *counter = 1;

        if let Some(dup) = find_duplicate(sheet, &label, row) {
            copy_row_values(sheet, dup, row, MARKER_COL, width);
            let lo = dup.saturating_sub(config.merge_window_before);
            let hi = dup.saturating_add(config.merge_window_after);
            summary.merges_removed +=
                remove_merges_where(sheet, |m| m.start_row >= lo && m.start_row <= hi);
            summary.consolidated += 1;
            debug!(sheet = %sheet.name, label = %label, row, duplicate = dup, "NETO consolidated");
        }
    }

    // Pass 2: drop the duplicated tables
    let mut row = 0;
    while row < sheet.row_count() {
        if let Some(label) = neto_marker(sheet, row, config).map(ToString::to_string) {
            if let Some(dup) = find_duplicate(sheet, &label, row) {
                let start = dup.saturating_sub(config.delete_offset);
                delete_rows(sheet, start, config.delete_count);
                summary.rows_deleted += config.delete_count;
                debug!(sheet = %sheet.name, label = %label, start, count = config.delete_count, "NETO table removed");
            }
        }
        row += 1;
    }

    // Pass 3: trailing rows with nothing in C and D; the header row stays
    loop {
        let last = sheet.row_count();
        if last <= 1 {
            break;
        }
        let row = last - 1;
        if CONTENT_COLS.iter().all(|&c| sheet.value(row, c).is_blank()) {
            delete_rows(sheet, row, 1);
            summary.trailing_trimmed += 1;
        } else {
            break;
        }
    }

    summary
}
