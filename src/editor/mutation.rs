//! Structural edits on a [`Sheet`].
//!
//! Deleting rows or columns moves every cell, dimension and merge record
//! after the deleted span back by the span length. Merges that intersect the
//! span shrink by the number of deleted lines they covered and are dropped
//! once nothing (or a single cell) is left.

use std::collections::BTreeMap;

use crate::types::{MergeRange, Sheet};

#[derive(Clone, Copy)]
enum Axis {
    Row,
    Col,
}

/// Remap one `[lo, hi]` span around a deletion of `[start, start + count)`.
///
/// Returns `None` when the whole span was deleted.
fn remap_span(lo: u32, hi: u32, start: u32, count: u32) -> Option<(u32, u32)> {
    let end = start.saturating_add(count); // exclusive
    if hi < start {
        return Some((lo, hi));
    }
    if lo >= end {
        return Some((lo - count, hi - count));
    }
    let covered = hi.min(end - 1) - lo.max(start) + 1;
    let len = hi - lo + 1;
    let remaining = len - covered;
    if remaining == 0 {
        return None;
    }
    let new_lo = lo.min(start);
    Some((new_lo, new_lo + remaining - 1))
}

fn remap_key(idx: u32, start: u32, count: u32) -> Option<u32> {
    let end = start.saturating_add(count);
    if idx < start {
        Some(idx)
    } else if idx < end {
        None
    } else {
        Some(idx - count)
    }
}

fn shift_dimension(map: &mut BTreeMap<u32, f64>, start: u32, count: u32) {
    *map = std::mem::take(map)
        .into_iter()
        .filter_map(|(idx, v)| remap_key(idx, start, count).map(|i| (i, v)))
        .collect();
}

fn delete_span(sheet: &mut Sheet, axis: Axis, start: u32, count: u32) {
    if count == 0 {
        return;
    }

    sheet.cells = std::mem::take(&mut sheet.cells)
        .into_iter()
        .filter_map(|((row, col), cell)| match axis {
            Axis::Row => remap_key(row, start, count).map(|r| ((r, col), cell)),
            Axis::Col => remap_key(col, start, count).map(|c| ((row, c), cell)),
        })
        .collect();

    match axis {
        Axis::Row => shift_dimension(&mut sheet.row_heights, start, count),
        Axis::Col => shift_dimension(&mut sheet.col_widths, start, count),
    }

    sheet.merges = std::mem::take(&mut sheet.merges)
        .into_iter()
        .filter_map(|m| {
            let remapped = match axis {
                Axis::Row => remap_span(m.start_row, m.end_row, start, count).map(|(lo, hi)| {
                    MergeRange::new(lo, m.start_col, hi, m.end_col)
                }),
                Axis::Col => remap_span(m.start_col, m.end_col, start, count).map(|(lo, hi)| {
                    MergeRange::new(m.start_row, lo, m.end_row, hi)
                }),
            };
            remapped.filter(|r| !r.is_single_cell())
        })
        .collect();
}

/// Delete `count` rows starting at 0-indexed `start`.
pub fn delete_rows(sheet: &mut Sheet, start: u32, count: u32) {
    delete_span(sheet, Axis::Row, start, count);
}

/// Delete `count` columns starting at 0-indexed `start`.
pub fn delete_cols(sheet: &mut Sheet, start: u32, count: u32) {
    delete_span(sheet, Axis::Col, start, count);
}

/// Drop every merge record matching `pred`; returns how many were removed.
pub fn remove_merges_where(sheet: &mut Sheet, pred: impl Fn(&MergeRange) -> bool) -> usize {
    let before = sheet.merges.len();
    sheet.merges.retain(|m| !pred(m));
    before - sheet.merges.len()
}

/// Unmerge ranges lying entirely inside column `col`.
pub fn unmerge_column(sheet: &mut Sheet, col: u32) -> usize {
    remove_merges_where(sheet, |m| m.start_col == col && m.end_col == col)
}

/// Copy the values of `from_row` into `to_row` for columns `first_col..width`.
///
/// Styles of the target row are kept.
pub fn copy_row_values(sheet: &mut Sheet, from_row: u32, to_row: u32, first_col: u32, width: u32) {
    for col in first_col..width {
        let value = sheet.value(from_row, col).clone();
        if value.is_blank() && sheet.cell(to_row, col).is_none() {
            continue;
        }
        sheet.set_value(to_row, col, value);
    }
}
