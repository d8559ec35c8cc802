//! Tests for layout inference and the significance pass on loaded banners.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use bannersig::analysis::{significance, CategoryColumnGroup, SignificanceOutcome};
use bannersig::config::NetoConfig;
use bannersig::frame::Frame;
use bannersig::preprocess::consolidate_netos;
use bannersig::{AnalysisConfig, CellValue, Sheet, StructuralError};
use common::*;

fn outcome_with(config: &AnalysisConfig) -> SignificanceOutcome {
    let mut sheet = load(&single_banner()).sheets.remove(0);
    consolidate_netos(&mut sheet, &NetoConfig::default());
    let frame = Frame::from_sheet(&mut sheet);
    significance::compute(&frame, config).unwrap()
}

fn outcome() -> SignificanceOutcome {
    outcome_with(&AnalysisConfig::default())
}

fn cell(outcome: &SignificanceOutcome, row: usize, col: usize) -> &CellValue {
    &outcome.table.rows[row][col]
}

#[test]
fn layout_is_inferred() {
    let meta = outcome().metadata;
    assert_eq!(meta.blocks.len(), 1);
    assert_eq!(meta.blocks[0].rows, vec![2, 3]);
    assert_eq!(meta.baseline_label, "Total");
    assert_eq!(meta.total_col, 3);
    assert_eq!(
        meta.groups,
        vec![CategoryColumnGroup::new(4, 6), CategoryColumnGroup::new(7, 9)]
    );
}

#[test]
fn whole_sample_column_becomes_percentages() {
    let out = outcome();
    assert_eq!(cell(&out, 2, 3), &CellValue::from("45.00"));
    assert_eq!(cell(&out, 3, 3), &CellValue::from("55.00"));
    assert_eq!(cell(&out, 4, 3), &CellValue::Number(200.0));
}

#[test]
fn significant_pairs_get_letters() {
    let out = outcome();
    // Total vs Men vs Women on "Yes"
    assert_eq!(cell(&out, 2, 4), &CellValue::from("45.00 C"));
    assert_eq!(cell(&out, 2, 5), &CellValue::from("60.00 A,C"));
    assert_eq!(cell(&out, 2, 6), &CellValue::from("30.00"));
    // and on "No"
    assert_eq!(cell(&out, 3, 4), &CellValue::from("55.00 B"));
    assert_eq!(cell(&out, 3, 5), &CellValue::from("40.00"));
    assert_eq!(cell(&out, 3, 6), &CellValue::from("70.00 A,B"));
    assert_eq!(out.table.letters_at(2, 5), Some("A,C"));
}

#[test]
fn close_proportions_stay_unmarked() {
    let out = outcome();
    assert_eq!(cell(&out, 2, 7), &CellValue::from("45.00"));
    assert_eq!(cell(&out, 2, 8), &CellValue::from("50.00"));
    assert_eq!(cell(&out, 2, 9), &CellValue::from("40.00"));
    assert_eq!(out.table.letters_at(2, 8), None);
    assert_eq!(out.table.letters.len(), 4);
}

#[test]
fn text_counts_are_parsed_and_totals_kept() {
    let out = outcome();
    assert_eq!(cell(&out, 4, 5), &CellValue::Number(100.0));
    assert_eq!(cell(&out, 4, 7), &CellValue::Number(200.0));
}

#[test]
fn first_answer_code_shows_its_label() {
    let out = outcome();
    assert_eq!(cell(&out, 2, 2), &CellValue::from("Yes"));
    assert_eq!(cell(&out, 3, 2), &CellValue::Number(2.0));
    assert_eq!(cell(&out, 4, 2), &CellValue::from("Total"));
}

#[test]
fn cut_row_falls_back_without_blank_rows() {
    assert_eq!(outcome().table.cut_row, 2);
}

#[test]
fn stricter_alpha_removes_letters() {
    let config = AnalysisConfig {
        alpha: 1e-9,
        ..AnalysisConfig::default()
    };
    let out = outcome_with(&config);
    assert!(out.table.letters.is_empty());
    assert_eq!(cell(&out, 2, 5), &CellValue::from("60.00"));
}

#[test]
fn small_samples_are_not_tested() {
    let config = AnalysisConfig {
        min_sample: 150.0,
        ..AnalysisConfig::default()
    };
    let out = outcome_with(&config);
    assert!(out.table.letters.is_empty());
}

#[test]
fn banner_without_total_header_is_rejected() {
    let mut sheet = Sheet::new("Blank");
    sheet.set_value(0, 2, "Banner");
    sheet.set_value(2, 2, 1.0);
    let frame = Frame::from_sheet(&mut sheet);
    let err = significance::compute(&frame, &AnalysisConfig::default()).unwrap_err();
    assert!(matches!(err, StructuralError::MissingColumn { .. }), "{err:?}");
}
