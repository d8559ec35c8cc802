//! Tests for penalty analysis and the rendered penalty sheet.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use bannersig::analysis::penalty;
use bannersig::config::PenaltyConfig;
use bannersig::{CellValue, MergeRange, SheetKind, SheetStatus, StructuralError};
use common::*;

fn penalty_sheet() -> bannersig::Sheet {
    let bytes = WorkbookFixture::new().penalty("Penalizacion").build();
    load(&bytes).sheets.remove(0)
}

#[test]
fn shares_and_means_per_sample() {
    let tables = penalty::analyze(&penalty_sheet(), &PenaltyConfig::default()).unwrap();
    assert_eq!(tables.len(), 1);
    let t = &tables[0];
    assert_eq!(t.question, "P1. Sweetness");
    assert_eq!(t.samples, vec!["Sample 1", "Sample 2"]);

    assert_close(t.row("Too little").unwrap().values[0].unwrap(), 0.2);
    assert_close(t.row("Just right").unwrap().values[0].unwrap(), 0.6);
    assert_close(t.row("MEAN Too little VS. IC").unwrap().values[0].unwrap(), 18.75);
    assert_close(t.row("MEAN Just right VS. IC").unwrap().values[0].unwrap(), 62.5);
    assert_close(t.row("MEAN Too much VS. IC").unwrap().values[0].unwrap(), 81.25);
}

#[test]
fn penalties_are_weighted_mean_drops() {
    let tables = penalty::analyze(&penalty_sheet(), &PenaltyConfig::default()).unwrap();
    let t = &tables[0];
    assert_close(t.row("PENALTY Too little").unwrap().values[0].unwrap(), -8.75);
    assert_close(t.row("PENALTY Too much").unwrap().values[0].unwrap(), 3.75);
    assert!(t.row("PENALTY Just right").is_none());
}

#[test]
fn unanswered_groups_stay_blank() {
    let tables = penalty::analyze(&penalty_sheet(), &PenaltyConfig::default()).unwrap();
    let t = &tables[0];
    // sample 2 only answered "Just right"
    assert_eq!(t.row("Too little").unwrap().values[1], None);
    assert_close(t.row("Just right").unwrap().values[1].unwrap(), 1.0);
    assert_close(t.row("MEAN Just right VS. IC").unwrap().values[1].unwrap(), 59.375);
    assert_eq!(t.row("PENALTY Too much").unwrap().values[1], None);
    assert_eq!(t.row("TOTAL").unwrap().values, vec![Some(100.0), Some(80.0)]);
}

#[test]
fn custom_weights_change_means() {
    let config = PenaltyConfig {
        weights: vec![1.0, 2.0, 3.0, 4.0, 5.0],
        ..PenaltyConfig::default()
    };
    let tables = penalty::analyze(&penalty_sheet(), &config).unwrap();
    // (1*10 + 2*5 + 3*5) / 20
    assert_close(
        tables[0].row("MEAN Too little VS. IC").unwrap().values[0].unwrap(),
        1.75,
    );
}

#[test]
fn sheet_without_questions_is_rejected() {
    let mut sheet = penalty_sheet();
    sheet.set_value(4, 0, "Sweetness");
    let err = penalty::analyze(&sheet, &PenaltyConfig::default()).unwrap_err();
    assert_eq!(err, StructuralError::NoPenaltyQuestions);
}

#[test]
fn penalty_sheet_is_rendered_as_tables() {
    let bytes = WorkbookFixture::new().penalty("Penalizacion").build();
    let (processed, _, reloaded) = round_trip(&bytes);

    let report = &processed.report.sheets[0];
    assert_eq!(report.kind, SheetKind::Penalty);
    assert_eq!(report.status, SheetStatus::Processed);
    assert_eq!(report.penalty_questions, 1);

    let sheet = reloaded.sheet("Penalizacion").unwrap();
    assert_eq!(text(sheet, 0, 1), "Grouped Variable");
    assert_eq!(text(sheet, 0, 2), "Sample 1");
    assert_eq!(text(sheet, 0, 3), "Sample 2");
    assert_eq!(text(sheet, 1, 0), "P1. Sweetness");
    assert_eq!(text(sheet, 1, 1), "Too little");
    assert_number(sheet, 1, 2, 0.2);
    assert_eq!(sheet.value(1, 3), &CellValue::Empty);
    assert_eq!(text(sheet, 9, 1), "TOTAL");
    assert_number(sheet, 9, 3, 80.0);
    assert!(sheet.merges.contains(&MergeRange::new(1, 0, 9, 0)));
    assert!(!sheet.show_gridlines);
}

#[test]
fn rendered_values_use_two_decimals() {
    let bytes = WorkbookFixture::new().penalty("Penalizacion").build();
    let (_, _, reloaded) = round_trip(&bytes);
    let sheet = reloaded.sheet("Penalizacion").unwrap();
    let style = sheet.style(2, 2).unwrap();
    assert_eq!(style.number_format.as_deref(), Some("0.00"));
    assert_eq!(sheet.style(0, 1).unwrap().bold, Some(true));
}
