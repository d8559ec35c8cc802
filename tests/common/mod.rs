//! Common test utilities and assertion helpers.
//!
//! Helpers for running the pipeline on fixture bytes and for looking into
//! the written package, both through the crate's own parser and as raw XML.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::approx_constant,
    clippy::cast_possible_truncation,
    clippy::absurd_extreme_comparisons,
    clippy::cast_lossless
)]

use std::io::{Cursor, Read};

use bannersig::{process_workbook, AnalysisConfig, CellValue, ProcessedWorkbook, Sheet, Workbook};

// Re-export fixtures for convenience
pub use super::fixtures::*;

// ============================================================================
// Pipeline Helpers
// ============================================================================

/// Parse fixture bytes, panicking on failure.
#[must_use]
pub fn load(data: &[u8]) -> Workbook {
    bannersig::parser::parse(data).expect("fixture should parse")
}

/// Run the whole pipeline on fixture bytes with default settings.
#[must_use]
pub fn process(data: &[u8]) -> ProcessedWorkbook {
    process_workbook(load(data), &AnalysisConfig::default()).expect("processing should succeed")
}

/// Process, serialize and parse the output back.
#[must_use]
pub fn round_trip(data: &[u8]) -> (ProcessedWorkbook, Vec<u8>, Workbook) {
    let config = AnalysisConfig::default();
    let processed = process(data);
    let bytes = processed.to_bytes(&config).expect("output should serialize");
    let reloaded = load(&bytes);
    (processed, bytes, reloaded)
}

// ============================================================================
// Raw Package Access
// ============================================================================

/// Read one part of an XLSX package as text.
#[must_use]
pub fn read_part(data: &[u8], path: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).expect("Failed to open ZIP archive");
    let mut file = archive.by_name(path).unwrap_or_else(|_| panic!("missing part {path}"));
    let mut xml = String::new();
    file.read_to_string(&mut xml).unwrap();
    xml
}

/// Shared-string table of a written package.
#[must_use]
pub fn shared_strings_xml(data: &[u8]) -> String {
    read_part(data, "xl/sharedStrings.xml")
}

/// Worksheet XML of the `index`-th sheet (1-based, as written).
#[must_use]
pub fn sheet_xml(data: &[u8], index: usize) -> String {
    read_part(data, &format!("xl/worksheets/sheet{index}.xml"))
}

// ============================================================================
// Assertions
// ============================================================================

/// Text of a cell, panicking when it is not text.
#[must_use]
pub fn text(sheet: &Sheet, row: u32, col: u32) -> &str {
    sheet
        .value(row, col)
        .as_str()
        .unwrap_or_else(|| panic!("{}!({row},{col}) is not text: {:?}", sheet.name, sheet.value(row, col)))
}

pub fn assert_number(sheet: &Sheet, row: u32, col: u32, expected: f64) {
    match sheet.value(row, col) {
        CellValue::Number(n) => assert!(
            (n - expected).abs() < 1e-9,
            "{}!({row},{col}) = {n}, expected {expected}",
            sheet.name
        ),
        other => panic!("{}!({row},{col}) is not a number: {other:?}", sheet.name),
    }
}

pub fn assert_fill(sheet: &Sheet, row: u32, col: u32, expected: &str) {
    let style = sheet
        .style(row, col)
        .unwrap_or_else(|| panic!("{}!({row},{col}) has no style", sheet.name));
    assert_eq!(
        style.bg_color.as_deref(),
        Some(expected),
        "{}!({row},{col}) fill",
        sheet.name
    );
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "{actual} != {expected}");
}
