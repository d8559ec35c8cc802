//! bannersig - significance letters for survey banner tables
//!
//! Reads a cross-tab workbook exported by survey software and writes an
//! annotated copy:
//! - Grouped-category (NETO) rows consolidated in place
//! - Counts turned into column percentages per category group
//! - Pairwise two-proportion z-tests, marked with red column letters
//! - Penalty tables for just-about-right questions
//! - A Totals sheet cross-checking every banner's Total rows
//!
//! Source styles survive the round trip: fonts, fills, borders, alignment,
//! number formats, merges, column widths and row heights.
//!
//! # Usage
//!
//! ```no_run
//! use bannersig::{process_file, AnalysisConfig};
//! use std::path::Path;
//!
//! let report = process_file(Path::new("study.xlsx"), None, &AnalysisConfig::default())?;
//! println!("{} sheets processed", report.processed());
//! # Ok::<(), bannersig::ProcessingError>(())
//! ```

// Loading
pub mod cell_ref;
pub mod color;
pub mod parser;
pub mod styles;
pub mod types;
pub mod xml_helpers;

// Processing
pub mod analysis;
pub mod config;
pub mod editor;
pub mod error;
pub mod frame;
pub mod preprocess;

// Output
pub mod export;
pub mod pipeline;

pub use config::AnalysisConfig;
pub use error::{ProcessingError, Result, SheetFailure, StructuralError};
pub use pipeline::{
    calculate_statistical_significance, output_path, process_file, process_workbook,
    ProcessedWorkbook, RunReport, SheetKind, SheetReport, SheetStatus,
};
pub use types::*;
