//! Tunable constants for a processing run.
//!
//! `AnalysisConfig::default()` reproduces the reference layout conventions;
//! a JSON file can override any subset of fields.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ProcessingError, Result};

/// Excel's default column width in characters; pixel widths divide by it.
pub const CHAR_WIDTH_PX: f64 = 8.43;
/// Pixel-to-point divisor used for row heights.
pub const ROW_HEIGHT_PX: f64 = 1.33;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Significance threshold for the two-proportion test.
    pub alpha: f64,
    /// Both totals must reach this size before a pair is tested.
    pub min_sample: f64,
    /// Rows after a question block searched for its Total row.
    pub total_lookahead: usize,
    /// Decimal places for rendered percentages.
    pub decimals: usize,

    pub neto: NetoConfig,
    pub penalty: PenaltyConfig,
    pub layout: LayoutConfig,
    pub totals: TotalsConfig,

    /// Appended to the input file stem to name the output.
    pub output_suffix: String,
    /// Cut row used when the combined table has no blank row.
    pub fallback_cut_row: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            min_sample: 30.0,
            total_lookahead: 6,
            decimals: 2,
            neto: NetoConfig::default(),
            penalty: PenaltyConfig::default(),
            layout: LayoutConfig::default(),
            totals: TotalsConfig::default(),
            output_suffix: "_processed".to_string(),
            fallback_cut_row: 2,
        }
    }
}

/// Grouped-category ("NETO") consolidation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NetoConfig {
    pub marker: String,
    /// Marker rows that are never consolidated.
    pub reserved: Vec<String>,
    /// Deletion starts this many rows above the duplicate.
    pub delete_offset: u32,
    pub delete_count: u32,
    /// Merges starting within `[dup - before, dup + after]` are dropped.
    pub merge_window_before: u32,
    pub merge_window_after: u32,
}

impl Default for NetoConfig {
    fn default() -> Self {
        Self {
            marker: "NETO".to_string(),
            reserved: vec![
                "NETO TOP TWO BOX".to_string(),
                "NETO BOTTOM TWO BOX".to_string(),
            ],
            delete_offset: 7,
            delete_count: 11,
            merge_window_before: 7,
            merge_window_after: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PenaltyConfig {
    /// Case-insensitive sheet-name prefix.
    pub sheet_prefix: String,
    /// Question cells start with this marker.
    pub question_marker: String,
    /// Scale weights applied to each grouped variable's answer rows.
    pub weights: Vec<f64>,
    /// Grouped variables containing this (case-insensitive) get no penalty row.
    pub exclude: String,
    /// Position of the reference group among the declared grouped variables.
    pub reference_index: usize,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            sheet_prefix: "penal".to_string(),
            question_marker: "P".to_string(),
            weights: vec![0.0, 25.0, 50.0, 75.0, 100.0],
            exclude: "just".to_string(),
            reference_index: 1,
        }
    }
}

/// Column widths (characters) and row heights (points) of rendered sheets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub label_width: f64,
    pub link_width: f64,
    pub data_width: f64,
    pub row_height: f64,
    pub penalty_question_width: f64,
    pub penalty_group_width: f64,
    /// Color of the significance letter run.
    pub letter_color: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            label_width: 400.0 / CHAR_WIDTH_PX,
            link_width: 150.0 / CHAR_WIDTH_PX,
            data_width: 80.0 / CHAR_WIDTH_PX,
            row_height: 20.0 / ROW_HEIGHT_PX,
            penalty_question_width: 400.0 / CHAR_WIDTH_PX,
            penalty_group_width: 250.0 / CHAR_WIDTH_PX,
            letter_color: "#FF0000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TotalsConfig {
    pub sheet_name: String,
    pub missing_fill: String,
    pub mismatch_fill: String,
    pub separator_fill: String,
    pub gap_width: f64,
    pub separator_width: f64,
    pub value_width: f64,
}

impl Default for TotalsConfig {
    fn default() -> Self {
        Self {
            sheet_name: "TOTALES".to_string(),
            missing_fill: "#C80000".to_string(),
            mismatch_fill: "#FFFF00".to_string(),
            separator_fill: "#C5D9F1".to_string(),
            gap_width: 3.0,
            separator_width: 4.0,
            value_width: 14.0,
        }
    }
}

impl AnalysisConfig {
    /// Load overrides from a JSON file; absent keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ProcessingError::Config(format!(
                "alpha must lie in (0, 1), got {}",
                self.alpha
            )));
        }
        if self.min_sample < 0.0 {
            return Err(ProcessingError::Config("min_sample must be >= 0".into()));
        }
        if self.neto.marker.is_empty() {
            return Err(ProcessingError::Config("neto.marker is empty".into()));
        }
        if self.neto.delete_count == 0 {
            return Err(ProcessingError::Config("neto.delete_count is 0".into()));
        }
        if self.penalty.sheet_prefix.is_empty() {
            return Err(ProcessingError::Config("penalty.sheet_prefix is empty".into()));
        }
        if self.penalty.weights.is_empty() {
            return Err(ProcessingError::Config("penalty.weights is empty".into()));
        }
        if self.output_suffix.is_empty() {
            return Err(ProcessingError::Config("output_suffix is empty".into()));
        }
        if self.totals.sheet_name.is_empty() {
            return Err(ProcessingError::Config("totals.sheet_name is empty".into()));
        }
        Ok(())
    }

    /// Whether `sheet_name` marks a penalty sheet.
    #[must_use]
    pub fn is_penalty_sheet(&self, sheet_name: &str) -> bool {
        sheet_name
            .to_lowercase()
            .starts_with(&self.penalty.sheet_prefix.to_lowercase())
    }
}
