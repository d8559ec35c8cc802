//! End-to-end processing of one workbook.
//!
//! Every sheet is classified by name. Banner sheets go through NETO
//! consolidation, the significance pass and the banner renderer, and feed the
//! Totals sheet; penalty sheets go through the penalty analysis. A sheet that
//! does not fit its layout is reported and skipped; the run only fails when
//! no sheet could be processed.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::analysis::{penalty, significance};
use crate::config::AnalysisConfig;
use crate::error::{ProcessingError, Result, SheetFailure, StructuralError};
use crate::export::{self, render_banner, render_penalty, RenderedSheet, TotalsBuilder};
use crate::frame::Frame;
use crate::parser;
use crate::preprocess::{consolidate_netos, PreprocessSummary};
use crate::types::{Sheet, Workbook};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetKind {
    Banner,
    Penalty,
}

impl SheetKind {
    #[must_use]
    pub fn classify(name: &str, config: &AnalysisConfig) -> Self {
        if config.is_penalty_sheet(name) {
            Self::Penalty
        } else {
            Self::Banner
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SheetStatus {
    Processed,
    SkippedEmpty,
    Failed { error: StructuralError },
}

/// What happened to one input sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetReport {
    pub sheet: String,
    pub kind: SheetKind,
    #[serde(flatten)]
    pub status: SheetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preprocess: Option<PreprocessSummary>,
    pub question_blocks: usize,
    pub category_groups: usize,
    pub letter_cells: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cut_row: Option<usize>,
    pub penalty_questions: usize,
}

impl SheetReport {
    fn new(sheet: &str, kind: SheetKind) -> Self {
        Self {
            sheet: sheet.to_string(),
            kind,
            status: SheetStatus::Processed,
            preprocess: None,
            question_blocks: 0,
            category_groups: 0,
            letter_cells: 0,
            cut_row: None,
            penalty_questions: 0,
        }
    }
}

/// Summary of a run, serializable for `--report`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub sheets: Vec<SheetReport>,
    /// Totals-sheet figures that differ from the first banner.
    pub totals_mismatches: usize,
}

impl RunReport {
    #[must_use]
    pub fn processed(&self) -> usize {
        self.sheets
            .iter()
            .filter(|s| s.status == SheetStatus::Processed)
            .count()
    }

    #[must_use]
    pub fn failures(&self) -> Vec<SheetFailure> {
        self.sheets
            .iter()
            .filter_map(|s| match &s.status {
                SheetStatus::Failed { error } => Some(SheetFailure {
                    sheet: s.sheet.clone(),
                    error: error.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

/// Rendered output sheets, Totals first, plus the run report.
#[derive(Debug, Clone)]
pub struct ProcessedWorkbook {
    pub sheets: Vec<RenderedSheet>,
    pub report: RunReport,
}

impl ProcessedWorkbook {
    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&RenderedSheet> {
        self.sheets.iter().find(|s| s.sheet.name == name)
    }

    pub fn to_bytes(&self, config: &AnalysisConfig) -> Result<Vec<u8>> {
        export::to_bytes(&self.sheets, &config.layout.letter_color)
    }

    pub fn save(&self, path: &Path, config: &AnalysisConfig) -> Result<()> {
        export::save(&self.sheets, &config.layout.letter_color, path)
    }
}

fn process_banner(
    mut sheet: Sheet,
    config: &AnalysisConfig,
    report: &mut SheetReport,
) -> std::result::Result<RenderedSheet, StructuralError> {
    let summary = consolidate_netos(&mut sheet, &config.neto);
    if !summary.is_noop() {
        info!(
            sheet = %sheet.name,
            consolidated = summary.consolidated,
            rows_deleted = summary.rows_deleted,
            trailing = summary.trailing_trimmed,
            "NETO rows consolidated"
        );
    }
    report.preprocess = Some(summary);

    let frame = Frame::from_sheet(&mut sheet);
    let outcome = significance::compute(&frame, config)?;
    report.question_blocks = outcome.metadata.blocks.len();
    report.category_groups = outcome.metadata.groups.len();
    report.letter_cells = outcome.table.letters.len();
    report.cut_row = Some(outcome.table.cut_row);

    Ok(render_banner(&sheet, &outcome.table, &config.layout))
}

fn process_penalty(
    sheet: &Sheet,
    config: &AnalysisConfig,
    report: &mut SheetReport,
) -> std::result::Result<RenderedSheet, StructuralError> {
    let tables = penalty::analyze(sheet, &config.penalty)?;
    report.penalty_questions = tables.len();
    Ok(render_penalty(&sheet.name, &tables, &config.layout))
}

/// Process every sheet of a loaded workbook.
///
/// Returns [`ProcessingError::NoSheetsProcessed`] when no sheet could be
/// processed.
pub fn process_workbook(workbook: Workbook, config: &AnalysisConfig) -> Result<ProcessedWorkbook> {
    config.validate()?;

    let mut totals = TotalsBuilder::new(&config.totals);
    let mut rendered: Vec<RenderedSheet> = Vec::new();
    let mut report = RunReport::default();

    for sheet in workbook.sheets {
        let kind = SheetKind::classify(&sheet.name, config);
        let mut sheet_report = SheetReport::new(&sheet.name, kind);

        if sheet.is_empty() {
            debug!(sheet = %sheet.name, "empty sheet skipped");
            sheet_report.status = SheetStatus::SkippedEmpty;
            report.sheets.push(sheet_report);
            continue;
        }

        let name = sheet.name.clone();
        let result = match kind {
            SheetKind::Penalty => process_penalty(&sheet, config, &mut sheet_report),
            SheetKind::Banner => process_banner(sheet, config, &mut sheet_report),
        };

        match result {
            Ok(out) => {
                if kind == SheetKind::Banner {
                    totals.append(&out.sheet);
                }
                info!(sheet = %name, ?kind, "sheet processed");
                rendered.push(out);
            }
            Err(error) => {
                warn!(sheet = %name, %error, "sheet skipped");
                sheet_report.status = SheetStatus::Failed { error };
            }
        }
        report.sheets.push(sheet_report);
    }

    if report.processed() == 0 {
        return Err(ProcessingError::NoSheetsProcessed {
            failures: report.failures(),
        });
    }

    report.totals_mismatches = totals.mismatches();
    let mut sheets = Vec::with_capacity(rendered.len() + 1);
    sheets.push(totals.finish());
    sheets.extend(rendered);

    Ok(ProcessedWorkbook { sheets, report })
}

/// `<dir>/<stem><suffix>.xlsx` next to `input`.
#[must_use]
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{suffix}.xlsx"))
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Load `input`, process it and write the result.
///
/// The output goes to `output` when given, otherwise next to the input. An
/// output resolving to the input file itself is rejected before anything is
/// read.
pub fn process_file(input: &Path, output: Option<&Path>, config: &AnalysisConfig) -> Result<RunReport> {
    config.validate()?;
    let out = output.map_or_else(|| output_path(input, &config.output_suffix), Path::to_path_buf);
    if same_file(input, &out) {
        return Err(ProcessingError::Config(format!(
            "output path {} would overwrite the input",
            out.display()
        )));
    }

    info!(input = %input.display(), "processing workbook");
    let workbook = parser::load(input)?;
    let processed = process_workbook(workbook, config)?;
    processed.save(&out, config)?;
    info!(
        output = %out.display(),
        processed = processed.report.processed(),
        failed = processed.report.failures().len(),
        "workbook written"
    );

    let mut report = processed.report;
    report.input = Some(input.to_path_buf());
    report.output = Some(out);
    Ok(report)
}

/// Process `path` with default settings; returns the output path.
pub fn calculate_statistical_significance(path: impl AsRef<Path>) -> Result<PathBuf> {
    let report = process_file(path.as_ref(), None, &AnalysisConfig::default())?;
    report
        .output
        .ok_or_else(|| ProcessingError::Parse("output path missing from report".into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn output_sits_next_to_input() {
        assert_eq!(
            output_path(Path::new("/data/study.xlsx"), "_processed"),
            PathBuf::from("/data/study_processed.xlsx")
        );
    }

    #[test]
    fn sheets_classify_by_prefix() {
        let config = AnalysisConfig::default();
        assert_eq!(SheetKind::classify("Penalizaciones", &config), SheetKind::Penalty);
        assert_eq!(SheetKind::classify("Banner 1", &config), SheetKind::Banner);
    }

    #[test]
    fn all_empty_workbook_fails() {
        let workbook = Workbook {
            sheets: vec![Sheet::new("Empty")],
            ..Workbook::default()
        };
        let err = process_workbook(workbook, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, ProcessingError::NoSheetsProcessed { ref failures } if failures.is_empty()));
    }

    #[test]
    fn structural_failures_are_collected() {
        let mut sheet = Sheet::new("Banner");
        sheet.set_value(0, 3, "TOTAL");
        sheet.set_value(1, 0, "no questions here");
        let workbook = Workbook {
            sheets: vec![sheet],
            ..Workbook::default()
        };
        match process_workbook(workbook, &AnalysisConfig::default()) {
            Err(ProcessingError::NoSheetsProcessed { failures }) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures.first().unwrap().error, StructuralError::NoQuestionBlocks);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
