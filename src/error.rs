//! Structured error types for bannersig.
//!
//! `ProcessingError` is what the public entry points return. Sheet-local
//! problems are `StructuralError`s: the orchestrator records them against the
//! sheet and keeps going, so they only surface as `ProcessingError` when every
//! sheet fails.

use serde::Serialize;

/// All errors that can end a processing run.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Invalid cell reference.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// General parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output workbook could not be written.
    #[error("Write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// Report or configuration (de)serialization failed.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A sheet did not match the banner or penalty layout.
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// Every sheet in the workbook failed.
    #[error("no sheet could be processed ({} failures)", failures.len())]
    NoSheetsProcessed { failures: Vec<SheetFailure> },
}

impl ProcessingError {
    /// Whether the input itself could not be read as a workbook.
    #[must_use]
    pub const fn is_fatal_load(&self) -> bool {
        matches!(
            self,
            Self::Xml(_) | Self::Zip(_) | Self::Parse(_) | Self::CellRef(_) | Self::Io(_)
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ProcessingError>;

impl From<String> for ProcessingError {
    fn from(s: String) -> Self {
        Self::Parse(s)
    }
}

impl From<&str> for ProcessingError {
    fn from(s: &str) -> Self {
        Self::Parse(s.to_string())
    }
}

/// Layout problems that make one sheet unprocessable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StructuralError {
    #[error("no question rows found")]
    NoQuestionBlocks,

    #[error("required column {name:?} not found")]
    MissingColumn { name: String },

    #[error("no row precedes the first question block")]
    MissingBaselineRow,

    #[error("no category column groups found")]
    NoCategoryGroups,

    #[error("no Total row within reach of the block starting at data row {block_start}")]
    MissingTotalRow { block_start: usize },

    #[error("Total row {row} has no usable count in column {column:?}")]
    InvalidTotal { row: usize, column: String },

    #[error("penalty sheet has no data rows")]
    NoPenaltyData,

    #[error("penalty sheet has no question rows")]
    NoPenaltyQuestions,

    #[error("question {question:?} has no Total row")]
    MissingPenaltyTotal { question: String },
}

/// A sheet that failed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetFailure {
    pub sheet: String,
    pub error: StructuralError,
}

impl std::fmt::Display for SheetFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.sheet, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_errors_are_fatal() {
        assert!(ProcessingError::from("bad workbook").is_fatal_load());
        assert!(!ProcessingError::Config("alpha".into()).is_fatal_load());
        assert!(!ProcessingError::from(StructuralError::NoQuestionBlocks).is_fatal_load());
    }

    #[test]
    fn structural_messages_name_the_problem() {
        let err = StructuralError::MissingTotalRow { block_start: 4 };
        assert!(err.to_string().contains("data row 4"));
    }
}
