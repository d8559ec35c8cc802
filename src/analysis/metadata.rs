//! Layout inference for banner sheets: question blocks and category column
//! groups.

use serde::Serialize;
use tracing::debug;

use crate::error::StructuralError;
use crate::frame::{Frame, LABEL_COLUMN, METADATA_COLUMN, TOTAL_HEADER};

/// Consecutive data rows answering one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionBlock {
    pub rows: Vec<usize>,
}

impl QuestionBlock {
    #[must_use]
    pub fn first(&self) -> usize {
        self.rows.first().copied().unwrap_or_default()
    }

    #[must_use]
    pub fn last(&self) -> usize {
        self.rows.last().copied().unwrap_or_default()
    }
}

/// Inclusive span of frame columns compared against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryColumnGroup {
    pub start: usize,
    pub end: usize,
}

impl CategoryColumnGroup {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn columns(&self) -> impl Iterator<Item = usize> {
        self.start..=self.end
    }

    #[must_use]
    pub const fn is_single(&self) -> bool {
        self.start == self.end
    }
}

/// Everything the significance pass needs to know about a sheet's layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BannerMetadata {
    pub blocks: Vec<QuestionBlock>,
    /// Span groups first, then single-column sub-groups.
    pub groups: Vec<CategoryColumnGroup>,
    /// Label under `TOTAL` on the row above the first block.
    pub baseline_label: String,
    pub total_col: usize,
    pub metadata_col: usize,
    pub label_col: usize,
}

/// Split sorted, de-duplicated indices into runs of consecutive values.
#[must_use]
pub fn group_consecutive(indices: &[usize]) -> Vec<Vec<usize>> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut groups: Vec<Vec<usize>> = Vec::new();
    for idx in sorted {
        match groups.last_mut() {
            Some(run) if run.last().is_some_and(|&prev| prev + 1 == idx) => run.push(idx),
            _ => groups.push(vec![idx]),
        }
    }
    groups
}

fn require_column(frame: &Frame, name: &str) -> Result<usize, StructuralError> {
    frame
        .column(name)
        .ok_or_else(|| StructuralError::MissingColumn {
            name: name.to_string(),
        })
}

/// Rows whose metadata cell holds a number (or numeric text).
#[must_use]
pub fn question_rows(frame: &Frame, metadata_col: usize) -> Vec<usize> {
    (0..frame.height())
        .filter(|&r| frame.get(r, metadata_col).to_number().is_some())
        .collect()
}

/// Turn runs of baseline-label columns into comparison groups.
///
/// Between two runs the group spans from the last column of the first run to
/// just before the next run; the last run opens a group reaching the final
/// column. Every column of a multi-column run except its last is also a group
/// on its own.
#[must_use]
pub fn category_groups(runs: &[Vec<usize>], width: usize) -> Vec<CategoryColumnGroup> {
    let mut groups: Vec<CategoryColumnGroup> = runs
        .windows(2)
        .filter_map(|pair| match pair {
            [a, b] => Some(CategoryColumnGroup::new(
                *a.last()?,
                b.first()?.saturating_sub(1),
            )),
            _ => None,
        })
        .collect();

    if let Some(first) = runs.last().and_then(|run| run.first()) {
        groups.push(CategoryColumnGroup::new(*first, width.saturating_sub(1)));
    }

    for run in runs.iter().filter(|run| run.len() > 1) {
        let (_, head) = run.split_last().unwrap_or((&0, &[]));
        groups.extend(head.iter().map(|&c| CategoryColumnGroup::new(c, c)));
    }

    groups
}

/// Infer question blocks and category groups from a banner frame.
pub fn extract(frame: &Frame) -> Result<BannerMetadata, StructuralError> {
    let metadata_col = require_column(frame, METADATA_COLUMN)?;
    let label_col = require_column(frame, LABEL_COLUMN)?;
    let total_col = require_column(frame, TOTAL_HEADER)?;

    let blocks: Vec<QuestionBlock> = group_consecutive(&question_rows(frame, metadata_col))
        .into_iter()
        .map(|rows| QuestionBlock { rows })
        .collect();
    let first_block = blocks.first().ok_or(StructuralError::NoQuestionBlocks)?;

    let baseline_row = first_block
        .first()
        .checked_sub(1)
        .ok_or(StructuralError::MissingBaselineRow)?;
    let baseline = frame.get(baseline_row, total_col);
    if baseline.is_blank() {
        return Err(StructuralError::NoCategoryGroups);
    }

    let matches: Vec<usize> = (0..frame.width())
        .filter(|&c| frame.get(baseline_row, c).same_as(baseline))
        .skip(1)
        .collect();
    let runs = group_consecutive(&matches);
    let groups = category_groups(&runs, frame.width());
    if groups.is_empty() {
        return Err(StructuralError::NoCategoryGroups);
    }

    debug!(
        blocks = blocks.len(),
        groups = groups.len(),
        baseline = %baseline.display(),
        "banner layout inferred"
    );

    Ok(BannerMetadata {
        blocks,
        groups,
        baseline_label: baseline.display(),
        total_col,
        metadata_col,
        label_col,
    })
}
