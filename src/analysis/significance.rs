//! Group percentages and significance letters for a banner frame.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::{debug, trace};

use super::letters::GroupLetters;
use super::metadata::{self, BannerMetadata, CategoryColumnGroup, QuestionBlock};
use super::ztest::is_significant;
use crate::config::AnalysisConfig;
use crate::error::StructuralError;
use crate::frame::Frame;
use crate::types::CellValue;

#[allow(clippy::unwrap_used)]
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Label searched for in the metadata column below each block.
const TOTAL_LABEL: &str = "Total";

/// First run of ASCII digits in a cell's text, as a count.
#[must_use]
pub fn extract_count(value: &CellValue) -> Option<u64> {
    let text = value.display();
    DIGITS.find(&text).and_then(|m| m.as_str().parse().ok())
}

/// Result of the significance pass, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    pub headers: Vec<String>,
    /// Data rows; percentage cells are text such as `"45.00 A,C"`.
    pub rows: Vec<Vec<CellValue>>,
    /// Significance letters per `(data row, column)`.
    pub letters: BTreeMap<(usize, usize), String>,
    /// First data row with nothing in it.
    pub cut_row: usize,
}

impl CombinedTable {
    #[must_use]
    pub fn letters_at(&self, row: usize, col: usize) -> Option<&str> {
        self.letters.get(&(row, col)).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignificanceOutcome {
    pub metadata: BannerMetadata,
    pub table: CombinedTable,
}

#[derive(Debug, Clone)]
enum Working {
    Value(CellValue),
    Percent(f64),
}

struct Pass<'a> {
    frame: &'a Frame,
    config: &'a AnalysisConfig,
    cells: Vec<Vec<Working>>,
    letters: BTreeMap<(usize, usize), String>,
}

fn truncate_total(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Empty => Some(0.0),
        other => other.to_number().map(f64::trunc),
    }
}

impl<'a> Pass<'a> {
    fn new(frame: &'a Frame, config: &'a AnalysisConfig, metadata_col: usize) -> Self {
        let cells = frame
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(c, v)| {
                        // numeric markers in text form count as numbers
                        let v = match (c == metadata_col, v.to_number()) {
                            (true, Some(n)) => CellValue::Number(n),
                            _ => v.clone(),
                        };
                        Working::Value(v)
                    })
                    .collect()
            })
            .collect();
        Self {
            frame,
            config,
            cells,
            letters: BTreeMap::new(),
        }
    }

    fn set(&mut self, row: usize, col: usize, value: Working) {
        if let Some(slot) = self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            *slot = value;
        }
    }

    fn total_row(&self, block: &QuestionBlock, metadata_col: usize) -> Result<usize, StructuralError> {
        let end = block.last();
        (end..=end + self.config.total_lookahead)
            .find(|&r| self.frame.get(r, metadata_col).display().contains(TOTAL_LABEL))
            .ok_or(StructuralError::MissingTotalRow {
                block_start: block.first(),
            })
    }

    fn invalid_total(&self, row: usize, col: usize) -> StructuralError {
        StructuralError::InvalidTotal {
            row,
            column: self.frame.headers.get(col).cloned().unwrap_or_default(),
        }
    }

    fn whole_sample(
        &mut self,
        block: &QuestionBlock,
        total_row: usize,
        total_col: usize,
    ) -> Result<(), StructuralError> {
        let total = self
            .frame
            .get(total_row, total_col)
            .to_number()
            .map(f64::trunc)
            .ok_or_else(|| self.invalid_total(total_row, total_col))?;
        self.set(total_row, total_col, Working::Value(CellValue::Number(total)));

        for &r in &block.rows {
            let Some(count) = self.frame.get(r, total_col).to_number() else {
                continue;
            };
            if total != 0.0 {
                self.set(r, total_col, Working::Percent(count / total * 100.0));
            }
        }
        Ok(())
    }

    fn group(
        &mut self,
        block: &QuestionBlock,
        total_row: usize,
        group: CategoryColumnGroup,
    ) -> Result<(), StructuralError> {
        let last_col = self.frame.width().saturating_sub(1);
        let columns: Vec<usize> = group.columns().filter(|&c| c <= last_col).collect();

        let counts: Vec<(usize, Vec<Option<u64>>)> = columns
            .iter()
            .map(|&c| {
                let col_counts = block
                    .rows
                    .iter()
                    .map(|&r| extract_count(self.frame.get(r, c)))
                    .collect();
                (c, col_counts)
            })
            .filter(|(_, col_counts): &(usize, Vec<Option<u64>>)| col_counts.iter().any(Option::is_some))
            .collect();

        let mut totals = Vec::with_capacity(counts.len());
        for (c, _) in &counts {
            let total = truncate_total(self.frame.get(total_row, *c))
                .ok_or_else(|| self.invalid_total(total_row, *c))?;
            self.set(total_row, *c, Working::Value(CellValue::Number(total)));
            totals.push(total);
        }

        for ((c, col_counts), total) in counts.iter().zip(&totals) {
            for (&r, count) in block.rows.iter().zip(col_counts) {
                let Some(count) = count else { continue };
                let count = *count as f64;
                let value = if *total != 0.0 {
                    Working::Percent(count / total * 100.0)
                } else {
                    Working::Value(CellValue::Number(count))
                };
                self.set(r, *c, value);
            }
        }

        for (pos, &r) in block.rows.iter().enumerate() {
            let mut letters = GroupLetters::new(counts.len());
            for i in 0..counts.len() {
                for j in i + 1..counts.len() {
                    let (Some((_, a)), Some((_, b))) = (counts.get(i), counts.get(j)) else {
                        continue;
                    };
                    let (Some(Some(x1)), Some(Some(x2))) = (a.get(pos), b.get(pos)) else {
                        continue;
                    };
                    let (Some(n1), Some(n2)) = (totals.get(i), totals.get(j)) else {
                        continue;
                    };
                    let (x1, x2) = (*x1 as f64, *x2 as f64);
                    if is_significant(x1, *n1, x2, *n2, self.config.alpha, self.config.min_sample) {
                        letters.mark(i, j, x1 / n1 > x2 / n2);
                        trace!(row = r, i, j, "significant pair");
                    }
                }
            }
            // later groups overwrite earlier ones on shared columns
            for ((c, _), marks) in counts.iter().zip(letters.finish()) {
                self.letters.insert((r, *c), marks);
            }
        }
        Ok(())
    }

    fn combine(self, label_col: usize, metadata_col: usize) -> (Vec<Vec<CellValue>>, BTreeMap<(usize, usize), String>) {
        let decimals = self.config.decimals;
        let letters: BTreeMap<(usize, usize), String> =
            self.letters.into_iter().filter(|(_, l)| !l.is_empty()).collect();

        let rows = self
            .cells
            .into_iter()
            .enumerate()
            .map(|(r, row)| {
                let label = self.frame.get(r, label_col).clone();
                row.into_iter()
                    .enumerate()
                    .map(|(c, cell)| {
                        let marks = letters.get(&(r, c)).map_or("", String::as_str);
                        match cell {
                            Working::Percent(p) => {
                                CellValue::Text(format!("{p:.decimals$} {marks}").trim_end().to_string())
                            }
                            Working::Value(v) if c == metadata_col && v.same_as(&CellValue::Number(1.0)) => {
                                label.clone()
                            }
                            Working::Value(v) if !marks.is_empty() => {
                                CellValue::Text(format!("{} {marks}", v.display()))
                            }
                            Working::Value(v) => v,
                        }
                    })
                    .collect()
            })
            .collect();
        (rows, letters)
    }
}

/// First row whose cells are all blank.
#[must_use]
pub fn find_cut_row(rows: &[Vec<CellValue>], fallback: usize) -> usize {
    rows.iter()
        .position(|row| row.iter().all(CellValue::is_blank))
        .unwrap_or(fallback)
}

/// Convert counts to percentages and mark significant differences.
///
/// Within each question block every category group is handled on its own:
/// counts become percentages of the group's Total row, and every pair of
/// columns is compared row by row. Totals are written back as plain numbers.
pub fn compute(frame: &Frame, config: &AnalysisConfig) -> Result<SignificanceOutcome, StructuralError> {
    let meta = metadata::extract(frame)?;
    let mut pass = Pass::new(frame, config, meta.metadata_col);

    for block in &meta.blocks {
        let total_row = pass.total_row(block, meta.metadata_col)?;
        pass.whole_sample(block, total_row, meta.total_col)?;
        for group in &meta.groups {
            pass.group(block, total_row, *group)?;
        }
        debug!(block_start = block.first(), total_row, "question block processed");
    }

    let (rows, letters) = pass.combine(meta.label_col, meta.metadata_col);
    let cut_row = find_cut_row(&rows, config.fallback_cut_row);
    debug!(cut_row, marked = letters.len(), "significance pass finished");

    Ok(SignificanceOutcome {
        table: CombinedTable {
            headers: frame.headers.clone(),
            rows,
            letters,
            cut_row,
        },
        metadata: meta,
    })
}
