//! Penalty analysis for just-about-right scale questions.
//!
//! A penalty sheet holds one table per question. Each table lists grouped
//! variables ("Too little", "Just right", "Too much", ...) with five answer
//! rows each, one column per sample. For every sample the analysis reports
//! the share and weighted mean of each grouped variable and the penalty of
//! every non-"just" variable against the reference one.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::PenaltyConfig;
use crate::error::StructuralError;
use crate::types::{CellValue, Sheet};

/// Question text column.
const QUESTION_COL: u32 = 0;
/// Grouped-variable and Total labels.
const GROUP_COL: u32 = 1;
const SECOND_COL: u32 = 2;
/// First sample column; sample values start here too.
const FIRST_SAMPLE_COL: u32 = 3;
/// Label that splits a question table into declarations and data.
const TOTAL_LABEL: &str = "Total";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PenaltyRow {
    pub label: String,
    /// One value per sample; `None` renders as a blank cell.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PenaltyTable {
    pub question: String,
    pub samples: Vec<String>,
    pub rows: Vec<PenaltyRow>,
}

impl PenaltyTable {
    #[must_use]
    pub fn row(&self, label: &str) -> Option<&PenaltyRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}

/// Sheet rows from the first one with a sample value on.
struct Grid<'a> {
    sheet: &'a Sheet,
    rows: Vec<u32>,
}

impl<'a> Grid<'a> {
    fn new(sheet: &'a Sheet) -> Option<Self> {
        // the first sheet row is a header and never holds data
        let first = (1..sheet.row_count()).find(|&r| !sheet.value(r, FIRST_SAMPLE_COL).is_blank())?;
        Some(Self {
            sheet,
            rows: (first..sheet.row_count()).collect(),
        })
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn value(&self, row: usize, col: u32) -> &CellValue {
        let sheet_row = self.rows.get(row).copied().unwrap_or(u32::MAX);
        self.sheet.value(sheet_row, col)
    }

    fn text(&self, row: usize, col: u32) -> String {
        self.value(row, col).display()
    }
}

#[derive(Debug)]
struct Sample {
    col: u32,
    label: String,
}

fn samples(grid: &Grid<'_>) -> Vec<Sample> {
    (FIRST_SAMPLE_COL..grid.sheet.col_count())
        .filter_map(|col| {
            let label = grid.text(1, col);
            (!label.trim().is_empty()).then_some(Sample { col, label })
        })
        .collect()
}

/// Questions in order of first appearance, with the grid row they sit on.
fn questions(grid: &Grid<'_>, marker: &str) -> Vec<(String, usize)> {
    let mut found: Vec<(String, usize)> = Vec::new();
    for row in 0..grid.len() {
        let Some(text) = grid.value(row, QUESTION_COL).as_str() else {
            continue;
        };
        if text.starts_with(marker) && !found.iter().any(|(q, _)| q == text) {
            found.push((text.to_string(), row));
        }
    }
    found
}

#[derive(Debug, Default, Clone, Copy)]
struct GroupStats {
    pct: Option<f64>,
    mean: Option<f64>,
}

fn analyze_question(
    grid: &Grid<'_>,
    question: &str,
    qidx: usize,
    samples: &[Sample],
    config: &PenaltyConfig,
) -> Result<PenaltyTable, StructuralError> {
    let start = qidx.saturating_sub(2);
    let last = grid.len().saturating_sub(1);
    let end = (start + 2..grid.len())
        .find(|&r| grid.value(r, GROUP_COL).is_blank() && grid.value(r, SECOND_COL).is_blank())
        .unwrap_or(last);

    let total_row = (start..=end)
        .find(|&r| grid.text(r, GROUP_COL).contains(TOTAL_LABEL))
        .ok_or_else(|| StructuralError::MissingPenaltyTotal {
            question: question.to_string(),
        })?;

    let mut groups: Vec<String> = Vec::new();
    for r in start..total_row {
        let group = grid.text(r, GROUP_COL);
        if !group.is_empty() && !groups.contains(&group) {
            groups.push(group);
        }
    }
    let exclude = config.exclude.to_lowercase();
    let penalized: Vec<&String> = groups
        .iter()
        .filter(|g| !g.to_lowercase().contains(&exclude))
        .collect();
    let reference = groups.get(config.reference_index);

    let mut stats: Vec<Vec<GroupStats>> = Vec::with_capacity(samples.len());
    let mut sample_totals: Vec<Option<f64>> = Vec::with_capacity(samples.len());
    let mut penalties: Vec<Vec<Option<f64>>> = Vec::with_capacity(samples.len());

    for sample in samples {
        let mut per_group = vec![GroupStats::default(); groups.len()];
        let mut total = None;
        let mut any_block = false;

        for (g, group) in groups.iter().enumerate() {
            let Some(first) = (total_row..=end).find(|&r| grid.text(r, GROUP_COL) == *group) else {
                continue;
            };
            let block: Vec<f64> = (first..(first + config.weights.len()).min(end + 1))
                .map(|r| grid.value(r, sample.col).to_number().unwrap_or(0.0))
                .collect();
            let sum: f64 = block.iter().sum();
            if sum == 0.0 {
                continue;
            }
            any_block = true;
            total = grid.value(total_row, sample.col).to_number();
            let weighted: f64 = block.iter().zip(&config.weights).map(|(v, w)| v * w).sum();
            if let Some(slot) = per_group.get_mut(g) {
                *slot = GroupStats {
                    pct: total.map(|t| sum / t),
                    mean: Some(weighted / sum),
                };
            }
        }

        let reference_mean = reference
            .and_then(|r| groups.iter().position(|g| g == r))
            .and_then(|i| per_group.get(i))
            .and_then(|s| s.mean);
        let sample_penalties = penalized
            .iter()
            .map(|group| {
                if !any_block {
                    return None;
                }
                let i = groups.iter().position(|g| g == *group)?;
                let s = per_group.get(i)?;
                Some((s.mean? - reference_mean?) * s.pct?)
            })
            .collect();

        stats.push(per_group);
        sample_totals.push(total);
        penalties.push(sample_penalties);
    }

    let column = |f: &dyn Fn(usize) -> Option<f64>| -> Vec<Option<f64>> { (0..samples.len()).map(f).collect() };
    let mut rows: Vec<PenaltyRow> = Vec::new();
    for (g, group) in groups.iter().enumerate() {
        rows.push(PenaltyRow {
            label: group.clone(),
            values: column(&|s| stats.get(s)?.get(g)?.pct),
        });
    }
    for (g, group) in groups.iter().enumerate() {
        rows.push(PenaltyRow {
            label: format!("MEAN {group} VS. IC"),
            values: column(&|s| stats.get(s)?.get(g)?.mean),
        });
    }
    for (p, group) in penalized.iter().enumerate() {
        rows.push(PenaltyRow {
            label: format!("PENALTY {group}"),
            values: column(&|s| *penalties.get(s)?.get(p)?),
        });
    }
    rows.push(PenaltyRow {
        label: "TOTAL".to_string(),
        values: sample_totals,
    });

    debug!(question, groups = groups.len(), start, end, "penalty table built");

    Ok(PenaltyTable {
        question: question.to_string(),
        samples: samples.iter().map(|s| s.label.clone()).collect(),
        rows,
    })
}

/// Build one penalty table per question on `sheet`.
pub fn analyze(sheet: &Sheet, config: &PenaltyConfig) -> Result<Vec<PenaltyTable>, StructuralError> {
    let grid = Grid::new(sheet).ok_or(StructuralError::NoPenaltyData)?;
    let samples = samples(&grid);
    if samples.is_empty() {
        warn!(sheet = %sheet.name, "penalty sheet has no sample labels");
    }

    let questions = questions(&grid, &config.question_marker);
    if questions.is_empty() {
        return Err(StructuralError::NoPenaltyQuestions);
    }

    questions
        .iter()
        .map(|(question, qidx)| analyze_question(&grid, question, *qidx, &samples, config))
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::cast_possible_truncation
)]
mod tests {
    use super::*;

    /// Header row, sample row, question, three grouped variables, Total and
    /// five answer rows per variable, for two samples.
    fn sheet() -> Sheet {
        let mut s = Sheet::new("Penalizacion");
        s.set_value(0, 0, "export");
        s.set_value(1, 3, "base");
        s.set_value(2, 3, "Sample 1");
        s.set_value(2, 4, "Sample 2");
        s.set_value(4, 0, "P1. Sweetness");
        for (i, g) in ["Too little", "Just right", "Too much"].iter().enumerate() {
            s.set_value(4 + i as u32, 1, *g);
        }
        s.set_value(7, 1, "Total");
        s.set_value(7, 3, 100.0);
        s.set_value(7, 4, 80.0);
        let blocks: [(&str, [f64; 5], [f64; 5]); 3] = [
            ("Too little", [10.0, 5.0, 5.0, 0.0, 0.0], [0.0; 5]),
            ("Just right", [0.0, 10.0, 20.0, 20.0, 10.0], [10.0, 10.0, 20.0, 20.0, 20.0]),
            ("Too much", [0.0, 0.0, 5.0, 5.0, 10.0], [0.0, 0.0, 0.0, 0.0, 0.0]),
        ];
        let mut row = 8;
        for (label, s1, s2) in blocks {
            s.set_value(row, 1, label);
            for k in 0..5 {
                s.set_value(row + k, 2, format!("code {k}").as_str());
                s.set_value(row + k, 3, s1[k as usize]);
                s.set_value(row + k, 4, s2[k as usize]);
            }
            row += 5;
        }
        s
    }

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn computes_shares_means_and_penalties() {
        let tables = analyze(&sheet(), &PenaltyConfig::default()).unwrap();
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.question, "P1. Sweetness");
        assert_eq!(t.samples, vec!["Sample 1", "Sample 2"]);

        let labels: Vec<&str> = t.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Too little",
                "Just right",
                "Too much",
                "MEAN Too little VS. IC",
                "MEAN Just right VS. IC",
                "MEAN Too much VS. IC",
                "PENALTY Too little",
                "PENALTY Too much",
                "TOTAL",
            ]
        );

        // sample 1: too little = 20 answers, mean (0*10 + 25*5 + 50*5) / 20
        assert!(close(t.row("Too little").unwrap().values[0], 0.2));
        assert!(close(t.row("MEAN Too little VS. IC").unwrap().values[0], 18.75));
        assert!(close(t.row("MEAN Just right VS. IC").unwrap().values[0], 62.5));
        assert!(close(t.row("PENALTY Too little").unwrap().values[0], (18.75 - 62.5) * 0.2));
        // too much: 20 answers, mean (50*5 + 75*5 + 100*10) / 20
        assert!(close(t.row("PENALTY Too much").unwrap().values[0], (81.25 - 62.5) * 0.2));
        assert_eq!(t.row("TOTAL").unwrap().values, vec![Some(100.0), Some(80.0)]);
    }

    #[test]
    fn repeated_group_labels_count_once() {
        let mut s = sheet();
        s.set_value(3, 1, "Too little");
        let tables = analyze(&s, &PenaltyConfig::default()).unwrap();
        let t = &tables[0];
        assert_eq!(t.rows.len(), 9);
        assert_eq!(t.rows.iter().filter(|r| r.label == "PENALTY Too little").count(), 1);
        assert!(close(t.row("PENALTY Too little").unwrap().values[0], (18.75 - 62.5) * 0.2));
    }

    #[test]
    fn empty_blocks_leave_blanks() {
        let tables = analyze(&sheet(), &PenaltyConfig::default()).unwrap();
        let t = &tables[0];
        assert_eq!(t.row("Too little").unwrap().values[1], None);
        assert_eq!(t.row("PENALTY Too much").unwrap().values[1], None);
        assert!(close(t.row("Just right").unwrap().values[1], 1.0));
    }

    #[test]
    fn question_without_total_fails() {
        let mut s = sheet();
        s.set_value(7, 1, "Base");
        assert_eq!(
            analyze(&s, &PenaltyConfig::default()),
            Err(StructuralError::MissingPenaltyTotal {
                question: "P1. Sweetness".into()
            })
        );
    }

    #[test]
    fn sheet_without_questions_fails() {
        let mut s = sheet();
        s.set_value(4, 0, "Sweetness");
        assert_eq!(analyze(&s, &PenaltyConfig::default()), Err(StructuralError::NoPenaltyQuestions));
        assert_eq!(
            analyze(&Sheet::new("Penal"), &PenaltyConfig::default()),
            Err(StructuralError::NoPenaltyData)
        );
    }
}
