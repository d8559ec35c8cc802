//! Benchmarks for the significance pass and the full pipeline.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use bannersig::analysis::significance;
use bannersig::frame::Frame;
use bannersig::{process_workbook, AnalysisConfig, Sheet, Workbook};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const ANSWERS: u32 = 5;
const GROUP_WIDTH: u32 = 4;
/// Question title, baseline, answers, Total, gap.
const QUESTION_ROWS: u32 = ANSWERS + 4;

fn count(q: u32, k: u32, col: u32) -> f64 {
    f64::from((k * 37 + col * 11 + q * 5) % 90 + 10)
}

/// A banner with `questions` questions and `groups` four-column groups.
fn banner(questions: u32, groups: u32) -> Sheet {
    let mut sheet = Sheet::new("Banner");
    let last_col = 4 + groups * GROUP_WIDTH;
    sheet.set_value(0, 3, "TOTAL");
    for g in 0..groups {
        sheet.set_value(0, 4 + g * GROUP_WIDTH, format!("BANNER {g}"));
    }

    for q in 0..questions {
        let base = 1 + q * QUESTION_ROWS;
        sheet.set_value(base, 0, format!("P{q}. Question"));
        sheet.set_value(base + 1, 3, "Total");
        for g in 0..groups {
            let first = 4 + g * GROUP_WIDTH;
            sheet.set_value(base + 1, first, "Total");
            for i in 1..GROUP_WIDTH {
                sheet.set_value(base + 1, first + i, format!("Seg {i}"));
            }
        }

        let total_row = base + 2 + ANSWERS;
        sheet.set_value(total_row, 2, "Total");
        for col in 3..last_col {
            let mut total = 0.0;
            for k in 0..ANSWERS {
                let row = base + 2 + k;
                if col == 3 {
                    sheet.set_value(row, 1, format!("Answer {k}"));
                    sheet.set_value(row, 2, f64::from(k + 1));
                }
                let n = count(q, k, col);
                sheet.set_value(row, col, n);
                total += n;
            }
            sheet.set_value(total_row, col, total);
        }
    }
    sheet
}

fn bench_compute(c: &mut Criterion) {
    let config = AnalysisConfig::default();
    let mut group = c.benchmark_group("significance_compute");

    for questions in [10u32, 50, 200] {
        let mut sheet = banner(questions, 6);
        let frame = Frame::from_sheet(&mut sheet);
        group.bench_with_input(BenchmarkId::from_parameter(questions), &frame, |b, frame| {
            b.iter(|| significance::compute(black_box(frame), &config).expect("compute"))
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let config = AnalysisConfig::default();
    let workbook = Workbook {
        sheets: (0..4)
            .map(|i| {
                let mut s = banner(50, 6);
                s.name = format!("Banner {i}");
                s
            })
            .collect(),
        ..Workbook::default()
    };

    c.bench_function("process_workbook_4x50", |b| {
        b.iter(|| process_workbook(black_box(workbook.clone()), &config).expect("process"))
    });

    c.bench_function("process_and_write_4x50", |b| {
        b.iter(|| {
            let processed = process_workbook(workbook.clone(), &config).expect("process");
            processed.to_bytes(&config).expect("write")
        })
    });
}

criterion_group!(benches, bench_compute, bench_pipeline);
criterion_main!(benches);
