//! Test fixtures for generating banner workbooks in memory.
//!
//! Input workbooks are written with `rust_xlsxwriter` the way survey
//! software exports them, so tests exercise the real loading path.
//!
//! # Example
//!
//! ```rust
//! use fixtures::{BannerFixture, WorkbookFixture};
//!
//! let xlsx = WorkbookFixture::new()
//!     .banner(&BannerFixture::new("Banner 1"))
//!     .build();
//!
//! let workbook = bannersig::parser::parse(&xlsx).unwrap();
//! ```
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

use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatDiagonalBorder, FormatScript,
    FormatUnderline, Workbook, Worksheet,
};

// ============================================================================
// Banner sheet
// ============================================================================

/// Colors used by fixture styles, as the parser reports them.
pub const HEADER_FILL: &str = "#DDEBF7";
pub const HIGHLIGHT_FILL: &str = "#FFFF00";

/// Sheet coordinates of the "35+" header, which carries [`detailed_format`].
pub const DETAILED_CELL: (u32, u32) = (2, 9);

/// A format touching every font, fill, border, alignment, number format and
/// protection attribute. Rotation is -45 degrees, stored as 135.
pub fn detailed_format() -> Format {
    Format::new()
        .set_font_name("Arial")
        .set_font_size(9)
        .set_font_color(Color::RGB(0x001F_4E78))
        .set_italic()
        .set_underline(FormatUnderline::Single)
        .set_font_strikethrough()
        .set_font_script(FormatScript::Superscript)
        .set_background_color(Color::RGB(0x00E2_EFDA))
        .set_border_top(FormatBorder::Thin)
        .set_border_top_color(Color::RGB(0x00FF_0000))
        .set_border_bottom(FormatBorder::Double)
        .set_border_bottom_color(Color::RGB(0x0000_00FF))
        .set_border_left(FormatBorder::Medium)
        .set_border_left_color(Color::RGB(0x0000_B050))
        .set_border_right(FormatBorder::Dashed)
        .set_border_right_color(Color::RGB(0x0070_30A0))
        .set_border_diagonal(FormatBorder::Hair)
        .set_border_diagonal_color(Color::RGB(0x0080_8080))
        .set_border_diagonal_type(FormatDiagonalBorder::BorderUp)
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::Top)
        .set_indent(2)
        .set_shrink()
        .set_rotation(-45)
        .set_reading_direction(2)
        .set_num_format("0.0%")
        .set_unlocked()
        .set_hidden()
}

/// Wrapped, centred, stacked text; worn by the question cell A2.
pub fn stacked_format() -> Format {
    Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_rotation(270)
}

/// One question with a TOTAL column and two banner groups:
///
/// ```text
///      A            B     C      D      E       F         G         H      I         J
///  1                             TOTAL  GENDER  (merged)            AGE    (merged)
///  2   P1. Agree?
///  3                             Total  Total   Men       Women     Total  18-34     35+
///  4                Yes   1      90     90      60 (60%)  30 (30%)  90     50 (50%)  40 (40%)
///  5                No    2      110    110     40 (40%)  70 (70%)  110    50 (50%)  60 (60%)
///  6                      Total  200    200     100       100       200    100       100
/// ```
///
/// Men vs Women and both against the group Total are significant; nothing
/// in the age group is.
#[derive(Debug, Clone)]
pub struct BannerFixture {
    pub name: String,
    pub question: String,
    /// Whole-sample total in D6; D5 is adjusted to keep D4 at 90.
    pub total: f64,
    /// Trailing note rows below the table (C and D empty).
    pub notes: Vec<String>,
}

impl BannerFixture {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            question: "P1. Do you agree?".to_string(),
            total: 200.0,
            notes: Vec::new(),
        }
    }

    pub fn question(mut self, question: &str) -> Self {
        self.question = question.to_string();
        self
    }

    pub fn total(mut self, total: f64) -> Self {
        self.total = total;
        self
    }

    pub fn note(mut self, note: &str) -> Self {
        self.notes.push(note.to_string());
        self
    }

    fn write(&self, ws: &mut Worksheet) {
        let header = Format::new()
            .set_bold()
            .set_background_color(Color::RGB(0x00DD_EBF7));
        let highlight = Format::new()
            .set_font_name("Arial")
            .set_font_size(9)
            .set_background_color(Color::RGB(0x00FF_FF00));

        ws.set_name(&self.name).unwrap();
        ws.set_column_width(0, 30).unwrap();

        ws.write_string_with_format(0, 3, "TOTAL", &header).unwrap();
        ws.merge_range(0, 4, 0, 6, "GENDER", &header).unwrap();
        ws.merge_range(0, 7, 0, 9, "AGE", &header).unwrap();

        ws.write_string_with_format(1, 0, &self.question, &stacked_format())
            .unwrap();

        for (col, label) in [(3, "Total"), (4, "Total"), (5, "Men"), (6, "Women")] {
            ws.write_string(2, col, label).unwrap();
        }
        ws.write_string(2, 7, "Total").unwrap();
        ws.write_string(2, 8, "18-34").unwrap();
        let (row, col) = DETAILED_CELL;
        ws.write_string_with_format(row, col as u16, "35+", &detailed_format())
            .unwrap();

        let answers: [(&str, f64, f64, [&str; 5]); 2] = [
            ("Yes", 1.0, 90.0, ["60 (60%)", "30 (30%)", "90", "50 (50%)", "40 (40%)"]),
            ("No", 2.0, self.total - 90.0, ["40 (40%)", "70 (70%)", "110", "50 (50%)", "60 (60%)"]),
        ];
        for (i, (label, code, all, cells)) in answers.iter().enumerate() {
            let row = 3 + i as u32;
            ws.write_string(row, 1, *label).unwrap();
            ws.write_number(row, 2, *code).unwrap();
            ws.write_number(row, 3, *all).unwrap();
            ws.write_number(row, 4, [90.0, 110.0][i]).unwrap();
            for (k, text) in cells.iter().enumerate() {
                let col = 5 + k as u16;
                if row == 3 && col == 5 {
                    ws.write_string_with_format(row, col, *text, &highlight).unwrap();
                } else {
                    ws.write_string(row, col, *text).unwrap();
                }
            }
        }

        ws.write_string(5, 2, "Total").unwrap();
        ws.write_number(5, 3, self.total).unwrap();
        for (col, value) in [(4, 200.0), (5, 100.0), (6, 100.0), (7, 200.0), (8, 100.0), (9, 100.0)] {
            ws.write_number(5, col, value).unwrap();
        }

        for (i, note) in self.notes.iter().enumerate() {
            ws.write_string(6 + i as u32, 0, note).unwrap();
        }
    }
}

// ============================================================================
// NETO sheet
// ============================================================================

/// Forty rows of filler with a NETO row on sheet row 10 and its duplicate
/// on row 25 (1-based), plus merges near the duplicate table.
pub fn write_neto_sheet(ws: &mut Worksheet, name: &str) {
    ws.set_name(name).unwrap();
    for r in 0..40u32 {
        ws.write_string(r, 0, format!("r{r}")).unwrap();
        ws.write_number(r, 2, f64::from(r)).unwrap();
        ws.write_number(r, 3, f64::from(r) * 2.0).unwrap();
    }
    ws.write_string(9, 1, "NETO SATISFIED").unwrap();
    ws.write_string(24, 1, "NETO SATISFIED").unwrap();
    ws.write_string(24, 4, "55 (42%)").unwrap();

    let plain = Format::new();
    ws.merge_range(2, 5, 3, 5, "kept", &plain).unwrap();
    ws.merge_range(29, 5, 30, 5, "dropped", &plain).unwrap();
}

// ============================================================================
// Penalty sheet
// ============================================================================

/// One just-about-right question for two samples.
///
/// Sample 1: "Too little" 20 answers (mean 18.75), "Just right" 60 (62.5),
/// "Too much" 20 (81.25), total 100. Sample 2 only answered "Just right".
pub fn write_penalty_sheet(ws: &mut Worksheet, name: &str) {
    ws.set_name(name).unwrap();
    ws.write_string(0, 0, "export").unwrap();
    ws.write_string(1, 3, "base").unwrap();
    ws.write_string(2, 3, "Sample 1").unwrap();
    ws.write_string(2, 4, "Sample 2").unwrap();
    ws.write_string(4, 0, "P1. Sweetness").unwrap();
    for (i, group) in ["Too little", "Just right", "Too much"].iter().enumerate() {
        ws.write_string(4 + i as u32, 1, *group).unwrap();
    }
    ws.write_string(7, 1, "Total").unwrap();
    ws.write_number(7, 3, 100.0).unwrap();
    ws.write_number(7, 4, 80.0).unwrap();

    let blocks: [(&str, [f64; 5], [f64; 5]); 3] = [
        ("Too little", [10.0, 5.0, 5.0, 0.0, 0.0], [0.0; 5]),
        ("Just right", [0.0, 10.0, 20.0, 20.0, 10.0], [10.0, 10.0, 20.0, 20.0, 20.0]),
        ("Too much", [0.0, 0.0, 5.0, 5.0, 10.0], [0.0; 5]),
    ];
    let mut row = 8u32;
    for (label, s1, s2) in blocks {
        ws.write_string(row, 1, label).unwrap();
        for k in 0..5usize {
            let r = row + k as u32;
            ws.write_string(r, 2, format!("code {k}")).unwrap();
            ws.write_number(r, 3, s1[k]).unwrap();
            ws.write_number(r, 4, s2[k]).unwrap();
        }
        row += 5;
    }
}

// ============================================================================
// Workbook
// ============================================================================

/// Builder for a whole input workbook.
pub struct WorkbookFixture {
    workbook: Workbook,
}

impl Default for WorkbookFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkbookFixture {
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
        }
    }

    pub fn banner(mut self, banner: &BannerFixture) -> Self {
        banner.write(self.workbook.add_worksheet());
        self
    }

    pub fn neto(mut self, name: &str) -> Self {
        write_neto_sheet(self.workbook.add_worksheet(), name);
        self
    }

    pub fn penalty(mut self, name: &str) -> Self {
        write_penalty_sheet(self.workbook.add_worksheet(), name);
        self
    }

    pub fn empty(mut self, name: &str) -> Self {
        self.workbook.add_worksheet().set_name(name).unwrap();
        self
    }

    /// A sheet with a TOTAL header but no numbered answer rows.
    pub fn malformed(mut self, name: &str) -> Self {
        let ws = self.workbook.add_worksheet();
        ws.set_name(name).unwrap();
        ws.write_string(0, 3, "TOTAL").unwrap();
        ws.write_string(1, 0, "no questions here").unwrap();
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.workbook.save_to_buffer().unwrap()
    }
}

/// The usual input: one banner sheet.
pub fn single_banner() -> Vec<u8> {
    WorkbookFixture::new()
        .banner(&BannerFixture::new("Banner 1"))
        .build()
}
