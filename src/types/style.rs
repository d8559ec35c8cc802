use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;
use std::sync::Arc;

/// Resolved cell style
///
/// Every attribute the renderer carries over from a source cell to its
/// destination: font, fill, border, alignment, number format and protection.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    // Font
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<UnderlineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vert_align: Option<VertAlign>,

    // Fill
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_type: Option<PatternType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg_color: Option<String>, // Pattern foreground color

    // Borders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_top: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_right: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_left: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_diagonal: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagonal_up: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagonal_down: Option<bool>,

    // Alignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_h: Option<HAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_v: Option<VAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shrink_to_fit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_order: Option<u8>, // 0=context, 1=LTR, 2=RTL

    // Number format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_format: Option<String>,

    // Protection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

impl Style {
    /// True when no attribute is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Replace every border side with `top`/`bottom` rules only.
    #[must_use]
    pub fn with_rules(mut self, top: Option<BorderStyle>, bottom: Option<BorderStyle>) -> Self {
        self.border_top = top.map(Border::black);
        self.border_bottom = bottom.map(Border::black);
        self.border_left = None;
        self.border_right = None;
        self
    }
}

/// Shared handle to a resolved style.
///
/// Loaded cells share one allocation per `cellXfs` entry; edits go through
/// [`StyleRef::edit`], which clones before writing so no other cell sees the change.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRef(pub Arc<Style>);

impl StyleRef {
    #[must_use]
    pub fn new(style: Style) -> Self {
        Self(Arc::new(style))
    }

    /// Copy-on-write edit.
    pub fn edit(&mut self, f: impl FnOnce(&mut Style)) {
        f(Arc::make_mut(&mut self.0));
    }
}

impl Deref for StyleRef {
    type Target = Style;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for StyleRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StyleRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let style = Style::deserialize(deserializer)?;
        Ok(Self(Arc::new(style)))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Border {
    pub style: BorderStyle,
    pub color: String,
}

impl Border {
    #[must_use]
    pub fn black(style: BorderStyle) -> Self {
        Self {
            style,
            color: "#000000".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HAlign {
    General,
    Left,
    Center,
    Right,
    Fill,
    Justify,
    CenterContinuous,
    Distributed,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum VAlign {
    Top,
    Center, // Excel uses "center" not "middle"
    Bottom,
    Justify,
    Distributed,
}

/// Underline style for font formatting
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum UnderlineStyle {
    Single,
    Double,
    SingleAccounting,
    DoubleAccounting,
    None,
}

/// Vertical alignment for text (subscript/superscript)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum VertAlign {
    Baseline,
    Subscript,
    Superscript,
}

/// Pattern fill types from ECMA-376 Part 1, Section 18.18.55
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PatternType {
    None,
    Solid,
    Gray125,
    Gray0625,
    DarkGray,
    MediumGray,
    LightGray,
    DarkHorizontal,
    DarkVertical,
    DarkDown,
    DarkUp,
    DarkGrid,
    DarkTrellis,
    LightHorizontal,
    LightVertical,
    LightDown,
    LightUp,
    LightGrid,
    LightTrellis,
}

/// Theme colors and fonts extracted from theme1.xml
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Theme {
    /// 12 theme colors: lt1, dk1, lt2, dk2, accent1-6, hlink, folHlink
    pub colors: Vec<String>,
    /// Major font (headings) from fontScheme
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major_font: Option<String>,
    /// Minor font (body) from fontScheme
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor_font: Option<String>,
}

// ============================================================================
// Internal types for parsing
// ============================================================================

/// Raw style components from styles.xml
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Default, Clone)]
pub struct RawFont {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub color: Option<ColorSpec>,
    pub bold: bool,
    pub italic: bool,
    pub underline: Option<UnderlineStyle>,
    pub strikethrough: bool,
    pub vert_align: Option<VertAlign>,
    /// Font scheme: "minor" (body) or "major" (headings)
    pub scheme: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct RawFill {
    pub fg_color: Option<ColorSpec>,
    pub bg_color: Option<ColorSpec>,
    pub pattern_type: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct RawBorder {
    pub left: Option<RawBorderSide>,
    pub right: Option<RawBorderSide>,
    pub top: Option<RawBorderSide>,
    pub bottom: Option<RawBorderSide>,
    pub diagonal: Option<RawBorderSide>,
    pub diagonal_up: bool,
    pub diagonal_down: bool,
}

#[derive(Debug, Clone)]
pub struct RawBorderSide {
    pub style: String,
    pub color: Option<ColorSpec>,
}

#[derive(Debug, Clone, Default)]
pub struct ColorSpec {
    pub rgb: Option<String>,
    pub theme: Option<u32>,
    pub tint: Option<f64>,
    pub indexed: Option<u32>,
    pub auto: bool,
}

#[derive(Debug, Default, Clone)]
pub struct RawAlignment {
    pub horizontal: Option<String>,
    pub vertical: Option<String>,
    pub wrap_text: bool,
    pub shrink_to_fit: bool,
    pub indent: Option<u32>,
    pub text_rotation: Option<i32>,
    pub reading_order: Option<u8>,
}

/// Raw protection settings from styles.xml
#[derive(Debug, Clone)]
pub struct RawProtection {
    pub locked: bool,
    pub hidden: bool,
}

impl Default for RawProtection {
    fn default() -> Self {
        // Excel locks cells unless told otherwise
        Self {
            locked: true,
            hidden: false,
        }
    }
}

/// Cell format (xf) from cellXfs or cellStyleXfs
///
/// Per ECMA-376 Section 18.8.45, the apply* attributes default to TRUE when absent.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone)]
pub struct CellXf {
    pub font_id: Option<u32>,
    pub fill_id: Option<u32>,
    pub border_id: Option<u32>,
    pub num_fmt_id: Option<u32>,
    pub alignment: Option<RawAlignment>,
    pub apply_font: bool,
    pub apply_fill: bool,
    pub apply_border: bool,
    pub apply_alignment: bool,
    pub apply_number_format: bool,
    pub apply_protection: bool,
    pub protection: Option<RawProtection>,
    /// Reference to cellStyleXfs entry (for cellXfs only)
    pub xf_id: Option<u32>,
}

impl Default for CellXf {
    fn default() -> Self {
        Self {
            font_id: None,
            fill_id: None,
            border_id: None,
            num_fmt_id: None,
            alignment: None,
            apply_font: true,
            apply_fill: true,
            apply_border: true,
            apply_alignment: true,
            apply_number_format: true,
            apply_protection: true,
            protection: None,
            xf_id: None,
        }
    }
}

/// Complete parsed style data from styles.xml
#[derive(Debug, Default)]
pub struct StyleSheet {
    pub fonts: Vec<RawFont>,
    pub fills: Vec<RawFill>,
    pub borders: Vec<RawBorder>,
    pub cell_xfs: Vec<CellXf>,
    pub num_fmts: Vec<(u32, String)>, // (numFmtId, formatCode)
    /// Base styles that cellXfs can inherit from
    pub cell_style_xfs: Vec<CellXf>,
    /// Custom indexed colors from `<colors><indexedColors>`; falls back to
    /// `INDEXED_COLORS` when absent
    pub indexed_colors: Option<Vec<String>>,
    /// Default font from the "Normal" style (`cellStyleXfs[0]`)
    pub default_font: Option<RawFont>,
}
