//! Style resolution: turns a `cellXfs` index into a flat [`Style`].

use std::collections::HashMap;

use crate::color::resolve_color;
use crate::types::{
    Border, BorderStyle, CellXf, HAlign, PatternType, RawBorderSide, RawFont, Style, StyleSheet,
    Theme, VAlign,
};

/// Built-in number format codes (ECMA-376 Part 1, 18.8.30).
pub(crate) const fn builtin_format(id: u32) -> Option<&'static str> {
    match id {
        1 => Some("0"),
        2 => Some("0.00"),
        3 => Some("#,##0"),
        4 => Some("#,##0.00"),
        5 => Some("$#,##0_);($#,##0)"),
        6 => Some("$#,##0_);[Red]($#,##0)"),
        7 => Some("$#,##0.00_);($#,##0.00)"),
        8 => Some("$#,##0.00_);[Red]($#,##0.00)"),
        9 => Some("0%"),
        10 => Some("0.00%"),
        11 => Some("0.00E+00"),
        12 => Some("# ?/?"),
        13 => Some("# ??/??"),
        14 => Some("mm-dd-yy"),
        15 => Some("d-mmm-yy"),
        16 => Some("d-mmm"),
        17 => Some("mmm-yy"),
        18 => Some("h:mm AM/PM"),
        19 => Some("h:mm:ss AM/PM"),
        20 => Some("h:mm"),
        21 => Some("h:mm:ss"),
        22 => Some("m/d/yy h:mm"),
        37 => Some("#,##0 ;(#,##0)"),
        38 => Some("#,##0 ;[Red](#,##0)"),
        39 => Some("#,##0.00;(#,##0.00)"),
        40 => Some("#,##0.00;[Red](#,##0.00)"),
        41 => Some("_(* #,##0_);_(* (#,##0);_(* \"-\"_);_(@_)"),
        42 => Some("_($* #,##0_);_($* (#,##0);_($* \"-\"_);_(@_)"),
        43 => Some("_(* #,##0.00_);_(* (#,##0.00);_(* \"-\"??_);_(@_)"),
        44 => Some("_($* #,##0.00_);_($* (#,##0.00);_($* \"-\"??_);_(@_)"),
        45 => Some("mm:ss"),
        46 => Some("[h]:mm:ss"),
        47 => Some("mmss.0"),
        48 => Some("##0.0E+0"),
        49 => Some("@"),
        _ => None,
    }
}

/// Resolves every `cellXfs` entry once; cells then share the results.
pub(super) struct StyleResolver<'a> {
    stylesheet: &'a StyleSheet,
    theme: &'a Theme,
    custom_formats: HashMap<u32, &'a str>,
}

impl<'a> StyleResolver<'a> {
    pub(super) fn new(stylesheet: &'a StyleSheet, theme: &'a Theme) -> Self {
        let custom_formats = stylesheet
            .num_fmts
            .iter()
            .map(|(id, code)| (*id, code.as_str()))
            .collect();
        Self {
            stylesheet,
            theme,
            custom_formats,
        }
    }

    fn color(&self, spec: Option<&crate::types::ColorSpec>) -> Option<String> {
        resolve_color(
            spec?,
            &self.theme.colors,
            self.stylesheet.indexed_colors.as_ref(),
        )
    }

    fn font_family(&self, font: &RawFont) -> Option<String> {
        match font.scheme.as_deref() {
            Some("minor") => self.theme.minor_font.as_ref().or(font.name.as_ref()),
            Some("major") => self.theme.major_font.as_ref().or(font.name.as_ref()),
            _ => font.name.as_ref(),
        }
        .cloned()
    }

    fn apply_font(&self, style: &mut Style, font: &RawFont) {
        if let Some(family) = self.font_family(font) {
            style.font_family = Some(family);
        }
        if font.size.is_some() {
            style.font_size = font.size;
        }
        style.bold = font.bold.then_some(true);
        style.italic = font.italic.then_some(true);
        style.underline = font.underline;
        style.strikethrough = font.strikethrough.then_some(true);
        style.vert_align = font.vert_align;
        if let Some(color) = self.color(font.color.as_ref()) {
            style.font_color = Some(color);
        }
    }

    /// The Normal style's font, used for cells with no `s` attribute.
    pub(super) fn default_style(&self) -> Option<Style> {
        let font = self.stylesheet.default_font.as_ref()?;
        let mut style = Style::default();
        self.apply_font(&mut style, font);
        Some(style)
    }

    pub(super) fn number_format(&self, id: u32) -> Option<String> {
        builtin_format(id)
            .or_else(|| self.custom_formats.get(&id).copied())
            .map(ToString::to_string)
    }

    /// Flatten `cellXfs[idx]` over its `cellStyleXfs` parent.
    ///
    /// A component whose `apply*` flag is off comes from the parent xf.
    pub(super) fn resolve(&self, idx: usize) -> Option<Style> {
        let sheet = self.stylesheet;
        let xf = sheet.cell_xfs.get(idx)?;
        let parent = xf
            .xf_id
            .and_then(|id| sheet.cell_style_xfs.get(usize::try_from(id).ok()?));

        let pick = |applies: bool, get: fn(&CellXf) -> Option<u32>| -> Option<usize> {
            let id = if applies {
                get(xf)
            } else {
                parent.and_then(get).or_else(|| get(xf))
            };
            id.and_then(|v| usize::try_from(v).ok())
        };

        let mut style = self.default_style().unwrap_or_default();

        if let Some(font) = pick(xf.apply_font, |x| x.font_id).and_then(|i| sheet.fonts.get(i)) {
            self.apply_font(&mut style, font);
        }

        if let Some(fill) = pick(xf.apply_fill, |x| x.fill_id).and_then(|i| sheet.fills.get(i)) {
            match parse_pattern_type(fill.pattern_type.as_deref()) {
                None | Some(PatternType::None) => {}
                Some(PatternType::Solid) => {
                    style.pattern_type = Some(PatternType::Solid);
                    style.bg_color = self.color(fill.fg_color.as_ref());
                }
                Some(pattern) => {
                    style.pattern_type = Some(pattern);
                    style.fg_color = self.color(fill.fg_color.as_ref());
                    style.bg_color = self.color(fill.bg_color.as_ref());
                }
            }
        }

        if let Some(border) =
            pick(xf.apply_border, |x| x.border_id).and_then(|i| sheet.borders.get(i))
        {
            style.border_top = self.border(border.top.as_ref());
            style.border_right = self.border(border.right.as_ref());
            style.border_bottom = self.border(border.bottom.as_ref());
            style.border_left = self.border(border.left.as_ref());
            style.border_diagonal = self.border(border.diagonal.as_ref());
            style.diagonal_up = border.diagonal_up.then_some(true);
            style.diagonal_down = border.diagonal_down.then_some(true);
        }

        let alignment = if xf.apply_alignment {
            xf.alignment.as_ref()
        } else {
            parent
                .and_then(|p| p.alignment.as_ref())
                .or(xf.alignment.as_ref())
        };
        if let Some(align) = alignment {
            style.align_h = parse_halign(align.horizontal.as_deref());
            style.align_v = parse_valign(align.vertical.as_deref());
            style.wrap = align.wrap_text.then_some(true);
            style.shrink_to_fit = align.shrink_to_fit.then_some(true);
            style.indent = align.indent.filter(|&i| i > 0);
            style.rotation = align.text_rotation.filter(|&r| r != 0);
            style.reading_order = align.reading_order.filter(|&r| r != 0);
        }

        if let Some(id) = pick(xf.apply_number_format, |x| x.num_fmt_id) {
            style.number_format = u32::try_from(id).ok().and_then(|id| self.number_format(id));
        }

        let protection = if xf.apply_protection {
            xf.protection.as_ref()
        } else {
            parent
                .and_then(|p| p.protection.as_ref())
                .or(xf.protection.as_ref())
        };
        if let Some(prot) = protection {
            // locked is the Excel default; only deviations are kept
            style.locked = (!prot.locked).then_some(false);
            style.hidden = prot.hidden.then_some(true);
        }

        (!style.is_empty()).then_some(style)
    }

    fn border(&self, side: Option<&RawBorderSide>) -> Option<Border> {
        let side = side?;
        let style = parse_border_style(&side.style)?;
        let color = self
            .color(side.color.as_ref())
            .unwrap_or_else(|| "#000000".to_string());
        Some(Border { style, color })
    }
}

fn parse_halign(value: Option<&str>) -> Option<HAlign> {
    match value? {
        "general" => Some(HAlign::General),
        "left" => Some(HAlign::Left),
        "center" => Some(HAlign::Center),
        "right" => Some(HAlign::Right),
        "fill" => Some(HAlign::Fill),
        "justify" => Some(HAlign::Justify),
        "centerContinuous" => Some(HAlign::CenterContinuous),
        "distributed" => Some(HAlign::Distributed),
        _ => None,
    }
}

fn parse_valign(value: Option<&str>) -> Option<VAlign> {
    match value? {
        "top" => Some(VAlign::Top),
        "center" => Some(VAlign::Center),
        "bottom" => Some(VAlign::Bottom),
        "justify" => Some(VAlign::Justify),
        "distributed" => Some(VAlign::Distributed),
        _ => None,
    }
}

fn parse_pattern_type(pattern_type: Option<&str>) -> Option<PatternType> {
    match pattern_type? {
        "none" => Some(PatternType::None),
        "solid" => Some(PatternType::Solid),
        "gray125" => Some(PatternType::Gray125),
        "gray0625" => Some(PatternType::Gray0625),
        "darkGray" => Some(PatternType::DarkGray),
        "mediumGray" => Some(PatternType::MediumGray),
        "lightGray" => Some(PatternType::LightGray),
        "darkHorizontal" => Some(PatternType::DarkHorizontal),
        "darkVertical" => Some(PatternType::DarkVertical),
        "darkDown" => Some(PatternType::DarkDown),
        "darkUp" => Some(PatternType::DarkUp),
        "darkGrid" => Some(PatternType::DarkGrid),
        "darkTrellis" => Some(PatternType::DarkTrellis),
        "lightHorizontal" => Some(PatternType::LightHorizontal),
        "lightVertical" => Some(PatternType::LightVertical),
        "lightDown" => Some(PatternType::LightDown),
        "lightUp" => Some(PatternType::LightUp),
        "lightGrid" => Some(PatternType::LightGrid),
        "lightTrellis" => Some(PatternType::LightTrellis),
        _ => None,
    }
}

fn parse_border_style(value: &str) -> Option<BorderStyle> {
    match value {
        "thin" => Some(BorderStyle::Thin),
        "medium" => Some(BorderStyle::Medium),
        "thick" => Some(BorderStyle::Thick),
        "dashed" => Some(BorderStyle::Dashed),
        "dotted" => Some(BorderStyle::Dotted),
        "double" => Some(BorderStyle::Double),
        "hair" => Some(BorderStyle::Hair),
        "mediumDashed" => Some(BorderStyle::MediumDashed),
        "dashDot" => Some(BorderStyle::DashDot),
        "mediumDashDot" => Some(BorderStyle::MediumDashDot),
        "dashDotDot" => Some(BorderStyle::DashDotDot),
        "mediumDashDotDot" => Some(BorderStyle::MediumDashDotDot),
        "slantDashDot" => Some(BorderStyle::SlantDashDot),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::{ColorSpec, RawAlignment, RawBorder, RawFill};

    fn stylesheet() -> StyleSheet {
        let base_font = RawFont {
            name: Some("Calibri".into()),
            size: Some(11.0),
            ..RawFont::default()
        };
        let bold_font = RawFont {
            name: Some("Arial".into()),
            bold: true,
            color: Some(ColorSpec {
                rgb: Some("FF1F497D".into()),
                ..ColorSpec::default()
            }),
            ..RawFont::default()
        };
        StyleSheet {
            fonts: vec![base_font.clone(), bold_font],
            fills: vec![
                RawFill::default(),
                RawFill {
                    pattern_type: Some("solid".into()),
                    fg_color: Some(ColorSpec {
                        rgb: Some("FFC5D9F1".into()),
                        ..ColorSpec::default()
                    }),
                    bg_color: None,
                },
            ],
            borders: vec![
                RawBorder::default(),
                RawBorder {
                    bottom: Some(RawBorderSide {
                        style: "thin".into(),
                        color: None,
                    }),
                    ..RawBorder::default()
                },
            ],
            cell_style_xfs: vec![CellXf {
                font_id: Some(0),
                fill_id: Some(0),
                border_id: Some(0),
                ..CellXf::default()
            }],
            cell_xfs: vec![
                CellXf {
                    font_id: Some(0),
                    xf_id: Some(0),
                    ..CellXf::default()
                },
                CellXf {
                    font_id: Some(1),
                    fill_id: Some(1),
                    border_id: Some(1),
                    num_fmt_id: Some(2),
                    xf_id: Some(0),
                    alignment: Some(RawAlignment {
                        horizontal: Some("center".into()),
                        wrap_text: true,
                        ..RawAlignment::default()
                    }),
                    ..CellXf::default()
                },
                CellXf {
                    font_id: Some(1),
                    xf_id: Some(0),
                    apply_font: false,
                    ..CellXf::default()
                },
            ],
            num_fmts: vec![(164, "0.0%".into())],
            indexed_colors: None,
            default_font: Some(base_font),
        }
    }

    #[test]
    fn resolves_every_component() {
        let sheet = stylesheet();
        let theme = Theme::default();
        let resolver = StyleResolver::new(&sheet, &theme);
        let style = resolver.resolve(1).unwrap();
        assert_eq!(style.font_family.as_deref(), Some("Arial"));
        assert_eq!(style.font_size, Some(11.0));
        assert_eq!(style.bold, Some(true));
        assert_eq!(style.font_color.as_deref(), Some("#1F497D"));
        assert_eq!(style.pattern_type, Some(PatternType::Solid));
        assert_eq!(style.bg_color.as_deref(), Some("#C5D9F1"));
        assert_eq!(style.border_bottom.as_ref().unwrap().style, BorderStyle::Thin);
        assert!(style.border_top.is_none());
        assert_eq!(style.align_h, Some(HAlign::Center));
        assert_eq!(style.wrap, Some(true));
        assert_eq!(style.number_format.as_deref(), Some("0.00"));
    }

    #[test]
    fn apply_flag_off_inherits_from_parent() {
        let sheet = stylesheet();
        let theme = Theme::default();
        let style = StyleResolver::new(&sheet, &theme).resolve(2).unwrap();
        assert_eq!(style.font_family.as_deref(), Some("Calibri"));
        assert_eq!(style.bold, None);
    }

    #[test]
    fn custom_formats_are_looked_up() {
        let sheet = stylesheet();
        let theme = Theme::default();
        let resolver = StyleResolver::new(&sheet, &theme);
        assert_eq!(resolver.number_format(164).as_deref(), Some("0.0%"));
        assert_eq!(resolver.number_format(0), None);
    }
}
