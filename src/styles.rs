//! Parsing of xl/styles.xml
//!
//! Collects number formats, fonts, fills, borders and the two xf tables
//! (`cellStyleXfs`, `cellXfs`). Differential formats (`dxfs`) and named
//! style metadata are skipped: nothing downstream reads them.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;

use crate::error::Result;
use crate::types::{
    CellXf, RawAlignment, RawBorder, RawBorderSide, RawFill, RawFont, RawProtection, StyleSheet,
    UnderlineStyle, VertAlign,
};
use crate::xml_helpers::{
    attr_bool, attr_i32, attr_string, attr_toggle, attr_u32, attr_val, parse_color_attrs,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    NumFmts,
    Fonts,
    Fills,
    Borders,
    CellStyleXfs,
    CellXfs,
    IndexedColors,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    Top,
    Bottom,
    Diagonal,
}

fn side_of(name: &[u8]) -> Option<Side> {
    match name {
        b"left" | b"start" => Some(Side::Left),
        b"right" | b"end" => Some(Side::Right),
        b"top" => Some(Side::Top),
        b"bottom" => Some(Side::Bottom),
        b"diagonal" => Some(Side::Diagonal),
        _ => None,
    }
}

fn border_side_mut(border: &mut RawBorder, side: Side) -> &mut Option<RawBorderSide> {
    match side {
        Side::Left => &mut border.left,
        Side::Right => &mut border.right,
        Side::Top => &mut border.top,
        Side::Bottom => &mut border.bottom,
        Side::Diagonal => &mut border.diagonal,
    }
}

fn parse_underline(e: &BytesStart) -> UnderlineStyle {
    match attr_val(e).as_deref() {
        Some("double") => UnderlineStyle::Double,
        Some("singleAccounting") => UnderlineStyle::SingleAccounting,
        Some("doubleAccounting") => UnderlineStyle::DoubleAccounting,
        Some("none") => UnderlineStyle::None,
        _ => UnderlineStyle::Single,
    }
}

fn parse_xf(e: &BytesStart) -> CellXf {
    let flag = |key: &[u8]| attr_bool(e, key).unwrap_or(true);
    CellXf {
        font_id: attr_u32(e, b"fontId"),
        fill_id: attr_u32(e, b"fillId"),
        border_id: attr_u32(e, b"borderId"),
        num_fmt_id: attr_u32(e, b"numFmtId"),
        xf_id: attr_u32(e, b"xfId"),
        apply_font: flag(b"applyFont"),
        apply_fill: flag(b"applyFill"),
        apply_border: flag(b"applyBorder"),
        apply_alignment: flag(b"applyAlignment"),
        apply_number_format: flag(b"applyNumberFormat"),
        apply_protection: flag(b"applyProtection"),
        ..CellXf::default()
    }
}

fn parse_alignment(e: &BytesStart) -> RawAlignment {
    RawAlignment {
        horizontal: attr_string(e, b"horizontal"),
        vertical: attr_string(e, b"vertical"),
        wrap_text: attr_bool(e, b"wrapText").unwrap_or(false),
        shrink_to_fit: attr_bool(e, b"shrinkToFit").unwrap_or(false),
        indent: attr_u32(e, b"indent"),
        text_rotation: attr_i32(e, b"textRotation"),
        reading_order: attr_u32(e, b"readingOrder").and_then(|v| u8::try_from(v).ok()),
    }
}

/// Parse styles.xml content
#[allow(clippy::too_many_lines)]
pub fn parse_styles<R: BufRead>(reader: R) -> Result<StyleSheet> {
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut stylesheet = StyleSheet::default();
    let mut buf = Vec::new();

    let mut section = Section::None;
    let mut current_font: Option<RawFont> = None;
    let mut current_fill: Option<RawFill> = None;
    let mut current_border: Option<RawBorder> = None;
    let mut current_side: Option<Side> = None;
    let mut current_xf: Option<CellXf> = None;
    let mut indexed_colors: Vec<String> = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            ref event @ (Event::Start(ref e) | Event::Empty(ref e)) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = e.local_name();

                match (section, name.as_ref()) {
                    (_, b"numFmts") => section = Section::NumFmts,
                    (_, b"fonts") => section = Section::Fonts,
                    (_, b"fills") => section = Section::Fills,
                    (_, b"borders") => section = Section::Borders,
                    (_, b"cellStyleXfs") => section = Section::CellStyleXfs,
                    (_, b"cellXfs") => section = Section::CellXfs,
                    (_, b"indexedColors") => section = Section::IndexedColors,

                    (Section::NumFmts, b"numFmt") => {
                        if let (Some(id), Some(code)) =
                            (attr_u32(e, b"numFmtId"), attr_string(e, b"formatCode"))
                        {
                            stylesheet.num_fmts.push((id, code));
                        }
                    }

                    (Section::IndexedColors, b"rgbColor") => {
                        if let Some(color) =
                            attr_string(e, b"rgb").and_then(|rgb| crate::color::normalize_hex(&rgb))
                        {
                            indexed_colors.push(color);
                        }
                    }

                    // Fonts
                    (Section::Fonts, b"font") => {
                        current_font = Some(RawFont::default());
                        if is_empty {
                            stylesheet.fonts.push(RawFont::default());
                            current_font = None;
                        }
                    }
                    (Section::Fonts, tag) => {
                        if let Some(font) = current_font.as_mut() {
                            match tag {
                                b"sz" => {
                                    font.size = attr_val(e).and_then(|s| s.parse().ok());
                                }
                                b"name" | b"rFont" => font.name = attr_val(e),
                                b"scheme" => font.scheme = attr_val(e),
                                b"b" => font.bold = attr_toggle(e),
                                b"i" => font.italic = attr_toggle(e),
                                b"strike" => font.strikethrough = attr_toggle(e),
                                b"u" => font.underline = Some(parse_underline(e)),
                                b"vertAlign" => {
                                    font.vert_align = match attr_val(e).as_deref() {
                                        Some("superscript") => Some(VertAlign::Superscript),
                                        Some("subscript") => Some(VertAlign::Subscript),
                                        Some("baseline") => Some(VertAlign::Baseline),
                                        _ => None,
                                    };
                                }
                                b"color" => font.color = Some(parse_color_attrs(e)),
                                _ => {}
                            }
                        }
                    }

                    // Fills
                    (Section::Fills, b"fill") => {
                        current_fill = Some(RawFill::default());
                        if is_empty {
                            stylesheet.fills.push(RawFill::default());
                            current_fill = None;
                        }
                    }
                    (Section::Fills, b"patternFill") => {
                        if let Some(fill) = current_fill.as_mut() {
                            fill.pattern_type = attr_string(e, b"patternType");
                        }
                    }
                    (Section::Fills, b"fgColor") => {
                        if let Some(fill) = current_fill.as_mut() {
                            fill.fg_color = Some(parse_color_attrs(e));
                        }
                    }
                    (Section::Fills, b"bgColor") => {
                        if let Some(fill) = current_fill.as_mut() {
                            fill.bg_color = Some(parse_color_attrs(e));
                        }
                    }

                    // Borders
                    (Section::Borders, b"border") => {
                        let border = RawBorder {
                            diagonal_up: attr_bool(e, b"diagonalUp").unwrap_or(false),
                            diagonal_down: attr_bool(e, b"diagonalDown").unwrap_or(false),
                            ..RawBorder::default()
                        };
                        if is_empty {
                            stylesheet.borders.push(border);
                        } else {
                            current_border = Some(border);
                        }
                    }
                    (Section::Borders, b"color") => {
                        if let (Some(border), Some(side)) = (current_border.as_mut(), current_side)
                        {
                            if let Some(raw) = border_side_mut(border, side).as_mut() {
                                raw.color = Some(parse_color_attrs(e));
                            }
                        }
                    }
                    (Section::Borders, tag) => {
                        if let (Some(border), Some(side)) = (current_border.as_mut(), side_of(tag))
                        {
                            *border_side_mut(border, side) =
                                attr_string(e, b"style").map(|style| RawBorderSide {
                                    style,
                                    color: None,
                                });
                            current_side = (!is_empty).then_some(side);
                        }
                    }

                    // Cell formats
                    (Section::CellStyleXfs | Section::CellXfs, b"xf") => {
                        let xf = parse_xf(e);
                        if is_empty {
                            push_xf(&mut stylesheet, section, xf);
                        } else {
                            current_xf = Some(xf);
                        }
                    }
                    (Section::CellStyleXfs | Section::CellXfs, b"alignment") => {
                        if let Some(xf) = current_xf.as_mut() {
                            xf.alignment = Some(parse_alignment(e));
                        }
                    }
                    (Section::CellStyleXfs | Section::CellXfs, b"protection") => {
                        if let Some(xf) = current_xf.as_mut() {
                            xf.protection = Some(RawProtection {
                                locked: attr_bool(e, b"locked").unwrap_or(true),
                                hidden: attr_bool(e, b"hidden").unwrap_or(false),
                            });
                        }
                    }

                    _ => {}
                }
            }

            Event::End(ref e) => match e.local_name().as_ref() {
                b"numFmts" | b"fonts" | b"fills" | b"borders" | b"cellStyleXfs" | b"cellXfs"
                | b"indexedColors" => section = Section::None,
                b"font" if section == Section::Fonts => {
                    if let Some(font) = current_font.take() {
                        stylesheet.fonts.push(font);
                    }
                }
                b"fill" if section == Section::Fills => {
                    if let Some(fill) = current_fill.take() {
                        stylesheet.fills.push(fill);
                    }
                }
                b"border" if section == Section::Borders => {
                    if let Some(border) = current_border.take() {
                        stylesheet.borders.push(border);
                    }
                }
                tag if section == Section::Borders && side_of(tag).is_some() => {
                    current_side = None;
                }
                b"xf" => {
                    if let Some(xf) = current_xf.take() {
                        push_xf(&mut stylesheet, section, xf);
                    }
                }
                _ => {}
            },

            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !indexed_colors.is_empty() {
        stylesheet.indexed_colors = Some(indexed_colors);
    }

    // The Normal style's font applies to every cell without an explicit one
    stylesheet.default_font = stylesheet
        .cell_style_xfs
        .first()
        .and_then(|xf| xf.font_id)
        .or(Some(0))
        .and_then(|id| stylesheet.fonts.get(usize::try_from(id).ok()?))
        .cloned();

    Ok(stylesheet)
}

fn push_xf(stylesheet: &mut StyleSheet, section: Section, xf: CellXf) {
    match section {
        Section::CellStyleXfs => stylesheet.cell_style_xfs.push(xf),
        Section::CellXfs => stylesheet.cell_xfs.push(xf),
        _ => {}
    }
}
