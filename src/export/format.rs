//! Conversion from resolved [`Style`]s to `rust_xlsxwriter` formats.

use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatDiagonalBorder, FormatPattern, FormatScript,
    FormatUnderline,
};

use crate::color::hex_to_rgb;
use crate::types::{
    Border, BorderStyle, HAlign, PatternType, Style, UnderlineStyle, VAlign, VertAlign,
};

fn color(hex: &str) -> Option<Color> {
    hex_to_rgb(hex).map(Color::RGB)
}

fn format_border(style: BorderStyle) -> FormatBorder {
    match style {
        BorderStyle::None => FormatBorder::None,
        BorderStyle::Thin => FormatBorder::Thin,
        BorderStyle::Medium => FormatBorder::Medium,
        BorderStyle::Thick => FormatBorder::Thick,
        BorderStyle::Dashed => FormatBorder::Dashed,
        BorderStyle::Dotted => FormatBorder::Dotted,
        BorderStyle::Double => FormatBorder::Double,
        BorderStyle::Hair => FormatBorder::Hair,
        BorderStyle::MediumDashed => FormatBorder::MediumDashed,
        BorderStyle::DashDot => FormatBorder::DashDot,
        BorderStyle::MediumDashDot => FormatBorder::MediumDashDot,
        BorderStyle::DashDotDot => FormatBorder::DashDotDot,
        BorderStyle::MediumDashDotDot => FormatBorder::MediumDashDotDot,
        BorderStyle::SlantDashDot => FormatBorder::SlantDashDot,
    }
}

const fn format_halign(align: HAlign) -> FormatAlign {
    match align {
        HAlign::General => FormatAlign::General,
        HAlign::Left => FormatAlign::Left,
        HAlign::Center => FormatAlign::Center,
        HAlign::Right => FormatAlign::Right,
        HAlign::Fill => FormatAlign::Fill,
        HAlign::Justify => FormatAlign::Justify,
        HAlign::CenterContinuous => FormatAlign::CenterAcross,
        HAlign::Distributed => FormatAlign::Distributed,
    }
}

const fn format_valign(align: VAlign) -> FormatAlign {
    match align {
        VAlign::Top => FormatAlign::Top,
        VAlign::Center => FormatAlign::VerticalCenter,
        VAlign::Bottom => FormatAlign::Bottom,
        VAlign::Justify => FormatAlign::VerticalJustify,
        VAlign::Distributed => FormatAlign::VerticalDistributed,
    }
}

const fn format_pattern(pattern: PatternType) -> FormatPattern {
    match pattern {
        PatternType::None => FormatPattern::None,
        PatternType::Solid => FormatPattern::Solid,
        PatternType::Gray125 => FormatPattern::Gray125,
        PatternType::Gray0625 => FormatPattern::Gray0625,
        PatternType::DarkGray => FormatPattern::DarkGray,
        PatternType::MediumGray => FormatPattern::MediumGray,
        PatternType::LightGray => FormatPattern::LightGray,
        PatternType::DarkHorizontal => FormatPattern::DarkHorizontal,
        PatternType::DarkVertical => FormatPattern::DarkVertical,
        PatternType::DarkDown => FormatPattern::DarkDown,
        PatternType::DarkUp => FormatPattern::DarkUp,
        PatternType::DarkGrid => FormatPattern::DarkGrid,
        PatternType::DarkTrellis => FormatPattern::DarkTrellis,
        PatternType::LightHorizontal => FormatPattern::LightHorizontal,
        PatternType::LightVertical => FormatPattern::LightVertical,
        PatternType::LightDown => FormatPattern::LightDown,
        PatternType::LightUp => FormatPattern::LightUp,
        PatternType::LightGrid => FormatPattern::LightGrid,
        PatternType::LightTrellis => FormatPattern::LightTrellis,
    }
}

const fn format_underline(underline: UnderlineStyle) -> FormatUnderline {
    match underline {
        UnderlineStyle::Single => FormatUnderline::Single,
        UnderlineStyle::Double => FormatUnderline::Double,
        UnderlineStyle::SingleAccounting => FormatUnderline::SingleAccounting,
        UnderlineStyle::DoubleAccounting => FormatUnderline::DoubleAccounting,
        UnderlineStyle::None => FormatUnderline::None,
    }
}

/// Map a stored `textRotation` to the writer's angle.
///
/// Stored values 91..=180 are the negative angles -1..=-90 and 255 is
/// stacked text, which the writer spells 270.
fn writer_rotation(stored: i32) -> Option<i16> {
    let angle = match stored {
        -90..=90 => stored,
        91..=180 => 90 - stored,
        255 => 270,
        _ => return None,
    };
    i16::try_from(angle).ok()
}

#[derive(Clone, Copy)]
enum Side {
    Top,
    Bottom,
    Left,
    Right,
    Diagonal,
}

fn apply_border(mut format: Format, side: Side, border: Option<&Border>) -> Format {
    let Some(border) = border else {
        return format;
    };
    let line = format_border(border.style);
    let line_color = color(&border.color);
    format = match side {
        Side::Top => format.set_border_top(line),
        Side::Bottom => format.set_border_bottom(line),
        Side::Left => format.set_border_left(line),
        Side::Right => format.set_border_right(line),
        Side::Diagonal => format.set_border_diagonal(line),
    };
    match (side, line_color) {
        (_, None) => format,
        (Side::Top, Some(c)) => format.set_border_top_color(c),
        (Side::Bottom, Some(c)) => format.set_border_bottom_color(c),
        (Side::Left, Some(c)) => format.set_border_left_color(c),
        (Side::Right, Some(c)) => format.set_border_right_color(c),
        (Side::Diagonal, Some(c)) => format.set_border_diagonal_color(c),
    }
}

/// Font attributes of `style` only; used for rich-text fragments.
#[must_use]
pub fn font_format(style: &Style) -> Format {
    let mut format = Format::new();
    if let Some(name) = &style.font_family {
        format = format.set_font_name(name.as_str());
    }
    if let Some(size) = style.font_size {
        format = format.set_font_size(size);
    }
    if let Some(c) = style.font_color.as_deref().and_then(color) {
        format = format.set_font_color(c);
    }
    if style.bold == Some(true) {
        format = format.set_bold();
    }
    if style.italic == Some(true) {
        format = format.set_italic();
    }
    if let Some(underline) = style.underline {
        format = format.set_underline(format_underline(underline));
    }
    if style.strikethrough == Some(true) {
        format = format.set_font_strikethrough();
    }
    match style.vert_align {
        Some(VertAlign::Superscript) => format = format.set_font_script(FormatScript::Superscript),
        Some(VertAlign::Subscript) => format = format.set_font_script(FormatScript::Subscript),
        Some(VertAlign::Baseline) | None => {}
    }
    format
}

/// Full cell format for `style`.
#[must_use]
pub fn cell_format(style: &Style) -> Format {
    let mut format = font_format(style);

    // fill
    match style.pattern_type {
        Some(PatternType::Solid) => {
            format = format.set_pattern(FormatPattern::Solid);
            if let Some(c) = style.bg_color.as_deref().and_then(color) {
                format = format.set_background_color(c);
            }
        }
        Some(PatternType::None) | None => {}
        Some(pattern) => {
            format = format.set_pattern(format_pattern(pattern));
            if let Some(c) = style.fg_color.as_deref().and_then(color) {
                format = format.set_foreground_color(c);
            }
            if let Some(c) = style.bg_color.as_deref().and_then(color) {
                format = format.set_background_color(c);
            }
        }
    }

    // borders
    format = apply_border(format, Side::Top, style.border_top.as_ref());
    format = apply_border(format, Side::Bottom, style.border_bottom.as_ref());
    format = apply_border(format, Side::Left, style.border_left.as_ref());
    format = apply_border(format, Side::Right, style.border_right.as_ref());
    if style.border_diagonal.is_some() {
        format = apply_border(format, Side::Diagonal, style.border_diagonal.as_ref());
        let diagonal = match (style.diagonal_up == Some(true), style.diagonal_down == Some(true)) {
            (true, true) => Some(FormatDiagonalBorder::BorderUpDown),
            (true, false) => Some(FormatDiagonalBorder::BorderUp),
            (false, true) => Some(FormatDiagonalBorder::BorderDown),
            (false, false) => None,
        };
        if let Some(d) = diagonal {
            format = format.set_border_diagonal_type(d);
        }
    }

    // alignment
    if let Some(h) = style.align_h {
        format = format.set_align(format_halign(h));
    }
    if let Some(v) = style.align_v {
        format = format.set_align(format_valign(v));
    }
    if style.wrap == Some(true) {
        format = format.set_text_wrap();
    }
    if style.shrink_to_fit == Some(true) {
        format = format.set_shrink();
    }
    if let Some(indent) = style.indent.and_then(|i| u8::try_from(i).ok()) {
        format = format.set_indent(indent);
    }
    if let Some(rotation) = style.rotation.and_then(writer_rotation) {
        format = format.set_rotation(rotation);
    }
    if let Some(order) = style.reading_order.filter(|&o| o <= 2) {
        format = format.set_reading_direction(order);
    }

    if let Some(num) = &style.number_format {
        format = format.set_num_format(num.as_str());
    }

    if style.locked == Some(false) {
        format = format.set_unlocked();
    }
    if style.hidden == Some(true) {
        format = format.set_hidden();
    }

    format
}
