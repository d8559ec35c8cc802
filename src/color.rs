//! Color resolution utilities
//!
//! Turns theme, indexed and ARGB color specs from styles.xml into `#RRGGBB`
//! strings, and `#RRGGBB` strings into the packed integers the writer wants.

use crate::types::ColorSpec;

/// Excel's 64 indexed colors (legacy palette)
pub const INDEXED_COLORS: [&str; 64] = [
    "#000000", "#FFFFFF", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
    "#000000", "#FFFFFF", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
    "#800000", "#008000", "#000080", "#808000", "#800080", "#008080", "#C0C0C0", "#808080",
    "#9999FF", "#993366", "#FFFFCC", "#CCFFFF", "#660066", "#FF8080", "#0066CC", "#CCCCFF",
    "#000080", "#FF00FF", "#FFFF00", "#00FFFF", "#800080", "#800000", "#008080", "#0000FF",
    "#00CCFF", "#CCFFFF", "#CCFFCC", "#FFFF99", "#99CCFF", "#FF99CC", "#CC99FF", "#FFCC99",
    "#3366FF", "#33CCCC", "#99CC00", "#FFCC00", "#FF9900", "#FF6600", "#666699", "#969696",
    "#003366", "#339966", "#003300", "#333300", "#993300", "#993366", "#333399", "#333333",
];

/// Office theme colors, in theme index order: lt1, dk1, lt2, dk2,
/// accent1-6, hlink, folHlink.
pub const DEFAULT_THEME_COLORS: [&str; 12] = [
    "#FFFFFF", "#000000", "#E7E6E6", "#44546A", "#4472C4", "#ED7D31", "#A5A5A5", "#FFC000",
    "#5B9BD5", "#70AD47", "#0563C1", "#954F72",
];

/// Resolve a `ColorSpec` to an #RRGGBB string
///
/// Priority: rgb > theme > indexed > auto.
pub fn resolve_color(
    color: &ColorSpec,
    theme_colors: &[String],
    indexed_colors: Option<&Vec<String>>,
) -> Option<String> {
    if let Some(rgb) = &color.rgb {
        return normalize_hex(rgb);
    }

    if let Some(theme_idx) = color.theme {
        let idx = usize::try_from(theme_idx).ok()?;
        let base_color = theme_colors
            .get(idx)
            .map(String::as_str)
            .or_else(|| DEFAULT_THEME_COLORS.get(idx).copied())?;

        return Some(match color.tint {
            Some(tint) => apply_tint(base_color, tint),
            None => base_color.to_string(),
        });
    }

    if let Some(indexed) = color.indexed {
        if indexed == 64 {
            // system foreground
            return Some("#000000".to_string());
        }
        let idx = usize::try_from(indexed).ok()?;
        if let Some(found) = indexed_colors.and_then(|palette| palette.get(idx)) {
            return Some(found.clone());
        }
        if let Some(found) = INDEXED_COLORS.get(idx) {
            return Some((*found).to_string());
        }
    }

    if color.auto {
        return Some("#000000".to_string());
    }

    None
}

/// Normalise `RRGGBB`, `#RRGGBB` or ARGB `AARRGGBB` to `#RRGGBB`.
#[must_use]
pub fn normalize_hex(raw: &str) -> Option<String> {
    let hex = raw.trim().trim_start_matches('#');
    let rgb = match hex.len() {
        8 => hex.get(2..)?,
        6 => hex,
        _ => return None,
    };
    if !rgb.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(format!("#{}", rgb.to_ascii_uppercase()))
}

/// Packed `0xRRGGBB` value of a color string.
#[must_use]
pub fn hex_to_rgb(raw: &str) -> Option<u32> {
    let normalized = normalize_hex(raw)?;
    u32::from_str_radix(normalized.get(1..)?, 16).ok()
}

/// Apply a tint value to a color
/// tint < 0: shade (darken)
/// tint > 0: tint (lighten)
#[allow(clippy::many_single_char_names)]
pub fn apply_tint(hex_color: &str, tint: f64) -> String {
    let packed = hex_to_rgb(hex_color).unwrap_or(0);
    let [_, r, g, b] = packed.to_be_bytes();

    let (h, s, l) = rgb_to_hsl(r, g, b);

    let new_l = if tint < 0.0 {
        l * (1.0 + tint)
    } else {
        (1.0 - l).mul_add(tint, l)
    };

    let (r, g, b) = hsl_to_rgb(h, s, new_l.clamp(0.0, 1.0));

    format!("#{r:02X}{g:02X}{b:02X}")
}

#[allow(clippy::many_single_char_names)]
fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < f64::EPSILON {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if (max - r).abs() < f64::EPSILON {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if (max - g).abs() < f64::EPSILON {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h / 6.0, s, l)
}

#[allow(clippy::many_single_char_names)]
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    if s.abs() < f64::EPSILON {
        let v = unit_to_byte(l);
        return (v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l.mul_add(-s, l + s)
    };
    let p = 2.0f64.mul_add(l, -q);

    (
        unit_to_byte(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        unit_to_byte(hue_to_rgb(p, q, h)),
        unit_to_byte(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_byte(v: f64) -> u8 {
    // clamped to [0, 255] first
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        return ((q - p) * 6.0).mul_add(t, p);
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return ((q - p) * (2.0 / 3.0 - t)).mul_add(6.0, p);
    }
    p
}
