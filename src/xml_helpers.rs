//! Attribute extraction helpers for the quick-xml readers.
//!
//! All lookups compare local names, so `r:id` and `id` resolve alike, and
//! values are unescaped (`&amp;` → `&`).

use quick_xml::events::BytesStart;

use crate::types::ColorSpec;

/// Extract a string attribute by local name (namespace prefix ignored).
///
/// Returns `None` if the attribute is missing or not valid UTF-8.
pub fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

pub fn attr_u32(e: &BytesStart, key: &[u8]) -> Option<u32> {
    attr_string(e, key).and_then(|s| s.trim().parse().ok())
}

pub fn attr_i32(e: &BytesStart, key: &[u8]) -> Option<i32> {
    attr_string(e, key).and_then(|s| s.trim().parse().ok())
}

pub fn attr_f64(e: &BytesStart, key: &[u8]) -> Option<f64> {
    attr_string(e, key).and_then(|s| s.trim().parse().ok())
}

/// Boolean attribute: `"1"`/`"true"` are true, anything else false.
pub fn attr_bool(e: &BytesStart, key: &[u8]) -> Option<bool> {
    attr_string(e, key).map(|s| matches!(s.as_str(), "1" | "true"))
}

/// The ubiquitous `val` attribute.
pub fn attr_val(e: &BytesStart) -> Option<String> {
    attr_string(e, b"val")
}

/// Font toggles like `<b/>` are on unless `val` says otherwise.
pub fn attr_toggle(e: &BytesStart) -> bool {
    attr_bool(e, b"val").unwrap_or(true)
}

/// Parse `rgb`, `theme`, `tint`, `indexed` and `auto` into a `ColorSpec`.
pub fn parse_color_attrs(e: &BytesStart) -> ColorSpec {
    ColorSpec {
        rgb: attr_string(e, b"rgb"),
        theme: attr_u32(e, b"theme"),
        tint: attr_f64(e, b"tint"),
        indexed: attr_u32(e, b"indexed"),
        auto: attr_bool(e, b"auto").unwrap_or(false),
    }
}
