//! Package-level parts: workbook relationships, sheet list, theme, shared
//! strings and the stylesheet.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::color::DEFAULT_THEME_COLORS;
use crate::error::Result;
use crate::styles::parse_styles;
use crate::types::{StyleSheet, Theme};
use crate::xml_helpers::attr_string;

use super::worksheet::SheetInfo;

/// Paths from xl/_rels/workbook.xml.rels, resolved to full archive paths.
#[derive(Default, Debug)]
pub(super) struct WorkbookRelationships {
    /// rId -> "xl/worksheets/sheetN.xml"
    pub worksheets: HashMap<String, String>,
    pub shared_strings: Option<String>,
    pub styles: Option<String>,
    pub theme: Option<String>,
}

pub(super) fn parse_workbook_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<WorkbookRelationships> {
    let mut rels = WorkbookRelationships::default();

    let Ok(file) = archive.by_name("xl/_rels/workbook.xml.rels") else {
        return Ok(rels);
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e)
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = attr_string(e, b"Id").unwrap_or_default();
                let target = attr_string(e, b"Target").unwrap_or_default();
                let rel_type = attr_string(e, b"Type").unwrap_or_default();
                if target.is_empty() {
                    buf.clear();
                    continue;
                }

                let full_path = match target.strip_prefix('/') {
                    Some(absolute) => absolute.to_string(),
                    None => format!("xl/{target}"),
                };

                if rel_type.ends_with("/worksheet") && !id.is_empty() {
                    rels.worksheets.insert(id, full_path);
                } else if rel_type.ends_with("/sharedStrings") {
                    rels.shared_strings = Some(full_path);
                } else if rel_type.ends_with("/styles") {
                    rels.styles = Some(full_path);
                } else if rel_type.ends_with("/theme") {
                    rels.theme = Some(full_path);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Sheet names and part paths from xl/workbook.xml, in tab order.
pub(super) fn get_sheet_info<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    relationships: &HashMap<String, String>,
) -> Result<Vec<SheetInfo>> {
    let file = archive.by_name("xl/workbook.xml")?;
    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);

    let mut sheets = Vec::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) if e.local_name().as_ref() == b"sheet" => {
                let Some(name) = attr_string(e, b"name").filter(|n| !n.is_empty()) else {
                    buf.clear();
                    continue;
                };
                // `r:id` matches by local name
                let path = attr_string(e, b"id")
                    .and_then(|r_id| relationships.get(&r_id).cloned())
                    .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", sheets.len() + 1));
                sheets.push(SheetInfo { name, path });
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

const THEME_SLOTS: [&[u8]; 12] = [
    b"lt1", b"dk1", b"lt2", b"dk2", b"accent1", b"accent2", b"accent3", b"accent4", b"accent5",
    b"accent6", b"hlink", b"folHlink",
];

/// Theme palette and fonts. A missing or malformed theme yields the Office defaults.
pub(super) fn parse_theme<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: Option<&str>,
) -> Theme {
    let mut theme = Theme {
        colors: DEFAULT_THEME_COLORS.iter().map(ToString::to_string).collect(),
        major_font: None,
        minor_font: None,
    };

    let Ok(file) = archive.by_name(path.unwrap_or("xl/theme/theme1.xml")) else {
        return theme;
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);
    let mut buf = Vec::new();

    let mut in_clr_scheme = false;
    let mut slot: Option<usize> = None;
    let mut font_scope: Option<bool> = None; // Some(true) = major

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
                let name = e.local_name();
                match name.as_ref() {
                    b"clrScheme" => in_clr_scheme = true,
                    b"majorFont" => font_scope = Some(true),
                    b"minorFont" => font_scope = Some(false),
                    tag if in_clr_scheme && THEME_SLOTS.contains(&tag) => {
                        slot = THEME_SLOTS.iter().position(|s| *s == tag);
                    }
                    b"srgbClr" | b"sysClr" if in_clr_scheme => {
                        let value = attr_string(e, b"lastClr").or_else(|| attr_string(e, b"val"));
                        if let (Some(idx), Some(hex)) =
                            (slot, value.and_then(|v| crate::color::normalize_hex(&v)))
                        {
                            if let Some(color) = theme.colors.get_mut(idx) {
                                *color = hex;
                            }
                        }
                    }
                    b"latin" => {
                        let typeface = attr_string(e, b"typeface").filter(|t| !t.is_empty());
                        match font_scope {
                            Some(true) if theme.major_font.is_none() => theme.major_font = typeface,
                            Some(false) if theme.minor_font.is_none() => {
                                theme.minor_font = typeface;
                            }
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"clrScheme" => in_clr_scheme = false,
                b"majorFont" | b"minorFont" => font_scope = None,
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    theme
}

/// Shared string table. Rich-text runs are flattened to their plain text;
/// phonetic runs (`rPh`) are skipped.
pub(super) fn parse_shared_strings<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: Option<&str>,
) -> Result<Vec<String>> {
    let Ok(file) = archive.by_name(path.unwrap_or("xl/sharedStrings.xml")) else {
        return Ok(Vec::new());
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut strings = Vec::new();
    let mut buf = Vec::new();
    let mut current = String::new();
    let mut in_t = false;
    let mut in_phonetic = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"si" => current.clear(),
                b"rPh" => in_phonetic = true,
                b"t" if !in_phonetic => in_t = true,
                _ => {}
            },
            Event::Text(ref e) if in_t => current.push_str(&e.unescape()?),
            Event::End(ref e) => match e.local_name().as_ref() {
                b"si" => strings.push(std::mem::take(&mut current)),
                b"t" => in_t = false,
                b"rPh" => in_phonetic = false,
                _ => {}
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

pub(super) fn parse_stylesheet<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: Option<&str>,
) -> Result<StyleSheet> {
    let Ok(file) = archive.by_name(path.unwrap_or("xl/styles.xml")) else {
        return Ok(StyleSheet::default());
    };
    parse_styles(BufReader::new(file))
}
