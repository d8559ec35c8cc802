//! XLSX loader
//!
//! Reads the ZIP package into a [`Workbook`]: every sheet's cell values,
//! resolved styles, merges, column widths and row heights.

mod relationships;
pub(crate) mod styles;
mod worksheet;

use std::io::Cursor;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

use crate::error::Result;
use crate::types::{StyleRef, Workbook};

use relationships::{
    get_sheet_info, parse_shared_strings, parse_stylesheet, parse_theme,
    parse_workbook_relationships,
};
use styles::StyleResolver;
use worksheet::{parse_sheet, SheetContext};

/// Parse an XLSX file from bytes.
pub fn parse(data: &[u8]) -> Result<Workbook> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let relationships = parse_workbook_relationships(&mut archive)?;
    let theme = parse_theme(&mut archive, relationships.theme.as_deref());
    let shared_strings =
        parse_shared_strings(&mut archive, relationships.shared_strings.as_deref())?;
    let stylesheet = parse_stylesheet(&mut archive, relationships.styles.as_deref())?;
    let sheet_info = get_sheet_info(&mut archive, &relationships.worksheets)?;

    debug!(
        sheets = sheet_info.len(),
        shared_strings = shared_strings.len(),
        cell_xfs = stylesheet.cell_xfs.len(),
        "workbook package read"
    );

    let resolver = StyleResolver::new(&stylesheet, &theme);
    let resolved_styles: Vec<Option<StyleRef>> = (0..stylesheet.cell_xfs.len())
        .map(|idx| resolver.resolve(idx).map(StyleRef::new))
        .collect();
    let default_style = resolver.default_style().map(StyleRef::new);

    let ctx = SheetContext {
        shared_strings: &shared_strings,
        styles: &resolved_styles,
        default_style: default_style.as_ref(),
    };

    let mut sheets = Vec::with_capacity(sheet_info.len());
    for info in &sheet_info {
        let sheet = parse_sheet(&mut archive, info, &ctx)?;
        debug!(
            sheet = %sheet.name,
            rows = sheet.row_count(),
            cols = sheet.col_count(),
            merges = sheet.merges.len(),
            "sheet parsed"
        );
        sheets.push(sheet);
    }

    Ok(Workbook { sheets, theme })
}

/// Read and parse the workbook at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Workbook> {
    let data = std::fs::read(path)?;
    parse(&data)
}
