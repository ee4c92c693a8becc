//! Spreadsheet and clipboard serialization of fetched data.

use std::path::Path;

use serde::Serialize;

use crate::domain::{AppError, ExportRow, Result, EXPORT_HEADER};
use crate::infrastructure::write_workbook;

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Crisp Messages";

/// Writes `rows` to a one-sheet workbook at `path`, header row first.
///
/// Zero rows produce a header-only workbook; callers warn instead of exporting
/// an empty dataset.
///
/// # Errors
/// Returns error if the file cannot be written.
pub fn export_to_spreadsheet(rows: &[ExportRow], path: &Path) -> Result<()> {
    write_workbook(path, SHEET_NAME, EXPORT_HEADER, rows.iter().map(ExportRow::cells))?;

    tracing::info!(rows = rows.len(), path = %path.display(), "Spreadsheet exported");
    Ok(())
}

/// Pretty-printed JSON of conversations or groups, as placed on the clipboard.
///
/// # Errors
/// Returns error if serialization fails.
pub fn to_clipboard_text<T>(items: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string_pretty(items).map_err(AppError::json_parse)
}
