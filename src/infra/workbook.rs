use crate::common::error::{DirectoryError, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::path::Path;

/// Reads the first sheet of an xlsx workbook into rows of cell strings.
/// The import pipeline itself is format-agnostic; this is the only place
/// that knows about spreadsheets.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).map_err(|e| DirectoryError::ImportFailed {
            message: format!("failed to open workbook: {e}"),
        })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DirectoryError::ImportFailed {
            message: "workbook has no sheets".to_string(),
        })?
        .map_err(|e| DirectoryError::ImportFailed {
            message: format!("failed to read sheet: {e}"),
        })?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
