// ============================================================
// WORKBOOK PARSER
// ============================================================
// First worksheet of an XLSX/XLS/ODS upload, first row as headers

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};

use crate::domain::error::{AppError, Result};

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// ZIP container (xlsx, ods) and OLE compound file (xls) signatures
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = b"\xD0\xCF\x11\xE0";

/// Whether the upload should be read as a spreadsheet workbook
pub fn looks_like_workbook(bytes: &[u8], file_name: Option<&str>) -> bool {
    let by_extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| WORKBOOK_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false);

    by_extension || bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC)
}

pub fn parse_workbook(bytes: &[u8]) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AppError::FormatError(format!("Failed to open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::FormatError("No worksheet found in workbook".to_string()))?
        .map_err(|e| AppError::FormatError(format!("Failed to read worksheet: {}", e)))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());

    let headers = rows
        .next()
        .ok_or_else(|| AppError::FormatError("Worksheet is empty".to_string()))?;

    let records = rows
        .filter(|cells| !cells.iter().all(|c| c.is_empty()))
        .collect();

    Ok((headers, records))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        // Phone columns usually arrive as whole floats
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other
            .as_string()
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| format!("{}", other)),
    }
}
