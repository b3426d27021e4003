// ============================================================
// TABULAR INFRASTRUCTURE LAYER
// ============================================================
// Delimited text, JSON row arrays and spreadsheet workbooks

mod csv_parser;
mod json_rows;
mod workbook;

pub use csv_parser::{decode_text_bytes, CsvParser};
pub use json_rows::parse_json_rows;
pub use workbook::{looks_like_workbook, parse_workbook};
