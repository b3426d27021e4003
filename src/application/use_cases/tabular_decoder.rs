// ============================================================
// TABULAR DECODER USE CASE
// ============================================================
// Turn an upload into headers plus numbered rows, trying the
// structured JSON shape before delimited text

use tracing::{debug, info};

use crate::domain::contact::{ImportConfig, TabularData};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::tabular::{
    decode_text_bytes, looks_like_workbook, parse_json_rows, parse_workbook, CsvParser,
};

/// Which decoding strategy produced the rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    JsonRows,
    Delimited,
    Workbook,
}

/// Upload decoder
pub struct TabularDecoder {
    max_rows: usize,
}

impl TabularDecoder {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            max_rows: config.max_rows,
        }
    }

    /// Decode raw text: JSON row array first, delimited text otherwise
    pub fn decode_text(&self, content: &str) -> Result<TabularData> {
        if content.trim().is_empty() {
            return Err(AppError::FormatError("File is empty".to_string()));
        }

        if let Some((headers, records)) = parse_json_rows(content) {
            return self.finish(DecodeStrategy::JsonRows, headers, records);
        }

        let (headers, records) = CsvParser::parse_auto_detect(content)?;
        self.finish(DecodeStrategy::Delimited, headers, records)
    }

    /// Decode uploaded bytes, routing spreadsheets to the workbook reader
    pub fn decode_bytes(&self, bytes: &[u8], file_name: Option<&str>) -> Result<TabularData> {
        if looks_like_workbook(bytes, file_name) {
            let (headers, records) = parse_workbook(bytes)?;
            return self.finish(DecodeStrategy::Workbook, headers, records);
        }

        self.decode_text(&decode_text_bytes(bytes))
    }

    fn finish(
        &self,
        strategy: DecodeStrategy,
        headers: Vec<String>,
        records: Vec<Vec<String>>,
    ) -> Result<TabularData> {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let records: Vec<Vec<String>> = records
            .into_iter()
            .map(|cells| cells.into_iter().map(|c| c.trim().to_string()).collect())
            .collect();

        if headers.iter().all(|h| h.is_empty()) || records.is_empty() {
            return Err(AppError::FormatError(
                "File must contain a header row and at least one data row".to_string(),
            ));
        }

        if records.len() > self.max_rows {
            return Err(AppError::FormatError(format!(
                "File has {} data rows, maximum allowed: {}",
                records.len(),
                self.max_rows
            )));
        }

        debug!(?strategy, headers = ?headers, "Decoded upload headers");
        info!(?strategy, rows = records.len(), "Decoded contact upload");

        Ok(TabularData::from_records(headers, records))
    }
}

impl Default for TabularDecoder {
    fn default() -> Self {
        Self::new(&ImportConfig::default())
    }
}
