// ============================================================
// CSV PARSER
// ============================================================
// Parse delimited text with delimiter detection and encoding fallback

use csv::{ReaderBuilder, Trim};

use crate::domain::error::{AppError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Delimiters tried by detection, in tie-break order
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Delimited-text parser
pub struct CsvParser {
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse content into header cells and non-blank data records
    pub fn parse_content(&self, content: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(content.trim_start_matches('\u{feff}').as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::FormatError(format!("Failed to read header row: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::FormatError(format!("Malformed record near line {}: {}", index + 2, e))
            })?;

            if record.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            records.push(record.iter().map(str::to_string).collect());
        }

        Ok((headers, records))
    }

    /// Pick the candidate that splits the first lines most often and most evenly
    pub fn detect_delimiter(content: &str) -> u8 {
        let sample: Vec<&str> = content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .take(10)
            .collect();
        if sample.is_empty() {
            return b',';
        }

        let mut best = (b',', 0.0f32);
        for &delimiter in &CANDIDATE_DELIMITERS {
            let counts: Vec<f32> = sample
                .iter()
                .map(|line| count_unquoted(line, delimiter) as f32)
                .collect();

            let n = counts.len() as f32;
            let mean = counts.iter().sum::<f32>() / n;
            let spread = (counts.iter().map(|c| (c - mean).powi(2)).sum::<f32>() / n).sqrt();
            let score = mean / (1.0 + spread);

            if score > best.1 {
                best = (delimiter, score);
            }
        }

        best.0
    }

    pub fn parse_auto_detect(content: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let delimiter = Self::detect_delimiter(content);
        Self::new().with_delimiter(delimiter).parse_content(content)
    }
}

/// Delimiter occurrences outside double-quoted fields
fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for b in line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

/// Decode uploaded bytes as UTF-8, falling back to Windows-1252
pub fn decode_text_bytes(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        Err(_) => {
            let (content, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            content.into_owned()
        }
    }
}
