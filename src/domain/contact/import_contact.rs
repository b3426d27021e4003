// ============================================================
// IMPORT CONTACT TYPES
// ============================================================
// Rows that passed validation, and structured errors for those that did not

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Open-ended personalization values keyed by author-defined names
pub type PersonalizationFields = BTreeMap<String, String>;

/// A row that passed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportContact {
    pub first_name: String,
    pub last_name: String,

    /// E.164 identity key
    pub phone_number: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personalization_fields: Option<PersonalizationFields>,

    /// Source row, when the contact came from an uploaded file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_number: Option<usize>,
}

impl ImportContact {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone_number: phone_number.into(),
            personalization_fields: None,
            row_number: None,
        }
    }

    pub fn display_name(&self) -> String {
        display_name(&self.first_name, &self.last_name)
    }
}

/// "first last", trimmed so a missing half leaves no stray space
pub fn display_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name.trim(), last_name.trim())
        .trim()
        .to_string()
}

/// Best-effort identifying data kept for a failed row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportErrorData {
    pub name: String,
    pub phone: String,
}

/// A row that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportError {
    pub row_number: usize,
    pub message: String,
    pub data: ImportErrorData,
}

impl ImportError {
    pub fn new(row_number: usize, message: impl Into<String>, data: ImportErrorData) -> Self {
        Self {
            row_number,
            message: message.into(),
            data,
        }
    }
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row {}: {}", self.row_number, self.message)
    }
}

impl std::error::Error for ImportError {}

/// Row validator output for a whole file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedRows {
    pub contacts: Vec<ImportContact>,
    pub errors: Vec<ImportError>,

    /// Rows the decoder emitted
    pub total_rows: usize,
}

impl ValidatedRows {
    pub fn phone_numbers(&self) -> Vec<String> {
        self.contacts.iter().map(|c| c.phone_number.clone()).collect()
    }
}
