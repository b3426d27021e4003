// ============================================================
// IMPORT CONFIGURATION
// ============================================================
// Tunables for decoding, normalization and commit batching

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::entities::LinkStatus;

/// Configuration for the contact import pipeline
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ImportConfig {
    /// Calling code prefixed to numbers entered without `+` (default: "1")
    #[validate(length(min = 1, max = 4))]
    #[serde(deserialize_with = "calling_code")]
    pub default_country_code: String,

    /// Rows per batched insert/delete statement (default: 100)
    #[validate(range(min = 1, max = 500))]
    pub batch_size: usize,

    /// Maximum data rows accepted from one upload (default: 50000)
    #[validate(range(min = 1))]
    pub max_rows: usize,

    /// Reserved personalization key holding "first last" (default: "name")
    #[validate(length(min = 1, max = 64))]
    pub display_name_key: String,

    /// Status given to newly created campaign links
    pub default_link_status: LinkStatus,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_country_code: "1".to_string(),
            batch_size: 100,
            max_rows: 50_000,
            display_name_key: "name".to_string(),
            default_link_status: LinkStatus::Pending,
        }
    }
}

impl ImportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration values
    pub fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())?;

        let code = self.default_country_code.trim_start_matches('+');
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) || code.starts_with('0') {
            return Err(format!(
                "default_country_code must be 1-3 digits not starting with 0, got \"{}\"",
                self.default_country_code
            ));
        }
        if code.len() > 3 {
            return Err("default_country_code must be at most 3 digits".to_string());
        }
        if self.display_name_key.trim().is_empty() {
            return Err("display_name_key must not be blank".to_string());
        }
        Ok(())
    }
}

/// Environment values like `44` arrive as numbers
fn calling_code<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Number(u64),
    }

    Ok(match Code::deserialize(deserializer)? {
        Code::Text(code) => code,
        Code::Number(code) => code.to_string(),
    })
}
