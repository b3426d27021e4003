// ============================================================
// FIELD MAPPING
// ============================================================
// User-authored association of source columns to canonical contact
// fields, plus open-ended personalization columns. Pure data, no I/O.

use serde::{Deserialize, Serialize};

use super::tabular::column_index;
use crate::domain::error::{AppError, Result};

/// The three identity attributes every import row must resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    FirstName,
    LastName,
    PhoneNumber,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 3] = [
        CanonicalField::FirstName,
        CanonicalField::LastName,
        CanonicalField::PhoneNumber,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CanonicalField::FirstName => "First name",
            CanonicalField::LastName => "Last name",
            CanonicalField::PhoneNumber => "Phone number",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::FirstName => FIRST_NAME_ALIASES,
            CanonicalField::LastName => LAST_NAME_ALIASES,
            CanonicalField::PhoneNumber => PHONE_ALIASES,
        }
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// Matched against a normalized header (lowercase, space/dash -> underscore).
pub const FIRST_NAME_ALIASES: &[&str] = &[
    "first_name",
    "firstname",
    "first",
    "given_name",
    "givenname",
    "fname",
    "forename",
];

pub const LAST_NAME_ALIASES: &[&str] = &[
    "last_name",
    "lastname",
    "last",
    "surname",
    "family_name",
    "familyname",
    "lname",
];

pub const PHONE_ALIASES: &[&str] = &[
    "phone_number",
    "phonenumber",
    "phone",
    "mobile",
    "cell",
    "telephone",
    "tel",
    "msisdn",
];

pub fn normalize_header(s: &str) -> String {
    s.trim()
        .trim_matches('"')
        .to_ascii_lowercase()
        .replace([' ', '-'], "_")
}

pub fn header_matches_alias(normalized_header: &str, alias: &str) -> bool {
    normalized_header == alias
        || normalized_header.ends_with(&format!("_{}", alias))
        || normalized_header.starts_with(&format!("{}_", alias))
        || normalized_header.contains(&format!("_{}_", alias))
}

/// One personalization key/column pair, either side may still be blank
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizationEntry {
    pub key: String,
    pub csv_header: Option<String>,
}

impl PersonalizationEntry {
    pub fn new(key: impl Into<String>, csv_header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            csv_header: Some(csv_header.into()),
        }
    }

    /// Both a key and a source column are filled in
    pub fn is_complete(&self) -> bool {
        !self.key.trim().is_empty()
            && self
                .csv_header
                .as_deref()
                .map(|h| !h.trim().is_empty())
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub personalization: Vec<PersonalizationEntry>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping with all three canonical columns set
    pub fn with_columns(first_name: &str, last_name: &str, phone_number: &str) -> Self {
        Self {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            phone_number: Some(phone_number.to_string()),
            personalization: Vec::new(),
        }
    }

    pub fn set(&mut self, field: CanonicalField, column: Option<String>) {
        let slot = match field {
            CanonicalField::FirstName => &mut self.first_name,
            CanonicalField::LastName => &mut self.last_name,
            CanonicalField::PhoneNumber => &mut self.phone_number,
        };
        *slot = column;
    }

    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        match field {
            CanonicalField::FirstName => self.first_name.as_deref(),
            CanonicalField::LastName => self.last_name.as_deref(),
            CanonicalField::PhoneNumber => self.phone_number.as_deref(),
        }
    }

    /// Append a blank personalization entry and return its index
    pub fn add_personalization(&mut self) -> usize {
        self.personalization.push(PersonalizationEntry::default());
        self.personalization.len() - 1
    }

    pub fn remove_personalization(&mut self, index: usize) -> Option<PersonalizationEntry> {
        (index < self.personalization.len()).then(|| self.personalization.remove(index))
    }

    /// Update one entry in place; `None` leaves that side untouched
    pub fn update_personalization(
        &mut self,
        index: usize,
        key: Option<String>,
        csv_header: Option<Option<String>>,
    ) -> bool {
        let Some(entry) = self.personalization.get_mut(index) else {
            return false;
        };
        if let Some(key) = key {
            entry.key = key;
        }
        if let Some(csv_header) = csv_header {
            entry.csv_header = csv_header;
        }
        true
    }

    /// Canonical fields without a non-empty column
    pub fn missing_fields(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .into_iter()
            .filter(|f| self.get(*f).map(|c| c.trim().is_empty()).unwrap_or(true))
            .collect()
    }

    /// Valid enough to proceed: every canonical field is mapped
    pub fn is_ready(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Personalization entries that will take part in validation
    pub fn complete_personalization(&self) -> impl Iterator<Item = &PersonalizationEntry> {
        self.personalization.iter().filter(|e| e.is_complete())
    }

    /// Resolve column names against the decoded headers
    pub fn resolve(&self, headers: &[String]) -> Result<ResolvedMapping> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            let labels: Vec<&str> = missing.iter().map(|f| f.label()).collect();
            return Err(AppError::ValidationError(format!(
                "Mapping incomplete, missing: {}",
                labels.join(", ")
            )));
        }

        let index_of = |field: CanonicalField| -> Result<usize> {
            let column = self.get(field).unwrap_or_default();
            column_index(headers, column).ok_or_else(|| {
                AppError::ValidationError(format!(
                    "{} column \"{}\" not found in file headers",
                    field.label(),
                    column
                ))
            })
        };

        let personalization = self
            .complete_personalization()
            .map(|entry| ResolvedPersonalization {
                key: entry.key.trim().to_string(),
                column: entry
                    .csv_header
                    .as_deref()
                    .and_then(|h| column_index(headers, h)),
            })
            .collect();

        Ok(ResolvedMapping {
            first_name: index_of(CanonicalField::FirstName)?,
            last_name: index_of(CanonicalField::LastName)?,
            phone_number: index_of(CanonicalField::PhoneNumber)?,
            personalization,
        })
    }

    /// Pre-fill canonical fields from common header spellings
    pub fn suggest(headers: &[String]) -> Self {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let mut taken = vec![false; headers.len()];
        let mut mapping = Self::new();

        // exact alias hits first, then the looser boundary matches
        for exact in [true, false] {
            for field in CanonicalField::ALL {
                if mapping.get(field).is_some() {
                    continue;
                }
                let hit = normalized.iter().enumerate().position(|(idx, h)| {
                    !taken[idx]
                        && field.aliases().iter().any(|a| {
                            if exact {
                                h == a
                            } else {
                                header_matches_alias(h, a)
                            }
                        })
                });
                if let Some(idx) = hit {
                    taken[idx] = true;
                    mapping.set(field, Some(headers[idx].clone()));
                }
            }
        }

        mapping
    }
}

/// Personalization entry bound to a column index (None when the header is gone)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPersonalization {
    pub key: String,
    pub column: Option<usize>,
}

/// Column indices for one validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMapping {
    pub first_name: usize,
    pub last_name: usize,
    pub phone_number: usize,
    pub personalization: Vec<ResolvedPersonalization>,
}

impl ResolvedMapping {
    /// Highest canonical column index a row must reach
    pub fn max_required_index(&self) -> usize {
        self.first_name.max(self.last_name).max(self.phone_number)
    }
}
