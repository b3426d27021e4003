// ============================================================
// ROW VALIDATOR USE CASE
// ============================================================
// Apply a field mapping to decoded rows; each row is atomically a
// valid contact or a structured error

use std::collections::HashMap;

use tracing::{debug, info};

use crate::domain::contact::{
    column_index, display_name, CanonicalField, FieldMapping, ImportConfig, ImportContact, ImportError, ImportErrorData,
    PersonalizationFields, PhoneNormalizer, PhoneValidation, RawRow, ResolvedMapping,
    TabularData, ValidatedRows,
};
use crate::domain::error::Result;

pub struct RowValidator {
    normalizer: PhoneNormalizer,
}

impl RowValidator {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            normalizer: PhoneNormalizer::new(config.default_country_code.clone()),
        }
    }

    pub fn with_normalizer(normalizer: PhoneNormalizer) -> Self {
        Self { normalizer }
    }

    /// Validate one row against unresolved headers and mapping
    pub fn validate_row(
        &self,
        row: &RawRow,
        headers: &[String],
        mapping: &FieldMapping,
    ) -> std::result::Result<ImportContact, ImportError> {
        let resolved = mapping.resolve(headers).map_err(|e| {
            let data = unresolved_data(row, headers, mapping);
            ImportError::new(row.row_number, e.to_string(), data)
        })?;
        self.validate(row, &resolved)
    }

    /// Validate one row against a resolved mapping
    pub fn validate(
        &self,
        row: &RawRow,
        mapping: &ResolvedMapping,
    ) -> std::result::Result<ImportContact, ImportError> {
        if row.cells.len() <= mapping.max_required_index() {
            return Err(ImportError::new(
                row.row_number,
                "Missing required columns",
                best_effort_data(row, mapping),
            ));
        }

        let first_name = row.cell(mapping.first_name).unwrap_or_default().trim();
        let last_name = row.cell(mapping.last_name).unwrap_or_default().trim();
        let raw_phone = row.cell(mapping.phone_number).unwrap_or_default();

        let mut problems: Vec<String> = Vec::new();
        if first_name.is_empty() {
            problems.push("First name is required".to_string());
        }
        if last_name.is_empty() {
            problems.push("Last name is required".to_string());
        }

        let phone_number = match self.normalizer.normalize(raw_phone) {
            PhoneValidation::Valid { e164 } => Some(e164),
            PhoneValidation::Invalid { reason } => {
                problems.push(reason);
                None
            }
        };

        if !problems.is_empty() {
            return Err(ImportError::new(
                row.row_number,
                problems.join(", "),
                ImportErrorData {
                    name: display_name(first_name, last_name),
                    phone: PhoneNormalizer::strip(raw_phone),
                },
            ));
        }

        let personalization: PersonalizationFields = mapping
            .personalization
            .iter()
            .filter_map(|entry| {
                let value = row.cell(entry.column?)?;
                Some((entry.key.clone(), value.trim().to_string()))
            })
            .collect();

        Ok(ImportContact {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            phone_number: phone_number.unwrap_or_default(),
            personalization_fields: (!personalization.is_empty()).then_some(personalization),
            row_number: Some(row.row_number),
        })
    }

    /// Validate every decoded row; a phone seen twice fails the later row
    pub fn validate_rows(&self, data: &TabularData, mapping: &FieldMapping) -> Result<ValidatedRows> {
        let resolved = mapping.resolve(&data.headers)?;

        let mut validated = ValidatedRows {
            total_rows: data.row_count(),
            ..Default::default()
        };
        let mut first_seen: HashMap<String, usize> = HashMap::new();

        for row in &data.rows {
            match self.validate(row, &resolved) {
                Ok(contact) => {
                    if let Some(&first_row) = first_seen.get(&contact.phone_number) {
                        debug!(row = row.row_number, first_row, "Duplicate phone in upload");
                        validated.errors.push(ImportError::new(
                            row.row_number,
                            format!("Duplicate phone number (first seen on row {})", first_row),
                            ImportErrorData {
                                name: contact.display_name(),
                                phone: contact.phone_number.clone(),
                            },
                        ));
                        continue;
                    }
                    first_seen.insert(contact.phone_number.clone(), row.row_number);
                    validated.contacts.push(contact);
                }
                Err(error) => validated.errors.push(error),
            }
        }

        info!(
            total = validated.total_rows,
            valid = validated.contacts.len(),
            failed = validated.errors.len(),
            "Validated contact rows"
        );

        Ok(validated)
    }
}

impl Default for RowValidator {
    fn default() -> Self {
        Self::new(&ImportConfig::default())
    }
}

fn best_effort_data(row: &RawRow, mapping: &ResolvedMapping) -> ImportErrorData {
    ImportErrorData {
        name: display_name(
            row.cell(mapping.first_name).unwrap_or_default(),
            row.cell(mapping.last_name).unwrap_or_default(),
        ),
        phone: PhoneNormalizer::strip(row.cell(mapping.phone_number).unwrap_or_default()),
    }
}

/// Name and phone for a row whose mapping did not resolve; mapped headers
/// that exist are used, alias guesses fill the rest
fn unresolved_data(row: &RawRow, headers: &[String], mapping: &FieldMapping) -> ImportErrorData {
    let suggested = FieldMapping::suggest(headers);
    let cell = |field: CanonicalField| {
        mapping
            .get(field)
            .and_then(|h| column_index(headers, h))
            .or_else(|| suggested.get(field).and_then(|h| column_index(headers, h)))
            .and_then(|idx| row.cell(idx))
            .unwrap_or_default()
    };
    ImportErrorData {
        name: display_name(
            cell(CanonicalField::FirstName),
            cell(CanonicalField::LastName),
        ),
        phone: PhoneNormalizer::strip(cell(CanonicalField::PhoneNumber)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contact::PersonalizationEntry;

    fn sample() -> TabularData {
        TabularData::from_records(
            vec!["first".into(), "last".into(), "phone".into(), "company".into()],
            vec![
                vec!["Jane".into(), "Doe".into(), "555-0100".into(), "Acme".into()],
                vec!["".into(), "Smith".into(), "555-0101".into()],
            ],
        )
    }

    fn mapping() -> FieldMapping {
        FieldMapping::with_columns("first", "last", "phone")
    }

    #[test]
    fn test_valid_and_invalid_rows() {
        let validated = RowValidator::default()
            .validate_rows(&sample(), &mapping())
            .unwrap();

        assert_eq!(validated.total_rows, 2);
        assert_eq!(validated.contacts.len(), 1);
        assert_eq!(validated.contacts[0].first_name, "Jane");
        assert_eq!(validated.contacts[0].phone_number, "+15550100");
        assert_eq!(validated.contacts[0].personalization_fields, None);

        assert_eq!(
            validated.errors,
            vec![ImportError::new(
                3,
                "First name is required",
                ImportErrorData {
                    name: "Smith".into(),
                    phone: "5550101".into(),
                },
            )]
        );
    }

    #[test]
    fn test_row_is_atomic_on_bad_phone() {
        let data = TabularData::from_records(
            vec!["first".into(), "last".into(), "phone".into()],
            vec![vec!["Jane".into(), "Doe".into(), "12".into()]],
        );
        let validated = RowValidator::default().validate_rows(&data, &mapping()).unwrap();

        assert!(validated.contacts.is_empty());
        assert_eq!(validated.errors.len(), 1);
        assert_eq!(validated.errors[0].data.name, "Jane Doe");
        assert!(validated.errors[0].message.starts_with("Invalid phone number"));
    }

    #[test]
    fn test_errors_joined_in_order() {
        let data = TabularData::from_records(
            vec!["first".into(), "last".into(), "phone".into()],
            vec![vec!["".into(), " ".into(), "".into()]],
        );
        let validated = RowValidator::default().validate_rows(&data, &mapping()).unwrap();

        assert_eq!(
            validated.errors[0].message,
            "First name is required, Last name is required, Phone number is required"
        );
    }

    #[test]
    fn test_short_row_missing_columns() {
        let data = TabularData::from_records(
            vec!["first".into(), "last".into(), "phone".into()],
            vec![vec!["Jane".into(), "Doe".into()]],
        );
        let validated = RowValidator::default().validate_rows(&data, &mapping()).unwrap();

        assert_eq!(validated.errors[0].message, "Missing required columns");
        assert_eq!(validated.errors[0].data.name, "Jane Doe");
        assert_eq!(validated.errors[0].data.phone, "");
    }

    #[test]
    fn test_personalization_collected_within_bounds() {
        let mut mapping = mapping();
        mapping
            .personalization
            .push(PersonalizationEntry::new("company", "company"));
        mapping
            .personalization
            .push(PersonalizationEntry::new("plan", "missing_header"));

        let data = TabularData::from_records(
            vec!["first".into(), "last".into(), "phone".into(), "company".into()],
            vec![
                vec!["Jane".into(), "Doe".into(), "555-0100".into(), "Acme".into()],
                vec!["John".into(), "Roe".into(), "555-0199".into()],
            ],
        );
        let validated = RowValidator::default().validate_rows(&data, &mapping).unwrap();

        let fields = validated.contacts[0].personalization_fields.as_ref().unwrap();
        assert_eq!(fields.get("company").map(String::as_str), Some("Acme"));
        assert!(!fields.contains_key("plan"));
        assert_eq!(validated.contacts[1].personalization_fields, None);
    }

    #[test]
    fn test_duplicate_phone_in_file_fails_later_row() {
        let data = TabularData::from_records(
            vec!["first".into(), "last".into(), "phone".into()],
            vec![
                vec!["Jane".into(), "Doe".into(), "415-555-2671".into()],
                vec!["Janet".into(), "Doe".into(), "(415) 555 2671".into()],
            ],
        );
        let validated = RowValidator::default().validate_rows(&data, &mapping()).unwrap();

        assert_eq!(validated.contacts.len(), 1);
        assert_eq!(validated.errors[0].row_number, 3);
        assert!(validated.errors[0].message.contains("row 2"));
    }

    #[test]
    fn test_unready_mapping_fails_run() {
        let mut mapping = mapping();
        mapping.phone_number = None;
        assert!(RowValidator::default().validate_rows(&sample(), &mapping).is_err());
    }

    #[test]
    fn test_validate_row_with_headers() {
        let data = sample();
        let contact = RowValidator::default()
            .validate_row(&data.rows[0], &data.headers, &mapping())
            .unwrap();
        assert_eq!(contact.row_number, Some(2));
    }

    #[test]
    fn test_unresolved_mapping_keeps_row_data() {
        let headers: Vec<String> = vec!["First".into(), "Surname".into(), "Mobile".into()];
        let row = RawRow::new(2, vec!["Jane".into(), "Doe".into(), "(555) 0100".into()]);
        let mapping = FieldMapping::with_columns("First", "Surname", "phone");

        let error = RowValidator::default()
            .validate_row(&row, &headers, &mapping)
            .unwrap_err();

        assert_eq!(error.row_number, 2);
        assert_eq!(error.data.name, "Jane Doe");
        assert_eq!(error.data.phone, "5550100");
    }
}
