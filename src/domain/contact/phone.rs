// ============================================================
// PHONE NORMALIZER
// ============================================================
// Canonicalize user-entered phone strings into E.164 identity keys

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

static NON_DIALABLE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9+]").unwrap());

/// Minimum digits (country code included) accepted for any E.164 number
const E164_MIN_DIGITS: usize = 8;

/// Maximum digits allowed by E.164
const E164_MAX_DIGITS: usize = 15;

/// Numbering rules for a region we know how to check structurally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionRule {
    pub region: &'static str,
    pub calling_code: &'static str,
    /// Accepted national significant number lengths, ascending
    pub national_lengths: &'static [usize],
    /// Digit dialled domestically before the national number, dropped on export
    pub trunk_prefix: Option<char>,
    /// Whether the national significant number may start with 0 or 1
    pub allow_low_leading_digit: bool,
}

const REGION_RULES: &[RegionRule] = &[
    RegionRule {
        region: "US",
        calling_code: "1",
        national_lengths: &[7, 10],
        trunk_prefix: None,
        allow_low_leading_digit: false,
    },
    RegionRule {
        region: "GB",
        calling_code: "44",
        national_lengths: &[9, 10],
        trunk_prefix: Some('0'),
        allow_low_leading_digit: true,
    },
    RegionRule {
        region: "AU",
        calling_code: "61",
        national_lengths: &[9],
        trunk_prefix: Some('0'),
        allow_low_leading_digit: true,
    },
    RegionRule {
        region: "IN",
        calling_code: "91",
        national_lengths: &[10],
        trunk_prefix: Some('0'),
        allow_low_leading_digit: false,
    },
    RegionRule {
        region: "ID",
        calling_code: "62",
        national_lengths: &[8, 9, 10, 11, 12],
        trunk_prefix: Some('0'),
        allow_low_leading_digit: true,
    },
];

impl RegionRule {
    /// Look up the rule for a calling code, if the region is known
    pub fn for_calling_code(calling_code: &str) -> Option<&'static RegionRule> {
        REGION_RULES.iter().find(|r| r.calling_code == calling_code)
    }

    fn matching(digits: &str) -> Option<&'static RegionRule> {
        REGION_RULES
            .iter()
            .find(|r| digits.starts_with(r.calling_code))
    }

    fn check_national(&self, national: &str) -> std::result::Result<(), String> {
        let len = national.len();
        if !self.national_lengths.contains(&len) {
            let shortest = self.national_lengths.first().copied().unwrap_or(0);
            let problem = if len < shortest {
                "too short"
            } else if self.national_lengths.iter().all(|&n| len > n) {
                "too long"
            } else {
                "wrong length"
            };
            return Err(format!("{} for region {}", problem, self.region));
        }
        if !self.allow_low_leading_digit && national.starts_with(['0', '1']) {
            return Err(format!("not a valid number for region {}", self.region));
        }
        Ok(())
    }
}

/// Outcome of normalizing a raw phone string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PhoneValidation {
    Valid { e164: String },
    Invalid { reason: String },
}

impl PhoneValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, PhoneValidation::Valid { .. })
    }

    pub fn e164(&self) -> Option<&str> {
        match self {
            PhoneValidation::Valid { e164 } => Some(e164),
            PhoneValidation::Invalid { .. } => None,
        }
    }
}

/// Phone normalizer bound to a default calling code
#[derive(Debug, Clone)]
pub struct PhoneNormalizer {
    calling_code: String,
}

impl Default for PhoneNormalizer {
    fn default() -> Self {
        Self::new("1")
    }
}

impl PhoneNormalizer {
    pub fn new(calling_code: impl Into<String>) -> Self {
        let calling_code: String = calling_code.into();
        Self {
            calling_code: calling_code.trim_start_matches('+').to_string(),
        }
    }

    pub fn calling_code(&self) -> &str {
        &self.calling_code
    }

    /// Keep digits plus a single leading `+`
    pub fn strip(raw: &str) -> String {
        let cleaned = NON_DIALABLE_PATTERN.replace_all(raw.trim(), "");
        let mut out = String::with_capacity(cleaned.len());
        for (idx, c) in cleaned.chars().enumerate() {
            if c == '+' && idx != 0 {
                continue;
            }
            out.push(c);
        }
        out
    }

    /// Normalize to E.164, never failing hard on bad input
    pub fn normalize(&self, raw: &str) -> PhoneValidation {
        let stripped = Self::strip(raw);
        let digits = stripped.trim_start_matches('+');

        if digits.is_empty() {
            return PhoneValidation::Invalid {
                reason: "Phone number is required".to_string(),
            };
        }

        let international = if stripped.starts_with('+') {
            digits.to_string()
        } else {
            format!("{}{}", self.calling_code, self.national_part(digits))
        };

        match Self::check_structure(&international) {
            Ok(()) => PhoneValidation::Valid {
                e164: format!("+{}", international),
            },
            Err(reason) => PhoneValidation::Invalid {
                reason: format!("Invalid phone number: {}", reason),
            },
        }
    }

    /// Exception-style wrapper for callers that want a `Result`
    pub fn require_valid(&self, raw: &str) -> Result<String> {
        match self.normalize(raw) {
            PhoneValidation::Valid { e164 } => Ok(e164),
            PhoneValidation::Invalid { reason } => Err(AppError::ValidationError(reason)),
        }
    }

    fn national_part<'a>(&self, digits: &'a str) -> &'a str {
        match RegionRule::for_calling_code(&self.calling_code).and_then(|r| r.trunk_prefix) {
            Some(trunk) if digits.len() > 1 => digits.strip_prefix(trunk).unwrap_or(digits),
            _ => digits,
        }
    }

    fn check_structure(digits: &str) -> std::result::Result<(), String> {
        if digits.len() < E164_MIN_DIGITS {
            return Err("too short".to_string());
        }
        if digits.len() > E164_MAX_DIGITS {
            return Err("too long".to_string());
        }
        if digits.starts_with('0') {
            return Err("country code cannot start with 0".to_string());
        }

        match RegionRule::matching(digits) {
            Some(rule) => rule.check_national(&digits[rule.calling_code.len()..]),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_default_calling_code() {
        let normalizer = PhoneNormalizer::default();
        assert_eq!(normalizer.normalize("555-0100").e164(), Some("+15550100"));
        assert_eq!(
            normalizer.normalize("(415) 555-2671").e164(),
            Some("+14155552671")
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let normalizer = PhoneNormalizer::default();
        let first = normalizer.normalize("415.555.2671");
        let again = normalizer.normalize(first.e164().unwrap());
        assert_eq!(first, again);
    }

    #[test]
    fn test_different_formats_share_identity_key() {
        let normalizer = PhoneNormalizer::default();
        let a = normalizer.normalize("+1 (415) 555-2671");
        let b = normalizer.normalize("415 555 2671");
        assert_eq!(a.e164(), b.e164());
    }

    #[test]
    fn test_strip_keeps_only_leading_plus() {
        assert_eq!(PhoneNormalizer::strip(" +1 (555) 01+00 "), "+15550100");
        assert_eq!(PhoneNormalizer::strip("555-0101"), "5550101");
    }

    #[test]
    fn test_empty_and_garbage_are_invalid() {
        let normalizer = PhoneNormalizer::default();
        assert_eq!(
            normalizer.normalize("   "),
            PhoneValidation::Invalid {
                reason: "Phone number is required".to_string()
            }
        );
        assert!(!normalizer.normalize("call me").is_valid());
        assert!(!normalizer.normalize("12").is_valid());
    }

    #[test]
    fn test_region_rules_reject_bad_national_numbers() {
        let normalizer = PhoneNormalizer::default();
        // NANP numbers never start with 0 or 1
        assert!(!normalizer.normalize("0555012").is_valid());
        assert!(!normalizer.normalize("+1555012345678").is_valid());
    }

    #[test]
    fn test_nanp_accepts_only_local_or_full_length() {
        let normalizer = PhoneNormalizer::default();
        assert!(normalizer.normalize("555-0100").is_valid());
        assert!(normalizer.normalize("415-555-2671").is_valid());

        for partial in ["41555526", "415555267"] {
            assert_eq!(
                normalizer.normalize(partial),
                PhoneValidation::Invalid {
                    reason: "Invalid phone number: wrong length for region US".to_string()
                }
            );
        }
        assert!(!normalizer.normalize("+1415555267").is_valid());
    }

    #[test]
    fn test_non_ascii_digits_are_not_dialable() {
        let normalizer = PhoneNormalizer::default();
        assert_eq!(PhoneNormalizer::strip("+\u{664}\u{669}\u{661}\u{662}"), "+");
        assert!(!normalizer.normalize("+\u{664}\u{669}\u{661}\u{662}").is_valid());

        let mixed = normalizer.normalize("\u{664}415 555 2671");
        assert_eq!(mixed.e164(), Some("+14155552671"));
    }

    #[test]
    fn test_trunk_prefix_dropped_for_default_region() {
        let normalizer = PhoneNormalizer::new("+44");
        assert_eq!(
            normalizer.normalize("07700 900123").e164(),
            Some("+447700900123")
        );
    }

    #[test]
    fn test_unknown_region_uses_generic_checks() {
        let normalizer = PhoneNormalizer::default();
        assert_eq!(
            normalizer.normalize("+49 30 1234567").e164(),
            Some("+49301234567")
        );
    }

    #[test]
    fn test_require_valid_wraps_reason() {
        let normalizer = PhoneNormalizer::default();
        let err = normalizer.require_valid("abc").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(msg) if msg == "Phone number is required"));
    }
}
