// ============================================================
// CONTACT IMPORT DOMAIN LAYER
// ============================================================
// Core types and value objects for contact import and removal
// No I/O, no async

mod entities;
mod field_mapping;
mod import_config;
mod import_contact;
mod phone;
mod results;
mod tabular;

pub use entities::{CampaignContact, GlobalContact, LinkStatus, NewCampaignLink, NewContact};
pub use field_mapping::{
    normalize_header, CanonicalField, FieldMapping, PersonalizationEntry,
    ResolvedMapping, ResolvedPersonalization,
};
pub use import_config::ImportConfig;
pub use import_contact::{
    display_name, ImportContact, ImportError, ImportErrorData, PersonalizationFields,
    ValidatedRows,
};
pub use phone::{PhoneNormalizer, PhoneValidation, RegionRule};
pub use results::{
    CommitFailure, CommitReport, CommitStage, ImportResult, RemovalResult, RemovalTargets,
};
pub use tabular::{column_index, RawRow, TabularData, HEADER_ROW_NUMBER};
