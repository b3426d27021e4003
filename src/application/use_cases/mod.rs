pub mod commit_executor;
pub mod contact_import;
pub mod identity_resolver;
pub mod import_reconciler;
pub mod removal_reconciler;
pub mod row_validator;
pub mod tabular_decoder;
