pub mod use_cases;

pub use use_cases::commit_executor::CommitExecutor;
pub use use_cases::contact_import::{ContactImportService, Upload};
pub use use_cases::identity_resolver::{IdentityResolver, IdentitySnapshot, StoreIdentityResolver};
pub use use_cases::tabular_decoder::TabularDecoder;
