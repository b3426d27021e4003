//! Contact import and reconciliation for call campaigns.
//!
//! Uploads are decoded, mapped and validated into a reviewable preview; only
//! an explicit confirmation writes contacts and campaign links.

pub mod application;
pub mod domain;
pub mod infrastructure;

use tracing_subscriber::EnvFilter;

pub use application::{ContactImportService, Upload};
pub use domain::contact::{
    CampaignContact, CommitReport, FieldMapping, GlobalContact, ImportConfig, ImportContact,
    ImportError, ImportResult, LinkStatus, PersonalizationEntry, PhoneNormalizer, RemovalResult,
};
pub use domain::error::{AppError, Result};
pub use infrastructure::bootstrap::{bootstrap, bootstrap_from_env};
pub use infrastructure::config::{AppSettings, ConfigService};
pub use infrastructure::db::SqliteRecordStore;
pub use infrastructure::store::{InMemoryRecordStore, RecordStore};

/// Install the global subscriber once; `RUST_LOG` overrides the `info` default
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
