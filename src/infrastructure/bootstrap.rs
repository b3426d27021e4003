use std::sync::Arc;

use tracing::{error, info};

use crate::application::use_cases::contact_import::ContactImportService;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::{AppSettings, ConfigService};
use crate::infrastructure::db::SqliteRecordStore;

/// Wire a ready-to-use import service on top of the SQLite store
pub async fn bootstrap(settings: &AppSettings) -> Result<ContactImportService> {
    crate::init_tracing();

    settings.import.check().map_err(|err| {
        error!(error = %err, "Invalid import configuration");
        AppError::ConfigError(err)
    })?;

    let store = SqliteRecordStore::connect(&settings.database_url)
        .await
        .map_err(|err| {
            error!(error = %err, database_url = %settings.database_url, "Failed to open contact store");
            err
        })?;

    info!(
        database_url = %settings.database_url,
        batch_size = settings.import.batch_size,
        "Contact import service ready"
    );

    Ok(ContactImportService::new(
        Arc::new(store),
        settings.import.clone(),
    ))
}

/// Load settings from `.env`, `callboard.toml` and the environment, then bootstrap
pub async fn bootstrap_from_env() -> Result<ContactImportService> {
    let settings = ConfigService::new().load()?;
    bootstrap(&settings).await
}
