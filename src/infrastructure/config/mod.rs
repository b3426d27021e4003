use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::contact::ImportConfig;
use crate::domain::error::{AppError, Result};

pub const CONFIG_FILE: &str = "callboard.toml";
pub const ENV_PREFIX: &str = "CALLBOARD_";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub database_url: String,
    pub import: ImportConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://callboard.db".to_string(),
            import: ImportConfig::default(),
        }
    }
}

/// Layered settings: defaults, then `callboard.toml`, then `CALLBOARD_*`
/// environment variables (`__` separates nested keys).
pub struct ConfigService {
    config_path: PathBuf,
}

impl ConfigService {
    /// Loads `.env` into the process environment before anything is read
    pub fn new() -> Self {
        dotenvy::dotenv().ok();
        Self::from_file(CONFIG_FILE)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    pub fn figment(&self) -> Figment {
        Figment::from(Serialized::defaults(AppSettings::default()))
            .merge(Toml::file(&self.config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(&self) -> Result<AppSettings> {
        let settings: AppSettings = self.figment().extract()?;

        if settings.database_url.trim().is_empty() {
            return Err(AppError::ConfigError("database_url must not be empty".to_string()));
        }
        settings.import.check().map_err(AppError::ConfigError)?;

        tracing::debug!(
            config_path = %self.config_path.display(),
            batch_size = settings.import.batch_size,
            "Loaded settings"
        );
        Ok(settings)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
