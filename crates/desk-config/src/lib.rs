//! # desk-config
//!
//! Layered configuration loading for the exam check-in desk using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`EXAMDESK_*` prefix, `__` as separator)
//! 2. Project-level `.examdesk/config.toml`
//! 3. User-level `~/.config/examdesk/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `EXAMDESK_ORACLE__TIMEOUT_MS` -> `oracle.timeout_ms`,
//! `EXAMDESK_DATABASE__PATH` -> `database.path`, etc.
//!
//! ```no_run
//! use desk_config::DeskConfig;
//!
//! let config = DeskConfig::load_with_dotenv().expect("config");
//! println!("store: {}", config.database.path);
//! ```

mod database;
mod error;
mod general;
mod intake;
mod oracle;
mod violations;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use intake::IntakeConfig;
pub use oracle::{OracleConfig, OracleKind};
pub use violations::ViolationsConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub intake: IntakeConfig,
    #[serde(default)]
    pub violations: ViolationsConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl DeskConfig {
    /// Load and validate configuration from TOML files and environment
    /// variables.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env`
    /// support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source fails to parse and
    /// [`ConfigError::InvalidValue`] when a setting is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".examdesk/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("EXAMDESK_").split("__"))
    }

    /// Reject settings no component can run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        self.oracle.validate()?;
        if self.intake.max_photo_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "intake.max_photo_bytes".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.intake.allowed_content_types.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "intake.allowed_content_types".into(),
                reason: "at least one content type is required".into(),
            });
        }
        if self.violations.retry_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "violations.retry_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("examdesk").join("config.toml"))
    }
}
