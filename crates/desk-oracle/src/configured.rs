//! Oracle selected from configuration.

use std::time::Duration;

use desk_config::{OracleConfig, OracleKind};

use crate::{CommandOracle, HttpOracle, Judgment, OracleError, StaticOracle, VerificationOracle};

/// One of the built-in oracles, chosen by `oracle.kind`.
#[derive(Debug, Clone)]
pub enum ConfiguredOracle {
    Static(StaticOracle),
    Http(HttpOracle),
    Command(CommandOracle),
}

impl ConfiguredOracle {
    /// # Errors
    ///
    /// Returns [`OracleError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &OracleConfig) -> Result<Self, OracleError> {
        Ok(match config.kind {
            OracleKind::Static => Self::Static(StaticOracle::new(
                config.static_match,
                config.static_confidence,
            )),
            OracleKind::Http => Self::Http(HttpOracle::new(
                config.endpoint.clone(),
                Duration::from_millis(config.timeout_ms),
            )?),
            OracleKind::Command => {
                Self::Command(CommandOracle::new(config.program.clone(), config.args.clone()))
            }
        })
    }
}

impl VerificationOracle for ConfiguredOracle {
    async fn judge(&self, captured: &str, enrolled: &str) -> Result<Judgment, OracleError> {
        match self {
            Self::Static(oracle) => oracle.judge(captured, enrolled).await,
            Self::Http(oracle) => oracle.judge(captured, enrolled).await,
            Self::Command(oracle) => oracle.judge(captured, enrolled).await,
        }
    }
}
