use std::time::Duration;

use anyhow::Context;
use desk_config::DeskConfig;
use desk_db::service::DeskService;
use desk_oracle::{ConfiguredOracle, VerificationAdapter};

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
///
/// Holds the acting identity for the whole invocation; nothing below the
/// CLI keeps session state.
pub struct AppContext {
    pub service: DeskService,
    pub verifier: VerificationAdapter<ConfiguredOracle>,
    pub config: DeskConfig,
    actor: String,
}

impl AppContext {
    pub async fn init(config: DeskConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let service = DeskService::new_local(&config)
            .await
            .with_context(|| format!("failed to open store at {}", config.database.path))?;

        let oracle = ConfiguredOracle::from_config(&config.oracle)
            .context("failed to build verification oracle")?;
        let verifier = VerificationAdapter::new(oracle, Duration::from_millis(config.oracle.timeout_ms));

        let actor = flags
            .actor
            .clone()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| config.general.actor.clone());

        Ok(Self {
            service,
            verifier,
            config,
            actor,
        })
    }

    /// The actor recorded on mutations. Fails when neither `--actor` nor
    /// `general.actor` is set.
    pub fn actor(&self) -> anyhow::Result<&str> {
        let actor = self.actor.trim();
        if actor.is_empty() {
            anyhow::bail!("no actor: pass --actor or set general.actor");
        }
        Ok(actor)
    }
}
