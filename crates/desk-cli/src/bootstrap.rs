use anyhow::Context;
use desk_config::DeskConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, then the layered config, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<DeskConfig> {
    if let Err(error) = dotenvy::dotenv()
        && !error.not_found()
    {
        return Err(anyhow::anyhow!("failed to load .env: {error}"));
    }

    let mut config = DeskConfig::load().context("failed to load examdesk configuration")?;
    if let Some(db) = &flags.db {
        config.database.path.clone_from(db);
        config.validate()?;
    }
    Ok(config)
}
