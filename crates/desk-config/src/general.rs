//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit.
const fn default_limit() -> u32 {
    50
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Actor id recorded on mutations when `--actor` is not given.
    #[serde(default)]
    pub actor: String,

    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            actor: String::new(),
            default_limit: default_limit(),
        }
    }
}
