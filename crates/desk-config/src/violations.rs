//! Derived violation persistence settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_queue_dir() -> String {
    ".examdesk/queue".into()
}

const fn default_retry_attempts() -> u32 {
    3
}

const fn default_retry_base_delay_ms() -> u64 {
    50
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViolationsConfig {
    /// Directory for the deferred-violation JSONL queue. Empty disables it.
    #[serde(default = "default_queue_dir")]
    pub queue_dir: String,

    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl Default for ViolationsConfig {
    fn default() -> Self {
        Self {
            queue_dir: default_queue_dir(),
            retry_attempts: default_retry_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

impl ViolationsConfig {
    #[must_use]
    pub fn queue_path(&self) -> Option<PathBuf> {
        (!self.queue_dir.is_empty()).then(|| PathBuf::from(&self.queue_dir))
    }
}
