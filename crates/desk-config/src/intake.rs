//! Photo intake gating.

use serde::{Deserialize, Serialize};

const fn default_max_photo_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_allowed_content_types() -> Vec<String> {
    vec!["image/jpeg".into(), "image/png".into()]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IntakeConfig {
    #[serde(default = "default_max_photo_bytes")]
    pub max_photo_bytes: u64,

    /// Accepted MIME types for captured photos. Compared case-insensitively.
    #[serde(default = "default_allowed_content_types")]
    pub allowed_content_types: Vec<String>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_photo_bytes: default_max_photo_bytes(),
            allowed_content_types: default_allowed_content_types(),
        }
    }
}

impl IntakeConfig {
    #[must_use]
    pub fn allows_content_type(&self, content_type: &str) -> bool {
        self.allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(content_type.trim()))
    }
}
