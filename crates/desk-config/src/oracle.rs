//! Face verification oracle configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Which oracle implementation to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleKind {
    /// Fixed judgment, for demos and tests.
    #[default]
    Static,
    /// JSON over HTTP.
    Http,
    /// External program printing a JSON judgment on stdout.
    Command,
}

const fn default_timeout_ms() -> u64 {
    5_000
}

const fn default_static_confidence() -> f64 {
    100.0
}

const fn default_static_match() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleConfig {
    #[serde(default)]
    pub kind: OracleKind,

    /// URL the `http` oracle posts to.
    #[serde(default)]
    pub endpoint: String,

    /// Executable for the `command` oracle.
    #[serde(default)]
    pub program: String,

    /// Leading arguments for the `command` oracle; the captured and enrolled
    /// photo references are appended.
    #[serde(default)]
    pub args: Vec<String>,

    /// Upper bound on a single judgment, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_static_match")]
    pub static_match: bool,

    #[serde(default = "default_static_confidence")]
    pub static_confidence: f64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            kind: OracleKind::default(),
            endpoint: String::new(),
            program: String::new(),
            args: Vec::new(),
            timeout_ms: default_timeout_ms(),
            static_match: default_static_match(),
            static_confidence: default_static_confidence(),
        }
    }
}

impl OracleConfig {
    /// Whether the selected oracle has what it needs to run.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        match self.kind {
            OracleKind::Static => true,
            OracleKind::Http => !self.endpoint.is_empty(),
            OracleKind::Command => !self.program.is_empty(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "oracle.timeout_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if !(0.0..=100.0).contains(&self.static_confidence) {
            return Err(ConfigError::InvalidValue {
                field: "oracle.static_confidence".into(),
                reason: format!("{} is outside 0..=100", self.static_confidence),
            });
        }
        match self.kind {
            OracleKind::Http if self.endpoint.is_empty() => Err(ConfigError::InvalidValue {
                field: "oracle.endpoint".into(),
                reason: "required when oracle.kind = \"http\"".into(),
            }),
            OracleKind::Command if self.program.is_empty() => Err(ConfigError::InvalidValue {
                field: "oracle.program".into(),
                reason: "required when oracle.kind = \"command\"".into(),
            }),
            _ => Ok(()),
        }
    }
}
