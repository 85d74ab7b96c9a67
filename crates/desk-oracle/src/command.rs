//! Subprocess oracle.
//!
//! Runs `program [args..] <captured> <enrolled>` and reads one JSON judgment
//! from stdout, e.g. `{"success": true, "is_match": true, "confidence_score": 91.2}`.

use tokio::process::Command;

use crate::judgment::RawJudgment;
use crate::{Judgment, OracleError, VerificationOracle};

#[derive(Debug, Clone)]
pub struct CommandOracle {
    program: String,
    args: Vec<String>,
}

impl CommandOracle {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl VerificationOracle for CommandOracle {
    async fn judge(&self, captured: &str, enrolled: &str) -> Result<Judgment, OracleError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(captured)
            .arg(enrolled)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| OracleError::Process(format!("failed to run {}: {e}", self.program)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            // A failing script may still have printed a structured error.
            if let Ok(raw) = RawJudgment::parse(&stdout) {
                raw.into_judgment()?;
            }
            return Err(OracleError::Process(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        RawJudgment::parse(&stdout)?.into_judgment()
    }
}
