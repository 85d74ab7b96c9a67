//! Oracle that always returns the same judgment.

use crate::{Judgment, OracleError, VerificationOracle};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticOracle {
    judgment: Judgment,
}

impl StaticOracle {
    #[must_use]
    pub const fn new(is_match: bool, confidence_score: f64) -> Self {
        Self {
            judgment: Judgment {
                is_match,
                confidence_score,
            },
        }
    }

    #[must_use]
    pub const fn matching() -> Self {
        Self::new(true, 100.0)
    }
}

impl VerificationOracle for StaticOracle {
    async fn judge(&self, _captured: &str, _enrolled: &str) -> Result<Judgment, OracleError> {
        Ok(self.judgment)
    }
}
