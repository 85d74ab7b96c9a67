//! Wire shape shared by the HTTP and command oracles.

use serde::Deserialize;
use serde_json::Value;

use crate::{Judgment, OracleError};

/// Body an oracle returns: `{"is_match": bool, "confidence_score": number}`,
/// optionally with `success` and `error`. Scores may arrive as numeric
/// strings.
#[derive(Debug, Deserialize)]
pub(crate) struct RawJudgment {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    is_match: Option<bool>,
    #[serde(default)]
    confidence_score: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl RawJudgment {
    pub(crate) fn parse(body: &str) -> Result<Self, OracleError> {
        serde_json::from_str(body.trim()).map_err(|e| OracleError::Malformed(e.to_string()))
    }

    pub(crate) fn into_judgment(self) -> Result<Judgment, OracleError> {
        if self.success == Some(false) {
            return Err(OracleError::Rejected(
                self.error.unwrap_or_else(|| "oracle reported failure".into()),
            ));
        }
        let is_match = self
            .is_match
            .ok_or_else(|| OracleError::Malformed("missing is_match".into()))?;
        let confidence_score = match self.confidence_score {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| OracleError::Malformed("missing or non-numeric confidence_score".into()))?;

        Ok(Judgment {
            is_match,
            confidence_score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_plain_judgment() {
        let j = RawJudgment::parse(r#"{"is_match": true, "confidence_score": 87.5}"#)
            .unwrap()
            .into_judgment()
            .unwrap();
        assert_eq!(
            j,
            Judgment {
                is_match: true,
                confidence_score: 87.5
            }
        );
    }

    #[test]
    fn accepts_string_scores() {
        let j = RawJudgment::parse(r#"{"success": true, "is_match": false, "confidence_score": "42"}"#)
            .unwrap()
            .into_judgment()
            .unwrap();
        assert!(!j.is_match);
        assert!((j.confidence_score - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn success_false_is_rejected_with_message() {
        let err = RawJudgment::parse(r#"{"success": false, "error": "no face found"}"#)
            .unwrap()
            .into_judgment()
            .unwrap_err();
        assert!(matches!(err, OracleError::Rejected(ref m) if m == "no face found"));
    }

    #[test]
    fn missing_fields_are_malformed() {
        let err = RawJudgment::parse(r#"{"confidence_score": 10}"#)
            .unwrap()
            .into_judgment()
            .unwrap_err();
        assert!(matches!(err, OracleError::Malformed(_)));

        let err = RawJudgment::parse(r#"{"is_match": true, "confidence_score": "high"}"#)
            .unwrap()
            .into_judgment()
            .unwrap_err();
        assert!(matches!(err, OracleError::Malformed(_)));
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(matches!(
            RawJudgment::parse("Traceback (most recent call last)"),
            Err(OracleError::Malformed(_))
        ));
    }
}
