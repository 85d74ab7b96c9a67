//! Timeout and failure normalization around an oracle.

use std::fmt;
use std::time::Duration;

use crate::{Judgment, OracleError, VerificationOracle};

/// Why no judgment is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The student has no enrolled reference photo; the oracle was not called.
    NoEnrolledPhoto,
    /// The oracle did not answer within the adapter's timeout.
    Timeout,
    /// Transport, process or service-side failure.
    ServiceError(String),
    /// The oracle answered with something that is not a judgment.
    MalformedResponse(String),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEnrolledPhoto => f.write_str("no enrolled photo on file"),
            Self::Timeout => f.write_str("verification timed out"),
            Self::ServiceError(msg) => write!(f, "verification service error: {msg}"),
            Self::MalformedResponse(msg) => write!(f, "malformed verification response: {msg}"),
        }
    }
}

/// Result of one verification. Never an error: every failure is
/// [`Verification::Unavailable`], which reads as not-a-match with score 0.
#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    Judged(Judgment),
    Unavailable(UnavailableReason),
}

impl Verification {
    #[must_use]
    pub const fn is_match(&self) -> bool {
        match self {
            Self::Judged(j) => j.is_match,
            Self::Unavailable(_) => false,
        }
    }

    #[must_use]
    pub const fn confidence_score(&self) -> f64 {
        match self {
            Self::Judged(j) => j.confidence_score,
            Self::Unavailable(_) => 0.0,
        }
    }

    #[must_use]
    pub const fn unavailable_reason(&self) -> Option<&UnavailableReason> {
        match self {
            Self::Judged(_) => None,
            Self::Unavailable(reason) => Some(reason),
        }
    }
}

/// Wraps an oracle with a bounded timeout and folds every failure into
/// [`Verification::Unavailable`].
#[derive(Debug, Clone)]
pub struct VerificationAdapter<O> {
    oracle: O,
    timeout: Duration,
}

impl<O: VerificationOracle> VerificationAdapter<O> {
    pub const fn new(oracle: O, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    pub const fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Compare a captured photo against the enrolled reference.
    ///
    /// Short-circuits without calling the oracle when `enrolled` is missing or
    /// blank. Scores are clamped to `0..=100`; a non-finite score counts as a
    /// malformed response.
    pub async fn verify(&self, captured: &str, enrolled: Option<&str>) -> Verification {
        let Some(enrolled) = enrolled.map(str::trim).filter(|e| !e.is_empty()) else {
            tracing::warn!("verification: no enrolled photo, skipping oracle");
            return Verification::Unavailable(UnavailableReason::NoEnrolledPhoto);
        };

        let reason = match tokio::time::timeout(self.timeout, self.oracle.judge(captured, enrolled)).await {
            Ok(Ok(judgment)) if judgment.confidence_score.is_finite() => {
                return Verification::Judged(Judgment {
                    is_match: judgment.is_match,
                    confidence_score: judgment.confidence_score.clamp(0.0, 100.0),
                });
            }
            Ok(Ok(judgment)) => UnavailableReason::MalformedResponse(format!(
                "non-finite confidence score {}",
                judgment.confidence_score
            )),
            Ok(Err(OracleError::Malformed(msg))) => UnavailableReason::MalformedResponse(msg),
            Ok(Err(e)) => UnavailableReason::ServiceError(e.to_string()),
            Err(_) => UnavailableReason::Timeout,
        };

        tracing::warn!(
            timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            %reason,
            "verification: oracle unavailable, degrading to no match"
        );
        Verification::Unavailable(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticOracle;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingOracle {
        calls: AtomicUsize,
    }

    impl VerificationOracle for CountingOracle {
        async fn judge(&self, _captured: &str, _enrolled: &str) -> Result<Judgment, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Judgment {
                is_match: true,
                confidence_score: 99.0,
            })
        }
    }

    struct SlowOracle;

    impl VerificationOracle for SlowOracle {
        async fn judge(&self, _captured: &str, _enrolled: &str) -> Result<Judgment, OracleError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Judgment {
                is_match: true,
                confidence_score: 100.0,
            })
        }
    }

    struct FailingOracle(fn() -> OracleError);

    impl VerificationOracle for FailingOracle {
        async fn judge(&self, _captured: &str, _enrolled: &str) -> Result<Judgment, OracleError> {
            Err((self.0)())
        }
    }

    fn adapter<O: VerificationOracle>(oracle: O) -> VerificationAdapter<O> {
        VerificationAdapter::new(oracle, Duration::from_millis(20))
    }

    #[tokio::test]
    async fn missing_enrolled_photo_short_circuits() {
        let adapter = adapter(CountingOracle {
            calls: AtomicUsize::new(0),
        });
        for enrolled in [None, Some(""), Some("   ")] {
            let v = adapter.verify("cap.jpg", enrolled).await;
            assert_eq!(v, Verification::Unavailable(UnavailableReason::NoEnrolledPhoto));
        }
        assert_eq!(adapter.oracle().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn judgment_passes_through() {
        let adapter = adapter(CountingOracle {
            calls: AtomicUsize::new(0),
        });
        let v = adapter.verify("cap.jpg", Some("ref.jpg")).await;
        assert!(v.is_match());
        assert!((v.confidence_score() - 99.0).abs() < f64::EPSILON);
        assert_eq!(adapter.oracle().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn timeout_is_unavailable() {
        let v = adapter(SlowOracle).verify("cap.jpg", Some("ref.jpg")).await;
        assert_eq!(v, Verification::Unavailable(UnavailableReason::Timeout));
        assert!(!v.is_match());
        assert!(v.confidence_score().abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn service_failures_are_unavailable() {
        let v = adapter(FailingOracle(|| OracleError::Process("boom".into())))
            .verify("cap.jpg", Some("ref.jpg"))
            .await;
        assert!(matches!(
            v,
            Verification::Unavailable(UnavailableReason::ServiceError(ref m)) if m.contains("boom")
        ));

        let v = adapter(FailingOracle(|| OracleError::Malformed("not json".into())))
            .verify("cap.jpg", Some("ref.jpg"))
            .await;
        assert_eq!(
            v,
            Verification::Unavailable(UnavailableReason::MalformedResponse("not json".into()))
        );
    }

    #[tokio::test]
    async fn scores_are_clamped_and_nan_is_malformed() {
        let v = adapter(StaticOracle::new(true, 140.0))
            .verify("cap.jpg", Some("ref.jpg"))
            .await;
        assert!((v.confidence_score() - 100.0).abs() < f64::EPSILON);

        let v = adapter(StaticOracle::new(false, -3.0))
            .verify("cap.jpg", Some("ref.jpg"))
            .await;
        assert!(v.confidence_score().abs() < f64::EPSILON);

        let v = adapter(StaticOracle::new(true, f64::NAN))
            .verify("cap.jpg", Some("ref.jpg"))
            .await;
        assert!(matches!(
            v,
            Verification::Unavailable(UnavailableReason::MalformedResponse(_))
        ));
        assert!(!v.is_match());
    }
}
