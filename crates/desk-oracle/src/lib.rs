//! # desk-oracle
//!
//! Clients for the external face verification service and the adapter that
//! makes them safe to call from the check-in workflow.
//!
//! An oracle answers one question: do these two photos show the same person?
//! It may be slow, down, or return garbage. [`VerificationAdapter`] bounds the
//! call with a timeout and turns every failure, including a missing enrolled
//! photo, into [`Verification::Unavailable`].
//!
//! Implementations:
//! - [`HttpOracle`]: JSON POST to a verification endpoint
//! - [`CommandOracle`]: external program printing a JSON judgment
//! - [`StaticOracle`]: fixed answer
//! - [`ConfiguredOracle`]: whichever of the above `oracle.kind` selects

mod adapter;
mod command;
mod configured;
mod error;
mod fixed;
mod http;
mod judgment;

use std::future::Future;

pub use adapter::{UnavailableReason, Verification, VerificationAdapter};
pub use command::CommandOracle;
pub use configured::ConfiguredOracle;
pub use error::OracleError;
pub use fixed::StaticOracle;
pub use http::HttpOracle;

/// A face-match judgment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Judgment {
    pub is_match: bool,
    /// Similarity in `0..=100`.
    pub confidence_score: f64,
}

/// External face verification service.
pub trait VerificationOracle: Send + Sync {
    /// Compare a freshly captured photo with the enrolled reference.
    fn judge(
        &self,
        captured: &str,
        enrolled: &str,
    ) -> impl Future<Output = Result<Judgment, OracleError>> + Send;
}
