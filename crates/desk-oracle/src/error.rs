//! Oracle error types.

use thiserror::Error;

/// Ways a single judgment call can fail. The adapter folds all of these into
/// an unavailable verification; nothing here reaches the check-in caller.
#[derive(Debug, Error)]
pub enum OracleError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response could not be read as a judgment.
    #[error("malformed oracle response: {0}")]
    Malformed(String),

    /// The oracle process could not be run or exited unsuccessfully.
    #[error("oracle process failed: {0}")]
    Process(String),

    /// The oracle ran but reported that it could not judge.
    #[error("oracle declined to judge: {0}")]
    Rejected(String),
}
