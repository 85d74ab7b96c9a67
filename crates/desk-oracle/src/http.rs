//! JSON-over-HTTP oracle.

use std::time::Duration;

use serde::Serialize;

use crate::judgment::RawJudgment;
use crate::{Judgment, OracleError, VerificationOracle};

#[derive(Serialize)]
struct JudgeRequest<'a> {
    captured_photo: &'a str,
    enrolled_photo: &'a str,
}

/// Posts `{"captured_photo", "enrolled_photo"}` to an endpoint and reads a
/// judgment from the response body.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpOracle {
    /// # Errors
    ///
    /// Returns [`OracleError::Http`] if the client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, OracleError> {
        let http = reqwest::Client::builder()
            .user_agent("examdesk/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl VerificationOracle for HttpOracle {
    async fn judge(&self, captured: &str, enrolled: &str) -> Result<Judgment, OracleError> {
        let request = JudgeRequest {
            captured_photo: captured,
            enrolled_photo: enrolled,
        };
        let resp = check_response(self.http.post(&self.endpoint).json(&request).send().await?).await?;
        let body = resp.text().await?;
        RawJudgment::parse(&body)?.into_judgment()
    }
}

/// Map a non-success status to [`OracleError::Api`], keeping the body as the
/// message.
pub(crate) async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, OracleError> {
    if !resp.status().is_success() {
        return Err(OracleError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(::http::Response::builder().status(status).body(body).unwrap())
    }

    #[tokio::test]
    async fn check_response_api_error_keeps_body() {
        let err = check_response(mock_response(503, "model warming up"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OracleError::Api { status: 503, ref message } if message == "model warming up"
        ));
    }

    #[tokio::test]
    async fn check_response_success() {
        assert!(check_response(mock_response(200, "{}")).await.is_ok());
    }
}
