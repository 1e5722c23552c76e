//! Diagnose endpoint client.

use crate::config::ClientConfig;
use crate::wire::{DiagnoseRequest, DiagnosisResult};
use crate::{DiagError, DiagResult, DiagnoseFailure};
use async_trait::async_trait;
use std::time::Duration;

/// Anything that can turn a diagnose request into a diagnosis.
///
/// The form controller and the REST gateway only talk to the endpoint through this trait, so
/// tests can substitute an in-memory implementation.
#[async_trait]
pub trait DiagnoseClient: Send + Sync {
    async fn diagnose(&self, request: &DiagnoseRequest) -> Result<DiagnosisResult, DiagnoseFailure>;
}

/// HTTP client for the external `/api/diagnose` endpoint.
#[derive(Clone, Debug)]
pub struct HttpDiagnoseClient {
    client: reqwest::Client,
    diagnose_url: String,
    timeout: Duration,
}

impl HttpDiagnoseClient {
    pub fn new(config: &ClientConfig) -> DiagResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(DiagError::HttpClient)?;

        Ok(Self {
            client,
            diagnose_url: config.diagnose_url().to_string(),
            timeout: config.timeout(),
        })
    }

    pub fn diagnose_url(&self) -> &str {
        &self.diagnose_url
    }
}

#[async_trait]
impl DiagnoseClient for HttpDiagnoseClient {
    async fn diagnose(&self, request: &DiagnoseRequest) -> Result<DiagnosisResult, DiagnoseFailure> {
        tracing::debug!(
            url = %self.diagnose_url,
            diagnostic_type = %request.diagnostic_type,
            "sending diagnose request"
        );

        let response = self
            .client
            .post(&self.diagnose_url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_failure(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_failure(e))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "diagnose endpoint returned an error");
            return Err(DiagnoseFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| DiagnoseFailure::Decode(e.to_string()))
    }
}

impl HttpDiagnoseClient {
    fn transport_failure(&self, error: reqwest::Error) -> DiagnoseFailure {
        if error.is_timeout() {
            DiagnoseFailure::Timeout(self.timeout)
        } else if error.is_connect() {
            DiagnoseFailure::Transport(format!("cannot connect to {}", self.diagnose_url))
        } else {
            DiagnoseFailure::Transport(error.to_string())
        }
    }
}
