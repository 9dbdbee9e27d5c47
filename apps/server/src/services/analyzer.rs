//! Document analysis service client.
//!
//! Implements the two calls of the asynchronous analyze contract:
//! - `POST {endpoint}/formrecognizer/documentModels/{model}:analyze` submits the PDF
//!   and answers 202 with an `Operation-Location` header
//! - `GET {operation-location}` reports the operation status and, once
//!   succeeded, the `analyzeResult` payload
//!
//! The subscription key is sent on both calls and never logged.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::config::{AnalyzerSettings, OPERATION_LOCATION_HEADER, SUBSCRIPTION_KEY_HEADER};
use crate::error::AnalysisError;
use crate::models::{AnalyzeOperation, OperationLocation};
use crate::services::poller::OperationStatusSource;

/// HTTP connect timeout for analysis service calls.
const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP total timeout per call (covers the PDF upload).
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Client for the document analysis REST API.
#[derive(Clone)]
pub struct DocumentAnalysisClient {
    analyze_url: String,
    api_key: SecretString,
    http_client: reqwest::Client,
}

impl DocumentAnalysisClient {
    /// Create a client from settings.
    pub fn new(settings: &AnalyzerSettings) -> Result<Self, AnalysisError> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()?;

        let analyze_url = build_analyze_url(settings);

        info!(
            "Document analysis client initialized (model={}, api_version={}, endpoint={})",
            settings.model_id,
            settings.api_version,
            settings.endpoint.trim_end_matches('/')
        );

        Ok(Self {
            analyze_url,
            api_key: settings.api_key.clone(),
            http_client,
        })
    }

    /// Full submission URL including model and API version.
    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }

    /// Submit PDF bytes for analysis.
    ///
    /// Anything other than 202 Accepted is a rejection; no retry is made.
    pub async fn submit(&self, pdf: Vec<u8>) -> Result<OperationLocation, AnalysisError> {
        let size = pdf.len();
        let response = self
            .http_client
            .post(&self.analyze_url)
            .header(CONTENT_TYPE, PDF_CONTENT_TYPE)
            .header(SUBSCRIPTION_KEY_HEADER, self.api_key.expose_secret())
            .body(pdf)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::ACCEPTED {
            warn!("Analysis submission rejected with status {}", status);
            return Err(AnalysisError::SubmissionRejected {
                status: status.as_u16(),
            });
        }

        let location = response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or(AnalysisError::MissingOperationLocation)?;

        debug!("Submitted {} bytes, operation at {}", size, location);
        Ok(OperationLocation::new(location))
    }
}

#[async_trait]
impl OperationStatusSource for DocumentAnalysisClient {
    async fn fetch_status(
        &self,
        operation: &OperationLocation,
    ) -> Result<AnalyzeOperation, AnalysisError> {
        let response = self
            .http_client
            .get(operation.as_str())
            .header(SUBSCRIPTION_KEY_HEADER, self.api_key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Status poll for {} returned {}", operation, status);
            return Err(AnalysisError::PollRejected {
                status: status.as_u16(),
            });
        }

        response
            .json::<AnalyzeOperation>()
            .await
            .map_err(|e| AnalysisError::Transport(format!("Failed to parse status response: {}", e)))
    }
}

/// Build the analyze URL from the endpoint, model id and API version.
fn build_analyze_url(settings: &AnalyzerSettings) -> String {
    format!(
        "{}/formrecognizer/documentModels/{}:analyze?api-version={}",
        settings.endpoint.trim_end_matches('/'),
        urlencoding::encode(&settings.model_id),
        urlencoding::encode(&settings.api_version),
    )
}
