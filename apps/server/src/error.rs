//! Domain error types for the DDR summary server.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Failures of the submit/poll/extract sequence against the analysis service.
///
/// None of these are retried; each ends the current request.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Submission answered with something other than 202 Accepted
    #[error("Submission failed: {status}")]
    SubmissionRejected { status: u16 },

    /// 202 Accepted without an Operation-Location header
    #[error("Submission accepted without an Operation-Location header")]
    MissingOperationLocation,

    /// A status poll answered with a non-success HTTP status
    #[error("Status poll failed: {status}")]
    PollRejected { status: u16 },

    /// The service reported the operation as failed
    #[error("Analysis failed.{}", .message.as_ref().map(|m| format!(" {}", m)).unwrap_or_default())]
    AnalysisFailed {
        code: Option<String>,
        message: Option<String>,
    },

    /// The service reported a status the poll loop does not recognize
    #[error("Analysis returned unrecognized status '{0}'")]
    UnknownStatus(String),

    /// The poll bound was reached before a terminal status
    #[error("Analysis did not finish after {attempts} status checks")]
    Timeout { attempts: u32 },

    /// The result payload lacks the expected fields container
    #[error("No fields found in the extracted result.")]
    ExtractionFailed(String),

    /// Network or decoding failure talking to the service
    #[error("Analysis service unreachable: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        AnalysisError::Transport(err.to_string())
    }
}

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Uploaded file exceeds the configured limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Capacity exhausted
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Analysis pipeline failed
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            AppError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            AppError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            AppError::Analysis(err) => match err {
                AnalysisError::SubmissionRejected { .. } => {
                    (StatusCode::BAD_GATEWAY, "SUBMISSION_REJECTED")
                }
                AnalysisError::AnalysisFailed { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "ANALYSIS_FAILED")
                }
                AnalysisError::ExtractionFailed(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_FAILED")
                }
                AnalysisError::UnknownStatus(_) => (StatusCode::BAD_GATEWAY, "UNKNOWN_STATUS"),
                AnalysisError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "ANALYSIS_TIMEOUT"),
                AnalysisError::MissingOperationLocation
                | AnalysisError::PollRejected { .. }
                | AnalysisError::Transport(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            },
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, error_code) = self.status_and_code();

        let message = match self {
            AppError::Analysis(AnalysisError::Transport(detail)) => {
                tracing::error!("Analysis transport error: {}", detail);
                "The document analysis service could not be reached".to_string()
            }
            AppError::Analysis(AnalysisError::ExtractionFailed(detail)) => {
                tracing::warn!("Extraction failed: {}", detail);
                self.to_string()
            }
            _ => self.to_string(),
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: error_code.to_string(),
            message,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::InvalidInput(format!("Multipart error: {}", err))
    }
}
