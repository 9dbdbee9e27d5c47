//! Shared test helpers for analyzer E2E tests.

use actix_web::http::header;
use actix_web::{App, dev::ServiceResponse, test, web};
use async_trait::async_trait;
use ddr_summary_lib::config::{AnalyzerSettings, Config, Environment};
use ddr_summary_lib::middleware::RequestLogger;
use ddr_summary_lib::services::{
    AnalysisService, DocumentAnalysisClient, PollPolicy, Sleeper, UnknownStatusPolicy,
};
use secrecy::SecretString;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

use super::mock_analyzer::MockAnalyzer;

/// Subscription key used in tests.
pub const TEST_KEY: &str = "test-subscription-key";

/// Upload limit used by the test app.
pub const TEST_MAX_UPLOAD_SIZE: usize = 64 * 1024;

const BOUNDARY: &str = "ddr-test-boundary-7MA4YWxkTrZu0gW";

/// Minimal bytes that look like a PDF.
pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.7\n1 0 obj << /Type /Catalog >> endobj\ntrailer << /Root 1 0 R >>\n%%EOF\n".to_vec()
}

/// Sleeper that records requested delays instead of waiting.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn count(&self) -> usize {
        self.sleeps.lock().unwrap().len()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Analyzer settings pointing at the mock.
pub fn analyzer_settings(mock: &MockAnalyzer) -> AnalyzerSettings {
    AnalyzerSettings {
        endpoint: format!("{}/", mock.base_url),
        api_key: SecretString::from(TEST_KEY.to_string()),
        model_id: "DDR_Sample".to_string(),
        api_version: "2023-07-31".to_string(),
    }
}

/// Poll policy with the given bound and an interval the recording sleeper ignores.
pub fn test_policy(max_attempts: u32) -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(500),
        max_attempts,
        unknown_status: UnknownStatusPolicy::Fail,
    }
}

/// Client for the mock.
pub fn test_client(mock: &MockAnalyzer) -> DocumentAnalysisClient {
    DocumentAnalysisClient::new(&analyzer_settings(mock)).expect("failed to build client")
}

/// Create a test app wired to the mock with the given poll bound.
pub async fn create_test_app(
    mock: &MockAnalyzer,
    max_attempts: u32,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    create_test_app_with_permits(mock, max_attempts, 2).await
}

/// Create a test app with `permits` concurrent analyses allowed.
pub async fn create_test_app_with_permits(
    mock: &MockAnalyzer,
    max_attempts: u32,
    permits: usize,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let policy = test_policy(max_attempts);
    let config = Config {
        environment: Environment::Development,
        host: "127.0.0.1".to_string(),
        port: 0,
        max_upload_size: TEST_MAX_UPLOAD_SIZE,
        max_concurrent_analyses: permits.max(1),
        analyzer: analyzer_settings(mock),
        poll: policy,
    };
    let service = AnalysisService::with_sleeper(
        test_client(mock),
        policy,
        Arc::new(RecordingSleeper::default()),
    );

    test::init_service(
        App::new()
            .wrap(RequestLogger)
            .app_data(web::Data::new(config))
            .app_data(web::Data::new(service))
            .app_data(web::Data::new(TEST_MAX_UPLOAD_SIZE))
            .app_data(web::Data::new(Arc::new(Semaphore::new(permits))))
            .service(
                web::scope("/api/v1")
                    .configure(ddr_summary_lib::api::configure_health_routes)
                    .configure(ddr_summary_lib::api::configure_analyze_routes),
            )
            .configure(ddr_summary_lib::api::configure_page_routes),
    )
    .await
}

/// Build a multipart body with a single file part.
pub fn multipart_body(filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Build a multipart body with only a plain form field.
pub fn multipart_without_file() -> Vec<u8> {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nno file here\r\n--{b}--\r\n",
        b = BOUNDARY
    )
    .into_bytes()
}

/// Build a multipart body whose plain form field is cut off before its boundary.
pub fn multipart_truncated_form_field() -> Vec<u8> {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nno closing boundary",
        b = BOUNDARY
    )
    .into_bytes()
}

/// Analyze request for a multipart body.
pub fn analyze_request(body: Vec<u8>, show_raw: bool) -> actix_http::Request {
    test::TestRequest::post()
        .uri(&format!("/api/v1/reports/analyze?show_raw={}", show_raw))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        ))
        .set_payload(body)
        .to_request()
}

/// POST a multipart body to the analyze endpoint.
pub async fn post_multipart<S>(app: &S, body: Vec<u8>, show_raw: bool) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let resp = test::call_service(app, analyze_request(body, show_raw)).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// Upload a PDF to the analyze endpoint.
pub async fn upload_pdf<S>(app: &S, filename: &str, content: &[u8], show_raw: bool) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    post_multipart(app, multipart_body(filename, content), show_raw).await
}
