//! Mock document analysis service for E2E tests.
//!
//! Starts an in-process HTTP server that accepts analyze submissions and
//! replays a scripted sequence of poll responses.

use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

/// What the mock saw on the last submission.
#[derive(Debug, Clone)]
pub struct RecordedSubmit {
    pub model_action: String,
    pub query: String,
    pub content_type: Option<String>,
    pub subscription_key: Option<String>,
    pub body_len: usize,
}

/// Shared state for the mock analysis service.
pub struct MockAnalyzerState {
    pub base_url: String,
    pub submit_status: u16,
    pub omit_operation_location: bool,
    pub poll_http_status: u16,
    pub poll_responses: VecDeque<Value>,
    pub submit_calls: u32,
    pub poll_calls: u32,
    pub poll_keys: Vec<Option<String>>,
    pub last_submit: Option<RecordedSubmit>,
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn submit_endpoint(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
    state: web::Data<Arc<Mutex<MockAnalyzerState>>>,
) -> HttpResponse {
    let mut state = state.lock().unwrap();
    let model_action = path.into_inner();

    state.submit_calls += 1;
    state.last_submit = Some(RecordedSubmit {
        model_action: model_action.clone(),
        query: req.query_string().to_string(),
        content_type: header_value(&req, "content-type"),
        subscription_key: header_value(&req, "ocp-apim-subscription-key"),
        body_len: body.len(),
    });

    if state.submit_status != 202 {
        let status = StatusCode::from_u16(state.submit_status).unwrap();
        return HttpResponse::build(status).json(json!({
            "error": { "code": "Rejected", "message": "Submission rejected by mock" }
        }));
    }

    let model = model_action.trim_end_matches(":analyze");
    let location = format!(
        "{}/formrecognizer/documentModels/{}/analyzeResults/result-{}?api-version=2023-07-31",
        state.base_url, model, state.submit_calls
    );

    let mut response = HttpResponse::Accepted();
    if !state.omit_operation_location {
        response.insert_header(("Operation-Location", location));
    }
    response.finish()
}

async fn poll_endpoint(
    req: HttpRequest,
    state: web::Data<Arc<Mutex<MockAnalyzerState>>>,
) -> HttpResponse {
    let mut state = state.lock().unwrap();
    state.poll_calls += 1;
    let key = header_value(&req, "ocp-apim-subscription-key");
    state.poll_keys.push(key);

    if state.poll_http_status != 200 {
        let status = StatusCode::from_u16(state.poll_http_status).unwrap();
        return HttpResponse::build(status).finish();
    }

    let body = state
        .poll_responses
        .pop_front()
        .unwrap_or_else(|| json!({ "status": "running" }));
    HttpResponse::Ok().json(body)
}

/// Mock analysis service bound to an ephemeral port.
pub struct MockAnalyzer {
    pub base_url: String,
    pub state: Arc<Mutex<MockAnalyzerState>>,
}

impl MockAnalyzer {
    /// Start the mock. Submissions answer 202 and polls replay `poll_responses`.
    pub async fn start(poll_responses: Vec<Value>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = Arc::new(Mutex::new(MockAnalyzerState {
            base_url: base_url.clone(),
            submit_status: 202,
            omit_operation_location: false,
            poll_http_status: 200,
            poll_responses: poll_responses.into(),
            submit_calls: 0,
            poll_calls: 0,
            poll_keys: Vec::new(),
            last_submit: None,
        }));

        let state_data = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(state_data.clone()))
                .route(
                    "/formrecognizer/documentModels/{model_action}",
                    web::post().to(submit_endpoint),
                )
                .route(
                    "/formrecognizer/documentModels/{model}/analyzeResults/{result_id}",
                    web::get().to(poll_endpoint),
                )
        })
        .workers(1)
        .listen(listener)
        .expect("failed to listen")
        .disable_signals()
        .run();

        // Fire and forget - server lives for the process lifetime
        tokio::spawn(server);

        MockAnalyzer { base_url, state }
    }

    pub fn reject_submissions_with(&self, status: u16) {
        self.state.lock().unwrap().submit_status = status;
    }

    pub fn omit_operation_location(&self) {
        self.state.lock().unwrap().omit_operation_location = true;
    }

    pub fn fail_polls_with(&self, status: u16) {
        self.state.lock().unwrap().poll_http_status = status;
    }

    pub fn submit_calls(&self) -> u32 {
        self.state.lock().unwrap().submit_calls
    }

    pub fn poll_calls(&self) -> u32 {
        self.state.lock().unwrap().poll_calls
    }

    pub fn poll_keys(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().poll_keys.clone()
    }

    pub fn last_submit(&self) -> Option<RecordedSubmit> {
        self.state.lock().unwrap().last_submit.clone()
    }
}

/// Poll body for a still-running operation.
pub fn running() -> Value {
    json!({ "status": "running", "createdDateTime": "2024-05-01T10:00:00Z" })
}

/// Poll body for a failed operation.
pub fn failed() -> Value {
    json!({
        "status": "failed",
        "error": { "code": "InvalidContent", "message": "The file is corrupted or format is unsupported." }
    })
}

/// Poll body for a succeeded operation carrying `fields` on the first document.
pub fn succeeded_with_fields(fields: Value) -> Value {
    json!({
        "status": "succeeded",
        "analyzeResult": {
            "apiVersion": "2023-07-31",
            "modelId": "DDR_Sample",
            "documents": [{ "docType": "DDR_Sample", "fields": fields, "confidence": 0.93 }]
        }
    })
}

/// Poll body for a succeeded operation whose document has no field container.
pub fn succeeded_without_fields() -> Value {
    json!({
        "status": "succeeded",
        "analyzeResult": {
            "modelId": "DDR_Sample",
            "documents": [{ "docType": "DDR_Sample" }]
        }
    })
}

/// Field map with every DDR field populated.
pub fn ddr_fields(remarks: &str) -> Value {
    json!({
        "WellName": { "type": "string", "content": "A-12", "confidence": 0.98 },
        "ReportDate": { "type": "string", "content": "2024-05-01", "confidence": 0.97 },
        "CurrentDepth": { "type": "string", "content": "3,450 ft", "confidence": 0.95 },
        "MudWeight": { "type": "string", "content": "9.8 ppg", "confidence": 0.96 },
        "DrillingHours": { "type": "string", "content": "18", "confidence": 0.94 },
        "OperationType": { "type": "string", "content": "Reaming", "confidence": 0.92 },
        "Remarks": { "type": "string", "content": remarks, "confidence": 0.88 }
    })
}
