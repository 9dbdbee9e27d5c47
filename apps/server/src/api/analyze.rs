//! DDR analysis endpoint.
//!
//! `POST /api/v1/reports/analyze` takes one PDF as `multipart/form-data`,
//! runs it through the analysis pipeline and returns the role summaries.

use std::sync::Arc;

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, post, web};
use futures_util::StreamExt;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{AnalyzeQuery, UploadedDocument};
use crate::services::AnalysisService;

/// Accepted file extension (the picker only offers PDFs).
const PDF_EXTENSION: &str = ".pdf";

/// Analyze an uploaded Daily Drilling Report.
#[utoipa::path(
    post,
    path = "/api/v1/reports/analyze",
    tag = "Reports",
    params(
        ("show_raw" = Option<bool>, Query, description = "Include every extracted field")
    ),
    request_body(content_type = "multipart/form-data", description = "One PDF file part"),
    responses(
        (status = 200, description = "Report analyzed", body = crate::models::DdrReport),
        (status = 400, description = "Missing, empty or non-PDF file", body = crate::error::ErrorResponse),
        (status = 413, description = "File exceeds the upload limit", body = crate::error::ErrorResponse),
        (status = 422, description = "Analysis failed or no fields found", body = crate::error::ErrorResponse),
        (status = 502, description = "Submission rejected or service error", body = crate::error::ErrorResponse),
        (status = 503, description = "Too many analyses in progress", body = crate::error::ErrorResponse),
        (status = 504, description = "Analysis did not finish in time", body = crate::error::ErrorResponse)
    )
)]
#[post("/reports/analyze")]
pub async fn analyze_report(
    query: web::Query<AnalyzeQuery>,
    mut payload: Multipart,
    request_id: RequestId,
    service: web::Data<AnalysisService>,
    max_upload_size: web::Data<usize>,
    analysis_semaphore: web::Data<Arc<Semaphore>>,
) -> AppResult<HttpResponse> {
    // Limits analyses in flight, each holds its PDF in memory
    let _permit = analysis_semaphore.try_acquire().map_err(|_| {
        warn!("Analysis rejected: too many analyses in progress");
        AppError::ServiceUnavailable(
            "Too many analyses in progress. Please try again later.".to_string(),
        )
    })?;

    let document = read_pdf_upload(&mut payload, *max_upload_size.get_ref()).await?;

    info!(
        file_name = %document.file_name,
        size = document.bytes.len(),
        show_raw = query.show_raw,
        "Received report upload"
    );

    let report = service
        .analyze(request_id.0, document, query.show_raw)
        .await?;

    Ok(HttpResponse::Ok().json(report))
}

/// Configure analysis routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(analyze_report);
}

/// Read the first file part of the upload into memory.
///
/// Parts without a filename (plain form fields) are skipped.
async fn read_pdf_upload(
    payload: &mut Multipart,
    max_upload_size: usize,
) -> AppResult<UploadedDocument> {
    while let Some(item) = payload.next().await {
        let mut field = item?;

        let filename = match field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
        {
            Some(name) => display_name(name),
            None => {
                drain_field(&mut field).await?;
                continue;
            }
        };

        if !is_pdf_filename(&filename) {
            return Err(AppError::InvalidInput(format!(
                "'{}' is not a PDF file",
                filename
            )));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > max_upload_size {
                return Err(AppError::PayloadTooLarge(format!(
                    "'{}' exceeds the {} byte limit",
                    filename, max_upload_size
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(AppError::InvalidInput(format!("'{}' is empty", filename)));
        }

        return Ok(UploadedDocument {
            file_name: filename,
            bytes,
        });
    }

    Err(AppError::InvalidInput(
        "Missing PDF file. Upload it as a multipart file field.".to_string(),
    ))
}

/// Strip any client-side directory from an uploaded filename.
fn display_name(raw: &str) -> String {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw).to_string()
}

fn is_pdf_filename(filename: &str) -> bool {
    filename.to_lowercase().ends_with(PDF_EXTENSION) && filename.len() > PDF_EXTENSION.len()
}

/// Consume a multipart field without storing it.
async fn drain_field(field: &mut Field) -> AppResult<()> {
    while let Some(chunk) = field.next().await {
        chunk?;
    }
    Ok(())
}
