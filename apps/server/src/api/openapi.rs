//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "DDR Summary Server",
        version = "0.1.0",
        description = "Upload Daily Drilling Reports (PDF) for AI field extraction and role-based summaries"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::info,
        // Analysis endpoints
        api::analyze::analyze_report,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ServerInfoResponse,
            // Reports
            models::DdrReport,
            models::RoleSummaries,
            models::EngineerSummary,
            models::SupervisorSummary,
            models::AnalystSummary,
            models::AnalyzeQuery,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Reports", description = "DDR analysis and summaries")
    )
)]
pub struct ApiDoc;
