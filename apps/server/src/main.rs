//! DDR Summary Server - Main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use tokio::sync::Semaphore;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use ddr_summary_lib::api::{self, ApiDoc};
use ddr_summary_lib::config::Config;
use ddr_summary_lib::middleware;
use ddr_summary_lib::services::{AnalysisService, DocumentAnalysisClient};

/// Perform health check (for Docker healthcheck).
fn health_check() -> bool {
    // Simple check - just verify we can load config
    Config::from_env().is_ok()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        std::process::exit(if health_check() { 0 } else { 1 });
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, DDR_ANALYZER_ENDPOINT and DDR_ANALYZER_KEY must be set");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  DDR Summary Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
    }

    let client = match DocumentAnalysisClient::new(&config.analyzer) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to initialize document analysis client: {}", e);
            std::process::exit(1);
        }
    };
    let analysis_service = AnalysisService::new(client, config.poll);
    info!(
        "Polling every {}ms, at most {} attempts, unknown status policy: {:?}",
        config.poll.interval.as_millis(),
        config.poll.max_attempts,
        config.poll.unknown_status
    );

    // Prepare shared state
    let bind_address = config.bind_address();
    let max_upload_size = config.max_upload_size;
    let is_development = config.is_development();

    // Bounds memory usage: max_concurrent_analyses x max_upload_size
    let analysis_semaphore = Arc::new(Semaphore::new(config.max_concurrent_analyses));
    info!(
        "Upload limits: {}MB max size, {} concurrent analyses",
        max_upload_size / 1024 / 1024,
        config.max_concurrent_analyses
    );

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    let config = web::Data::new(config);

    // Start HTTP server
    let server = HttpServer::new(move || {
        let cors = if is_development {
            // Permissive CORS for a separately served frontend during development
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        } else {
            // Same-origin only in production
            Cors::default()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
                .max_age(3600)
        };

        App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            .wrap(middleware::RequestLogger)
            .app_data(config.clone())
            .app_data(web::Data::new(analysis_service.clone()))
            .app_data(web::Data::new(max_upload_size))
            .app_data(web::Data::new(analysis_semaphore.clone()))
            // Multipart framing overhead on top of the PDF itself
            .app_data(web::PayloadConfig::new(max_upload_size + 64 * 1024))
            .service(
                web::scope("/api/v1")
                    .configure(api::configure_health_routes)
                    .configure(api::configure_analyze_routes),
            )
            .service(
                SwaggerUi::new("/api/docs/{_:.*}").url("/api/openapi.json", ApiDoc::openapi()),
            )
            .configure(api::configure_page_routes)
    });

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
