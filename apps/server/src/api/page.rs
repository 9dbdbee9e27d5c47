//! Upload page.

use actix_web::{HttpResponse, get, http::header::ContentType, web};

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Serve the single-page upload form.
#[get("/")]
pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}

/// Configure page routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index);
}
