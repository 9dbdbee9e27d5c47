//! API endpoint modules.

pub mod analyze;
pub mod health;
pub mod openapi;
pub mod page;

pub use analyze::configure_routes as configure_analyze_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use page::configure_routes as configure_page_routes;
