/// HTTP handlers for blog-service
///
/// - Posts: generate a post from a topic
/// - Comments: classify and store a comment
/// - Listing: every post with its comments
/// - Health: liveness and readiness probes
pub mod comments;
pub mod health;
pub mod listing;
pub mod posts;

use crate::error::AppError;
use crate::services::{EMPTY_TOPIC, INVALID_COMMENT};
use actix_web::web;
use serde::Serialize;
use utoipa::ToSchema;

pub use comments::submit_comment;
pub use listing::list_posts;
pub use posts::generate_post;

/// Error payload returned by every failing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

/// JSON extractor settings that turn unreadable bodies into `InvalidInput`
fn json_config(message: &'static str) -> web::JsonConfig {
    web::JsonConfig::default().error_handler(move |err, _req| {
        tracing::debug!(error = %err, "Rejected request body");
        AppError::InvalidInput(message.to_string()).into()
    })
}

/// Register the pipeline routes.
///
/// Expects `web::Data<PipelineService>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(list_posts))
        .service(
            web::resource("/generate-post")
                .app_data(json_config(EMPTY_TOPIC))
                .route(web::post().to(generate_post)),
        )
        .service(
            web::resource("/comment")
                .app_data(json_config(INVALID_COMMENT))
                .route(web::post().to(submit_comment)),
        );
}

/// Register the health probes under `/api/v1/health`
pub fn configure_health(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/health")
            .route("", web::get().to(health::health_summary))
            .route("/ready", web::get().to(health::readiness_summary))
            .route("/live", web::get().to(health::liveness_check)),
    );
}
