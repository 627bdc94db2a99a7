/// Comment handlers - HTTP endpoints for comment submission
use crate::error::Result;
use crate::handlers::ErrorResponse;
use crate::services::PipelineService;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    /// Comment text
    #[serde(default, alias = "comentario")]
    pub comment: String,
    /// Post the comment belongs to
    #[serde(default)]
    pub post_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    /// Negative, Neutral, Positive, or the raw model label when unmapped
    pub sentiment: String,
    /// Classifier confidence as a percentage
    pub confidence: f64,
}

/// Classify a comment and store it under its post
#[utoipa::path(
    post,
    path = "/comment",
    tag = "comments",
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment classified and stored", body = CommentResponse),
        (status = 400, description = "Missing or empty fields", body = ErrorResponse),
        (status = 404, description = "Post does not exist", body = ErrorResponse),
        (status = 503, description = "Sentiment model unavailable", body = ErrorResponse),
    )
)]
pub async fn submit_comment(
    pipeline: web::Data<PipelineService>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    let comment = pipeline.submit_comment(req.post_id, &req.comment).await?;

    Ok(HttpResponse::Ok().json(CommentResponse {
        sentiment: comment.sentiment_label.to_string(),
        confidence: comment.confidence,
    }))
}
