/// Post handlers - HTTP endpoints for post generation
use crate::error::Result;
use crate::handlers::ErrorResponse;
use crate::services::PipelineService;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct GeneratePostRequest {
    /// Subject of the post
    #[serde(default, alias = "tema")]
    pub topic: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GeneratePostResponse {
    /// Generated post content
    pub post: String,
}

/// Generate a post for a topic and store it
#[utoipa::path(
    post,
    path = "/generate-post",
    tag = "posts",
    request_body = GeneratePostRequest,
    responses(
        (status = 200, description = "Post generated and stored", body = GeneratePostResponse),
        (status = 400, description = "Empty topic", body = ErrorResponse),
        (status = 502, description = "Generation endpoint failed", body = ErrorResponse),
    )
)]
pub async fn generate_post(
    pipeline: web::Data<PipelineService>,
    req: web::Json<GeneratePostRequest>,
) -> Result<HttpResponse> {
    let post = pipeline.generate_post(&req.topic).await?;

    Ok(HttpResponse::Ok().json(GeneratePostResponse { post: post.content }))
}
