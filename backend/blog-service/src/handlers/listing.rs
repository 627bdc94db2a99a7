/// Listing handler - every post with its comments
use crate::error::Result;
use crate::models::PostWithComments;
use crate::services::PipelineService;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentView {
    pub id: i64,
    pub text: String,
    pub sentiment: String,
    pub confidence: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PostView {
    pub id: i64,
    pub topic: String,
    pub content: String,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListingResponse {
    /// Newest post first
    pub posts: Vec<PostView>,
}

impl From<PostWithComments> for PostView {
    fn from(entry: PostWithComments) -> Self {
        Self {
            id: entry.post.id,
            topic: entry.post.topic,
            content: entry.post.content,
            comments: entry
                .comments
                .into_iter()
                .map(|c| CommentView {
                    id: c.id,
                    text: c.text,
                    sentiment: c.sentiment_label.to_string(),
                    confidence: c.confidence,
                })
                .collect(),
        }
    }
}

/// List all posts, newest first, each with its comments in creation order
#[utoipa::path(
    get,
    path = "/",
    tag = "posts",
    responses((status = 200, description = "All posts with comments", body = ListingResponse))
)]
pub async fn list_posts(pipeline: web::Data<PipelineService>) -> Result<HttpResponse> {
    let posts = pipeline.list_posts().await?;

    Ok(HttpResponse::Ok().json(ListingResponse {
        posts: posts.into_iter().map(PostView::from).collect(),
    }))
}
