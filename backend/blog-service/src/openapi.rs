/// OpenAPI documentation for Blog Service
use crate::handlers;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blog Service API",
        version = "1.0.0",
        description = "Generates short posts from a topic with a hosted language model and stores reader comments labeled with sentiment by a local multilingual classifier.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Development server"),
    ),
    paths(
        handlers::posts::generate_post,
        handlers::comments::submit_comment,
        handlers::listing::list_posts,
    ),
    tags(
        (name = "posts", description = "Post generation and listing"),
        (name = "comments", description = "Sentiment-labeled comments on posts"),
    ),
)]
pub struct ApiDoc;

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}
