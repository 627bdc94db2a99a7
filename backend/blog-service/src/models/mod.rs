/// Data models for blog-service
///
/// - Post: generated article keyed by a user-supplied topic
/// - Comment: reader text attached to a post, annotated with sentiment
/// - Sentiment: label and confidence produced by the classifier
mod sentiment;

pub use sentiment::{Sentiment, SentimentLabel};

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub topic: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub text: String,
    #[sqlx(try_from = "String")]
    pub sentiment_label: SentimentLabel,
    pub confidence: f64,
}

/// A post together with all of its comments, oldest comment first
#[derive(Debug, Clone, PartialEq)]
pub struct PostWithComments {
    pub post: Post,
    pub comments: Vec<Comment>,
}
