/// Database access layer
///
/// This module provides:
/// - Schema set-up for the `posts` and `comments` tables
/// - Repository functions for posts and comments
/// - `ContentStore`, the store handle the pipeline owns
pub mod comment_repo;
pub mod post_repo;

use crate::error::{AppError, Result};
use crate::models::{Comment, Post, PostWithComments, Sentiment};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Idempotent schema statements, safe to run on every startup.
///
/// `AUTOINCREMENT` keeps ids strictly increasing even after the highest row
/// is gone, so "newest first" is "highest id first".
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        topic TEXT NOT NULL CHECK (length(topic) > 0),
        content TEXT NOT NULL CHECK (length(content) > 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        post_id INTEGER NOT NULL REFERENCES posts(id),
        text TEXT NOT NULL CHECK (length(text) > 0),
        sentiment_label TEXT NOT NULL,
        confidence REAL NOT NULL CHECK (confidence >= 0 AND confidence <= 100)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments (post_id, id)",
];

/// Create tables and indexes if they are absent. Existing data is untouched.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// Relational storage for posts and their comments.
///
/// Every method is a single atomic unit against the store. Callers never see
/// a transaction handle.
#[derive(Clone)]
pub struct ContentStore {
    pool: SqlitePool,
}

impl ContentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Wrap a pool and make sure the schema exists
    pub async fn open(pool: SqlitePool) -> Result<Self> {
        ensure_schema(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a new post, returning it with its assigned id
    pub async fn create_post(&self, topic: &str, content: &str) -> Result<Post> {
        let post = post_repo::create_post(&self.pool, topic, content).await?;
        Ok(post)
    }

    /// Insert a sentiment-labeled comment on an existing post.
    ///
    /// Fails with `NotFound` when `post_id` does not reference a post.
    pub async fn create_comment(
        &self,
        post_id: i64,
        text: &str,
        sentiment: &Sentiment,
    ) -> Result<Comment> {
        comment_repo::create_comment_for_existing_post(
            &self.pool,
            post_id,
            text,
            sentiment.label.as_str(),
            sentiment.confidence,
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))
    }

    pub async fn get_post(&self, post_id: i64) -> Result<Option<Post>> {
        let post = post_repo::find_post_by_id(&self.pool, post_id).await?;
        Ok(post)
    }

    pub async fn count_posts(&self) -> Result<i64> {
        Ok(post_repo::count_posts(&self.pool).await?)
    }

    pub async fn count_comments(&self, post_id: i64) -> Result<i64> {
        Ok(comment_repo::count_comments_by_post(&self.pool, post_id).await?)
    }

    /// Posts newest first, each with its comments in creation order.
    ///
    /// Both tables are read inside one transaction so the listing is a
    /// consistent snapshot.
    pub async fn list_posts_with_comments(&self) -> Result<Vec<PostWithComments>> {
        let mut tx = self.pool.begin().await?;
        let posts = post_repo::list_posts_newest_first(&mut *tx).await?;
        let comments = comment_repo::list_all_comments(&mut *tx).await?;
        tx.commit().await?;

        let mut by_post: HashMap<i64, Vec<Comment>> = HashMap::new();
        for comment in comments {
            by_post.entry(comment.post_id).or_default().push(comment);
        }

        Ok(posts
            .into_iter()
            .map(|post| PostWithComments {
                comments: by_post.remove(&post.id).unwrap_or_default(),
                post,
            })
            .collect())
    }
}
