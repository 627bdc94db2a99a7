use crate::models::Comment;
use sqlx::{Executor, Sqlite, SqlitePool};

/// Insert a comment only if its post exists.
///
/// The existence check and the insert are one statement, so a comment can
/// never be written against a missing post. Returns `None` when the post does
/// not exist.
pub async fn create_comment_for_existing_post(
    pool: &SqlitePool,
    post_id: i64,
    text: &str,
    sentiment_label: &str,
    confidence: f64,
) -> Result<Option<Comment>, sqlx::Error> {
    let comment = sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (post_id, text, sentiment_label, confidence)
        SELECT ?1, ?2, ?3, ?4
        WHERE EXISTS (SELECT 1 FROM posts WHERE id = ?1)
        RETURNING id, post_id, text, sentiment_label, confidence
        "#,
    )
    .bind(post_id)
    .bind(text)
    .bind(sentiment_label)
    .bind(confidence)
    .fetch_optional(pool)
    .await?;

    Ok(comment)
}

/// Get all comments for a post in insertion order
pub async fn get_comments_by_post(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Vec<Comment>, sqlx::Error> {
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, text, sentiment_label, confidence
        FROM comments
        WHERE post_id = ?1
        ORDER BY id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}

/// Every comment, grouped by post and in insertion order within a post
pub async fn list_all_comments<'e, E>(executor: E) -> Result<Vec<Comment>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, post_id, text, sentiment_label, confidence
        FROM comments
        ORDER BY post_id, id ASC
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(comments)
}

/// Count comments for a post
pub async fn count_comments_by_post(pool: &SqlitePool, post_id: i64) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE post_id = ?1")
        .bind(post_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}
