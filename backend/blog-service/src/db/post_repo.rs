use crate::models::Post;
use sqlx::{Executor, Sqlite, SqlitePool};

/// Insert a new post and return it with its assigned id
pub async fn create_post(pool: &SqlitePool, topic: &str, content: &str) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (topic, content)
        VALUES (?1, ?2)
        RETURNING id, topic, content
        "#,
    )
    .bind(topic)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID
pub async fn find_post_by_id(pool: &SqlitePool, post_id: i64) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, topic, content
        FROM posts
        WHERE id = ?1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// All posts, newest (highest id) first
pub async fn list_posts_newest_first<'e, E>(executor: E) -> Result<Vec<Post>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, topic, content
        FROM posts
        ORDER BY id DESC
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(posts)
}

/// Count all posts
pub async fn count_posts(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
