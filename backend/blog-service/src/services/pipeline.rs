/// Generation and classification pipeline.
///
/// Two independent single-pass flows share nothing but the store:
/// - generate-post: validate topic, generate text, persist post
/// - comment: validate text and post id, classify, persist comment
///
/// Validation happens before any inference call, and persistence only after
/// the inference call succeeded, so a failed call never leaves a record.
use crate::db::ContentStore;
use crate::error::{AppError, GenerationError, Result};
use crate::metrics::pipeline::{
    COMMENTS_CLASSIFIED_TOTAL, INFERENCE_DURATION_SECONDS, INFERENCE_FAILURES_TOTAL,
    POSTS_GENERATED_TOTAL,
};
use crate::models::{Comment, Post, PostWithComments, SentimentLabel};
use crate::providers::{SentimentClassifier, TextGenerator};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// User-facing message for an empty topic
pub const EMPTY_TOPIC: &str = "empty topic";
/// User-facing message for a comment with missing fields
pub const INVALID_COMMENT: &str = "invalid data";

pub struct PipelineService {
    generator: Arc<dyn TextGenerator>,
    classifier: Arc<dyn SentimentClassifier>,
    store: ContentStore,
}

impl PipelineService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        classifier: Arc<dyn SentimentClassifier>,
        store: ContentStore,
    ) -> Self {
        Self {
            generator,
            classifier,
            store,
        }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    /// Generate a post for `topic` and store it.
    pub async fn generate_post(&self, topic: &str) -> Result<Post> {
        let topic = topic.trim();
        if topic.is_empty() {
            POSTS_GENERATED_TOTAL
                .with_label_values(&["invalid_input"])
                .inc();
            return Err(AppError::InvalidInput(EMPTY_TOPIC.to_string()));
        }

        let start = Instant::now();
        let generated = self.generator.generate(topic).await;
        INFERENCE_DURATION_SECONDS
            .with_label_values(&["generation"])
            .observe(start.elapsed().as_secs_f64());

        let content = generated
            .and_then(|content| {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    Err(GenerationError::MalformedResponse(
                        "generated content is empty".to_string(),
                    ))
                } else {
                    Ok(trimmed.to_string())
                }
            })
            .map_err(|err| {
                POSTS_GENERATED_TOTAL
                    .with_label_values(&["generation_failed"])
                    .inc();
                INFERENCE_FAILURES_TOTAL
                    .with_label_values(&["generation", err.kind()])
                    .inc();
                warn!(topic = %topic, error = %err, "Post generation failed");
                AppError::from(err)
            })?;

        let post = self
            .store
            .create_post(topic, &content)
            .await
            .inspect_err(|_| {
                POSTS_GENERATED_TOTAL
                    .with_label_values(&["store_failed"])
                    .inc();
            })?;

        POSTS_GENERATED_TOTAL.with_label_values(&["created"]).inc();
        info!(
            post_id = post.id,
            topic = %post.topic,
            latency_ms = start.elapsed().as_millis() as u64,
            "Post generated"
        );

        Ok(post)
    }

    /// Classify a comment and store it under `post_id`.
    ///
    /// A missing or non-positive `post_id` counts as missing data. An id that
    /// does not reference a post fails with `NotFound` before the classifier
    /// is called; the guarded insert repeats the check atomically.
    pub async fn submit_comment(&self, post_id: Option<i64>, text: &str) -> Result<Comment> {
        let text = text.trim();
        let post_id = match post_id {
            Some(id) if id > 0 && !text.is_empty() => id,
            _ => return Err(AppError::InvalidInput(INVALID_COMMENT.to_string())),
        };

        if self.store.get_post(post_id).await?.is_none() {
            return Err(AppError::NotFound(format!("post {}", post_id)));
        }

        let start = Instant::now();
        let classified = self.classifier.classify(text).await;
        INFERENCE_DURATION_SECONDS
            .with_label_values(&["classification"])
            .observe(start.elapsed().as_secs_f64());

        let sentiment = classified.inspect_err(|err| {
            INFERENCE_FAILURES_TOTAL
                .with_label_values(&["classification", "unavailable"])
                .inc();
            warn!(post_id, error = %err, "Comment classification failed");
        })?;

        let comment = self.store.create_comment(post_id, text, &sentiment).await?;

        let metric_label = match &comment.sentiment_label {
            SentimentLabel::Other(_) => "other",
            label => label.as_str(),
        };
        COMMENTS_CLASSIFIED_TOTAL
            .with_label_values(&[metric_label])
            .inc();
        info!(
            post_id,
            comment_id = comment.id,
            sentiment = %comment.sentiment_label,
            confidence = comment.confidence,
            "Comment classified"
        );

        Ok(comment)
    }

    /// Read view: posts newest first with their comments
    pub async fn list_posts(&self) -> Result<Vec<PostWithComments>> {
        self.store.list_posts_with_comments().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;
    use crate::providers::{MockSentimentClassifier, MockTextGenerator};
    use db_pool::{create_pool, DbConfig};
    use mockall::predicate::eq;

    async fn temp_store() -> (tempfile::TempDir, ContentStore) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_pool(DbConfig::for_path("pipeline-test", dir.path().join("blog.db")))
            .await
            .unwrap();
        (dir, ContentStore::open(pool).await.unwrap())
    }

    fn service(
        generator: MockTextGenerator,
        classifier: MockSentimentClassifier,
        store: ContentStore,
    ) -> PipelineService {
        PipelineService::new(Arc::new(generator), Arc::new(classifier), store)
    }

    #[tokio::test]
    async fn test_empty_topic_never_calls_generator() {
        let (_dir, store) = temp_store().await;
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().times(0);

        let pipeline = service(generator, MockSentimentClassifier::new(), store.clone());

        for topic in ["", "   "] {
            let err = pipeline.generate_post(topic).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(ref m) if m == EMPTY_TOPIC));
        }
        assert_eq!(store.count_posts().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_generated_post_is_persisted_once() {
        let (_dir, store) = temp_store().await;
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .with(eq("cats"))
            .times(1)
            .returning(|_| Ok("Cats are great.".to_string()));

        let pipeline = service(generator, MockSentimentClassifier::new(), store.clone());
        let post = pipeline.generate_post("cats").await.unwrap();

        assert_eq!(post.topic, "cats");
        assert_eq!(post.content, "Cats are great.");
        assert_eq!(store.count_posts().await.unwrap(), 1);
        assert_eq!(store.get_post(post.id).await.unwrap(), Some(post));
    }

    #[tokio::test]
    async fn test_generation_failure_creates_no_post() {
        let (_dir, store) = temp_store().await;
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().times(1).returning(|_| {
            Err(GenerationError::UpstreamStatus {
                status: 500,
                body: "boom".into(),
            })
        });

        let pipeline = service(generator, MockSentimentClassifier::new(), store.clone());
        let err = pipeline.generate_post("cats").await.unwrap_err();

        assert!(matches!(err, AppError::Generation(_)));
        assert_eq!(store.count_posts().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_blank_generation_is_rejected() {
        let (_dir, store) = temp_store().await;
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok("  \n ".to_string()));

        let pipeline = service(generator, MockSentimentClassifier::new(), store.clone());
        let err = pipeline.generate_post("cats").await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Generation(GenerationError::MalformedResponse(_))
        ));
        assert_eq!(store.count_posts().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_comment_never_calls_classifier() {
        let (_dir, store) = temp_store().await;
        let post = store.create_post("cats", "Cats are great.").await.unwrap();
        let mut classifier = MockSentimentClassifier::new();
        classifier.expect_classify().times(0);

        let pipeline = service(MockTextGenerator::new(), classifier, store.clone());

        for (post_id, text) in [
            (Some(post.id), ""),
            (Some(post.id), "  "),
            (None, "I love this!"),
            (Some(0), "I love this!"),
        ] {
            let err = pipeline.submit_comment(post_id, text).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(ref m) if m == INVALID_COMMENT));
        }
        assert_eq!(store.count_comments(post.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_comment_on_unknown_post_is_not_found() {
        let (_dir, store) = temp_store().await;
        let mut classifier = MockSentimentClassifier::new();
        classifier.expect_classify().times(0);

        let pipeline = service(MockTextGenerator::new(), classifier, store.clone());
        let err = pipeline.submit_comment(Some(7), "hello").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.count_comments(7).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_classified_comment_is_persisted() {
        let (_dir, store) = temp_store().await;
        let post = store.create_post("cats", "Cats are great.").await.unwrap();
        let mut classifier = MockSentimentClassifier::new();
        classifier
            .expect_classify()
            .with(eq("I love this!"))
            .times(1)
            .returning(|_| Sentiment::from_prediction("LABEL_2", 0.93));

        let pipeline = service(MockTextGenerator::new(), classifier, store.clone());
        let comment = pipeline
            .submit_comment(Some(post.id), "I love this!")
            .await
            .unwrap();

        assert_eq!(comment.sentiment_label, SentimentLabel::Positive);
        assert!((comment.confidence - 93.0).abs() < 1e-9);
        assert_eq!(store.count_comments(post.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_classifier_failure_creates_no_comment() {
        let (_dir, store) = temp_store().await;
        let post = store.create_post("cats", "Cats are great.").await.unwrap();
        let mut classifier = MockSentimentClassifier::new();
        classifier
            .expect_classify()
            .times(1)
            .returning(|_| Err(AppError::InferenceUnavailable("model offline".into())));

        let pipeline = service(MockTextGenerator::new(), classifier, store.clone());
        let err = pipeline
            .submit_comment(Some(post.id), "I love this!")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InferenceUnavailable(_)));
        assert_eq!(store.count_comments(post.id).await.unwrap(), 0);
    }
}
