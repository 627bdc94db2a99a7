//! Inference providers
//!
//! Two capabilities sit behind traits so the pipeline never depends on the
//! network or a model file directly:
//! - [`TextGenerator`]: remote chat-completion call producing post text
//! - [`SentimentClassifier`]: local model labeling comment text

pub mod chat_completion;
pub mod fake;
pub mod onnx_sentiment;

use crate::error::{GenerationError, Result};
use crate::models::Sentiment;
use async_trait::async_trait;

pub use chat_completion::ChatCompletionClient;
pub use fake::{FixedSentimentClassifier, ScriptedTextGenerator};
pub use onnx_sentiment::OnnxSentimentClassifier;

/// Turns a topic into generated post text.
///
/// Implementations issue exactly one upstream request per call and never
/// retry. The returned text is trimmed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, topic: &str) -> std::result::Result<String, GenerationError>;
}

/// Labels text with a sentiment and a confidence percentage.
///
/// Fails with `AppError::InferenceUnavailable` when the model cannot run.
/// Never substitutes a default sentiment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Sentiment>;
}
