//! Deterministic stand-ins for the inference providers.
//!
//! Used by integration tests and for running the service without network or
//! model access.
use super::{SentimentClassifier, TextGenerator};
use crate::error::{AppError, GenerationError, Result};
use crate::models::Sentiment;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Generator that always answers with the same text or the same failure
pub struct ScriptedTextGenerator {
    outcome: std::result::Result<String, GenerationError>,
    calls: AtomicUsize,
}

impl ScriptedTextGenerator {
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: GenerationError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `generate` calls received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedTextGenerator {
    async fn generate(&self, _topic: &str) -> std::result::Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone().map(|text| text.trim().to_string())
    }
}

/// Classifier that reports a fixed raw model prediction.
///
/// The prediction goes through the same label mapping and scaling as the
/// real model output.
pub struct FixedSentimentClassifier {
    outcome: std::result::Result<(String, f64), String>,
    calls: AtomicUsize,
}

impl FixedSentimentClassifier {
    pub fn new(raw_label: impl Into<String>, probability: f64) -> Self {
        Self {
            outcome: Ok((raw_label.into(), probability)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(reason.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `classify` calls received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentClassifier for FixedSentimentClassifier {
    async fn classify(&self, _text: &str) -> Result<Sentiment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok((raw_label, probability)) => Sentiment::from_prediction(raw_label, *probability),
            Err(reason) => Err(AppError::InferenceUnavailable(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentLabel;

    #[tokio::test]
    async fn test_scripted_generator_trims_and_counts() {
        let generator = ScriptedTextGenerator::returning("  Cats are great.\n");

        assert_eq!(generator.generate("cats").await.unwrap(), "Cats are great.");
        assert_eq!(generator.generate("cats").await.unwrap(), "Cats are great.");
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_fixed_classifier_maps_through_vocabulary() {
        let classifier = FixedSentimentClassifier::new("0", 0.5);

        let sentiment = classifier.classify("meh").await.unwrap();
        assert_eq!(sentiment.label, SentimentLabel::Negative);
        assert_eq!(sentiment.confidence, 50.0);
    }

    #[tokio::test]
    async fn test_unavailable_classifier_never_defaults() {
        let classifier = FixedSentimentClassifier::unavailable("model not loaded");

        let err = classifier.classify("anything").await.unwrap_err();
        assert!(matches!(err, AppError::InferenceUnavailable(_)));
        assert_eq!(classifier.calls(), 1);
    }
}
