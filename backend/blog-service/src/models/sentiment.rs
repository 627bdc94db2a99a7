use crate::error::{AppError, Result};
use std::fmt;

/// Sentiment vocabulary stored with every comment.
///
/// `Other` carries a classifier identifier this service does not know how to
/// map. It is stored verbatim so a model swap never turns into a hard failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
    Other(String),
}

impl SentimentLabel {
    /// Map a raw class identifier emitted by the model.
    ///
    /// Ordinal ids 0/1/2 are accepted bare or in the `LABEL_<n>` spelling used
    /// by exported sequence-classification heads.
    pub fn from_model_id(raw: &str) -> Self {
        let ordinal = raw.strip_prefix("LABEL_").unwrap_or(raw);
        match ordinal {
            "0" => SentimentLabel::Negative,
            "1" => SentimentLabel::Neutral,
            "2" => SentimentLabel::Positive,
            _ => SentimentLabel::Other(raw.to_string()),
        }
    }

    /// Parse the value persisted in `comments.sentiment_label`
    pub fn from_stored(value: &str) -> Self {
        match value {
            "Negative" => SentimentLabel::Negative,
            "Neutral" => SentimentLabel::Neutral,
            "Positive" => SentimentLabel::Positive,
            other => SentimentLabel::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Other(raw) => raw,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SentimentLabel {
    fn from(value: String) -> Self {
        SentimentLabel::from_stored(&value)
    }
}

/// Classification result: label and confidence always travel together.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentiment {
    pub label: SentimentLabel,
    /// Top-class probability as a percentage in [0, 100]
    pub confidence: f64,
}

impl Sentiment {
    /// Build a sentiment from the model's raw top-class identifier and
    /// probability.
    ///
    /// The score must be a probability in [0, 1]. Anything else means the
    /// model is not emitting what this mapping expects, so it is reported as
    /// unavailable inference instead of being rescaled.
    pub fn from_prediction(raw_label: &str, probability: f64) -> Result<Self> {
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(AppError::InferenceUnavailable(format!(
                "classifier score {} for '{}' is not a probability",
                probability, raw_label
            )));
        }

        Ok(Self {
            label: SentimentLabel::from_model_id(raw_label),
            confidence: probability * 100.0,
        })
    }
}
