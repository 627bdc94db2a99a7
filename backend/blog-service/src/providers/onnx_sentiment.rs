//! Multilingual sentiment model served locally with ONNX Runtime.
//!
//! Expects an ONNX export of an XLM-RoBERTa style sequence classifier
//! (inputs `input_ids` and `attention_mask`, output `logits` shaped
//! `[1, num_classes]`) and the matching `tokenizer.json`.
use super::SentimentClassifier;
use crate::config::ClassifierConfig;
use crate::error::{AppError, Result};
use crate::models::Sentiment;
use async_trait::async_trait;
use ndarray::Array2;
use ort::session::{Session, SessionInputValue, SessionOutputs};
use std::borrow::Cow;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};

fn unavailable(context: &str, err: impl std::fmt::Display) -> AppError {
    AppError::InferenceUnavailable(format!("{}: {}", context, err))
}

struct OnnxModel {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
}

/// Sentiment classifier backed by an ONNX Runtime session
#[derive(Clone)]
pub struct OnnxSentimentClassifier {
    model: Arc<OnnxModel>,
}

impl OnnxSentimentClassifier {
    /// Load the model and tokenizer. Missing files fail immediately.
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        ensure_exists(&config.model_path)?;
        ensure_exists(&config.tokenizer_path)?;

        let session = Session::builder()
            .map_err(|e| unavailable("creating ONNX session", e))?
            .commit_from_file(&config.model_path)
            .map_err(|e| unavailable("loading sentiment model", e))?;

        let mut tokenizer = Tokenizer::from_file(&config.tokenizer_path)
            .map_err(|e| unavailable("loading tokenizer", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_sequence_length,
                ..Default::default()
            }))
            .map_err(|e| unavailable("configuring truncation", e))?;

        tracing::info!(
            model = %config.model_path.display(),
            max_sequence_length = config.max_sequence_length,
            "Sentiment model loaded"
        );

        Ok(Self {
            model: Arc::new(OnnxModel {
                session: Mutex::new(session),
                tokenizer,
            }),
        })
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(AppError::InferenceUnavailable(format!(
            "model file not found: {}",
            path.display()
        )))
    }
}

impl OnnxModel {
    /// Run the classifier and return the raw top-class id and its probability
    fn predict(&self, text: &str) -> Result<(String, f64)> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| unavailable("tokenizing input", e))?;

        let ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let len = ids.len();

        let input_ids = Array2::from_shape_vec((1, len), ids)
            .map_err(|e| unavailable("shaping input_ids", e))?;
        let attention_mask = Array2::from_shape_vec((1, len), mask)
            .map_err(|e| unavailable("shaping attention_mask", e))?;

        let input_ids = ort::value::Value::from_array(input_ids)
            .map_err(|e| unavailable("building input_ids tensor", e))?;
        let attention_mask = ort::value::Value::from_array(attention_mask)
            .map_err(|e| unavailable("building attention_mask tensor", e))?;

        let inputs: Vec<(Cow<'_, str>, SessionInputValue<'_>)> = vec![
            (Cow::Borrowed("input_ids"), SessionInputValue::from(input_ids)),
            (
                Cow::Borrowed("attention_mask"),
                SessionInputValue::from(attention_mask),
            ),
        ];

        let mut session = self
            .session
            .lock()
            .map_err(|e| AppError::Internal(format!("Failed to lock session: {}", e)))?;

        let outputs: SessionOutputs = session
            .run(inputs)
            .map_err(|e| unavailable("running sentiment model", e))?;

        let logits = outputs
            .get("logits")
            .ok_or_else(|| AppError::InferenceUnavailable("No logits tensor".to_string()))?;

        let (_, logits) = logits
            .try_extract_tensor::<f32>()
            .map_err(|e| unavailable("reading logits", e))?;

        let (class_id, probability) = top_class(logits)?;
        Ok((format!("LABEL_{}", class_id), probability))
    }
}

/// Softmax over the logits and pick the most probable class
pub(crate) fn top_class(logits: &[f32]) -> Result<(usize, f64)> {
    if logits.is_empty() {
        return Err(AppError::InferenceUnavailable(
            "model returned no class scores".to_string(),
        ));
    }

    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;
    let exps: Vec<f64> = logits.iter().map(|&l| (l as f64 - max).exp()).collect();
    let total: f64 = exps.iter().sum();

    let (class_id, top) = exps
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (idx, &value)| {
            if value > best.1 {
                (idx, value)
            } else {
                best
            }
        });

    Ok((class_id, top / total))
}

#[async_trait]
impl SentimentClassifier for OnnxSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<Sentiment> {
        let model = self.model.clone();
        let text = text.to_owned();

        let (raw_label, probability) = tokio::task::spawn_blocking(move || model.predict(&text))
            .await
            .map_err(|e| unavailable("inference task failed", e))??;

        Sentiment::from_prediction(&raw_label, probability)
    }
}
