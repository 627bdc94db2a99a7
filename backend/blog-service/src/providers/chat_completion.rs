//! OpenAI-compatible chat-completion client used to write posts.
//!
//! Targets the Hugging Face router by default. One request per call, bearer
//! authentication, no retry.
use super::TextGenerator;
use crate::config::GenerationConfig;
use crate::error::GenerationError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

/// Upstream bodies are cut to this many characters in error diagnostics
const MAX_DIAGNOSTIC_CHARS: usize = 512;

// ============================================
// Request types
// ============================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

// ============================================
// Response types
// ============================================

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completion client
pub struct ChatCompletionClient {
    client: Client,
    endpoint: String,
    api_token: String,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatCompletionClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_token: config.api_token.clone(),
            model: config.model.clone(),
            system_prompt: system_prompt(&config.language),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn build_request<'a>(&'a self, topic: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: self.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(topic),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

fn system_prompt(language: &str) -> String {
    format!("Write short, engaging posts in {}.", language)
}

fn user_prompt(topic: &str) -> String {
    format!("Write a post about '{}'.", topic)
}

fn truncate_diagnostic(body: &str) -> String {
    if body.chars().count() <= MAX_DIAGNOSTIC_CHARS {
        body.to_string()
    } else {
        let mut cut: String = body.chars().take(MAX_DIAGNOSTIC_CHARS).collect();
        cut.push('…');
        cut
    }
}

/// Diagnostic text for a failed call; a body that cannot be read is reported
/// as such rather than dropped.
fn error_diagnostic(body: Result<String, reqwest::Error>) -> String {
    match body {
        Ok(body) => truncate_diagnostic(&body),
        Err(e) => format!("<unreadable body: {}>", e),
    }
}

/// Pull the generated text out of a response body.
fn extract_content(body: &[u8]) -> Result<String, GenerationError> {
    let parsed: ChatResponse = serde_json::from_slice(body)
        .map_err(|e| GenerationError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::MalformedResponse("no choices returned".to_string()))?
        .message
        .and_then(|message| message.content)
        .ok_or_else(|| {
            GenerationError::MalformedResponse("first choice has no message content".to_string())
        })?;

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "generated content is empty".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}

#[async_trait]
impl TextGenerator for ChatCompletionClient {
    async fn generate(&self, topic: &str) -> Result<String, GenerationError> {
        let start = Instant::now();
        let request = self.build_request(topic);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_diagnostic(response.text().await);
            warn!(
                status = status.as_u16(),
                model = %self.model,
                "Generation endpoint returned an error status"
            );

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Unauthorized {
                    status: status.as_u16(),
                    body,
                },
                _ => GenerationError::UpstreamStatus {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;
        let content = extract_content(&body)?;

        debug!(
            model = %self.model,
            latency_ms = start.elapsed().as_millis() as u64,
            chars = content.len(),
            "Post text generated"
        );

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ChatCompletionClient {
        let mut config = GenerationConfig::with_token("hf_test");
        config.endpoint = format!("{}/v1/chat/completions", server.uri());
        ChatCompletionClient::new(&config).unwrap()
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": content } }
            ]
        })
    }

    #[test]
    fn test_request_shape() {
        let config = GenerationConfig::with_token("hf_test");
        let client = ChatCompletionClient::new(&config).unwrap();

        let request = serde_json::to_value(client.build_request("cats")).unwrap();

        assert_eq!(request["model"], GenerationConfig::DEFAULT_MODEL);
        assert_eq!(request["max_tokens"], 250);
        assert_eq!(request["messages"][0]["role"], "system");
        assert_eq!(
            request["messages"][0]["content"],
            "Write short, engaging posts in Portuguese."
        );
        assert_eq!(request["messages"][1]["content"], "Write a post about 'cats'.");
        assert!((request["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_generate_returns_trimmed_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(bearer_token("hf_test"))
            .and(body_partial_json(json!({ "max_tokens": 250 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("\n  Cats are great.  ")))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let content = client.generate("cats").await.unwrap();

        assert_eq!(content, "Cats are great.");
    }

    #[tokio::test]
    async fn test_unauthorized_is_distinct() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid credentials"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.generate("cats").await.unwrap_err();

        assert_eq!(
            err,
            GenerationError::Unauthorized {
                status: 401,
                body: "Invalid credentials".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_forbidden_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Model access denied"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.generate("cats").await.unwrap_err();

        assert_eq!(
            err,
            GenerationError::Unauthorized {
                status: 403,
                body: "Model access denied".to_string()
            }
        );
        assert_eq!(err.kind(), "unauthorized");
    }

    #[tokio::test]
    async fn test_unreadable_error_body_is_reported() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let read_err = Client::new().get(&uri).send().await.unwrap_err();
        let diagnostic = error_diagnostic(Err(read_err));

        assert!(diagnostic.starts_with("<unreadable body: "));
        assert!(diagnostic.len() > "<unreadable body: >".len());
    }

    #[test]
    fn test_readable_error_body_is_truncated() {
        let diagnostic = error_diagnostic(Ok("y".repeat(MAX_DIAGNOSTIC_CHARS * 2)));
        assert_eq!(diagnostic.chars().count(), MAX_DIAGNOSTIC_CHARS + 1);
    }

    #[tokio::test]
    async fn test_server_error_propagates_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.generate("cats").await.unwrap_err();

        match err {
            GenerationError::UpstreamStatus { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "model loading");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_choices_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.generate("cats").await.unwrap_err();

        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.generate("cats").await.unwrap_err();

        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;
        drop(server);

        let err = client.generate("cats").await.unwrap_err();

        assert!(matches!(err, GenerationError::Network(_)));
    }

    #[test]
    fn test_blank_content_is_malformed() {
        let body = serde_json::to_vec(&completion("   ")).unwrap();
        assert!(matches!(
            extract_content(&body),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_long_bodies_truncated() {
        let body = "x".repeat(MAX_DIAGNOSTIC_CHARS + 100);
        let cut = truncate_diagnostic(&body);
        assert_eq!(cut.chars().count(), MAX_DIAGNOSTIC_CHARS + 1);
    }
}
