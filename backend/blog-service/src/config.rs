/// Configuration management for Blog Service
///
/// Everything is read from environment variables (optionally seeded from a
/// `.env` file by `main`). The generation credential is mandatory: without it
/// every post request would be a doomed network call, so loading fails.
use db_pool::env_utils::{parse_env_strict, parse_env_with_default};
use db_pool::DbConfig;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const SERVICE_NAME: &str = "blog-service";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Database pool configuration
    pub database: DbConfig,
    /// Remote post generation
    pub generation: GenerationConfig,
    /// Local sentiment model
    pub classifier: ClassifierConfig,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// HTTP worker count
    pub workers: usize,
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Chat-completion endpoint settings
#[derive(Clone)]
pub struct GenerationConfig {
    /// Bearer token for the endpoint
    pub api_token: String,
    pub endpoint: String,
    pub model: String,
    /// Language every generated post is written in
    pub language: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_token", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("language", &self.language)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GenerationConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "https://router.huggingface.co/v1/chat/completions";
    pub const DEFAULT_MODEL: &'static str = "meta-llama/Llama-3.2-3B-Instruct";
    pub const DEFAULT_LANGUAGE: &'static str = "Portuguese";
    pub const DEFAULT_MAX_TOKENS: u32 = 250;
    pub const DEFAULT_TEMPERATURE: f32 = 0.8;

    /// Settings with the default endpoint and sampling, for a given token
    pub fn with_token(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            language: Self::DEFAULT_LANGUAGE.to_string(),
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            temperature: Self::DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Local sentiment model files
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// ONNX export of the sequence-classification model
    pub model_path: PathBuf,
    /// `tokenizer.json` matching the model
    pub tokenizer_path: PathBuf,
    /// Token limit applied before inference
    pub max_sequence_length: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let is_production = app_env.eq_ignore_ascii_case("production");

        let api_token = std::env::var("HUGGINGFACE_TOKEN")
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                "HUGGINGFACE_TOKEN must be set to call the generation endpoint".to_string()
            })?;

        let temperature = parse_env_strict("GENERATION_TEMPERATURE", GenerationConfig::DEFAULT_TEMPERATURE)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(format!(
                "GENERATION_TEMPERATURE must be within [0, 2], got {}",
                temperature
            ));
        }

        let max_tokens = parse_env_strict("GENERATION_MAX_TOKENS", GenerationConfig::DEFAULT_MAX_TOKENS)?;
        if max_tokens == 0 {
            return Err("GENERATION_MAX_TOKENS must be positive".to_string());
        }

        let model_dir = PathBuf::from(
            std::env::var("SENTIMENT_MODEL_DIR").unwrap_or_else(|_| "models/sentiment".to_string()),
        );

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("BLOG_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_strict("BLOG_SERVICE_PORT", 5000)?,
                workers: parse_env_with_default("BLOG_SERVICE_WORKERS", 4),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if is_production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if is_production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            database: DbConfig::from_env(SERVICE_NAME),
            generation: GenerationConfig {
                api_token,
                endpoint: std::env::var("GENERATION_ENDPOINT")
                    .unwrap_or_else(|_| GenerationConfig::DEFAULT_ENDPOINT.to_string()),
                model: std::env::var("GENERATION_MODEL")
                    .unwrap_or_else(|_| GenerationConfig::DEFAULT_MODEL.to_string()),
                language: std::env::var("GENERATION_LANGUAGE")
                    .unwrap_or_else(|_| GenerationConfig::DEFAULT_LANGUAGE.to_string()),
                max_tokens,
                temperature,
                timeout: Duration::from_secs(parse_env_strict("GENERATION_TIMEOUT_SECS", 60)?),
            },
            classifier: ClassifierConfig {
                model_path: std::env::var("SENTIMENT_MODEL_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| model_dir.join("model.onnx")),
                tokenizer_path: std::env::var("SENTIMENT_TOKENIZER_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| model_dir.join("tokenizer.json")),
                max_sequence_length: parse_env_with_default("SENTIMENT_MAX_SEQUENCE_LENGTH", 512),
            },
        })
    }
}
