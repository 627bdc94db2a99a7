//! Environment variable parsing utilities
//!
//! Shared by the pool configuration and the services that embed it, so that
//! every numeric setting is parsed the same way.

use std::str::FromStr;

/// Parse an environment variable with a default fallback.
///
/// Missing or unparsable values fall back to `default`.
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parse an optional environment variable strictly.
///
/// Unlike [`parse_env_with_default`], a present but malformed value is an
/// error instead of silently falling back.
pub fn parse_env_strict<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|_| format!("Failed to parse {}='{}'", key, val)),
        Err(_) => Ok(default),
    }
}
