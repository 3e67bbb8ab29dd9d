//! Configuration module for the Graph connection and server settings
//!
//! All configuration is loaded from environment variables following the
//! pattern `MAIL_GRAPH_<KEY>`. Each running instance acts on behalf of
//! exactly one authenticated mailbox identity, so there is a single token
//! and endpoint rather than an account table.

use std::env;
use std::env::VarError;

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

/// Default Microsoft Graph endpoint
const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Server-wide configuration
///
/// Wraps the Graph connection details and HTTP timeouts. Cloned into the MCP
/// server via `Arc` for thread-safe shared access.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Graph API base URL without trailing slash (overridable for testing)
    pub base_url: String,
    /// OAuth bearer token stored in a type that prevents accidental logging
    pub access_token: SecretString,
    /// End-to-end HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// TCP connection timeout in milliseconds
    pub connect_timeout_ms: u64,
}

impl ServerConfig {
    /// Load all configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `MAIL_GRAPH_ACCESS_TOKEN` is missing or any
    /// set variable is malformed.
    ///
    /// # Example Environment
    ///
    /// ```text
    /// MAIL_GRAPH_ACCESS_TOKEN=eyJ0eXAiOiJKV1Qi...
    /// MAIL_GRAPH_BASE_URL=https://graph.microsoft.com/v1.0
    /// MAIL_GRAPH_REQUEST_TIMEOUT_MS=30000
    /// MAIL_GRAPH_CONNECT_TIMEOUT_MS=10000
    /// ```
    pub fn load_from_env() -> AppResult<Self> {
        let token = required_env("MAIL_GRAPH_ACCESS_TOKEN")?;
        let base_url = match env::var("MAIL_GRAPH_BASE_URL") {
            Ok(v) => normalize_base_url(&v)?,
            Err(VarError::NotPresent) => DEFAULT_BASE_URL.to_owned(),
            Err(VarError::NotUnicode(_)) => {
                return Err(AppError::InvalidInput(
                    "environment variable MAIL_GRAPH_BASE_URL contains non-unicode data".to_owned(),
                ));
            }
        };

        Ok(Self {
            base_url,
            access_token: SecretString::new(token.into()),
            request_timeout_ms: parse_u64_env("MAIL_GRAPH_REQUEST_TIMEOUT_MS", 30_000)?,
            connect_timeout_ms: parse_u64_env("MAIL_GRAPH_CONNECT_TIMEOUT_MS", 10_000)?,
        })
    }
}

/// Read a required environment variable, returning error if missing or empty
fn required_env(key: &str) -> AppResult<String> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::InvalidInput(format!(
            "missing required environment variable {key}"
        ))),
    }
}

/// Normalize a base URL by trimming whitespace and trailing slashes
///
/// # Errors
///
/// Returns `InvalidInput` if the value is empty or not an http(s) URL.
fn normalize_base_url(value: &str) -> AppResult<String> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(
            "MAIL_GRAPH_BASE_URL must not be empty".to_owned(),
        ));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(AppError::InvalidInput(format!(
            "MAIL_GRAPH_BASE_URL must be an absolute http(s) URL, got '{trimmed}'"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Parse a `u64` environment variable with default fallback
///
/// Returns `default` if unset.
///
/// # Errors
///
/// Returns `InvalidInput` if the variable is set but not a valid `u64`.
fn parse_u64_env(key: &str, default: u64) -> AppResult<u64> {
    match env::var(key) {
        Ok(v) => v.parse::<u64>().map_err(|_| {
            AppError::InvalidInput(format!("invalid u64 environment variable {key}: '{v}'"))
        }),
        Err(VarError::NotPresent) => Ok(default),
        Err(VarError::NotUnicode(_)) => Err(AppError::InvalidInput(format!(
            "environment variable {key} contains non-unicode data"
        ))),
    }
}
