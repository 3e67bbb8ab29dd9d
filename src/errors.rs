//! Application error model
//!
//! Defines a typed error hierarchy using `thiserror` for internal error
//! handling. Tool failures are rendered as error results at the dispatch
//! boundary; only protocol-level conditions (an unknown tool name) are
//! mapped to MCP `ErrorData`.

use rmcp::model::ErrorData;
use serde_json::json;
use thiserror::Error;

/// Application error type
///
/// Covers all error cases the Graph MCP server may encounter. Provider-side
/// failures are not classified beyond the variants below; the dispatcher
/// surfaces them uniformly as error results.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid user input (missing or mistyped tool argument)
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Resource not found (message or draft id unknown to the provider)
    #[error("not found: {0}")]
    NotFound(String),
    /// Authentication failure (expired or rejected access token)
    #[error("authentication failed: {0}")]
    AuthFailed(String),
    /// Operation timeout (connect or response deadline exceeded)
    #[error("operation timed out: {0}")]
    Timeout(String),
    /// Remote provider failure (any non-success Graph response)
    #[error("provider error: {0}")]
    Provider(String),
    /// Internal error (unexpected failure, external crate error)
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Convenience constructor for `InvalidInput`
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Convert to MCP `ErrorData`
    ///
    /// Used only where the protocol itself must fail (tool resolution);
    /// everything raised inside a tool handler becomes an error result
    /// instead.
    pub fn to_error_data(&self) -> ErrorData {
        match self {
            Self::InvalidInput(msg) => {
                ErrorData::invalid_params(msg.clone(), Some(json!({ "code": "invalid_input" })))
            }
            Self::NotFound(msg) => {
                ErrorData::resource_not_found(msg.clone(), Some(json!({ "code": "not_found" })))
            }
            Self::AuthFailed(msg) => {
                ErrorData::invalid_request(msg.clone(), Some(json!({ "code": "auth_failed" })))
            }
            Self::Timeout(msg) => {
                ErrorData::internal_error(msg.clone(), Some(json!({ "code": "timeout" })))
            }
            Self::Provider(msg) => {
                ErrorData::internal_error(msg.clone(), Some(json!({ "code": "provider" })))
            }
            Self::Internal(msg) => {
                ErrorData::internal_error(msg.clone(), Some(json!({ "code": "internal" })))
            }
        }
    }
}

/// Type alias for fallible return values
///
/// Use this for all internal functions that can fail. Provides a consistent
/// error type throughout the codebase.
pub type AppResult<T> = Result<T, AppError>;
