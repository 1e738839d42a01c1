//! Error types for the insight gateway and catalog loading
//!
//! Insight errors are classified by recoverability:
//! - Retryable: network issues, timeouts, server-side API errors
//! - NonRetryable: malformed or schema-violating responses
//! - RequiresUserAction: missing API credential
//!
//! None of them reach the dashboard as an error; the gateway swaps them for
//! fallback content and only the log records the cause.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single insight request.
#[derive(Debug, Error)]
pub enum InsightError {
    // Retryable errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Insight request timed out after {0} seconds")]
    Timeout(u64),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    // Non-retryable errors
    #[error("Summarization service returned no text")]
    EmptyResponse,

    #[error("Response is not valid JSON: {0}")]
    Parse(String),

    #[error("Response does not match the insight schema: {0}")]
    Schema(String),

    // Requires user action
    #[error("No API credential configured. Set API_KEY or GEMINI_API_KEY")]
    MissingCredential,
}

/// Coarse recoverability class, used for log context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Retryable,
    NonRetryable,
    RequiresUserAction,
}

impl InsightError {
    /// Returns true if re-selecting the category may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            InsightError::Network(_) | InsightError::Timeout(_) => true,
            InsightError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        if matches!(self, InsightError::MissingCredential) {
            ErrorType::RequiresUserAction
        } else if self.is_retryable() {
            ErrorType::Retryable
        } else {
            ErrorType::NonRetryable
        }
    }

    /// Stable short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            InsightError::Network(_) => "transport",
            InsightError::Timeout(_) => "timeout",
            InsightError::Api { .. } => "api",
            InsightError::EmptyResponse => "empty_response",
            InsightError::Parse(_) => "malformed",
            InsightError::Schema(_) => "schema",
            InsightError::MissingCredential => "missing_credential",
        }
    }
}

impl From<reqwest::Error> for InsightError {
    fn from(err: reqwest::Error) -> Self {
        InsightError::Network(err.to_string())
    }
}

/// Failure loading a JSON project catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Project {id} has progress {progress}, expected 0-100")]
    ProgressOutOfRange { id: String, progress: u8 },

    #[error("Duplicate project id: {0}")]
    DuplicateId(String),
}
