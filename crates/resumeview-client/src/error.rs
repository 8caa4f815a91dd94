use resumeview_core::RecordId;
#[cfg(feature = "http")]
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Client-side constraint violation. Never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// The service rejected otherwise well-formed input.
    #[error("{detail}")]
    ServiceValidation { status: u16, detail: String },

    #[error("record {id} not found")]
    NotFound { id: RecordId, detail: Option<String> },

    #[error("server returned {status}")]
    Server { status: u16, detail: Option<String> },

    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "http")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The four failure classes a view distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    ServiceValidation,
    NotFound,
    Transport,
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::Validation(_) => ErrorKind::Validation,
            RepositoryError::ServiceValidation { .. } => ErrorKind::ServiceValidation,
            RepositoryError::NotFound { .. } => ErrorKind::NotFound,
            _ => ErrorKind::Transport,
        }
    }

    /// The `detail` string from the service's error body, if it sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            RepositoryError::ServiceValidation { detail, .. } => Some(detail),
            RepositoryError::NotFound { detail, .. } | RepositoryError::Server { detail, .. } => {
                detail.as_deref()
            }
            _ => None,
        }
    }

    /// Text to show the user. Validation messages and service details are
    /// passed through verbatim; everything else becomes `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            RepositoryError::Validation(message) => message.clone(),
            RepositoryError::NotFound { detail, .. } => detail
                .clone()
                .unwrap_or_else(|| "Resume not found".to_string()),
            other => other.detail().unwrap_or(fallback).to_string(),
        }
    }
}

/// Pull a human-readable message out of a service error body.
///
/// Handles `{"detail": "..."}` and the list form
/// `{"detail": [{"msg": "..."}, ...]}` produced by request validation.
#[cfg(feature = "http")]
pub(crate) fn parse_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    }
}
