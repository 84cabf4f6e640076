use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error payload returned by the backend: `{ error?, message? }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// `message` if present and non-empty, otherwise `error`.
    pub fn detail(&self) -> Option<&str> {
        fn non_empty(s: &Option<String>) -> Option<&str> {
            s.as_deref().filter(|s| !s.is_empty())
        }
        non_empty(&self.message).or_else(|| non_empty(&self.error))
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid endpoint URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Failed to build multipart body: {0}")]
    Multipart(#[source] reqwest::Error),

    /// No response at all (connection refused, timeout, reset).
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("{url} responded with {status}: {}", .body.detail().unwrap_or("no details"))]
    Status {
        url: String,
        status: u16,
        body: ErrorBody,
    },

    /// The body could not be read or was not the expected JSON.
    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_prefers_message() {
        let body = ErrorBody {
            error: Some("boom".to_string()),
            message: Some("exists".to_string()),
        };
        assert_eq!(body.detail(), Some("exists"));
    }

    #[test]
    fn detail_falls_back_to_error() {
        let body = ErrorBody {
            error: Some("boom".to_string()),
            message: Some(String::new()),
        };
        assert_eq!(body.detail(), Some("boom"));
        assert_eq!(ErrorBody::default().detail(), None);
    }

    #[test]
    fn detail_ignores_empty_strings() {
        let body = ErrorBody {
            error: Some(String::new()),
            message: Some(String::new()),
        };
        assert_eq!(body.detail(), None);
    }

    #[test]
    fn status_error_display_includes_detail() {
        let err = ApiError::Status {
            url: "http://localhost/add_user".to_string(),
            status: 500,
            body: ErrorBody {
                error: Some("db down".to_string()),
                message: None,
            },
        };
        assert!(err.to_string().contains("db down"));
    }
}
