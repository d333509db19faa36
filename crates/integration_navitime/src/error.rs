//! Route search error types

use thiserror::Error;

/// Maximum number of characters of a response body kept in a [`RouteError::Decode`]
pub const RAW_BODY_SNIPPET_CHARS: usize = 512;

/// Errors that can occur while building or executing a route search
///
/// Missing fields inside an otherwise well-formed response are not errors;
/// the parser substitutes [`crate::Reported::Unavailable`] for them.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Caller input rejected before any network activity
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field (e.g. `origin.latitude`)
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// Connection to the route service failed
    #[error("Network error: {0}")]
    Network(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// The provider answered with a non-2xx status
    #[error("HTTP {status}: {raw_body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, verbatim (JSON or plain text)
        raw_body: String,
    },

    /// The body of a successful response was not the expected JSON
    #[error("Decode error: {message} (body starts with: {raw_body_snippet})")]
    Decode {
        /// Parser diagnostic
        message: String,
        /// Leading part of the body that failed to decode
        raw_body_snippet: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RouteError {
    /// Create a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a decode error, keeping at most [`RAW_BODY_SNIPPET_CHARS`] of the body
    pub fn decode(message: impl Into<String>, raw_body: &str) -> Self {
        Self::Decode {
            message: message.into(),
            raw_body_snippet: snippet(raw_body),
        }
    }

    /// Returns true for connectivity failures and timeouts
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout { .. })
    }

    /// Returns true if repeating the same request could succeed
    ///
    /// The client never retries on its own; this is a hint for callers.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout { .. } => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::Validation { .. } | Self::Decode { .. } | Self::Configuration(_) => false,
        }
    }
}

fn snippet(raw_body: &str) -> String {
    match raw_body.char_indices().nth(RAW_BODY_SNIPPET_CHARS) {
        Some((end, _)) => raw_body[..end].to_string(),
        None => raw_body.to_string(),
    }
}
