//! Error types for the nebulon ON client.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP error information captured from reqwest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpErrorInfo {
    /// Error message.
    pub message: String,
    /// HTTP status code (if available).
    pub status_code: Option<u16>,
    /// Whether the error was a timeout.
    pub is_timeout: bool,
    /// Whether the error was a connection failure.
    pub is_connect: bool,
}

impl From<reqwest::Error> for HttpErrorInfo {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            status_code: err.status().map(|status| status.as_u16()),
            is_timeout: err.is_timeout(),
            is_connect: err.is_connect(),
        }
    }
}

/// GraphQL error location (1-based line and column in the document).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlErrorLocation {
    /// Line number in the query.
    pub line: u32,
    /// Column number in the query.
    pub column: u32,
}

/// GraphQL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphqlPathSegment {
    /// Field name.
    Key(String),
    /// Array index.
    Index(i64),
}

/// A single error reported by the GraphQL endpoint (per GraphQL spec).
///
/// Errors are passed through unmodified with their message, path, and
/// extensions so callers can diagnose failures without inspecting the
/// document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    /// Human-readable error message.
    pub message: String,
    /// Location(s) within the query.
    #[serde(default)]
    pub locations: Vec<GraphqlErrorLocation>,
    /// Path within the response where the error occurred.
    #[serde(default)]
    pub path: Vec<GraphqlPathSegment>,
    /// Extensions metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

/// Error type for nebulon ON client operations.
///
/// Every failure names exactly one layer: input validation, the HTTP
/// transport, JSON (de)serialization, the remote GraphQL endpoint, or a
/// client-vs-schema protocol violation. The client never retries and never
/// swallows errors.
#[derive(Debug, Clone, Error)]
pub enum NebClientError {
    /// A caller-constructed input, filter, sort, or page object holds a
    /// value outside its declared range. Raised at construction time,
    /// before any network interaction.
    #[error("invalid value for {field}: {message}")]
    Validation {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// HTTP/network error.
    #[error("HTTP error: {0:?}")]
    Http(HttpErrorInfo),

    /// HTTP response status outside 2xx.
    #[error("HTTP status {status} with body: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: StatusCode,
        /// Response body (truncated if needed).
        body: String,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// GraphQL-level errors returned by the server for an otherwise
    /// well-formed document (permission denied, resource not found, ...).
    #[error("GraphQL errors: {errors:?}")]
    Graphql {
        /// GraphQL error list, unmodified.
        errors: Vec<GraphqlError>,
    },

    /// A raw reply violates an invariant the materializer relies on,
    /// indicating a client-vs-remote-schema mismatch.
    #[error("GraphQL protocol error: {message}")]
    Protocol {
        /// Details, including the offending reply path where known.
        message: String,
    },
}

impl From<reqwest::Error> for NebClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(HttpErrorInfo::from(err))
    }
}

impl From<serde_json::Error> for NebClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl NebClientError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_error_deserializes_path_segments() {
        let raw = serde_json::json!({
            "message": "volume not found",
            "path": ["getVolumes", "items", 2, "uuid"],
            "extensions": {"code": "NOT_FOUND"}
        });
        let err: GraphqlError = serde_json::from_value(raw).unwrap();
        assert_eq!(err.message, "volume not found");
        assert_eq!(err.path.len(), 4);
        assert_eq!(err.path[2], GraphqlPathSegment::Index(2));
        assert!(err.extensions.is_some());
        assert!(err.locations.is_empty());
    }

    #[test]
    fn validation_error_names_field() {
        let err = NebClientError::validation("page", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid value for page: must be at least 1"
        );
    }
}
