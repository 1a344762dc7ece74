//! Error types for the request executor.
//!
//! # Design
//! Four failure kinds reach the caller and none is recovered locally:
//! a missing argument, a transport that produced no response, a response
//! with a non-2xx status, and a body that would not decode. HTTP failures
//! and decode failures are separate variants so callers never mistake a
//! malformed 200 for a server error.

use std::fmt;

use crate::http::HttpMethod;
use crate::request::EncodedBody;

/// Errors returned by every executor operation.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required argument was missing or unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The JSON payload of a POST could not be serialized.
    #[error("request payload serialization failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The transport failed before any response arrived.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a non-2xx status.
    #[error(transparent)]
    Request(#[from] RequestFailure),

    /// The response body could not be decoded into the requested shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A blocking call could not start the runtime that drives it.
    #[error("failed to start blocking runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Connection-level failure reported by a transport.
#[derive(Debug, thiserror::Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else if err.is_builder() {
            "invalid request".to_string()
        } else {
            "request failed".to_string()
        };
        Self::with_source(message, err)
    }
}

/// The body of a successful response did not match the requested shape.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed XML response: {0}")]
    Xml(String),

    /// Well-formed document with the wrong top-level structure.
    #[error("unexpected response shape: {0}")]
    Shape(String),
}

/// A response arrived but its status was outside 2xx.
///
/// Only diagnostic context is kept; the response body is never decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub operation: &'static str,
    pub method: HttpMethod,
    pub url: String,
    pub status: u16,
    pub body: Option<String>,
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed: HTTP {} from {} {}",
            self.operation, self.status, self.method, self.url
        )?;
        if let Some(body) = &self.body {
            write!(f, " body: {body}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RequestFailure {}

/// What was being attempted when a request failed.
#[derive(Debug, Clone, Copy)]
pub struct FailureContext<'a> {
    pub operation: &'static str,
    pub method: HttpMethod,
    pub url: &'a str,
    pub body: Option<&'a EncodedBody>,
}

/// Turn a non-2xx status into the uniform [`RequestFailure`].
///
/// The body, when present, is rendered with [`EncodedBody::describe`] so the
/// message is the same for equal inputs.
pub fn map_failure(context: FailureContext<'_>, status: u16) -> RequestFailure {
    RequestFailure {
        operation: context.operation,
        method: context.method,
        url: context.url.to_string(),
        status,
        body: context.body.map(EncodedBody::describe),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_failure_message_names_operation_and_url() {
        let context = FailureContext {
            operation: "get_json",
            method: HttpMethod::Get,
            url: "http://localhost/missing",
            body: None,
        };
        let failure = map_failure(context, 404);
        let message = failure.to_string();
        assert!(message.contains("get_json"), "{message}");
        assert!(message.contains("http://localhost/missing"), "{message}");
        assert!(message.contains("404"), "{message}");
        assert!(!message.contains("body:"), "{message}");
    }

    #[test]
    fn post_failure_message_includes_form_body() {
        let body = EncodedBody::Form(vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]);
        let context = FailureContext {
            operation: "post_form",
            method: HttpMethod::Post,
            url: "http://localhost/form",
            body: Some(&body),
        };
        let message = map_failure(context, 500).to_string();
        assert_eq!(
            message,
            "post_form failed: HTTP 500 from POST http://localhost/form body: a=1&b=2"
        );
    }

    #[test]
    fn post_failure_message_renders_json_body_compactly() {
        let body = EncodedBody::Json(serde_json::json!({"x": 1}));
        let context = FailureContext {
            operation: "post_json",
            method: HttpMethod::Post,
            url: "http://localhost/json",
            body: Some(&body),
        };
        let failure = map_failure(context, 400);
        assert_eq!(failure.body.as_deref(), Some(r#"{"x":1}"#));
        assert!(failure.to_string().ends_with(r#"body: {"x":1}"#));
    }

    #[test]
    fn transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::with_source("connection failed", io);
        assert_eq!(err.message(), "connection failed");
        assert!(std::error::Error::source(&err).is_some());
        let api: ApiError = err.into();
        assert!(matches!(api, ApiError::Transport(_)));
        assert_eq!(api.to_string(), "transport error: connection failed");
    }
}
