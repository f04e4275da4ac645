//! Error types for the Sonos control client.
//!
//! # Design
//! Every failure reaches the caller as an `ApiError`. Failures raised while
//! building or encoding a request (missing identifiers, unknown parameters,
//! unserializable values) never reach the transport. `HttpStatus` keeps the
//! complete response so callers can read the vendor's JSON error body
//! themselves; the core does not interpret it.

use std::fmt;

use thiserror::Error;

use crate::http::HttpResponse;

/// Errors returned while building, encoding or dispatching a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport could not complete the round-trip.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The transport classified the response as unsuccessful.
    #[error("HTTP {status}")]
    HttpStatus { status: u16, response: HttpResponse },

    /// The request could not be serialized or its URL is malformed.
    #[error("request encoding failed: {0}")]
    Encoding(String),

    /// A `{placeholder}` in the URL template was left without a value.
    #[error("missing path parameter `{0}`")]
    MissingPathParameter(String),

    /// A path parameter value is empty or would alter the URL structure.
    #[error("invalid value for path parameter `{0}`")]
    InvalidPathParameter(String),

    /// A required body parameter was not supplied.
    #[error("missing required parameter `{0}`")]
    MissingParameter(String),

    /// A supplied parameter is not part of the endpoint's schema.
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    /// No access token or client keys were supplied.
    #[error("missing credential for endpoint `{0}`")]
    MissingCredential(String),

    /// The dispatch was cancelled through its handle.
    #[error("dispatch cancelled")]
    Cancelled,
}

/// Coarse classification of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    HttpStatus,
    Encoding,
    Cancelled,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::HttpStatus { .. } => ErrorKind::HttpStatus,
            ApiError::Cancelled => ErrorKind::Cancelled,
            ApiError::Encoding(_)
            | ApiError::MissingPathParameter(_)
            | ApiError::InvalidPathParameter(_)
            | ApiError::MissingParameter(_)
            | ApiError::UnknownParameter(_)
            | ApiError::MissingCredential(_) => ErrorKind::Encoding,
        }
    }

    /// Status code of an `HttpStatus` failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response attached to an `HttpStatus` failure.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ApiError::HttpStatus { response, .. } => Some(response),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Encoding(err.to_string())
    }
}

/// What went wrong below HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// DNS resolution or TCP connect failed.
    Connect,
    Timeout,
    Io,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Connect => "connect",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Io => "io",
            TransportErrorKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Failure reported by a `Transport` implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
