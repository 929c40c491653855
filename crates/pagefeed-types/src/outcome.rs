//! Typed results of a segment fetch.
//!
//! The taxonomy is data, not exceptions: transport failures travel as a
//! [`FetchOutcome`] variant so the engine can route them without a `Result`
//! at every seam.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::payload::Payload;

/// Settlement of one segment fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The segment resolved with renderable content.
    Success {
        payload: Payload,
        /// False when the response declared the stream finished after this
        /// segment (`no-more-content` header).
        more_available: bool,
        /// Total item count advertised by the source (`content-counter`
        /// header), forwarded verbatim and never interpreted here.
        item_count: Option<u64>,
    },
    /// HTTP 200 with nothing to render. A terminal pagination signal,
    /// not an error.
    Empty,
    /// HTTP 404. Permanent for this instance; automatic fetching stops.
    NotFound,
    /// Superseded by a newer fetch. Never surfaced as an error.
    Aborted,
    /// Network or parse failure; retryable on the next trigger.
    TransportError(TransportError),
}

impl FetchOutcome {
    /// True for the variants after which automatic fetching must stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FetchOutcome::Empty | FetchOutcome::NotFound)
    }
}

/// Categories of transport failure for consistent handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// Non-success HTTP status (other than 404, which is `NotFound`).
    HttpStatus,
    /// Connection-level failure (DNS, refused, timed out, body cut short).
    Connect,
    /// Body did not decode as the configured payload shape.
    Parse,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::HttpStatus => write!(f, "http_status"),
            TransportErrorKind::Connect => write!(f, "connect"),
            TransportErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Structured transport failure with kind and detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportError {
    /// Error category.
    pub kind: TransportErrorKind,
    /// HTTP status, when one was received.
    pub status: Option<u16>,
    /// One-line summary suitable for display.
    pub message: String,
    /// Optional raw detail (e.g. a body snippet).
    pub details: Option<String>,
}

impl TransportError {
    /// Creates a transport error without an HTTP status.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            details: None,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(status: u16, body: &str) -> Self {
        Self {
            kind: TransportErrorKind::HttpStatus,
            status: Some(status),
            message: format!("HTTP {status}"),
            details: if body.is_empty() {
                None
            } else {
                Some(body.to_string())
            },
        }
    }

    /// Creates a connection-level error.
    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Connect, message)
    }

    /// Creates a body decode error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Parse, message)
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransportError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_variants() {
        assert!(FetchOutcome::Empty.is_terminal());
        assert!(FetchOutcome::NotFound.is_terminal());
        assert!(!FetchOutcome::Aborted.is_terminal());
        assert!(
            !FetchOutcome::TransportError(TransportError::connect("connection refused"))
                .is_terminal()
        );
    }

    #[test]
    fn test_http_status_error_carries_status_and_body() {
        let err = TransportError::http_status(500, "boom");
        assert_eq!(err.status, Some(500));
        assert_eq!(err.message, "HTTP 500");
        assert_eq!(err.details.as_deref(), Some("boom"));

        let bare = TransportError::http_status(503, "");
        assert!(bare.details.is_none());
    }
}
