//! Error types for the diary sync client.
//!
//! # Design
//! Failures fall into four kinds: a local attachment could not be read, no
//! response arrived at all, a response arrived but was not usable, or the
//! payload could not be decoded. `Unexpected` covers anything that went wrong
//! while building the request itself (bad URL, serializer failure, a panicking
//! resolver). Every public operation returns exactly one of these instead of
//! unwinding into the caller.

use crate::types::ImageRef;

/// Message used when a 2xx response arrives without a body.
pub const NULL_BODY: &str = "Response body is null";

/// Message used when a non-2xx response carries no error text.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Errors returned by every `DiarySync` operation.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A local image could not be opened or read. Raised before (or instead
    /// of) submitting the multipart request.
    #[error("Unable to read image data for URI: {reference} ({reason})")]
    AttachmentRead { reference: ImageRef, reason: String },

    /// No response was received: DNS failure, timeout, connection reset.
    #[error("Network error: {0}")]
    Transport(String),

    /// A response was received but was non-2xx or had no body.
    #[error("Error: {message} (HTTP {status})")]
    Application { status: u16, message: String },

    /// The payload was structurally invalid or held an unknown enum name.
    #[error("Decode failed: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl SyncError {
    /// HTTP status carried by an application error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::Application { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_null_body(&self) -> bool {
        matches!(self, SyncError::Application { message, .. } if message == NULL_BODY)
    }
}

/// Errors raised by a `Transport` before any response is available.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request left (or tried to leave) the process but nothing came back.
    #[error("{0}")]
    Network(String),

    /// The request could not be constructed, e.g. an invalid URL.
    #[error("{0}")]
    Build(String),
}

impl From<TransportError> for SyncError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Network(msg) => SyncError::Transport(msg),
            TransportError::Build(msg) => SyncError::Unexpected(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_on_application_errors() {
        let err = SyncError::Application {
            status: 404,
            message: "missing".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(SyncError::Transport("reset".to_string()).status(), None);
    }

    #[test]
    fn display_messages_are_human_readable() {
        let err = SyncError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "Network error: connection refused");

        let err = SyncError::Application {
            status: 500,
            message: UNKNOWN_ERROR.to_string(),
        };
        assert_eq!(err.to_string(), "Error: Unknown error (HTTP 500)");
    }

    #[test]
    fn build_errors_surface_as_unexpected() {
        let err: SyncError = TransportError::Build("relative URL without a base".to_string()).into();
        assert!(matches!(err, SyncError::Unexpected(_)));
    }
}
