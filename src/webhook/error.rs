//! Error types for the webhook ingress.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that can occur while accepting a webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The X-GitHub-Event header is missing.
    #[error("missing event header")]
    MissingEvent,

    /// The X-GitHub-Delivery header is missing.
    #[error("missing delivery ID header")]
    MissingDeliveryId,

    /// A header is present but not valid UTF-8.
    #[error("malformed header: {0}")]
    MalformedHeader(&'static str),

    /// The X-Hub-Signature-256 header is missing while a secret is configured.
    #[error("missing signature header")]
    MissingSignature,

    /// The signature header has an invalid format.
    #[error("invalid signature format: {0}")]
    InvalidSignatureFormat(String),

    /// The signature does not match the payload.
    #[error("invalid signature")]
    InvalidSignature,

    /// The request payload could not be parsed.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// No handler exists for this event.
    #[error("unsupported event type: {0}")]
    UnsupportedEventType(String),

    /// The handler failed.
    #[error("handler failed: {0}")]
    Handler(#[from] crate::error::Error),
}

impl WebhookError {
    /// Returns the HTTP status code for this error.
    ///
    /// - Missing/invalid signature: 401 Unauthorized
    /// - Malformed headers, payload or unsupported event: 400 Bad Request
    /// - Handler failure: 500 Internal Server Error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingSignature | Self::InvalidSignature | Self::InvalidSignatureFormat(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::MissingEvent
            | Self::MissingDeliveryId
            | Self::MalformedHeader(_)
            | Self::InvalidPayload(_)
            | Self::UnsupportedEventType(_) => StatusCode::BAD_REQUEST,
            Self::Handler(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        // Generic bodies only; details go to the log and the error reporter.
        let status = self.status_code();
        let body = match &self {
            Self::MissingEvent => "Missing event",
            Self::MissingDeliveryId => "Missing delivery ID",
            Self::MalformedHeader(_) => "Malformed header",
            Self::MissingSignature => "Missing signature",
            Self::InvalidSignatureFormat(_) => "Invalid signature format",
            Self::InvalidSignature => "Invalid signature",
            Self::InvalidPayload(_) => "Invalid payload",
            Self::UnsupportedEventType(_) => "Unsupported event type",
            Self::Handler(_) => "Internal server error",
        };

        (status, body).into_response()
    }
}
