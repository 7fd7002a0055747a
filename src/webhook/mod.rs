//! Webhook ingress
//!
//! Turns an inbound GitHub delivery into a typed event and hands it to the
//! registered handler:
//! 1. Read `X-GitHub-Event` / `X-GitHub-Delivery`
//! 2. Verify `X-Hub-Signature-256` when a secret is configured
//! 3. Decode the payload and dispatch by event kind

mod dispatch;
mod error;
mod event;
mod locks;
pub mod signature;

pub use dispatch::{CreateBranchHandler, Dispatcher, EventHandler};
pub use error::WebhookError;
pub use event::{EventKind, WebhookEvent, decode};
pub use locks::{BranchGuard, BranchLocks};

use crate::report::{ErrorReport, ErrorReporter, NoopReporter};
use axum::http::HeaderMap;
use std::sync::Arc;
use tracing::{error, info};

/// Name of the event header
pub const EVENT_HEADER: &str = "x-github-event";
/// Name of the delivery ID header
pub const DELIVERY_HEADER: &str = "x-github-delivery";
/// Name of the signature header
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Log target of the ingress; its handler-failure logs are already reported
pub(crate) const LOG_TARGET: &str = module_path!();

/// What the ingress did with a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    /// Answered a ping
    Pong,
    /// The handler ran to completion
    Handled(EventKind),
}

/// Accepts deliveries and routes them to handlers
pub struct WebhookIngress {
    dispatcher: Dispatcher,
    secret: Option<String>,
    reporter: Arc<dyn ErrorReporter>,
}

impl WebhookIngress {
    /// Create an ingress with no signature check and no error reporting
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            secret: None,
            reporter: Arc::new(NoopReporter),
        }
    }

    /// Require deliveries to be signed with `secret`
    #[must_use]
    pub fn with_secret(mut self, secret: Option<String>) -> Self {
        self.secret = secret;
        self
    }

    /// Forward handler failures to `reporter`
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Process one delivery
    pub async fn handle(&self, headers: &HeaderMap, body: &[u8]) -> Result<Ack, WebhookError> {
        let event = header(headers, EVENT_HEADER)?.ok_or(WebhookError::MissingEvent)?;
        let delivery_id =
            header(headers, DELIVERY_HEADER)?.ok_or(WebhookError::MissingDeliveryId)?;

        if let Some(ref secret) = self.secret {
            let provided =
                header(headers, SIGNATURE_HEADER)?.ok_or(WebhookError::MissingSignature)?;
            signature::verify(secret.as_bytes(), body, provided)?;
        }

        let decoded = decode(event, body)?;
        let Some(kind) = decoded.kind() else {
            info!(delivery_id, "ping received");
            return Ok(Ack::Pong);
        };

        let handler = self
            .dispatcher
            .handler(kind)
            .ok_or_else(|| WebhookError::UnsupportedEventType(kind.to_string()))?;

        info!(delivery_id, %kind, "dispatching delivery");
        if let Err(e) = handler.handle(&decoded).await {
            error!(delivery_id, %kind, error = %e, "handler failed");
            self.reporter.report(&ErrorReport {
                delivery_id,
                event,
                error: &e,
            });
            return Err(e.into());
        }

        Ok(Ack::Handled(kind))
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<Option<&'a str>, WebhookError> {
    headers
        .get(name)
        .map(|v| v.to_str().map_err(|_| WebhookError::MalformedHeader(name)))
        .transpose()
}
