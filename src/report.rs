//! Error reporting for failed webhook deliveries
//!
//! Failures that reach the transport are captured in Sentry, tagged with the
//! delivery they belong to, before the error response goes out. Reporting is
//! best effort and never fails the delivery.

use crate::error::{Error, Result};
use sentry::ClientInitGuard;
use tracing::{debug, info};

/// Context of a failed delivery
#[derive(Debug, Clone, Copy)]
pub struct ErrorReport<'a> {
    /// `X-GitHub-Delivery` of the failed delivery
    pub delivery_id: &'a str,
    /// `X-GitHub-Event` of the failed delivery
    pub event: &'a str,
    /// What went wrong
    pub error: &'a Error,
}

/// Destination for error reports
pub trait ErrorReporter: Send + Sync {
    /// Report a failure; must not fail the caller
    fn report(&self, report: &ErrorReport<'_>);
}

/// Reporter that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ErrorReporter for NoopReporter {
    fn report(&self, report: &ErrorReport<'_>) {
        debug!(delivery_id = report.delivery_id, "error reporting disabled");
    }
}

/// Reporter that captures failures as Sentry events on the current hub
#[derive(Debug, Default, Clone, Copy)]
pub struct SentryReporter;

impl ErrorReporter for SentryReporter {
    fn report(&self, report: &ErrorReport<'_>) {
        let event_id = sentry::with_scope(
            |scope| {
                scope.set_tag("delivery_id", report.delivery_id);
                scope.set_tag("event", report.event);
            },
            || sentry::capture_error(report.error),
        );
        debug!(delivery_id = report.delivery_id, %event_id, "error captured");
    }
}

/// Start the Sentry client for `dsn`
///
/// Events are flushed when the returned guard is dropped, so the caller must
/// keep it alive for the life of the process.
pub fn init_sentry(dsn: &str) -> Result<ClientInitGuard> {
    let dsn = dsn
        .parse::<sentry::types::Dsn>()
        .map_err(|e| Error::Config(format!("invalid value for SENTRY_DSN: {e}")))?;

    let guard = sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        release: sentry::release_name!(),
        ..Default::default()
    });
    info!("Sentry initialized");
    Ok(guard)
}
