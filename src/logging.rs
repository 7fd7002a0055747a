//! Tracing subscriber setup

use crate::config::LogFormat;
use sentry_tracing::EventFilter;
use tracing::{Level, Metadata};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "pr_autogen=info,tower_http=info";

/// Install the global tracing subscriber
///
/// Errors are forwarded to Sentry and lower levels become breadcrumbs; without
/// a Sentry client the forwarding layer does nothing. Safe to call more than
/// once; later calls are ignored.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let sentry = sentry_tracing::layer().event_filter(sentry_event_filter);

    let registry = tracing_subscriber::registry().with(filter).with(sentry);
    let result = match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

fn sentry_event_filter(metadata: &Metadata<'_>) -> EventFilter {
    match *metadata.level() {
        // Handler failures reach Sentry through the reporter, with delivery tags
        Level::ERROR if metadata.target() == crate::webhook::LOG_TARGET => EventFilter::Breadcrumb,
        Level::ERROR => EventFilter::Event,
        Level::WARN | Level::INFO => EventFilter::Breadcrumb,
        _ => EventFilter::Ignore,
    }
}
