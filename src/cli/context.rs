//! Shared command context for CLI commands
//!
//! Extracts the setup shared by serve and reconcile.

use pr_autogen::config::Config;
use pr_autogen::error::Result;
use pr_autogen::platform::{PlatformProvider, create_platform_provider};
use pr_autogen::report::{ErrorReporter, NoopReporter, SentryReporter};
use std::sync::Arc;

/// Services built from the configuration
pub struct CommandContext {
    /// Hands out GitHub clients per delivery
    pub provider: Arc<dyn PlatformProvider>,
    /// Destination for failed-delivery reports
    pub reporter: Arc<dyn ErrorReporter>,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(config: &Config) -> Result<Self> {
        let provider = create_platform_provider(config)?;

        let reporter: Arc<dyn ErrorReporter> = if config.sentry_dsn.is_some() {
            Arc::new(SentryReporter)
        } else {
            Arc::new(NoopReporter)
        };

        Ok(Self { provider, reporter })
    }
}
