//! Serve command - run the webhook server

use crate::cli::context::CommandContext;
use pr_autogen::config::Config;
use pr_autogen::error::Result;
use pr_autogen::server::{AppState, build_router, serve};
use pr_autogen::webhook::{CreateBranchHandler, Dispatcher, EventKind, WebhookIngress};
use std::sync::Arc;
use tracing::{info, warn};

/// Options for the serve command
#[derive(Debug, Clone, Default)]
pub struct ServeOptions {
    /// Bind address override
    pub host: Option<String>,
    /// Port override
    pub port: Option<u16>,
}

/// Run the serve command
pub async fn run_serve(config: &Config, options: ServeOptions) -> Result<()> {
    let ctx = CommandContext::new(config)?;

    let dispatcher = Dispatcher::new().with_handler(
        EventKind::CreateBranch,
        Arc::new(CreateBranchHandler::new(Arc::clone(&ctx.provider))),
    );
    info!(kinds = ?dispatcher.kinds(), "registered handlers");

    if config.webhook_secret.is_none() {
        warn!("WEBHOOK_SECRET is not set; deliveries will not be authenticated");
    }

    let ingress = WebhookIngress::new(dispatcher)
        .with_secret(config.webhook_secret.clone())
        .with_reporter(ctx.reporter);

    let mut bind = config.clone();
    if let Some(host) = options.host {
        bind.host = host;
    }
    if let Some(port) = options.port {
        bind.port = port;
    }

    let router = build_router(Arc::new(AppState { ingress }));
    serve(&bind.bind_addr(), router).await
}
