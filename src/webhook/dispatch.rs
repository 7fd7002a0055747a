//! Event handlers and the kind-to-handler table

use super::event::{EventKind, WebhookEvent};
use super::locks::BranchLocks;
use crate::error::{Error, Result};
use crate::platform::PlatformProvider;
use crate::reconcile::{ReconcileOutcome, reconcile};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Handler for one kind of webhook event
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process a decoded event
    async fn handle(&self, event: &WebhookEvent) -> Result<()>;
}

/// Table of handlers, filled once at startup
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<EventKind, Arc<dyn EventHandler>>,
}

impl Dispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for an event kind, replacing any previous one
    #[must_use]
    pub fn with_handler(mut self, kind: EventKind, handler: Arc<dyn EventHandler>) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    /// Look up the handler for an event kind
    pub fn handler(&self, kind: EventKind) -> Option<&Arc<dyn EventHandler>> {
        self.handlers.get(&kind)
    }

    /// Event kinds with a registered handler
    pub fn kinds(&self) -> Vec<EventKind> {
        self.handlers.keys().copied().collect()
    }
}

/// Reconciles the pull request of every newly created branch
pub struct CreateBranchHandler {
    provider: Arc<dyn PlatformProvider>,
    locks: BranchLocks,
}

impl CreateBranchHandler {
    /// Create a handler acting through the services `provider` hands out
    pub fn new(provider: Arc<dyn PlatformProvider>) -> Self {
        Self {
            provider,
            locks: BranchLocks::new(),
        }
    }
}

#[async_trait]
impl EventHandler for CreateBranchHandler {
    async fn handle(&self, event: &WebhookEvent) -> Result<()> {
        let WebhookEvent::CreateBranch(created) = event else {
            return Err(Error::Internal(format!(
                "create-branch handler received {event:?}"
            )));
        };

        let repo = &created.repository;
        let platform = self.provider.platform(created.installation_id).await?;
        let _guard = self.locks.acquire(&repo.full_name, &created.ref_name).await;

        let outcome = reconcile(platform.as_ref(), repo, &created.ref_name).await?;
        match outcome {
            ReconcileOutcome::Existing(pr) | ReconcileOutcome::Created(pr) => {
                debug!(pr_number = pr.number, branch = %created.ref_name, "branch reconciled");
            }
            ReconcileOutcome::NoCommits => {
                debug!(branch = %created.ref_name, "branch reconciled without PR");
            }
        }
        Ok(())
    }
}
