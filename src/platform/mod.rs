//! Hosting-service API client
//!
//! Everything the agent does against GitHub goes through [`PlatformService`],
//! so the reconciler can be exercised against an in-memory implementation.
//! A [`PlatformProvider`] hands out the service for each delivery: one shared
//! client under token auth, or an installation-scoped client for a GitHub App.

mod factory;
mod github;

pub use factory::create_platform_provider;
pub use github::{GitHubAppProvider, GitHubService};

use crate::error::Result;
use crate::types::{Issue, PullRequest, RepositoryRef};
use async_trait::async_trait;
use std::sync::Arc;

/// Platform service trait for PR operations
///
/// Every call is attempted exactly once; implementations must not retry.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// List open PRs whose head matches `head_selector` (`owner:branch`)
    ///
    /// Order is whatever the API returns.
    async fn list_open_pull_requests(
        &self,
        repo: &RepositoryRef,
        head_selector: &str,
    ) -> Result<Vec<PullRequest>>;

    /// Find an existing open PR for a head branch
    ///
    /// Returns the first PR in lookup order.
    async fn find_existing_pr(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> Result<Option<PullRequest>> {
        let prs = self
            .list_open_pull_requests(repo, &repo.head_selector(branch))
            .await?;
        Ok(prs.into_iter().next())
    }

    /// Open a non-draft PR from `head` into `base`
    ///
    /// Rejections from the API surface as [`Error::GitHubApi`] carrying the
    /// API's message verbatim.
    ///
    /// [`Error::GitHubApi`]: crate::error::Error::GitHubApi
    async fn create_pr(
        &self,
        repo: &RepositoryRef,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest>;

    /// Fetch an issue by number
    ///
    /// A missing issue is reported as [`Error::IssueNotFound`].
    ///
    /// [`Error::IssueNotFound`]: crate::error::Error::IssueNotFound
    async fn get_issue(&self, repo: &RepositoryRef, number: u64) -> Result<Issue>;

    /// Enable squash auto-merge on a PR
    async fn enable_auto_merge(&self, repo: &RepositoryRef, pr: &PullRequest) -> Result<()>;

    /// Fetch repository metadata by `owner/name`
    async fn get_repository(&self, full_name: &str) -> Result<RepositoryRef>;
}

/// Hands out the platform service a delivery should act through
#[async_trait]
pub trait PlatformProvider: Send + Sync {
    /// Service for a delivery sent on behalf of `installation_id`
    ///
    /// Token-authenticated providers ignore the installation.
    async fn platform(&self, installation_id: Option<u64>) -> Result<Arc<dyn PlatformService>>;
}

/// Provider returning the same service for every delivery
pub struct SharedPlatform {
    platform: Arc<dyn PlatformService>,
}

impl SharedPlatform {
    /// Wrap a service
    pub fn new(platform: Arc<dyn PlatformService>) -> Self {
        Self { platform }
    }
}

#[async_trait]
impl PlatformProvider for SharedPlatform {
    async fn platform(&self, _installation_id: Option<u64>) -> Result<Arc<dyn PlatformService>> {
        Ok(Arc::clone(&self.platform))
    }
}
