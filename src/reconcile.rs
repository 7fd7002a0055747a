//! Pull request reconciliation for newly created branches
//!
//! Given a repository and a branch, make sure an open PR from that branch into
//! the default branch exists and has squash auto-merge enabled:
//!
//! 1. Lookup - reuse the first open PR whose head is `owner:branch`
//! 2. Create - otherwise open one; "no commits" rejections end the run quietly
//! 3. Enable auto-merge on whichever PR is in hand

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Issue, PullRequest, RepositoryRef};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, warn};

/// Body used when the PR is not derived from an issue
pub const DEFAULT_PR_BODY: &str = "PR automatically created";

static ISSUE_BRANCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^issue-(\d+)$").expect("issue branch pattern is valid"));

/// Title and body for a PR about to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrContent {
    /// PR title
    pub title: String,
    /// PR body
    pub body: String,
}

/// How reconciliation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// An open PR already existed; auto-merge was enabled on it
    Existing(PullRequest),
    /// A PR was created; auto-merge was enabled on it
    Created(PullRequest),
    /// The branch has no commits over the default branch; nothing was done
    NoCommits,
}

impl ReconcileOutcome {
    /// The PR auto-merge was enabled on, if any
    pub const fn pull_request(&self) -> Option<&PullRequest> {
        match self {
            Self::Existing(pr) | Self::Created(pr) => Some(pr),
            Self::NoCommits => None,
        }
    }
}

/// Extract the issue number from an `issue-<number>` branch name
pub fn parse_issue_reference(branch: &str) -> Option<u64> {
    ISSUE_BRANCH
        .captures(branch)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Render the PR body for a PR that resolves an issue
///
/// Links the issue, repeats its body and closes it on merge.
pub fn issue_pr_body(issue: &Issue) -> String {
    format!(
        "### [{title}]({url})\n\n{body}\n\nCloses #{number}\n\n",
        title = issue.title,
        url = issue.html_url,
        body = issue.body.as_deref().unwrap_or_default(),
        number = issue.number,
    )
}

/// Whether a create-PR failure is GitHub's "no commits between" rejection
///
/// Matches the exact message for this base/head pair, quoted or not.
pub fn is_no_commits_error(err: &Error, base: &str, head: &str) -> bool {
    err.api_message().is_some_and(|msg| {
        msg == format!("No commits between '{base}' and '{head}'")
            || msg == format!("No commits between {base} and {head}")
    })
}

/// Work out the title and body for a new PR on `branch`
///
/// Branches named `issue-<n>` take the issue's title and a body linking it.
/// A missing issue falls back to the defaults; other lookup failures propagate.
pub async fn pr_content(
    platform: &dyn PlatformService,
    repo: &RepositoryRef,
    branch: &str,
) -> Result<PrContent> {
    let default = PrContent {
        title: branch.to_string(),
        body: DEFAULT_PR_BODY.to_string(),
    };

    let Some(number) = parse_issue_reference(branch) else {
        return Ok(default);
    };

    match platform.get_issue(repo, number).await {
        Ok(issue) => Ok(PrContent {
            body: issue_pr_body(&issue),
            title: issue.title,
        }),
        Err(Error::IssueNotFound(_)) => {
            warn!(
                issue = number,
                branch, "Branch refers to a missing issue, using defaults"
            );
            Ok(default)
        }
        Err(e) => Err(e),
    }
}

/// Create a PR from `branch` into the default branch
///
/// Returns `None` when GitHub reports there is nothing to merge.
pub async fn create_pr(
    platform: &dyn PlatformService,
    repo: &RepositoryRef,
    branch: &str,
) -> Result<Option<PullRequest>> {
    let content = pr_content(platform, repo, branch).await?;
    let base = repo.default_branch.as_str();

    match platform
        .create_pr(repo, branch, base, &content.title, &content.body)
        .await
    {
        Ok(pr) => {
            info!(
                pr_number = pr.number,
                "Created PR for '{}' into '{base}'",
                repo.head_selector(branch)
            );
            Ok(Some(pr))
        }
        Err(e) if is_no_commits_error(&e, base, branch) => {
            warn!("No commits between '{base}' and '{branch}'");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Return the open PR for `branch`, creating one if none exists
///
/// The bool is true when the PR already existed.
pub async fn get_or_create_pr(
    platform: &dyn PlatformService,
    repo: &RepositoryRef,
    branch: &str,
) -> Result<Option<(PullRequest, bool)>> {
    if let Some(pr) = platform.find_existing_pr(repo, branch).await? {
        info!(
            pr_number = pr.number,
            "PR already exists for '{}' into '{}'",
            repo.head_selector(branch),
            repo.default_branch
        );
        return Ok(Some((pr, true)));
    }

    Ok(create_pr(platform, repo, branch).await?.map(|pr| (pr, false)))
}

/// Enable squash auto-merge on a PR
pub async fn enable_auto_merge(
    platform: &dyn PlatformService,
    repo: &RepositoryRef,
    pr: &PullRequest,
) -> Result<()> {
    platform.enable_auto_merge(repo, pr).await?;
    info!(pr_number = pr.number, "Enabled auto-merge");
    Ok(())
}

/// Reconcile a newly created branch with its pull request
///
/// Makes at most one create call and at most one auto-merge call. Nothing is
/// retried; any failure other than "no commits" is returned unchanged.
pub async fn reconcile(
    platform: &dyn PlatformService,
    repo: &RepositoryRef,
    branch: &str,
) -> Result<ReconcileOutcome> {
    info!(
        "Branch {}:{branch} created in {}",
        repo.owner_login, repo.full_name
    );

    let Some((pr, existed)) = get_or_create_pr(platform, repo, branch).await? else {
        return Ok(ReconcileOutcome::NoCommits);
    };

    enable_auto_merge(platform, repo, &pr).await?;

    Ok(if existed {
        ReconcileOutcome::Existing(pr)
    } else {
        ReconcileOutcome::Created(pr)
    })
}
