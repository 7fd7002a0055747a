//! Core types for pr-autogen

use serde::{Deserialize, Serialize};

/// Repository the agent acts on
///
/// Read-only identity of the target repository, as reported by the webhook
/// payload or fetched from the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryRef {
    /// Login of the user or organization owning the repository
    pub owner_login: String,
    /// `owner/name`
    pub full_name: String,
    /// Trunk branch pull requests merge into
    pub default_branch: String,
}

impl RepositoryRef {
    /// Create a repository reference
    pub fn new(
        owner_login: impl Into<String>,
        full_name: impl Into<String>,
        default_branch: impl Into<String>,
    ) -> Self {
        Self {
            owner_login: owner_login.into(),
            full_name: full_name.into(),
            default_branch: default_branch.into(),
        }
    }

    /// Repository name without the owner (`repo` in `owner/repo`)
    pub fn name(&self) -> &str {
        self.full_name
            .split_once('/')
            .map_or(self.full_name.as_str(), |(_, name)| name)
    }

    /// Head selector for a branch in this repository (`owner:branch`)
    pub fn head_selector(&self, branch: &str) -> String {
        format!("{}:{branch}", self.owner_login)
    }
}

/// A branch was created in a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCreatedEvent {
    /// Repository the branch was created in
    pub repository: RepositoryRef,
    /// Name of the new branch
    pub ref_name: String,
    /// GitHub App installation the delivery was sent for, if any
    pub installation_id: Option<u64>,
}

/// A pull request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
    /// PR body
    pub body: Option<String>,
    /// GraphQL node ID (used for mutations)
    pub node_id: Option<String>,
}

/// An issue that a branch may refer to (`issue-<number>`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    /// Issue number
    pub number: u64,
    /// Issue title
    pub title: String,
    /// Issue body
    pub body: Option<String>,
    /// Web URL of the issue, on whichever host serves the repository
    pub html_url: String,
}
