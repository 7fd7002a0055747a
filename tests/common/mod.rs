//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{CreatePrCall, MockPlatformService};

use pr_autogen::types::{Issue, PullRequest, RepositoryRef};

/// Repository with `master` as default branch
pub fn repository(full_name: &str) -> RepositoryRef {
    let owner = full_name.split('/').next().unwrap_or(full_name);
    RepositoryRef::new(owner, full_name, "master")
}

/// An open, non-draft PR from `head` into `master`
pub fn make_pr(number: u64, head: &str) -> PullRequest {
    PullRequest {
        number,
        html_url: format!("https://github.com/test/repo/pull/{number}"),
        base_ref: "master".to_string(),
        head_ref: head.to_string(),
        title: head.to_string(),
        body: None,
        node_id: Some(format!("PR_node_{number}")),
    }
}

/// Issue #42 titled "feature" in `owner/repo`
pub fn feature_issue() -> Issue {
    Issue {
        number: 42,
        title: "feature".to_string(),
        body: Some("feature body".to_string()),
        html_url: "https://github.com/owner/repo/issues/42".to_string(),
    }
}
