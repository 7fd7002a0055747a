//! Mock platform service for testing
//!
//! These are test utilities - not every test binary uses all of them.

#![allow(dead_code)]

use async_trait::async_trait;
use pr_autogen::error::{Error, Result};
use pr_autogen::platform::PlatformService;
use pr_autogen::types::{Issue, PullRequest, RepositoryRef};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub repo: String,
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Simple mock platform service for testing
///
/// This manually implements `PlatformService` rather than using a mocking
/// framework.
///
/// Features:
/// - Auto-incrementing PR numbers (starting at 100)
/// - Call tracking for verification
/// - Configurable responses per head selector and issue number
/// - Error injection for failure path testing
pub struct MockPlatformService {
    next_pr_number: AtomicU64,
    list_pr_responses: Mutex<HashMap<String, Vec<PullRequest>>>,
    issues: Mutex<HashMap<u64, Issue>>,
    repositories: Mutex<HashMap<String, RepositoryRef>>,
    // Call tracking
    list_pr_calls: Mutex<Vec<String>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    get_issue_calls: Mutex<Vec<u64>>,
    auto_merge_calls: Mutex<Vec<u64>>,
    // Error injection
    error_on_list_pr: Mutex<Option<String>>,
    error_on_create_pr: Mutex<Option<String>>,
    error_on_get_issue: Mutex<Option<String>>,
    error_on_auto_merge: Mutex<Option<String>>,
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatformService {
    /// Create a new mock with no PRs, issues or errors
    pub fn new() -> Self {
        Self {
            next_pr_number: AtomicU64::new(100),
            list_pr_responses: Mutex::new(HashMap::new()),
            issues: Mutex::new(HashMap::new()),
            repositories: Mutex::new(HashMap::new()),
            list_pr_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            get_issue_calls: Mutex::new(Vec::new()),
            auto_merge_calls: Mutex::new(Vec::new()),
            error_on_list_pr: Mutex::new(None),
            error_on_create_pr: Mutex::new(None),
            error_on_get_issue: Mutex::new(None),
            error_on_auto_merge: Mutex::new(None),
        }
    }

    // === Error injection methods ===

    /// Make `list_open_pull_requests` return an error
    pub fn fail_list_pr(&self, msg: &str) {
        *self.error_on_list_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr` return an API error with this message
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `get_issue` return an error
    pub fn fail_get_issue(&self, msg: &str) {
        *self.error_on_get_issue.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `enable_auto_merge` return an error
    pub fn fail_auto_merge(&self, msg: &str) {
        *self.error_on_auto_merge.lock().unwrap() = Some(msg.to_string());
    }

    // === Response setup ===

    /// Set the open PRs returned for a head selector (`owner:branch`)
    pub fn set_open_prs(&self, head_selector: &str, prs: Vec<PullRequest>) {
        self.list_pr_responses
            .lock()
            .unwrap()
            .insert(head_selector.to_string(), prs);
    }

    /// Make an issue available to `get_issue`
    pub fn add_issue(&self, issue: Issue) {
        self.issues.lock().unwrap().insert(issue.number, issue);
    }

    /// Make a repository available to `get_repository`
    pub fn add_repository(&self, repo: RepositoryRef) {
        self.repositories
            .lock()
            .unwrap()
            .insert(repo.full_name.clone(), repo);
    }

    // === Call verification methods ===

    /// Get all head selectors `list_open_pull_requests` was called with
    pub fn get_list_pr_calls(&self) -> Vec<String> {
        self.list_pr_calls.lock().unwrap().clone()
    }

    /// Get all `create_pr` calls
    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    /// Get all issue numbers `get_issue` was called with
    pub fn get_issue_calls(&self) -> Vec<u64> {
        self.get_issue_calls.lock().unwrap().clone()
    }

    /// Get the PR numbers `enable_auto_merge` was called with
    pub fn get_auto_merge_calls(&self) -> Vec<u64> {
        self.auto_merge_calls.lock().unwrap().clone()
    }

    /// Assert that `create_pr` was never called
    pub fn assert_create_pr_not_called(&self) {
        let calls = self.get_create_pr_calls();
        assert!(
            calls.is_empty(),
            "Expected create_pr NOT to be called but got: {calls:?}"
        );
    }

    /// Assert that auto-merge was enabled exactly once, on this PR
    pub fn assert_auto_merge_once(&self, pr_number: u64) {
        let calls = self.get_auto_merge_calls();
        assert_eq!(
            calls,
            vec![pr_number],
            "Expected a single auto-merge on PR #{pr_number}"
        );
    }

    /// Assert that auto-merge was never enabled
    pub fn assert_auto_merge_not_called(&self) {
        let calls = self.get_auto_merge_calls();
        assert!(
            calls.is_empty(),
            "Expected enable_auto_merge NOT to be called but got: {calls:?}"
        );
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_open_pull_requests(
        &self,
        _repo: &RepositoryRef,
        head_selector: &str,
    ) -> Result<Vec<PullRequest>> {
        self.list_pr_calls
            .lock()
            .unwrap()
            .push(head_selector.to_string());

        // Check for injected error
        if let Some(msg) = self.error_on_list_pr.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let responses = self.list_pr_responses.lock().unwrap();
        Ok(responses.get(head_selector).cloned().unwrap_or_default())
    }

    async fn create_pr(
        &self,
        repo: &RepositoryRef,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            repo: repo.full_name.clone(),
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });

        // Check for injected error
        if let Some(msg) = self.error_on_create_pr.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        Ok(PullRequest {
            number,
            html_url: format!("https://github.com/{}/pull/{number}", repo.full_name),
            base_ref: base.to_string(),
            head_ref: head.to_string(),
            title: title.to_string(),
            body: Some(body.to_string()),
            node_id: Some(format!("PR_node_{number}")),
        })
    }

    async fn get_issue(&self, _repo: &RepositoryRef, number: u64) -> Result<Issue> {
        self.get_issue_calls.lock().unwrap().push(number);

        if let Some(msg) = self.error_on_get_issue.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        self.issues
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .ok_or(Error::IssueNotFound(number))
    }

    async fn enable_auto_merge(&self, _repo: &RepositoryRef, pr: &PullRequest) -> Result<()> {
        self.auto_merge_calls.lock().unwrap().push(pr.number);

        if let Some(msg) = self.error_on_auto_merge.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(())
    }

    async fn get_repository(&self, full_name: &str) -> Result<RepositoryRef> {
        self.repositories
            .lock()
            .unwrap()
            .get(full_name)
            .cloned()
            .ok_or_else(|| Error::GitHubApi("Not Found".to_string()))
    }
}
