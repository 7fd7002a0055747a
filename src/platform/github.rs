//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::{PlatformProvider, PlatformService};
use crate::types::{Issue, PullRequest, RepositoryRef};
use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::models::{AppId, InstallationId};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

// GraphQL response types for the enable_auto_merge mutation

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnableAutoMergeData {
    enable_pull_request_auto_merge: Option<EnableAutoMergePayload>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnableAutoMergePayload {
    pull_request: Option<AutoMergePullRequest>,
}

#[derive(Deserialize)]
struct AutoMergePullRequest {
    number: u64,
}

const ENABLE_AUTO_MERGE_MUTATION: &str = r"
    mutation EnablePullRequestAutoMerge($pullRequestId: ID!) {
        enablePullRequestAutoMerge(input: { pullRequestId: $pullRequestId, mergeMethod: SQUASH }) {
            pullRequest {
                number
            }
        }
    }
";

/// REST root of a GitHub Enterprise host
fn enterprise_rest_uri(host: &str) -> String {
    format!("https://{host}/api/v3")
}

/// GraphQL root of a GitHub Enterprise host
///
/// octocrab posts GraphQL to `<base>/graphql` and always keeps the base path,
/// so Enterprise (`/api/graphql`, not `/api/v3/graphql`) needs its own client.
fn enterprise_graphql_uri(host: &str) -> String {
    format!("https://{host}/api")
}

fn token_client(token: &str, base_uri: Option<&str>) -> Result<Octocrab> {
    let mut builder = Octocrab::builder().personal_token(token.to_string());

    if let Some(uri) = base_uri {
        builder = builder
            .base_uri(uri)
            .map_err(|e| Error::GitHubApi(e.to_string()))?;
    }

    builder.build().map_err(|e| Error::GitHubApi(e.to_string()))
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    graphql: Octocrab,
}

impl GitHubService {
    /// Create a token-authenticated service
    ///
    /// `host` selects a GitHub Enterprise instance; `None` means github.com.
    pub fn new(token: &str, host: Option<&str>) -> Result<Self> {
        match host {
            Some(h) => Ok(Self::from_clients(
                token_client(token, Some(&enterprise_rest_uri(h)))?,
                token_client(token, Some(&enterprise_graphql_uri(h)))?,
            )),
            None => Ok(Self::from_client(token_client(token, None)?)),
        }
    }

    /// Create a service talking to an explicit API base URI
    pub fn with_base_uri(token: &str, base_uri: &str) -> Result<Self> {
        Ok(Self::from_client(token_client(token, Some(base_uri))?))
    }

    /// Wrap a client that serves both REST and GraphQL
    pub fn from_client(client: Octocrab) -> Self {
        Self {
            graphql: client.clone(),
            client,
        }
    }

    /// Wrap separate REST and GraphQL clients
    pub const fn from_clients(client: Octocrab, graphql: Octocrab) -> Self {
        Self { client, graphql }
    }

    /// Resolve the GraphQL node ID for a PR, fetching the PR if needed
    async fn node_id(&self, repo: &RepositoryRef, pr: &PullRequest) -> Result<String> {
        if let Some(ref id) = pr.node_id {
            return Ok(id.clone());
        }

        debug!(pr_number = pr.number, "fetching PR for node_id");
        let fetched = self
            .client
            .pulls(&repo.owner_login, repo.name())
            .get(pr.number)
            .await?;

        fetched
            .node_id
            .ok_or_else(|| Error::GitHubApi("PR missing node_id for GraphQL mutation".to_string()))
    }
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        base_ref: pr.base.ref_field.clone(),
        head_ref: pr.head.ref_field.clone(),
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        body: pr.body.clone(),
        node_id: pr.node_id.clone(),
    }
}

/// Whether an octocrab error is an HTTP 404 from the API
fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404)
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_open_pull_requests(
        &self,
        repo: &RepositoryRef,
        head_selector: &str,
    ) -> Result<Vec<PullRequest>> {
        debug!(repo = %repo.full_name, head_selector, "listing open PRs");

        let prs = self
            .client
            .pulls(&repo.owner_login, repo.name())
            .list()
            .head(head_selector)
            .state(octocrab::params::State::Open)
            .send()
            .await?;

        let result: Vec<PullRequest> = prs.items.iter().map(pr_from_octocrab).collect();
        debug!(count = result.len(), "listed open PRs");
        Ok(result)
    }

    async fn create_pr(
        &self,
        repo: &RepositoryRef,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        debug!(repo = %repo.full_name, head, base, "creating PR");
        let pr = self
            .client
            .pulls(&repo.owner_login, repo.name())
            .create(title, head, base)
            .body(body)
            .draft(false)
            .send()
            .await?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn get_issue(&self, repo: &RepositoryRef, number: u64) -> Result<Issue> {
        debug!(repo = %repo.full_name, number, "fetching issue");
        let issue = self
            .client
            .issues(&repo.owner_login, repo.name())
            .get(number)
            .await
            .map_err(|e| {
                if is_not_found(&e) {
                    Error::IssueNotFound(number)
                } else {
                    e.into()
                }
            })?;

        Ok(Issue {
            number: issue.number,
            title: issue.title,
            body: issue.body,
            html_url: issue.html_url.to_string(),
        })
    }

    async fn enable_auto_merge(&self, repo: &RepositoryRef, pr: &PullRequest) -> Result<()> {
        debug!(pr_number = pr.number, "enabling squash auto-merge");
        let node_id = self.node_id(repo, pr).await?;

        let response: GraphQlResponse<EnableAutoMergeData> = self
            .graphql
            .graphql(&serde_json::json!({
                "query": ENABLE_AUTO_MERGE_MUTATION,
                "variables": { "pullRequestId": node_id }
            }))
            .await
            .map_err(|e| Error::GitHubApi(format!("GraphQL mutation failed: {e}")))?;

        // Check for GraphQL errors
        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            return Err(Error::GitHubApi(messages.join(", ")));
        }

        let merged_pr = response
            .data
            .and_then(|d| d.enable_pull_request_auto_merge)
            .and_then(|p| p.pull_request)
            .ok_or_else(|| Error::GitHubApi("No data in GraphQL response".to_string()))?;

        debug!(pr_number = merged_pr.number, "enabled auto-merge");
        Ok(())
    }

    async fn get_repository(&self, full_name: &str) -> Result<RepositoryRef> {
        let (owner, name) = full_name.split_once('/').ok_or_else(|| {
            Error::Platform(format!("expected owner/name, got '{full_name}'"))
        })?;

        debug!(owner, name, "fetching repository");
        let repo = self.client.repos(owner, name).get().await?;

        Ok(RepositoryRef {
            owner_login: repo
                .owner
                .map_or_else(|| owner.to_string(), |o| o.login),
            full_name: repo.full_name.unwrap_or_else(|| full_name.to_string()),
            default_branch: repo
                .default_branch
                .ok_or_else(|| Error::GitHubApi(format!("{full_name} has no default branch")))?,
        })
    }
}

/// Authenticates as a GitHub App and acts for the installation of each delivery
pub struct GitHubAppProvider {
    app: Octocrab,
    graphql_uri: Option<String>,
}

impl GitHubAppProvider {
    /// Create a provider for App `app_id` signing with a PEM-encoded RSA key
    ///
    /// `host` selects a GitHub Enterprise instance; `None` means github.com.
    pub fn new(app_id: u64, private_key_pem: &str, host: Option<&str>) -> Result<Self> {
        let rest = host.map(enterprise_rest_uri);
        let mut provider = Self::build(app_id, private_key_pem, rest.as_deref())?;
        provider.graphql_uri = host.map(enterprise_graphql_uri);
        Ok(provider)
    }

    /// Create a provider talking to an explicit API base URI
    pub fn with_base_uri(app_id: u64, private_key_pem: &str, base_uri: &str) -> Result<Self> {
        Self::build(app_id, private_key_pem, Some(base_uri))
    }

    fn build(app_id: u64, private_key_pem: &str, base_uri: Option<&str>) -> Result<Self> {
        let key = jsonwebtoken::EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| Error::Config(format!("invalid GitHub App private key: {e}")))?;

        let mut builder = Octocrab::builder().app(AppId::from(app_id), key);
        if let Some(uri) = base_uri {
            builder = builder
                .base_uri(uri)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let app = builder
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        Ok(Self {
            app,
            graphql_uri: None,
        })
    }
}

#[async_trait]
impl PlatformProvider for GitHubAppProvider {
    async fn platform(&self, installation_id: Option<u64>) -> Result<Arc<dyn PlatformService>> {
        let id = installation_id.ok_or_else(|| {
            Error::Config("delivery has no installation id; GitHub App auth needs one".to_string())
        })?;
        debug!(installation_id = id, "building installation client");

        let service = match self.graphql_uri {
            // The installation token is needed up front to authenticate the
            // separate GraphQL client
            Some(ref uri) => {
                let (client, token) = self
                    .app
                    .installation_and_token(InstallationId::from(id))
                    .await?;
                let graphql = Octocrab::builder()
                    .personal_token(token)
                    .base_uri(uri.as_str())
                    .map_err(|e| Error::GitHubApi(e.to_string()))?
                    .build()
                    .map_err(|e| Error::GitHubApi(e.to_string()))?;
                GitHubService::from_clients(client, graphql)
            }
            None => GitHubService::from_client(self.app.installation(InstallationId::from(id))?),
        };

        Ok(Arc::new(service))
    }
}
