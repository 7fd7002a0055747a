//! Reconcile command - run one reconciliation by hand

use crate::cli::context::CommandContext;
use pr_autogen::config::Config;
use pr_autogen::error::{Error, Result};
use pr_autogen::reconcile::{ReconcileOutcome, reconcile};
use pr_autogen::types::RepositoryRef;

/// Options for the reconcile command
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Repository as owner/name
    pub repo: String,
    /// Branch to reconcile
    pub branch: String,
    /// Base branch override
    pub base: Option<String>,
    /// GitHub App installation to act as
    pub installation: Option<u64>,
}

/// Run the reconcile command
pub async fn run_reconcile(config: &Config, options: ReconcileOptions) -> Result<()> {
    let ctx = CommandContext::new(config)?;
    let platform = ctx.provider.platform(options.installation).await?;

    // With an explicit base there is nothing to look up
    let repo = match options.base {
        Some(base) => {
            let (owner, _) = options.repo.split_once('/').ok_or_else(|| {
                Error::Config(format!("expected owner/name, got '{}'", options.repo))
            })?;
            RepositoryRef::new(owner, options.repo.as_str(), base)
        }
        None => platform.get_repository(&options.repo).await?,
    };

    match reconcile(platform.as_ref(), &repo, &options.branch).await? {
        ReconcileOutcome::Existing(pr) => {
            println!("Auto-merge enabled on existing PR #{}: {}", pr.number, pr.html_url);
        }
        ReconcileOutcome::Created(pr) => {
            println!("Created PR #{} with auto-merge: {}", pr.number, pr.html_url);
        }
        ReconcileOutcome::NoCommits => {
            println!(
                "No commits between '{}' and '{}', nothing to do",
                repo.default_branch, options.branch
            );
        }
    }

    Ok(())
}
