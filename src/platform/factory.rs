//! Platform provider construction

use crate::config::Config;
use crate::error::{Error, Result};
use crate::platform::{GitHubAppProvider, GitHubService, PlatformProvider, SharedPlatform};
use std::fs;
use std::sync::Arc;
use tracing::{debug, info};

/// Build the platform provider described by the configuration
///
/// GitHub App credentials take precedence; a personal or installation token
/// in `GITHUB_TOKEN` is the fallback.
pub fn create_platform_provider(config: &Config) -> Result<Arc<dyn PlatformProvider>> {
    if let Some(app_id) = config.github_app_id {
        let key = app_private_key(config)?;
        info!(app_id, host = ?config.github_host, "authenticating as GitHub App");
        let provider = GitHubAppProvider::new(app_id, &key, config.github_host.as_deref())?;
        return Ok(Arc::new(provider));
    }

    let token = config
        .github_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            Error::Config("set GITHUB_APP_ID and a private key, or GITHUB_TOKEN".to_string())
        })?;

    debug!(host = ?config.github_host, "creating token-authenticated GitHub service");
    let service = GitHubService::new(token, config.github_host.as_deref())?;
    Ok(Arc::new(SharedPlatform::new(Arc::new(service))))
}

fn app_private_key(config: &Config) -> Result<String> {
    if let Some(ref pem) = config.github_app_private_key {
        return Ok(pem.clone());
    }
    let path = config.github_app_private_key_file.as_ref().ok_or_else(|| {
        Error::Config(
            "GITHUB_APP_ID is set but neither GITHUB_APP_PRIVATE_KEY nor \
             GITHUB_APP_PRIVATE_KEY_FILE is"
                .to_string(),
        )
    })?;
    fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))
}
