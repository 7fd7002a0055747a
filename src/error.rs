//! Error types for pr-autogen

use thiserror::Error;

/// Errors produced while talking to the hosting service or running the agent
#[derive(Debug, Error)]
pub enum Error {
    /// The GitHub API rejected a request.
    ///
    /// The message is the most specific one GitHub returned: the first nested
    /// validation error if there is one, otherwise the top-level message.
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform failure not tied to an API response
    #[error("platform error: {0}")]
    Platform(String),

    /// The referenced issue does not exist
    #[error("issue #{0} not found")]
    IssueNotFound(u64),

    /// Invalid or missing configuration
    #[error("config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal invariant violated
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => {
                let nested = source
                    .errors
                    .as_ref()
                    .and_then(|errors| errors.first())
                    .and_then(|e| e.get("message"))
                    .and_then(serde_json::Value::as_str)
                    .map(ToString::to_string);
                Self::GitHubApi(nested.unwrap_or_else(|| source.message.clone()))
            }
            other => Self::GitHubApi(other.to_string()),
        }
    }
}

impl Error {
    /// The API message carried by this error, if it came from the hosting service
    pub fn api_message(&self) -> Option<&str> {
        match self {
            Self::GitHubApi(msg) => Some(msg),
            _ => None,
        }
    }
}
