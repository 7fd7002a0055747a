//! Decoding of webhook payloads into typed events

use super::error::WebhookError;
use crate::types::{BranchCreatedEvent, RepositoryRef};
use serde::Deserialize;

/// Kind of event a handler can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A branch was created (`create` with `ref_type: branch`)
    CreateBranch,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateBranch => write!(f, "create_branch"),
        }
    }
}

/// A decoded webhook event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// GitHub's connectivity check after a webhook is configured
    Ping,
    /// A branch was created
    CreateBranch(BranchCreatedEvent),
}

impl WebhookEvent {
    /// The handler kind, `None` for events answered by the ingress itself
    pub const fn kind(&self) -> Option<EventKind> {
        match self {
            Self::Ping => None,
            Self::CreateBranch(_) => Some(EventKind::CreateBranch),
        }
    }
}

/// Type of a Git ref object.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RefType {
    Branch,
    Tag,
}

#[derive(Debug, Deserialize)]
struct Owner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct Repository {
    full_name: String,
    default_branch: String,
    owner: Owner,
}

/// Present on deliveries to a GitHub App.
#[derive(Debug, Deserialize)]
struct Installation {
    id: u64,
}

/// Payload of the `create` event; only the fields we use.
#[derive(Debug, Deserialize)]
struct CreateEventPayload {
    #[serde(rename = "ref")]
    ref_: String,
    ref_type: RefType,
    repository: Repository,
    installation: Option<Installation>,
}

/// Decode a delivery given its `X-GitHub-Event` name and raw body
pub fn decode(event: &str, body: &[u8]) -> Result<WebhookEvent, WebhookError> {
    match event {
        "ping" => Ok(WebhookEvent::Ping),
        "create" => {
            let payload: CreateEventPayload = serde_json::from_slice(body)
                .map_err(|e| WebhookError::InvalidPayload(e.to_string()))?;

            if payload.ref_type != RefType::Branch {
                return Err(WebhookError::UnsupportedEventType("create.tag".to_string()));
            }
            if payload.ref_.is_empty() {
                return Err(WebhookError::InvalidPayload("empty ref".to_string()));
            }

            Ok(WebhookEvent::CreateBranch(BranchCreatedEvent {
                repository: RepositoryRef {
                    owner_login: payload.repository.owner.login,
                    full_name: payload.repository.full_name,
                    default_branch: payload.repository.default_branch,
                },
                ref_name: payload.ref_,
                installation_id: payload.installation.map(|i| i.id),
            }))
        }
        other => Err(WebhookError::UnsupportedEventType(other.to_string())),
    }
}
