//! Publishing workspaces to a Structurizr workspace store.
//!
//! Publishing is optional. It only happens when all three credentials are
//! available; otherwise the step is skipped and reported as
//! [`PublishOutcome::Skipped`].

pub mod document;
pub mod signing;
pub mod structurizr;

use std::{env, fmt};

use log::info;
use thiserror::Error;

use blueprint_core::workspace::Workspace;

pub use structurizr::StructurizrClient;

pub const API_KEY_VAR: &str = "STRUCTURIZR_API_KEY";
pub const SECRET_KEY_VAR: &str = "STRUCTURIZR_SECRET_KEY";
pub const WORKSPACE_ID_VAR: &str = "STRUCTURIZR_WORKSPACE_ID";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("workspace id `{0}` is not a positive integer")]
    InvalidWorkspaceId(String),

    #[error("invalid API URL `{url}`: {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("failed to serialize workspace: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to sign request: {0}")]
    Signing(String),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("workspace {workspace_id} was rejected with status {status}: {body}")]
    Rejected {
        workspace_id: u64,
        status: u16,
        body: String,
    },
}

/// Result of the publish step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Skipped,
    Published { workspace_id: u64 },
}

/// Access to one remote workspace.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteCredentials {
    api_key: String,
    secret_key: String,
    workspace_id: String,
}

impl RemoteCredentials {
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        workspace_id: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            workspace_id: workspace_id.into(),
        }
    }

    /// Reads the credentials from the process environment.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads the credentials through `lookup`.
    ///
    /// Returns `None` unless all three values are set. A value set to the
    /// empty string still counts as set and is validated on publish.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Some(Self::new(
            lookup(API_KEY_VAR)?,
            lookup(SECRET_KEY_VAR)?,
            lookup(WORKSPACE_ID_VAR)?,
        ))
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Parses the workspace id.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::InvalidWorkspaceId`] unless the id is a
    /// positive integer.
    pub fn workspace_id(&self) -> Result<u64, PublishError> {
        match self.workspace_id.trim().parse::<u64>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(PublishError::InvalidWorkspaceId(self.workspace_id.clone())),
        }
    }
}

impl fmt::Debug for RemoteCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteCredentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .field("workspace_id", &self.workspace_id)
            .finish()
    }
}

/// Publishes `workspace` if credentials are given.
///
/// The workspace id is validated before any network activity.
pub fn publish(
    api_url: &str,
    workspace: &Workspace,
    credentials: Option<&RemoteCredentials>,
) -> Result<PublishOutcome, PublishError> {
    let Some(credentials) = credentials else {
        info!("No Structurizr credentials found, skipping publish");
        return Ok(PublishOutcome::Skipped);
    };

    let workspace_id = credentials.workspace_id()?;
    info!(workspace_id, api_url; "Publishing workspace");

    let client = StructurizrClient::new(api_url, credentials.api_key(), credentials.secret_key())?;
    client.put_workspace(workspace_id, workspace)?;

    Ok(PublishOutcome::Published { workspace_id })
}
