//! Blocking client for the Structurizr workspace API.

use std::time::Duration;

use log::{debug, info};
use reqwest::{
    Url,
    blocking::Client,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};

use blueprint_core::workspace::Workspace;

use crate::publish::{
    PublishError,
    document::WorkspaceDocument,
    signing::{self, SignedRequest},
};

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

const TIMEOUT: Duration = Duration::from_secs(60);

pub struct StructurizrClient {
    api_url: String,
    api_key: String,
    secret_key: String,
    http: Client,
}

impl StructurizrClient {
    /// Creates a client for the API rooted at `api_url`.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::InvalidApiUrl`] for a malformed URL and
    /// [`PublishError::Transport`] if the HTTP client cannot be built.
    pub fn new(
        api_url: &str,
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, PublishError> {
        let api_url = api_url.trim_end_matches('/').to_string();
        Url::parse(&api_url).map_err(|err| PublishError::InvalidApiUrl {
            url: api_url.clone(),
            reason: err.to_string(),
        })?;

        let http = Client::builder()
            .user_agent(concat!("blueprint/", env!("CARGO_PKG_VERSION")))
            .timeout(TIMEOUT)
            .build()
            .map_err(|source| PublishError::Transport {
                url: api_url.clone(),
                source,
            })?;

        Ok(Self {
            api_url,
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            http,
        })
    }

    /// URL of the workspace resource.
    pub fn workspace_url(&self, workspace_id: u64) -> Result<Url, PublishError> {
        let url = format!("{}/workspace/{workspace_id}", self.api_url);
        Url::parse(&url).map_err(|err| PublishError::InvalidApiUrl {
            url,
            reason: err.to_string(),
        })
    }

    /// Builds the signed headers for a request carrying `body`.
    pub fn headers(&self, url: &Url, body: &str, nonce: &str) -> Result<HeaderMap, PublishError> {
        let signature = signing::sign(
            &self.api_key,
            &self.secret_key,
            &SignedRequest {
                method: "PUT",
                path: url.path(),
                body,
                content_type: JSON_CONTENT_TYPE,
                nonce,
            },
        )?;

        let value = |raw: &str| {
            HeaderValue::from_str(raw).map_err(|err| PublishError::Signing(err.to_string()))
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert("Content-MD5", value(&signature.content_md5)?);
        headers.insert("Nonce", value(nonce)?);
        headers.insert("X-Authorization", value(&signature.authorization)?);
        Ok(headers)
    }

    /// Uploads `workspace` as the new content of workspace `workspace_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Transport`] if the request cannot be sent and
    /// [`PublishError::Rejected`] for any non-success status.
    pub fn put_workspace(&self, workspace_id: u64, workspace: &Workspace) -> Result<(), PublishError> {
        let url = self.workspace_url(workspace_id)?;
        let body = serde_json::to_string(&WorkspaceDocument::new(workspace_id, workspace))?;
        let nonce = chrono::Utc::now().timestamp_millis().to_string();
        let headers = self.headers(&url, &body, &nonce)?;

        debug!(url:% = url, bytes = body.len(); "Uploading workspace");
        let response = self
            .http
            .put(url.clone())
            .headers(headers)
            .body(body)
            .send()
            .map_err(|source| PublishError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PublishError::Rejected {
                workspace_id,
                status: status.as_u16(),
                body,
            });
        }

        info!(workspace_id, status = status.as_u16(); "Workspace published");
        Ok(())
    }
}
