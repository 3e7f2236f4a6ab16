//! REST implementation of [`ProjectApi`].
//!
//! Every endpoint answers with the platform envelope
//! `{ "success": bool, "data": T?, "message": string? }`.

use async_trait::async_trait;
use eep_core::api::{ProjectApi, ProjectRef};
use eep_core::config::ApiConfig;
use eep_core::error::{EepError, Result};
use eep_core::project::ProjectEntity;
use eep_core::workspace::WorkspaceEntity;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Response envelope used by all platform endpoints.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

/// Turns a raw HTTP answer into the payload or an error.
fn parse_envelope<T: DeserializeOwned>(
    status: u16,
    body: &str,
    entity_type: &'static str,
    id: &str,
) -> Result<T> {
    if status == StatusCode::NOT_FOUND.as_u16() {
        return Err(EepError::not_found(entity_type, id));
    }

    let envelope: ApiEnvelope<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if (200..300).contains(&status) => return Err(e.into()),
        Err(_) => return Err(EepError::api(status, body.trim().to_string())),
    };

    if !(200..300).contains(&status) || !envelope.success {
        let message = envelope
            .message
            .unwrap_or_else(|| format!("request for {} '{}' was not successful", entity_type, id));
        return Err(EepError::api(status, message));
    }

    envelope
        .data
        .ok_or_else(|| EepError::api(status, format!("response for {} '{}' had no data", entity_type, id)))
}

/// HTTP client for the project and workspace endpoints.
#[derive(Clone)]
pub struct HttpProjectApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpProjectApi {
    /// Creates a client from API settings.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EepError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        entity_type: &'static str,
        id: &str,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("[HttpProjectApi] GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EepError::network(format!("GET {} failed: {}", url, e)))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| EepError::network(format!("Reading {} failed: {}", url, e)))?;

        parse_envelope(status, &body, entity_type, id)
    }
}

#[async_trait]
impl ProjectApi for HttpProjectApi {
    async fn get_workspace_by_id(&self, workspace_id: &str) -> Result<WorkspaceEntity> {
        self.get(&format!("workspaces/{}", workspace_id), "workspace", workspace_id)
            .await
    }

    async fn get_workspace_projects(&self, workspace_id: &str) -> Result<Vec<ProjectRef>> {
        self.get(
            &format!("workspaces/{}/projects", workspace_id),
            "workspace",
            workspace_id,
        )
        .await
    }

    async fn get_project_by_id(&self, project_id: &str) -> Result<ProjectEntity> {
        self.get(&format!("projects/{}", project_id), "project", project_id)
            .await
    }
}
