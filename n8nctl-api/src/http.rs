//! Blocking HTTP implementation of [`WorkflowApi`] over the n8n public API.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use n8nctl_core::{Tag, TagId, Workflow, WorkflowId};

use crate::client::{outbound_payload, Page, WorkflowApi};
use crate::error::ApiError;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// Per-request timeout applied by [`HttpClient::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for `<instance>/api/v1`.
pub struct HttpClient {
    base_url: String,
    api_key: String,
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new(instance_url: &str, api_key: impl Into<String>) -> Self {
        Self::with_timeout(instance_url, api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(instance_url: &str, api_key: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: format!("{}/api/v1", instance_url.trim_end_matches('/')),
            api_key: api_key.into(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        self.agent
            .request(method, &format!("{}{}", self.base_url, path))
            .set(API_KEY_HEADER, &self.api_key)
            .set("Accept", "application/json")
    }

    fn send(
        &self,
        request: ureq::Request,
        body: Option<serde_json::Value>,
    ) -> Result<ureq::Response, ApiError> {
        let url = request.url().to_string();
        tracing::debug!("{} {}", request.method(), url);
        if let Some(body) = &body {
            tracing::debug!("request body: {body}");
        }

        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        match result {
            Ok(response) => {
                tracing::debug!("response status {} from {url}", response.status());
                Ok(response)
            }
            Err(ureq::Error::Status(404, _)) => Err(ApiError::NotFound { url }),
            Err(ureq::Error::Status(status, response)) => Err(ApiError::Status {
                status,
                url,
                body: response.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(transport)) => Err(ApiError::Transport {
                url,
                source: Box::new(transport),
            }),
        }
    }

    fn send_for<T: DeserializeOwned>(
        &self,
        request: ureq::Request,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let url = request.url().to_string();
        let response = self.send(request, body)?;
        response
            .into_json::<T>()
            .map_err(|source| ApiError::Decode { url, source })
    }

    fn listing(&self, path: &str, cursor: Option<&str>, limit: usize) -> ureq::Request {
        let request = self.request("GET", path).query("limit", &limit.to_string());
        match cursor {
            Some(cursor) => request.query("cursor", cursor),
            None => request,
        }
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<Option<serde_json::Value>, ApiError> {
    serde_json::to_value(value)
        .map(Some)
        .map_err(|source| ApiError::Encode { source })
}

impl WorkflowApi for HttpClient {
    fn list_workflows(
        &self,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<Workflow>, ApiError> {
        self.send_for(self.listing("/workflows", cursor, limit), None)
    }

    fn get_workflow(&self, id: &WorkflowId) -> Result<Workflow, ApiError> {
        self.send_for(self.request("GET", &format!("/workflows/{id}")), None)
    }

    fn create_workflow(&self, workflow: &Workflow) -> Result<Workflow, ApiError> {
        let body = to_body(&outbound_payload(workflow))?;
        self.send_for(self.request("POST", "/workflows"), body)
    }

    fn update_workflow(&self, id: &WorkflowId, workflow: &Workflow) -> Result<Workflow, ApiError> {
        let body = to_body(&outbound_payload(workflow))?;
        self.send_for(self.request("PUT", &format!("/workflows/{id}")), body)
    }

    fn activate_workflow(&self, id: &WorkflowId) -> Result<Workflow, ApiError> {
        self.send_for(self.request("POST", &format!("/workflows/{id}/activate")), None)
    }

    fn deactivate_workflow(&self, id: &WorkflowId) -> Result<Workflow, ApiError> {
        self.send_for(self.request("POST", &format!("/workflows/{id}/deactivate")), None)
    }

    fn delete_workflow(&self, id: &WorkflowId) -> Result<(), ApiError> {
        self.send(self.request("DELETE", &format!("/workflows/{id}")), None)?;
        Ok(())
    }

    fn list_tags(&self, cursor: Option<&str>, limit: usize) -> Result<Page<Tag>, ApiError> {
        self.send_for(self.listing("/tags", cursor, limit), None)
    }

    fn create_tag(&self, name: &str) -> Result<Tag, ApiError> {
        self.send_for(self.request("POST", "/tags"), Some(json!({ "name": name })))
    }

    fn set_workflow_tags(&self, id: &WorkflowId, tag_ids: &[TagId]) -> Result<Vec<Tag>, ApiError> {
        let body: Vec<serde_json::Value> = tag_ids.iter().map(|t| json!({ "id": t })).collect();
        self.send_for(
            self.request("PUT", &format!("/workflows/{id}/tags")),
            Some(serde_json::Value::Array(body)),
        )
    }
}
