//! The remote API seam used by the reconciliation engine.

use serde::Deserialize;

use n8nctl_core::{Tag, TagId, Workflow, WorkflowId};

use crate::error::ApiError;

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// A final page with no continuation.
    pub fn last(data: Vec<T>) -> Self {
        Self {
            data,
            next_cursor: None,
        }
    }
}

/// Operations the engine needs from an n8n instance.
///
/// Every call is blocking. `get_workflow` reports an absent workflow as
/// [`ApiError::NotFound`]; other errors are failures.
pub trait WorkflowApi {
    fn list_workflows(&self, cursor: Option<&str>, limit: usize)
        -> Result<Page<Workflow>, ApiError>;
    fn get_workflow(&self, id: &WorkflowId) -> Result<Workflow, ApiError>;
    fn create_workflow(&self, workflow: &Workflow) -> Result<Workflow, ApiError>;
    fn update_workflow(&self, id: &WorkflowId, workflow: &Workflow)
        -> Result<Workflow, ApiError>;
    fn activate_workflow(&self, id: &WorkflowId) -> Result<Workflow, ApiError>;
    fn deactivate_workflow(&self, id: &WorkflowId) -> Result<Workflow, ApiError>;
    fn delete_workflow(&self, id: &WorkflowId) -> Result<(), ApiError>;

    fn list_tags(&self, cursor: Option<&str>, limit: usize) -> Result<Page<Tag>, ApiError>;
    fn create_tag(&self, name: &str) -> Result<Tag, ApiError>;
    fn set_workflow_tags(&self, id: &WorkflowId, tag_ids: &[TagId]) -> Result<Vec<Tag>, ApiError>;
}

/// Copy of `workflow` fit for a create or update body.
///
/// The server owns `id`, `active`, the timestamps and `shared`; tags go
/// through their own endpoint.
pub fn outbound_payload(workflow: &Workflow) -> Workflow {
    Workflow {
        id: None,
        active: None,
        tags: None,
        shared: None,
        created_at: None,
        updated_at: None,
        ..workflow.clone()
    }
}
