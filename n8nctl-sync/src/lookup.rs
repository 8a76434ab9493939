//! Remote lookup by workflow name.

use n8nctl_api::{fetch_all, WorkflowApi};
use n8nctl_core::WorkflowId;

use crate::error::SyncError;

/// Id of the first remote workflow named exactly `name` that has one.
pub fn resolve_id_by_name<A: WorkflowApi + ?Sized>(
    api: &A,
    name: &str,
) -> Result<WorkflowId, SyncError> {
    fetch_all(api)?
        .into_iter()
        .filter(|w| w.name == name)
        .find_map(|w| w.resolved_id().cloned())
        .ok_or_else(|| SyncError::WorkflowNameNotFound {
            name: name.to_string(),
        })
}
