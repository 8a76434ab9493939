//! Pruner: delete remote workflows that no local file tracks.

use std::collections::BTreeSet;

use n8nctl_api::{fetch_all, WorkflowApi};
use n8nctl_core::WorkflowId;

use crate::error::SyncError;
use crate::progress::{execute_or_dry_run, Progress};

/// Delete every remote workflow whose id is not in `local_ids`.
///
/// Remote workflows without an identifier are never touched. The first
/// failed delete aborts the pass. Returns how many workflows were deleted
/// (or would have been, in dry-run).
pub fn prune<A: WorkflowApi + ?Sized>(
    api: &A,
    local_ids: &BTreeSet<WorkflowId>,
    dry_run: bool,
    progress: &mut Progress,
) -> Result<usize, SyncError> {
    let remote = fetch_all(api)?;
    let mut count = 0;

    for workflow in &remote {
        let Some(id) = workflow.resolved_id() else {
            continue;
        };
        if local_ids.contains(id) {
            continue;
        }

        let name = &workflow.name;
        execute_or_dry_run(
            progress,
            dry_run,
            format!("Would delete workflow '{name}' (ID: {id}) that was not in local files"),
            || {
                api.delete_workflow(id)?;
                Ok((
                    (),
                    format!("Deleted workflow '{name}' (ID: {id}) that was not in local files"),
                ))
            },
        )?;
        count += 1;
    }

    tracing::debug!("pruned {count} of {} remote workflow(s)", remote.len());
    Ok(count)
}
