//! Refresh: write canonical remote state back into local files.
//!
//! The destination of every write comes from the File Identity Resolver, and
//! the `originalName` marker already in a tracked file is carried forward so
//! a remote rename never moves the file.

use std::path::Path;

use n8nctl_api::{fetch_all, WorkflowApi};
use n8nctl_core::{codec, has_drift, FileFormat, Workflow, WorkflowId};

use crate::error::SyncError;
use crate::identity::{resolve_destination, FileAction};
use crate::index::{build_index, LocalIndex};
use crate::lookup::resolve_id_by_name;
use crate::progress::Progress;
use crate::writer::{atomic_write, ensure_directory_exists, WriteResult};

/// Options for a refresh pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOptions {
    pub dry_run: bool,
    /// Ignore tracked paths and write every workflow to its default path.
    pub overwrite: bool,
    /// Force this format; `None` keeps each tracked file's format.
    pub output: Option<FileFormat>,
    /// Drop server-owned fields from written files.
    pub minimal: bool,
    /// Fetch every remote workflow, not only those tracked locally.
    pub all: bool,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            overwrite: false,
            output: None,
            minimal: true,
            all: false,
        }
    }
}

/// Refresh the workflow files in `dir`, creating the directory if needed.
pub fn refresh_directory<A: WorkflowApi + ?Sized>(
    api: &A,
    dir: &Path,
    options: &RefreshOptions,
    progress: &mut Progress,
) -> Result<Vec<WriteResult>, SyncError> {
    announce_directory(dir, options.dry_run, progress)?;
    let index = build_index(dir)?;
    // An untracked directory is seeded from the whole instance.
    let options = RefreshOptions {
        all: options.all || index.is_empty(),
        ..*options
    };
    refresh_with_index(api, dir, &index, &options, progress)
}

/// Refresh against a prepared index.
///
/// With `all`, every remote workflow is written and the first write failure
/// aborts. Otherwise each tracked id is fetched; a failed fetch is a warning
/// and the pass continues.
pub fn refresh_with_index<A: WorkflowApi + ?Sized>(
    api: &A,
    dir: &Path,
    index: &LocalIndex,
    options: &RefreshOptions,
    progress: &mut Progress,
) -> Result<Vec<WriteResult>, SyncError> {
    let mut results = Vec::new();

    if options.all {
        progress.say("Refreshing all workflows from n8n instance");
        let remote = fetch_all(api)?;
        if remote.is_empty() {
            progress.say("No workflows found in n8n instance");
            return Ok(results);
        }
        for workflow in &remote {
            if let Some(result) = write_workflow(workflow, index, dir, options, progress)? {
                results.push(result);
            }
        }
        return Ok(results);
    }

    progress.say("Refreshing only workflows that exist in the directory");
    let mut refreshed = 0;
    for id in index.ids() {
        let workflow = match api.get_workflow(id) {
            Ok(workflow) => workflow,
            Err(e) => {
                progress.warn(format!(
                    "Warning: Could not fetch workflow with ID {id}: {e}"
                ));
                continue;
            }
        };
        if let Some(result) = write_workflow(&workflow, index, dir, options, progress)? {
            results.push(result);
        }
        refreshed += 1;
    }

    if refreshed == 0 {
        progress.say(
            "No workflows were refreshed. Either the local workflows don't exist in the n8n \
             instance or there was an error fetching them. Try refresh --all and delete the \
             local files you don't want to track.",
        );
    }

    Ok(results)
}

/// Write one fetched workflow into `dir`, resolving its destination.
///
/// Workflows without an identifier are skipped with a message.
pub fn write_workflow(
    workflow: &Workflow,
    index: &LocalIndex,
    dir: &Path,
    options: &RefreshOptions,
    progress: &mut Progress,
) -> Result<Option<WriteResult>, SyncError> {
    let Some(id) = workflow.resolved_id() else {
        progress.say(format!("Skipping workflow '{}' with no ID", workflow.name));
        return Ok(None);
    };

    let (path, action) = resolve_destination(workflow, index, dir, options.output, options.overwrite);
    let tracked = index.get(id);
    write_resolved(
        workflow,
        id,
        &path,
        action,
        tracked,
        options.dry_run,
        options.minimal,
        progress,
    )
    .map(Some)
}

/// Write one fetched workflow to an explicit `path`.
pub fn write_workflow_to_path(
    workflow: &Workflow,
    path: &Path,
    dry_run: bool,
    minimal: bool,
    progress: &mut Progress,
) -> Result<Option<WriteResult>, SyncError> {
    let Some(id) = workflow.resolved_id() else {
        progress.say(format!("Skipping workflow '{}' with no ID", workflow.name));
        return Ok(None);
    };

    let (action, tracked) = if path.exists() {
        (FileAction::Updating, Some(path))
    } else {
        (FileAction::Creating, None)
    };
    write_resolved(workflow, id, path, action, tracked, dry_run, minimal, progress).map(Some)
}

#[allow(clippy::too_many_arguments)]
fn write_resolved(
    workflow: &Workflow,
    id: &WorkflowId,
    path: &Path,
    action: FileAction,
    tracked: Option<&Path>,
    dry_run: bool,
    minimal: bool,
    progress: &mut Progress,
) -> Result<WriteResult, SyncError> {
    let marker = tracked.and_then(codec::extract_original_name);
    let original_name = marker.as_deref().unwrap_or(workflow.name.as_str());

    let format = FileFormat::require(path)?;
    let content = codec::encode(workflow, format, Some(original_name), minimal)?;

    if action == FileAction::Updating
        && marker.is_some()
        && !needs_update(path, tracked, &content, format, minimal)
    {
        progress.say(format!(
            "No changes for workflow '{}' (ID: {id}) in file: {}",
            workflow.name,
            path.display()
        ));
        return Ok(WriteResult::Unchanged {
            path: path.to_path_buf(),
        });
    }

    if dry_run {
        progress.say(format!(
            "Would {} workflow '{}' (ID: {id}) to file: {}",
            action.verb(),
            workflow.name,
            path.display()
        ));
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    let result = atomic_write(path, &content, false)?;
    progress.say(format!(
        "{action} workflow '{}' (ID: {id}) to file: {}",
        workflow.name,
        path.display()
    ));
    Ok(result)
}

/// `true` unless `path` already decodes to the same workflow as `content`.
fn needs_update(
    path: &Path,
    tracked: Option<&Path>,
    content: &str,
    format: FileFormat,
    minimal: bool,
) -> bool {
    if !path.exists() {
        return true;
    }
    if tracked.map(FileFormat::from_path) != Some(Some(format)) {
        return true;
    }

    let Ok(existing) = codec::read_workflow(path) else {
        return true;
    };
    let Ok(incoming) = codec::decode(content.as_bytes(), format) else {
        return true;
    };
    has_drift(&existing, &incoming, minimal)
}

/// Ensure `dir` exists, reporting when it had to be created.
pub fn announce_directory(dir: &Path, dry_run: bool, progress: &mut Progress) -> Result<(), SyncError> {
    if ensure_directory_exists(dir, dry_run)? {
        if dry_run {
            progress.say(format!("Would create directory: {}", dir.display()));
        } else {
            progress.say(format!("Created directory: {}", dir.display()));
        }
    }
    Ok(())
}

/// Refresh one file by `id`, by `name`, or by whatever the file itself holds.
pub fn refresh_file<A: WorkflowApi + ?Sized>(
    api: &A,
    path: &Path,
    id: Option<WorkflowId>,
    name: Option<String>,
    dry_run: bool,
    minimal: bool,
    progress: &mut Progress,
) -> Result<Option<WriteResult>, SyncError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        announce_directory(parent, dry_run, progress)?;
    }

    let (mut id, mut name) = (id, name);
    if id.is_none() && name.is_none() && path.exists() {
        match codec::extract_id(path) {
            Ok(Some(found)) => id = Some(found),
            _ => {
                if let Ok(workflow) = codec::read_workflow(path) {
                    name = Some(workflow.name).filter(|n| !n.is_empty());
                }
            }
        }
    }

    let id = match (id, name) {
        (Some(id), _) => id,
        (None, Some(name)) => resolve_id_by_name(api, &name)?,
        (None, None) => {
            return Err(SyncError::Validation(
                "workflow id or name is required when using --file".to_string(),
            ))
        }
    };

    let workflow = api.get_workflow(&id)?;
    write_workflow_to_path(&workflow, path, dry_run, minimal, progress)
}
