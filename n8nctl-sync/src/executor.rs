//! Sync Executor: apply one local workflow to the remote instance.
//!
//! Per workflow, strictly in this order:
//!
//! 1. content: create (no id, or id unknown remotely) or update (drift)
//! 2. activation state
//! 3. tags
//!
//! Every mutating call goes through [`execute_or_dry_run`].

use std::path::{Path, PathBuf};

use n8nctl_api::WorkflowApi;
use n8nctl_core::{codec, Workflow, WorkflowId};

use crate::error::SyncError;
use crate::planner::{plan, ChangeSet};
use crate::progress::{execute_or_dry_run, Progress};
use crate::tags::TagReconciler;

/// Result of syncing one workflow file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Remote identifier; `None` only for a dry-run create.
    pub id: Option<WorkflowId>,
    pub name: String,
    pub file_path: PathBuf,
    pub created: bool,
    pub updated: bool,
}

/// Applies workflows one at a time, sharing tag state across a pass.
pub struct Executor<'a, A: WorkflowApi + ?Sized> {
    api: &'a A,
    dry_run: bool,
    tags: TagReconciler,
    progress: Progress,
}

impl<'a, A: WorkflowApi + ?Sized> Executor<'a, A> {
    pub fn new(api: &'a A, dry_run: bool) -> Self {
        Self {
            api,
            dry_run,
            tags: TagReconciler::new(),
            progress: Progress::new(),
        }
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    pub fn into_progress(self) -> Progress {
        self.progress
    }

    /// Read `path` and sync the workflow it holds.
    pub fn sync_file(&mut self, path: &Path) -> Result<SyncOutcome, SyncError> {
        let workflow = codec::read_workflow(path)?;
        self.sync_workflow(&workflow, path)
    }

    /// Sync `workflow`, which was read from `file_path`.
    pub fn sync_workflow(
        &mut self,
        workflow: &Workflow,
        file_path: &Path,
    ) -> Result<SyncOutcome, SyncError> {
        let filename = file_path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string());

        let mut outcome = SyncOutcome {
            id: None,
            name: workflow.name.clone(),
            file_path: file_path.to_path_buf(),
            created: false,
            updated: false,
        };

        let changes = match workflow.resolved_id() {
            None => {
                let message = format!("Would create workflow '{}' from {filename}", workflow.name);
                self.create(workflow, message, &filename, &mut outcome)?;
                plan(workflow, None)
            }
            Some(id) => match self.api.get_workflow(id) {
                Err(e) if e.is_not_found() => {
                    tracing::debug!("workflow {id} not found remotely: {e}");
                    let message = format!(
                        "Would create workflow '{}' with ID {id} from {filename} (ID specified but not found on server)",
                        workflow.name
                    );
                    self.create(workflow, message, &filename, &mut outcome)?;
                    plan(workflow, None)
                }
                Err(e) => return Err(e.into()),
                Ok(remote) => {
                    let changes = plan(workflow, Some(&remote));
                    outcome.id = Some(remote.resolved_id().unwrap_or(id).clone());
                    if changes.needs_content_update {
                        self.update(workflow, id, &filename, &mut outcome)?;
                    } else {
                        let status = if self.dry_run {
                            "No content changes for"
                        } else {
                            "No changes needed for"
                        };
                        self.progress.say(format!(
                            "{status} workflow '{}' (ID: {id}) from {filename}",
                            workflow.name
                        ));
                    }
                    changes
                }
            },
        };

        let Some(id) = outcome.id.clone() else {
            return Ok(outcome);
        };

        self.apply_activation(workflow, &id, changes)?;

        if changes.needs_tag_update {
            self.tags
                .reconcile(self.api, workflow, &id, self.dry_run, &mut self.progress)?;
        }

        Ok(outcome)
    }

    fn create(
        &mut self,
        workflow: &Workflow,
        dry_run_message: String,
        filename: &str,
        outcome: &mut SyncOutcome,
    ) -> Result<(), SyncError> {
        let api = self.api;
        let created = execute_or_dry_run(&mut self.progress, self.dry_run, dry_run_message, || {
            let created = api.create_workflow(workflow)?;
            let id = created
                .resolved_id()
                .cloned()
                .ok_or_else(|| SyncError::MissingIdentifier {
                    name: workflow.name.clone(),
                })?;
            let message = format!("Created workflow '{}' (ID: {id}) from {filename}", created.name);
            Ok((id, message))
        })?;

        if let Some(id) = created {
            outcome.id = Some(id);
            outcome.created = true;
        }
        Ok(())
    }

    fn update(
        &mut self,
        workflow: &Workflow,
        id: &WorkflowId,
        filename: &str,
        outcome: &mut SyncOutcome,
    ) -> Result<(), SyncError> {
        let api = self.api;
        let updated = execute_or_dry_run(
            &mut self.progress,
            self.dry_run,
            format!("Would update workflow '{}' (ID: {id}) from {filename}", workflow.name),
            || {
                let updated = api.update_workflow(id, workflow)?;
                let message = format!(
                    "Updated workflow '{}' (ID: {}) from {filename}",
                    updated.name,
                    updated.resolved_id().unwrap_or(id)
                );
                Ok(((), message))
            },
        )?;

        outcome.updated = updated.is_some();
        Ok(())
    }

    fn apply_activation(
        &mut self,
        workflow: &Workflow,
        id: &WorkflowId,
        changes: ChangeSet,
    ) -> Result<(), SyncError> {
        let api = self.api;
        let name = &workflow.name;

        match workflow.active {
            Some(true) if changes.needs_activation => {
                execute_or_dry_run(
                    &mut self.progress,
                    self.dry_run,
                    format!("Would activate workflow '{name}' (ID: {id})"),
                    || {
                        api.activate_workflow(id)?;
                        Ok(((), format!("Activated workflow '{name}' (ID: {id})")))
                    },
                )?;
            }
            Some(false) if changes.needs_deactivation => {
                execute_or_dry_run(
                    &mut self.progress,
                    self.dry_run,
                    format!("Would deactivate workflow '{name}' (ID: {id})"),
                    || {
                        api.deactivate_workflow(id)?;
                        Ok(((), format!("Deactivated workflow '{name}' (ID: {id})")))
                    },
                )?;
            }
            _ => {}
        }
        Ok(())
    }
}
