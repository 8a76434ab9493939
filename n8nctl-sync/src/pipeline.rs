//! Reconciliation pass entrypoint used by the CLI.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use n8nctl_api::WorkflowApi;
use n8nctl_core::{codec, FileFormat, WorkflowId};

use crate::error::SyncError;
use crate::executor::{Executor, SyncOutcome};
use crate::index::{build_index, scan_workflow_files};
use crate::lookup::resolve_id_by_name;
use crate::progress::Progress;
use crate::prune::prune;
use crate::refresh::{refresh_file, refresh_with_index, RefreshOptions};
use crate::writer::WriteResult;

/// What a pass reconciles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncScope {
    /// Every workflow file in a directory.
    Directory(PathBuf),
    /// One workflow file.
    File(PathBuf),
}

/// Options for one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub scope: SyncScope,
    pub dry_run: bool,
    /// Delete remote workflows no local file tracks. Directory scope only.
    pub prune: bool,
    /// Write remote state back into local files after a non-dry run.
    pub refresh: bool,
    /// Post-sync refresh also pulls workflows that exist only remotely.
    pub all: bool,
    /// Id override for a single file.
    pub id: Option<WorkflowId>,
    /// Resolve the single file's id by exact remote name.
    pub name: Option<String>,
    /// Format used by the post-sync refresh.
    pub output: Option<FileFormat>,
}

impl SyncRequest {
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        Self::new(SyncScope::Directory(dir.into()))
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(SyncScope::File(path.into()))
    }

    fn new(scope: SyncScope) -> Self {
        Self {
            scope,
            dry_run: false,
            prune: false,
            refresh: true,
            all: false,
            id: None,
            name: None,
            output: None,
        }
    }

    /// Reject conflicting options. Never touches the network.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.id.is_some() && self.name.is_some() {
            return Err(SyncError::Validation(
                "use either --id or --name, not both".to_string(),
            ));
        }
        match &self.scope {
            SyncScope::File(_) if self.prune => Err(SyncError::Validation(
                "--prune cannot be used with --file".to_string(),
            )),
            SyncScope::Directory(_) if self.id.is_some() || self.name.is_some() => Err(
                SyncError::Validation("--id and --name require --file".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// Everything a pass did, in order.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub outcomes: Vec<SyncOutcome>,
    /// Files that failed; the pass continued past each.
    pub failures: Vec<(PathBuf, String)>,
    pub pruned: usize,
    /// Write-back results of the post-sync refresh.
    pub writes: Vec<WriteResult>,
    pub messages: Vec<String>,
    /// Set when the prune phase aborted; the pass stops there.
    pub prune_error: Option<SyncError>,
}

impl SyncReport {
    pub fn created(&self) -> usize {
        self.outcomes.iter().filter(|o| o.created).count()
    }

    pub fn updated(&self) -> usize {
        self.outcomes.iter().filter(|o| o.updated).count()
    }

    /// `Err` with the prune failure, if any.
    pub fn into_result(mut self) -> Result<Self, (Self, SyncError)> {
        match self.prune_error.take() {
            Some(e) => Err((self, e)),
            None => Ok(self),
        }
    }
}

/// Run one reconciliation pass.
///
/// Validation happens before any remote call. In a directory pass each file
/// is best-effort; prune is not. Post-sync refresh failures become warnings
/// since the remote side has already changed.
pub fn run<A: WorkflowApi + ?Sized>(api: &A, req: &SyncRequest) -> Result<SyncReport, SyncError> {
    req.validate()?;
    match &req.scope {
        SyncScope::Directory(dir) => run_directory(api, dir, req),
        SyncScope::File(path) => run_file(api, path, req),
    }
}

// ---------------------------------------------------------------------------
// Directory scope
// ---------------------------------------------------------------------------

fn run_directory<A: WorkflowApi + ?Sized>(
    api: &A,
    dir: &Path,
    req: &SyncRequest,
) -> Result<SyncReport, SyncError> {
    if !dir.is_dir() {
        return Err(SyncError::Validation(format!(
            "directory does not exist: {}",
            dir.display()
        )));
    }

    let files = scan_workflow_files(dir)?;
    tracing::debug!("syncing {} workflow file(s) from {}", files.len(), dir.display());

    let mut report = SyncReport::default();
    let mut executor = Executor::new(api, req.dry_run);

    for path in &files {
        match executor.sync_file(path) {
            Ok(outcome) => report.outcomes.push(outcome),
            Err(e) => {
                executor.progress_mut().warn(format!(
                    "Error processing workflow file {}: {e}",
                    path.display()
                ));
                report.failures.push((path.clone(), e.to_string()));
            }
        }
    }
    let mut progress = executor.into_progress();

    if req.prune {
        let local_ids = collect_local_ids(&files);
        match prune(api, &local_ids, req.dry_run, &mut progress) {
            Ok(count) => report.pruned = count,
            Err(e) => {
                report.messages = progress.into_messages();
                report.prune_error = Some(e);
                return Ok(report);
            }
        }
    }

    let synced_any = report.outcomes.iter().any(|o| o.id.is_some());
    if req.refresh && !req.dry_run && synced_any {
        post_sync_refresh(api, dir, req, &report.outcomes, &mut report.writes, &mut progress);
    }

    report.messages = progress.into_messages();
    Ok(report)
}

/// Ids that local files claim, including ones the server does not know.
fn collect_local_ids(files: &[PathBuf]) -> BTreeSet<WorkflowId> {
    let mut ids = BTreeSet::new();
    for path in files {
        match codec::extract_id(path) {
            Ok(Some(id)) => {
                ids.insert(id);
            }
            Ok(None) => {}
            Err(e) => tracing::debug!("no id in {}: {e}", path.display()),
        }
    }
    ids
}

fn post_sync_refresh<A: WorkflowApi + ?Sized>(
    api: &A,
    dir: &Path,
    req: &SyncRequest,
    outcomes: &[SyncOutcome],
    writes: &mut Vec<WriteResult>,
    progress: &mut Progress,
) {
    progress.say("Refreshing local workflow files with remote state...");
    if req.output.is_none() {
        progress.say("No output format specified, maintaining existing file formats");
    }

    let mut index = match build_index(dir) {
        Ok(index) => index,
        Err(e) => {
            progress.warn(format!("Error refreshing workflows after sync: {e}"));
            return;
        }
    };
    for outcome in outcomes.iter().filter(|o| o.created) {
        if let Some(id) = &outcome.id {
            index.insert(id.clone(), outcome.file_path.clone());
        }
    }

    let options = RefreshOptions {
        dry_run: false,
        overwrite: false,
        output: req.output,
        minimal: true,
        all: req.all,
    };
    match refresh_with_index(api, dir, &index, &options, progress) {
        Ok(results) => {
            writes.extend(results);
            progress.say("Local workflow files updated successfully with remote state");
        }
        Err(e) => progress.warn(format!("Error refreshing workflows after sync: {e}")),
    }
}

// ---------------------------------------------------------------------------
// File scope
// ---------------------------------------------------------------------------

fn run_file<A: WorkflowApi + ?Sized>(
    api: &A,
    path: &Path,
    req: &SyncRequest,
) -> Result<SyncReport, SyncError> {
    FileFormat::require(path)?;
    let mut workflow = codec::read_workflow(path)?;

    if let Some(id) = &req.id {
        workflow.id = Some(id.clone());
    } else if let Some(name) = &req.name {
        workflow.id = Some(resolve_id_by_name(api, name)?);
    }

    let mut executor = Executor::new(api, req.dry_run);
    let outcome = executor.sync_workflow(&workflow, path)?;
    let mut progress = executor.into_progress();
    let mut report = SyncReport::default();

    if req.refresh && !req.dry_run {
        if let Some(id) = outcome.id.clone() {
            progress.say("Refreshing local workflow file with remote state...");
            match refresh_file(api, path, Some(id), None, false, true, &mut progress) {
                Ok(Some(result)) => report.writes.push(result),
                Ok(None) => {}
                Err(e) => progress.warn(format!("Error refreshing workflow after sync: {e}")),
            }
        }
    }

    report.outcomes.push(outcome);
    report.messages = progress.into_messages();
    Ok(report)
}
