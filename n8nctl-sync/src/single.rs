//! Single-workflow operations: pull one workflow down, push one file up.

use std::path::{Path, PathBuf};

use n8nctl_api::WorkflowApi;
use n8nctl_core::{codec, sanitize_filename, FileFormat, WorkflowId};

use crate::error::SyncError;
use crate::executor::{Executor, SyncOutcome};
use crate::index::{build_index, find_by_name};
use crate::lookup::resolve_id_by_name;
use crate::progress::Progress;
use crate::refresh::{announce_directory, write_workflow_to_path};
use crate::writer::WriteResult;

/// `true` when a `--file` value names a file rather than a workflow: it has
/// a workflow extension or contains a path separator.
pub fn looks_like_file_path(value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    n8nctl_core::is_workflow_file(Path::new(value)) || value.contains(['/', '\\'])
}

/// Selector shared by pull and push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowTarget {
    pub directory: Option<PathBuf>,
    /// A file path, or a workflow name when it does not look like a path.
    pub file: Option<String>,
    pub id: Option<WorkflowId>,
    pub name: Option<String>,
}

impl WorkflowTarget {
    /// Split `file` into a real path or a name, rejecting `id` + `name`.
    fn split(&self) -> Result<(Option<PathBuf>, Option<String>), SyncError> {
        if self.id.is_some() && self.name.is_some() {
            return Err(SyncError::Validation(
                "use either --id or --name, not both".to_string(),
            ));
        }

        let mut name = self.name.clone().filter(|n| !n.is_empty());
        let mut file = None;
        if let Some(value) = self.file.as_deref().filter(|v| !v.is_empty()) {
            if looks_like_file_path(value) {
                file = Some(PathBuf::from(value));
            } else {
                name = Some(value.to_string());
            }
        }
        Ok((file, name))
    }
}

// ---------------------------------------------------------------------------
// pull
// ---------------------------------------------------------------------------

/// Fetch one workflow and write it locally.
///
/// The id comes from `--id`, else the remote workflow of that name, else a
/// local file of that name, else the id inside `--file`. The destination is
/// `--file`, else the indexed file for the id, else the matched local file,
/// else `directory/sanitize(name).ext`. A forced `output` swaps the
/// extension.
pub fn pull<A: WorkflowApi + ?Sized>(
    api: &A,
    target: &WorkflowTarget,
    output: Option<FileFormat>,
    dry_run: bool,
    minimal: bool,
    progress: &mut Progress,
) -> Result<Option<WriteResult>, SyncError> {
    let (file, mut name) = target.split()?;
    if target.id.is_none() && name.is_none() && file.is_none() {
        return Err(SyncError::Validation(
            "workflow id, name, or file is required".to_string(),
        ));
    }

    let local = match (&target.directory, &name) {
        (Some(dir), Some(name)) => find_by_name(dir, name)?,
        _ => None,
    };

    let mut id = target.id.clone();
    if id.is_none() {
        if let Some(wanted) = &name {
            id = match resolve_id_by_name(api, wanted) {
                Ok(found) => Some(found),
                Err(SyncError::WorkflowNameNotFound { .. }) => local
                    .as_ref()
                    .and_then(|(_, wf)| wf.resolved_id().cloned()),
                Err(e) => return Err(e),
            };
        }
    }

    if id.is_none() {
        if let Some(path) = &file {
            match codec::extract_id(path) {
                Ok(Some(found)) => id = Some(found),
                _ if name.is_none() => {
                    name = codec::read_workflow(path)
                        .ok()
                        .map(|wf| wf.name)
                        .filter(|n| !n.is_empty());
                }
                _ => {}
            }
        }
    }

    let Some(id) = id else {
        return Err(match name {
            None => SyncError::Validation("workflow id or name is required".to_string()),
            Some(name) => SyncError::Validation(format!(
                "workflow '{name}' not found on server and no local ID in {}",
                target
                    .directory
                    .as_deref()
                    .map(|d| d.display().to_string())
                    .unwrap_or_default()
            )),
        });
    };

    let workflow = api.get_workflow(&id)?;
    let name = name.unwrap_or_else(|| workflow.name.clone());

    let mut path = match file {
        Some(path) => path,
        None => {
            let indexed = match &target.directory {
                Some(dir) => build_index(dir)?.get(&id).map(Path::to_path_buf),
                None => None,
            };
            match (indexed, local) {
                (Some(path), _) => path,
                (None, Some((path, _))) => path,
                (None, None) => {
                    let dir = target.directory.as_ref().ok_or_else(|| {
                        SyncError::Validation(
                            "directory is required when no file path is provided".to_string(),
                        )
                    })?;
                    let format = output.unwrap_or(FileFormat::Json);
                    dir.join(format!("{}.{}", sanitize_filename(&name), format.extension()))
                }
            }
        }
    };

    if let Some(format) = output {
        path.set_extension(format.extension());
    }
    FileFormat::require(&path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        announce_directory(parent, dry_run, progress)?;
    }

    write_workflow_to_path(&workflow, &path, dry_run, minimal, progress)
}

// ---------------------------------------------------------------------------
// push
// ---------------------------------------------------------------------------

/// Sync one local file to the remote instance.
///
/// The file is `--file`, or the file in `directory` matching `--name`. An
/// explicit `--id` overrides the file's id; otherwise a remote workflow of
/// the same name supplies it. A name unknown remotely is not an error: the
/// workflow is created.
pub fn push<A: WorkflowApi + ?Sized>(
    api: &A,
    target: &WorkflowTarget,
    dry_run: bool,
    progress: &mut Progress,
) -> Result<SyncOutcome, SyncError> {
    let (file, mut name) = target.split()?;

    let path = match (file, &name) {
        (Some(path), _) => path,
        (None, Some(wanted)) => {
            let dir = target
                .directory
                .clone()
                .unwrap_or_else(|| PathBuf::from("."));
            let (path, workflow) = find_by_name(&dir, wanted)?
                .ok_or_else(|| SyncError::FileNotFound(wanted.clone()))?;
            if name.is_none() {
                name = Some(workflow.name);
            }
            path
        }
        (None, None) => {
            return Err(SyncError::Validation(
                "workflow name or file is required".to_string(),
            ))
        }
    };

    FileFormat::require(&path)?;
    let mut workflow = codec::read_workflow(&path)?;

    if let Some(id) = &target.id {
        workflow.id = Some(id.clone());
    } else if let Some(wanted) = &name {
        match resolve_id_by_name(api, wanted) {
            Ok(id) => workflow.id = Some(id),
            Err(SyncError::WorkflowNameNotFound { .. }) => {}
            Err(e) => return Err(e),
        }
    }

    let mut executor = Executor::new(api, dry_run);
    let outcome = executor.sync_workflow(&workflow, &path)?;
    progress.extend(executor.into_progress());

    if let Some(id) = &outcome.id {
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        progress.say(format!(
            "Workflow '{}' synced (ID: {id}) from {filename}",
            workflow.name
        ));
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use n8nctl_api::fake::{Call, FakeApi};
    use n8nctl_core::Workflow;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[rstest]
    #[case("flow.json", true)]
    #[case("flow.YML", true)]
    #[case("dir/flow", true)]
    #[case("dir\\flow", true)]
    #[case("My Flow", false)]
    #[case("report.v2", false)]
    #[case("", false)]
    fn file_path_heuristic(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(looks_like_file_path(value), expected);
    }

    fn remote(id: &str, name: &str) -> Workflow {
        let mut wf = Workflow::named(name);
        wf.id = Some(WorkflowId::from(id));
        wf
    }

    #[test]
    fn pull_by_name_writes_default_path() {
        let tmp = TempDir::new().unwrap();
        let api = FakeApi::new().with_workflow(remote("5", "Daily Report"));
        let target = WorkflowTarget {
            directory: Some(tmp.path().to_path_buf()),
            file: Some("Daily Report".to_string()),
            ..WorkflowTarget::default()
        };
        let mut progress = Progress::new();

        let result = pull(&api, &target, Some(FileFormat::Yaml), false, true, &mut progress)
            .unwrap()
            .unwrap();

        assert_eq!(result.path(), tmp.path().join("Daily_Report.yaml"));
        assert_eq!(
            codec::extract_id(result.path()).unwrap(),
            Some(WorkflowId::from("5"))
        );
    }

    #[test]
    fn pull_falls_back_to_local_id() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("local.json"),
            r#"{"id": "5", "name": "Old Name"}"#,
        )
        .unwrap();
        let api = FakeApi::new().with_workflow(remote("5", "New Name"));
        let target = WorkflowTarget {
            directory: Some(tmp.path().to_path_buf()),
            name: Some("Old Name".to_string()),
            ..WorkflowTarget::default()
        };
        let mut progress = Progress::new();

        let result = pull(&api, &target, None, false, true, &mut progress)
            .unwrap()
            .unwrap();
        assert_eq!(result.path(), tmp.path().join("local.json"));
        assert_eq!(codec::read_workflow(result.path()).unwrap().name, "New Name");
    }

    #[test]
    fn pull_rejects_id_and_name() {
        let api = FakeApi::new();
        let target = WorkflowTarget {
            id: Some(WorkflowId::from("1")),
            name: Some("x".to_string()),
            ..WorkflowTarget::default()
        };
        let err = pull(&api, &target, None, false, true, &mut Progress::new()).unwrap_err();
        assert!(matches!(err, SyncError::Validation(_)));
        assert!(api.reads().is_empty());
    }

    #[test]
    fn push_by_name_creates_when_unknown_remotely() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("new.json"), r#"{"name": "Brand New"}"#).unwrap();
        let api = FakeApi::new();
        let target = WorkflowTarget {
            directory: Some(tmp.path().to_path_buf()),
            name: Some("Brand New".to_string()),
            ..WorkflowTarget::default()
        };
        let mut progress = Progress::new();

        let outcome = push(&api, &target, false, &mut progress).unwrap();

        assert!(outcome.created);
        assert_eq!(api.calls(), vec![Call::CreateWorkflow("Brand New".to_string())]);
        assert!(progress
            .messages()
            .last()
            .unwrap()
            .starts_with("Workflow 'Brand New' synced (ID: "));
    }

    #[test]
    fn push_resolves_remote_id_by_name() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("flow.json");
        fs::write(&path, r#"{"name": "Flow", "nodes": [{"name": "Changed"}]}"#).unwrap();
        let api = FakeApi::new().with_workflow(remote("8", "Flow"));
        let target = WorkflowTarget {
            file: Some(path.display().to_string()),
            name: Some("Flow".to_string()),
            ..WorkflowTarget::default()
        };

        let outcome = push(&api, &target, false, &mut Progress::new()).unwrap();

        assert!(outcome.updated);
        assert_eq!(api.calls(), vec![Call::UpdateWorkflow(WorkflowId::from("8"))]);
    }

    #[test]
    fn push_missing_name_is_file_not_found() {
        let tmp = TempDir::new().unwrap();
        let target = WorkflowTarget {
            directory: Some(tmp.path().to_path_buf()),
            name: Some("Nope".to_string()),
            ..WorkflowTarget::default()
        };
        let err = push(&FakeApi::new(), &target, false, &mut Progress::new()).unwrap_err();
        assert!(matches!(err, SyncError::FileNotFound(_)));
    }
}
