//! Local Workflow Index: workflow id -> file path for one directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use n8nctl_core::{codec, FileFormat, Workflow, WorkflowId};

use crate::error::{io_err, SyncError};

/// Mapping from workflow identifier to the local file that tracks it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalIndex {
    entries: BTreeMap<WorkflowId, PathBuf>,
}

impl LocalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &WorkflowId) -> Option<&Path> {
        self.entries.get(id).map(PathBuf::as_path)
    }

    pub fn contains(&self, id: &WorkflowId) -> bool {
        self.entries.contains_key(id)
    }

    /// Track `path` for `id`, replacing any previous entry.
    pub fn insert(&mut self, id: WorkflowId, path: PathBuf) {
        self.entries.insert(id, path);
    }

    /// Track `path` for `id` unless an existing entry wins the collision.
    ///
    /// A YAML file beats a JSON file; between files of the same format the
    /// later one wins.
    pub fn insert_scanned(&mut self, id: WorkflowId, path: PathBuf) {
        if let Some(existing) = self.entries.get(&id) {
            let existing_yaml = FileFormat::from_path(existing) == Some(FileFormat::Yaml);
            let incoming_yaml = FileFormat::from_path(&path) == Some(FileFormat::Yaml);
            if existing_yaml && !incoming_yaml {
                tracing::debug!(
                    "id {id}: keeping {} over {}",
                    existing.display(),
                    path.display()
                );
                return;
            }
            tracing::debug!(
                "id {id}: {} replaces {}",
                path.display(),
                existing.display()
            );
        }
        self.entries.insert(id, path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &WorkflowId> {
        self.entries.keys()
    }
}

// ---------------------------------------------------------------------------
// Directory scan
// ---------------------------------------------------------------------------

/// Immediate workflow files in `dir`, sorted by file name.
///
/// A missing directory yields an empty list.
pub fn scan_workflow_files(dir: &Path) -> Result<Vec<PathBuf>, SyncError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|e| e.ok())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    Ok(entries
        .into_iter()
        .map(|e| e.path())
        .filter(|p| p.is_file() && n8nctl_core::is_workflow_file(p))
        .collect())
}

/// Build the id -> path index for `dir`.
///
/// Only the `id` field of each file is read. Files that fail to parse or
/// carry no identifier are skipped.
pub fn build_index(dir: &Path) -> Result<LocalIndex, SyncError> {
    let mut index = LocalIndex::new();

    for path in scan_workflow_files(dir)? {
        match codec::extract_id(&path) {
            Ok(Some(id)) => index.insert_scanned(id, path),
            Ok(None) => tracing::debug!("no id in {}", path.display()),
            Err(e) => tracing::warn!("skipping {}: {e}", path.display()),
        }
    }

    tracing::debug!("indexed {} workflow(s) in {}", index.len(), dir.display());
    Ok(index)
}

/// Find the local file for a workflow called `name`.
///
/// A file whose persisted original name matches is preferred over one whose
/// current `name` matches. Unparseable files are skipped.
pub fn find_by_name(dir: &Path, name: &str) -> Result<Option<(PathBuf, Workflow)>, SyncError> {
    if name.is_empty() {
        return Ok(None);
    }

    for path in scan_workflow_files(dir)? {
        let workflow = match codec::read_workflow(&path) {
            Ok(workflow) => workflow,
            Err(e) => {
                tracing::warn!("skipping {}: {e}", path.display());
                continue;
            }
        };
        let marker = codec::extract_original_name(&path);
        if marker.as_deref() == Some(name) || workflow.name == name {
            return Ok(Some((path, workflow)));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn missing_directory_is_empty_index() {
        let tmp = TempDir::new().unwrap();
        let index = build_index(&tmp.path().join("absent")).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn yaml_wins_over_json_regardless_of_order() {
        let tmp = TempDir::new().unwrap();
        let yaml = write(tmp.path(), "a.yaml", "id: \"1\"\nname: A\n");
        write(tmp.path(), "b.json", r#"{"id": "1", "name": "A"}"#);

        let index = build_index(tmp.path()).unwrap();
        assert_eq!(index.get(&WorkflowId::from("1")), Some(yaml.as_path()));
    }

    #[test]
    fn later_file_of_same_format_wins() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.json", r#"{"id": "1", "name": "A"}"#);
        let later = write(tmp.path(), "b.json", r#"{"id": "1", "name": "A copy"}"#);

        let index = build_index(tmp.path()).unwrap();
        assert_eq!(index.get(&WorkflowId::from("1")), Some(later.as_path()));
    }

    #[test]
    fn skips_broken_idless_and_foreign_files() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "broken.json", "{ nope");
        write(tmp.path(), "new.json", r#"{"name": "New"}"#);
        write(tmp.path(), "notes.txt", "id: 5");
        fs::create_dir(tmp.path().join("nested.json")).unwrap();
        write(tmp.path(), "ok.yml", "---\nid: \"5\"\nname: Ok\n");

        let index = build_index(tmp.path()).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.contains(&WorkflowId::from("5")));
    }

    #[test]
    fn find_by_name_prefers_original_name_marker() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.json", r#"{"name": "Other", "originalName": "Report"}"#);
        write(tmp.path(), "b.json", r#"{"name": "Report"}"#);

        let (path, workflow) = find_by_name(tmp.path(), "Report").unwrap().unwrap();
        assert!(path.ends_with("a.json"));
        assert_eq!(workflow.name, "Other");
        assert!(find_by_name(tmp.path(), "Missing").unwrap().is_none());
    }
}
