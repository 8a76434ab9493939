//! File Identity Resolver: where a fetched workflow should be written.

use std::fmt;
use std::path::{Path, PathBuf};

use n8nctl_core::{sanitize_filename, FileFormat, Workflow};

use crate::index::LocalIndex;

/// What writing a workflow to its destination amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// No tracked file (or overwrite requested): write the default path.
    Creating,
    /// Tracked file exists in the requested format: write it in place.
    Updating,
    /// Tracked file exists in the other format: write the default path in
    /// the requested format.
    Converting,
}

impl FileAction {
    /// Lower-case verb for `Would <verb> ...` messages.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Creating => "create",
            Self::Updating => "update",
            Self::Converting => "convert",
        }
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Creating => write!(f, "Creating"),
            Self::Updating => write!(f, "Updating"),
            Self::Converting => write!(f, "Converting"),
        }
    }
}

/// Lower-cased extension of `path` including the dot, or `""`.
fn dotted_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Decide the destination path and action for `workflow` in `dir`.
///
/// 1. Untracked, or `overwrite`: `dir/sanitize(name).ext`, [`FileAction::Creating`].
///    The extension follows a tracked YAML file when no `output` is forced,
///    else `output`, else JSON.
/// 2. Tracked, and `output` names the other format: the default path in the
///    requested format, [`FileAction::Converting`].
/// 3. Otherwise the tracked path as-is, [`FileAction::Updating`].
pub fn resolve_destination(
    workflow: &Workflow,
    index: &LocalIndex,
    dir: &Path,
    output: Option<FileFormat>,
    overwrite: bool,
) -> (PathBuf, FileAction) {
    let tracked = workflow.resolved_id().and_then(|id| index.get(id));

    let extension = match (tracked, output) {
        (Some(existing), None) if FileFormat::from_path(existing) == Some(FileFormat::Yaml) => {
            dotted_extension(existing)
        }
        (_, Some(FileFormat::Yaml)) => ".yaml".to_string(),
        _ => ".json".to_string(),
    };
    let default_path = dir.join(format!("{}{extension}", sanitize_filename(&workflow.name)));

    let existing = match tracked {
        Some(existing) if !overwrite => existing,
        _ => return (default_path, FileAction::Creating),
    };

    match output {
        Some(format) if FileFormat::from_path(existing) != Some(format) => {
            (default_path, FileAction::Converting)
        }
        _ => (existing.to_path_buf(), FileAction::Updating),
    }
}
