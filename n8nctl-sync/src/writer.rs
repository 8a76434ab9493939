//! Write-back of workflow files.
//!
//! Encoded content is compared with the bytes already on disk and only
//! written when it differs. Writes go to a sibling `.n8nctl.tmp` file first
//! and are renamed into place, so a crash never leaves a half-written
//! workflow behind.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

/// What happened to one destination file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    Written { path: PathBuf },
    /// On-disk bytes already matched.
    Unchanged { path: PathBuf },
    /// Dry-run: a write was needed but skipped.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            Self::Written { path } | Self::Unchanged { path } | Self::WouldWrite { path } => path,
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".n8nctl.tmp");
    PathBuf::from(name)
}

/// Write `content` to `path` through a staging file, creating parents.
///
/// Line endings are normalised to LF first.
pub fn atomic_write(path: &Path, content: &str, dry_run: bool) -> Result<WriteResult, SyncError> {
    write_via(path, content, dry_run, &staging_path(path))
}

fn write_via(
    path: &Path,
    content: &str,
    dry_run: bool,
    staging: &Path,
) -> Result<WriteResult, SyncError> {
    let content = content.replace("\r\n", "\n");
    let owned = path.to_path_buf();

    if fs::read(path).is_ok_and(|on_disk| on_disk == content.as_bytes()) {
        tracing::debug!("{} already up to date", path.display());
        return Ok(WriteResult::Unchanged { path: owned });
    }

    if dry_run {
        tracing::debug!("dry-run: {} not written", path.display());
        return Ok(WriteResult::WouldWrite { path: owned });
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    fs::write(staging, &content).map_err(|e| io_err(staging, e))?;
    fs::rename(staging, path).map_err(|e| {
        let _ = fs::remove_file(staging);
        io_err(path, e)
    })?;

    tracing::debug!("wrote {} ({} bytes)", path.display(), content.len());
    Ok(WriteResult::Written { path: owned })
}

/// Create `dir` (and parents) unless it exists. Returns `true` when it had
/// to be created (or would have been, in dry-run).
pub fn ensure_directory_exists(dir: &Path, dry_run: bool) -> Result<bool, SyncError> {
    if dir.is_dir() {
        return Ok(false);
    }
    if !dry_run {
        fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }
    Ok(true)
}
