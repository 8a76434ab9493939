//! On-disk workflow file formats.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::CodecError;

/// Serialization format of a workflow file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    /// Detect the format from a path's extension (case-insensitive).
    ///
    /// Returns `None` for anything other than `.json`, `.yaml`, `.yml`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Like [`FileFormat::from_path`] but fails with
    /// [`CodecError::UnsupportedFormat`].
    pub fn require(path: &Path) -> Result<Self, CodecError> {
        Self::from_path(path).ok_or_else(|| CodecError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
    }

    /// Default extension written for new files, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// `true` if the path carries a recognised workflow extension.
pub fn is_workflow_file(path: &Path) -> bool {
    FileFormat::from_path(path).is_some()
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

impl FromStr for FileFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(CodecError::UnknownFormat(other.to_string())),
        }
    }
}
