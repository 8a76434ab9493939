//! Error types for n8nctl-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while reading or writing workflow files.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Underlying I/O failure, with the offending path.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File extension is not one of `.json`, `.yaml`, `.yml`.
    #[error("unsupported workflow file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Unknown `--output` style format name.
    #[error("unsupported output format '{0}'; expected: json, yaml")]
    UnknownFormat(String),

    /// JSON parse or serialization failure.
    #[error("invalid JSON workflow: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parse or serialization failure.
    #[error("invalid YAML workflow: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Parse failure annotated with the file it came from.
    #[error("failed to parse workflow file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<CodecError>,
    },
}

/// Convenience constructor for [`CodecError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CodecError {
    CodecError::Io {
        path: path.into(),
        source,
    }
}
