//! Error types for n8nctl-sync.

use std::path::PathBuf;

use thiserror::Error;

use n8nctl_api::ApiError;
use n8nctl_core::CodecError;

/// All errors that can arise from reconciliation operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error talking to the remote instance.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A workflow file could not be read or encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Conflicting or incomplete options; raised before any remote call.
    #[error("{0}")]
    Validation(String),

    /// No remote workflow carries this exact name.
    #[error("workflow with name '{name}' not found")]
    WorkflowNameNotFound { name: String },

    /// A created or fetched workflow came back without an identifier.
    #[error("workflow '{name}' has no identifier")]
    MissingIdentifier { name: String },

    /// No local file matches the requested name or path.
    #[error("no workflow file found for '{0}'")]
    FileNotFound(String),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
