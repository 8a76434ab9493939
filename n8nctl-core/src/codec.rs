//! Workflow file codec.
//!
//! # File shape
//!
//! ```text
//! <dir>/
//!   My_Workflow.json      pretty JSON, 2-space indent, sorted keys
//!   Other.yaml            "---\n" + YAML document
//! ```
//!
//! Every written file carries one extra top-level key, `originalName`, which
//! remembers the name the file was first written under. It is not part of
//! [`Workflow`] and is dropped on decode, so it never registers as drift.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::drift::normalize;
use crate::error::{io_err, CodecError};
use crate::format::FileFormat;
use crate::types::{Workflow, WorkflowId};

/// Top-level key holding the persisted original name.
pub const ORIGINAL_NAME_KEY: &str = "originalName";

/// Leading YAML document marker on every written YAML file.
pub const YAML_DOCUMENT_MARKER: &str = "---\n";

// ---------------------------------------------------------------------------
// 1. Decode
// ---------------------------------------------------------------------------

/// Decode a workflow from bytes in a known format.
pub fn decode(bytes: &[u8], format: FileFormat) -> Result<Workflow, CodecError> {
    match format {
        FileFormat::Json => Ok(serde_json::from_slice(bytes)?),
        FileFormat::Yaml => Ok(serde_yaml::from_slice(bytes)?),
    }
}

/// Decode a workflow, sniffing the format from the first bytes.
///
/// Leading `{` or `[` means JSON; a leading `---` or no braces at all means
/// YAML; anything else is tried as JSON, then YAML.
pub fn decode_auto(bytes: &[u8]) -> Result<Workflow, CodecError> {
    let head: String = String::from_utf8_lossy(&bytes[..bytes.len().min(50)]).into_owned();
    let head = head.trim_start();

    if head.starts_with('{') || head.starts_with('[') {
        return decode(bytes, FileFormat::Json);
    }
    if head.starts_with("---") || (!head.contains('{') && !head.contains('[')) {
        return decode(bytes, FileFormat::Yaml);
    }

    match decode(bytes, FileFormat::Json) {
        Ok(workflow) => Ok(workflow),
        Err(_) => decode(bytes, FileFormat::Yaml),
    }
}

/// Read and fully decode a workflow file.
///
/// Returns [`CodecError::UnsupportedFormat`] for unknown extensions and
/// [`CodecError::Parse`] (with the path) for malformed content.
pub fn read_workflow(path: &Path) -> Result<Workflow, CodecError> {
    let format = FileFormat::require(path)?;
    let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
    tracing::debug!("read {} ({} bytes)", path.display(), bytes.len());
    decode(&bytes, format).map_err(|e| CodecError::Parse {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

// ---------------------------------------------------------------------------
// 2. Cheap probes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct IdProbe {
    #[serde(default)]
    id: Option<Value>,
}

#[derive(Deserialize)]
struct MarkerProbe {
    #[serde(default, rename = "originalName")]
    original_name: Option<Value>,
}

fn probe<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, CodecError> {
    let format = FileFormat::require(path)?;
    let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
    let parsed = match format {
        FileFormat::Json => serde_json::from_slice(&bytes).map_err(CodecError::from),
        FileFormat::Yaml => serde_yaml::from_slice(&bytes).map_err(CodecError::from),
    };
    parsed.map_err(|e| CodecError::Parse {
        path: path.to_path_buf(),
        source: Box::new(e),
    })
}

/// Read only the `id` field of a workflow file.
///
/// Returns `Ok(None)` when the file has no (string, non-empty) identifier.
pub fn extract_id(path: &Path) -> Result<Option<WorkflowId>, CodecError> {
    let probe: IdProbe = probe(path)?;
    Ok(probe
        .id
        .as_ref()
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(WorkflowId::from))
}

/// Read the persisted `originalName` marker, if the file has a non-empty one.
///
/// Unreadable or malformed files yield `None`.
pub fn extract_original_name(path: &Path) -> Option<String> {
    let probe: MarkerProbe = probe(path).ok()?;
    probe
        .original_name
        .as_ref()
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}

// ---------------------------------------------------------------------------
// 3. Encode
// ---------------------------------------------------------------------------

/// Serialize a workflow for writing to disk.
///
/// With `minimal`, the workflow is normalized first (timestamps, ownership
/// and tag timestamps dropped). `original_name`, when non-empty, is written
/// under [`ORIGINAL_NAME_KEY`].
pub fn encode(
    workflow: &Workflow,
    format: FileFormat,
    original_name: Option<&str>,
    minimal: bool,
) -> Result<String, CodecError> {
    let source = if minimal {
        normalize(workflow)
    } else {
        workflow.clone()
    };

    let mut value = serde_json::to_value(&source)?;
    if let (Some(name), Value::Object(map)) = (original_name.filter(|n| !n.is_empty()), &mut value)
    {
        map.entry(ORIGINAL_NAME_KEY)
            .or_insert_with(|| Value::String(name.to_string()));
    }

    match format {
        FileFormat::Json => {
            let mut json = serde_json::to_string_pretty(&value)?;
            json.push('\n');
            Ok(json)
        }
        FileFormat::Yaml => {
            let yaml = serde_yaml::to_string(&value)?;
            Ok(format!("{YAML_DOCUMENT_MARKER}{yaml}"))
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
