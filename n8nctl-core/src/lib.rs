//! n8nctl core library: workflow model, file codec, drift detection.
//!
//! - [`types`]: newtypes and domain structs
//! - [`format`] / [`codec`]: JSON and YAML workflow files
//! - [`drift`]: normalized structural comparison
//! - [`sanitize`]: workflow name -> file stem
//! - [`error`]: [`CodecError`]

pub mod codec;
pub mod drift;
pub mod error;
pub mod format;
pub mod sanitize;
pub mod types;

pub use codec::{
    decode, decode_auto, encode, extract_id, extract_original_name, read_workflow,
    ORIGINAL_NAME_KEY,
};
pub use drift::{has_drift, normalize};
pub use error::CodecError;
pub use format::{is_workflow_file, FileFormat};
pub use sanitize::sanitize_filename;
pub use types::{Tag, TagId, Workflow, WorkflowId};
