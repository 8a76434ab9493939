//! # n8nctl-sync
//!
//! Reconciliation between a directory of workflow files and an n8n instance.
//!
//! Call [`pipeline::run`] for a full sync pass, [`refresh_directory`] to pull
//! remote state into local files, or [`pull`] / [`push`] for one workflow.

pub mod error;
pub mod executor;
pub mod identity;
pub mod index;
pub mod lookup;
pub mod pipeline;
pub mod planner;
pub mod progress;
pub mod prune;
pub mod refresh;
pub mod single;
pub mod tags;
pub mod writer;

pub use error::SyncError;
pub use executor::{Executor, SyncOutcome};
pub use identity::{resolve_destination, FileAction};
pub use index::{build_index, find_by_name, scan_workflow_files, LocalIndex};
pub use lookup::resolve_id_by_name;
pub use pipeline::{SyncReport, SyncRequest, SyncScope};
pub use planner::{plan, ChangeSet};
pub use progress::{execute_or_dry_run, Progress};
pub use prune::prune;
pub use refresh::{refresh_directory, refresh_file, refresh_with_index, RefreshOptions};
pub use single::{looks_like_file_path, pull, push, WorkflowTarget};
pub use tags::TagReconciler;
pub use writer::{atomic_write, ensure_directory_exists, WriteResult};
