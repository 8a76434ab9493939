//! `n8nctl workflows pull`: fetch one workflow into a local file.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use n8nctl_core::{FileFormat, WorkflowId};
use n8nctl_sync::{pull, Progress, WorkflowTarget};

use super::print_messages;
use crate::GlobalArgs;

#[derive(Args, Debug)]
pub struct PullArgs {
    /// Directory containing workflow files.
    #[arg(long, short = 'd')]
    pub directory: Option<PathBuf>,

    /// Workflow name or file path.
    #[arg(long, short = 'f')]
    pub file: Option<String>,

    /// Workflow ID to pull.
    #[arg(long)]
    pub id: Option<String>,

    /// Workflow name to pull.
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Output format for the workflow file (json or yaml).
    #[arg(long, short = 'o')]
    pub output: Option<FileFormat>,

    /// Include all fields in the output file, including server-owned ones.
    #[arg(long)]
    pub no_truncate: bool,

    /// Show what would be written without making changes.
    #[arg(long)]
    pub dry_run: bool,
}

impl PullArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let target = WorkflowTarget {
            directory: self.directory,
            file: self.file,
            id: self.id.filter(|s| !s.is_empty()).map(WorkflowId::from),
            name: self.name,
        };

        let client = global.settings()?.client();
        let mut progress = Progress::new();
        let result = pull(
            &client,
            &target,
            self.output,
            self.dry_run,
            !self.no_truncate,
            &mut progress,
        );
        print_messages(progress.messages());
        result?;
        Ok(())
    }
}
