//! `n8nctl workflows push`: sync one local file to the instance.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use n8nctl_core::WorkflowId;
use n8nctl_sync::{push, Progress, WorkflowTarget};

use super::print_messages;
use crate::GlobalArgs;

#[derive(Args, Debug)]
pub struct PushArgs {
    /// Directory containing workflow files.
    #[arg(long, short = 'd')]
    pub directory: Option<PathBuf>,

    /// Workflow name or file path.
    #[arg(long, short = 'f')]
    pub file: Option<String>,

    /// Workflow ID to push to.
    #[arg(long)]
    pub id: Option<String>,

    /// Workflow name to push.
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Show what would be uploaded without making changes.
    #[arg(long)]
    pub dry_run: bool,
}

impl PushArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let target = WorkflowTarget {
            directory: self.directory,
            file: self.file,
            id: self.id.filter(|s| !s.is_empty()).map(WorkflowId::from),
            name: self.name,
        };

        let client = global.settings()?.client();
        let mut progress = Progress::new();
        let result = push(&client, &target, self.dry_run, &mut progress);
        print_messages(progress.messages());
        result?;
        Ok(())
    }
}
