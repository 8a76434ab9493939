//! `n8nctl workflows sync`: reconcile local files against the instance.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args};
use colored::Colorize;

use n8nctl_core::{FileFormat, WorkflowId};
use n8nctl_sync::pipeline::{self, SyncReport, SyncRequest};

use super::{directory_or_file, print_messages, Target};
use crate::GlobalArgs;

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Directory containing workflow files (JSON/YAML).
    #[arg(long, short = 'd')]
    pub directory: Option<PathBuf>,

    /// Single workflow file path (JSON/YAML).
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Show what would be uploaded without making changes.
    #[arg(long)]
    pub dry_run: bool,

    /// Remove workflows that are not present in the directory.
    #[arg(long)]
    pub prune: bool,

    /// Refresh the local state with the remote state.
    #[arg(long, default_value_t = true, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    pub refresh: bool,

    /// Output format for refreshed files; existing formats are kept when omitted.
    #[arg(long, short = 'o')]
    pub output: Option<FileFormat>,

    /// Refresh all workflows from the instance, not just those in the directory.
    #[arg(long)]
    pub all: bool,

    /// Workflow ID to sync (used with --file).
    #[arg(long)]
    pub id: Option<String>,

    /// Workflow name to sync (used with --file).
    #[arg(long)]
    pub name: Option<String>,
}

impl SyncArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let mut req = match directory_or_file(self.directory, self.file)? {
            Target::Directory(dir) => SyncRequest::directory(dir),
            Target::File(file) => SyncRequest::file(file),
        };
        req.dry_run = self.dry_run;
        req.prune = self.prune;
        req.refresh = self.refresh;
        req.all = self.all;
        req.output = self.output;
        req.id = self.id.filter(|s| !s.is_empty()).map(WorkflowId::from);
        req.name = self.name.filter(|s| !s.is_empty());
        req.validate()?;

        let settings = global.settings()?;
        let client = settings.client();

        println!("Syncing workflows...");
        let report = pipeline::run(&client, &req).context("sync failed")?;
        print_messages(&report.messages);

        match report.into_result() {
            Ok(report) => {
                print_summary(&report, self.dry_run);
                Ok(())
            }
            Err((report, err)) => {
                print_summary(&report, self.dry_run);
                Err(err).context("prune failed")
            }
        }
    }
}

fn print_summary(report: &SyncReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let summary = format!(
        "{prefix}{} created, {} updated, {} pruned, {} failed",
        report.created(),
        report.updated(),
        report.pruned,
        report.failures.len()
    );
    if report.failures.is_empty() {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.yellow());
    }
}
