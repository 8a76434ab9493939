//! `n8nctl workflows refresh`: write remote state into local files.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use n8nctl_core::{FileFormat, WorkflowId};
use n8nctl_sync::{refresh_directory, refresh_file, Progress, RefreshOptions};

use super::{directory_or_file, print_messages, Target};
use crate::GlobalArgs;

#[derive(Args, Debug)]
pub struct RefreshArgs {
    /// Directory containing workflow files (JSON/YAML).
    #[arg(long, short = 'd')]
    pub directory: Option<PathBuf>,

    /// Single workflow file path to refresh (JSON/YAML).
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Show what would be updated without making changes.
    #[arg(long)]
    pub dry_run: bool,

    /// Write every workflow to its default path, ignoring tracked file names.
    #[arg(long)]
    pub overwrite: bool,

    /// Output format for workflow files (json or yaml).
    #[arg(long, short = 'o')]
    pub output: Option<FileFormat>,

    /// Include all fields in output files, including server-owned ones.
    #[arg(long)]
    pub no_truncate: bool,

    /// Refresh all workflows from the instance, not just those in the directory.
    #[arg(long)]
    pub all: bool,

    /// Workflow ID to refresh (used with --file).
    #[arg(long)]
    pub id: Option<String>,

    /// Workflow name to refresh (used with --file).
    #[arg(long)]
    pub name: Option<String>,
}

impl RefreshArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let target = directory_or_file(self.directory, self.file)?;
        let id = self.id.filter(|s| !s.is_empty()).map(WorkflowId::from);
        let name = self.name.filter(|s| !s.is_empty());
        if id.is_some() && name.is_some() {
            bail!("use either --id or --name, not both");
        }

        let client = global.settings()?.client();
        let mut progress = Progress::new();
        let minimal = !self.no_truncate;

        println!("Refreshing workflows...");
        let result = match target {
            Target::Directory(dir) => {
                let options = RefreshOptions {
                    dry_run: self.dry_run,
                    overwrite: self.overwrite,
                    output: self.output,
                    minimal,
                    all: self.all,
                };
                refresh_directory(&client, &dir, &options, &mut progress)
                    .map(|_| ())
                    .with_context(|| format!("refresh failed for {}", dir.display()))
            }
            Target::File(file) => {
                let path = match self.output {
                    Some(format) => file.with_extension(format.extension()),
                    None => file,
                };
                refresh_file(&client, &path, id, name, self.dry_run, minimal, &mut progress)
                    .map(|_| ())
                    .with_context(|| format!("refresh failed for {}", path.display()))
            }
        };

        print_messages(progress.messages());
        result?;
        println!("Workflow refresh completed successfully");
        Ok(())
    }
}
