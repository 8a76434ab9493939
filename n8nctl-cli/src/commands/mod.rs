//! `n8nctl workflows ...` subcommands.

pub mod list;
pub mod manage;
pub mod pull;
pub mod push;
pub mod refresh;
pub mod sync;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Subcommand;

use crate::GlobalArgs;

#[derive(Subcommand, Debug)]
pub enum WorkflowsCommand {
    /// Synchronize workflow files with the n8n instance.
    Sync(sync::SyncArgs),

    /// Write the remote state of workflows into local files.
    Refresh(refresh::RefreshArgs),

    /// Pull one workflow into a local file.
    Pull(pull::PullArgs),

    /// Push one local workflow file to the instance.
    Push(push::PushArgs),

    /// List workflows on the instance.
    List(list::ListArgs),

    /// Activate a workflow by ID.
    Activate(manage::IdArg),

    /// Deactivate a workflow by ID.
    Deactivate(manage::IdArg),

    /// Delete a workflow by ID.
    Delete(manage::IdArg),
}

pub fn run(cmd: WorkflowsCommand, global: &GlobalArgs) -> Result<()> {
    match cmd {
        WorkflowsCommand::Sync(args) => args.run(global),
        WorkflowsCommand::Refresh(args) => args.run(global),
        WorkflowsCommand::Pull(args) => args.run(global),
        WorkflowsCommand::Push(args) => args.run(global),
        WorkflowsCommand::List(args) => args.run(global),
        WorkflowsCommand::Activate(args) => manage::activate(args, global),
        WorkflowsCommand::Deactivate(args) => manage::deactivate(args, global),
        WorkflowsCommand::Delete(args) => manage::delete(args, global),
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Either a directory or a single file; exactly one must be given.
pub(crate) enum Target {
    Directory(PathBuf),
    File(PathBuf),
}

pub(crate) fn directory_or_file(
    directory: Option<PathBuf>,
    file: Option<PathBuf>,
) -> Result<Target> {
    match (directory, file) {
        (Some(_), Some(_)) => bail!("use either --file or --directory, not both"),
        (None, None) => bail!("directory or file is required"),
        (Some(dir), None) => Ok(Target::Directory(dir)),
        (None, Some(file)) => Ok(Target::File(file)),
    }
}

pub(crate) fn print_messages<S: AsRef<str>>(messages: &[S]) {
    for message in messages {
        println!("{}", message.as_ref());
    }
}
