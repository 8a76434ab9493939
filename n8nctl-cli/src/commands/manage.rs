//! `activate`, `deactivate` and `delete`: one API call each.

use anyhow::{Context, Result};
use clap::Args;

use n8nctl_api::WorkflowApi;
use n8nctl_core::WorkflowId;

use crate::GlobalArgs;

#[derive(Args, Debug)]
pub struct IdArg {
    /// Workflow ID.
    #[arg(value_name = "WORKFLOW_ID")]
    pub id: String,
}

pub fn activate(args: IdArg, global: &GlobalArgs) -> Result<()> {
    let client = global.settings()?.client();
    let id = WorkflowId::from(args.id);
    let workflow = client
        .activate_workflow(&id)
        .context("Error activating workflow")?;

    println!("Workflow with ID {id} has been activated successfully");
    if !workflow.name.is_empty() {
        println!("Name: {}", workflow.name);
    }
    Ok(())
}

pub fn deactivate(args: IdArg, global: &GlobalArgs) -> Result<()> {
    let client = global.settings()?.client();
    let id = WorkflowId::from(args.id);
    let workflow = client
        .deactivate_workflow(&id)
        .context("Error deactivating workflow")?;

    println!("Workflow with ID {id} has been deactivated successfully");
    if !workflow.name.is_empty() {
        println!("Name: {}", workflow.name);
    }
    Ok(())
}

pub fn delete(args: IdArg, global: &GlobalArgs) -> Result<()> {
    let client = global.settings()?.client();
    let id = WorkflowId::from(args.id);
    client
        .delete_workflow(&id)
        .context("Error deleting workflow")?;

    println!("Workflow with ID {id} has been deleted successfully");
    Ok(())
}
