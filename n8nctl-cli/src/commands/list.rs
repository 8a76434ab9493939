//! `n8nctl workflows list`

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use n8nctl_api::fetch_all;
use n8nctl_core::Workflow;

use crate::GlobalArgs;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

impl FromStr for ListFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(format!(
                "unsupported output format: {other}. Supported formats: table, json, yaml"
            )),
        }
    }
}

impl fmt::Display for ListFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Yaml => "yaml",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!(
                "unsupported sort order: {other}. Supported orders: asc, desc"
            )),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format: table, json, or yaml.
    #[arg(long, short = 'o', default_value_t = ListFormat::Table)]
    pub output: ListFormat,

    /// Sort order for last update: asc or desc.
    #[arg(long, default_value_t = SortOrder::Asc)]
    pub order: SortOrder,
}

impl ListArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let client = global.settings()?.client();
        let mut workflows = fetch_all(&client).context("failed to list workflows")?;

        if workflows.is_empty() {
            println!("No workflows found");
            return Ok(());
        }

        sort_workflows(&mut workflows, self.order);

        match self.output {
            ListFormat::Table => print_table(&workflows),
            ListFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&workflows)
                    .context("error marshaling workflows to JSON")?
            ),
            ListFormat::Yaml => print!(
                "{}",
                serde_yaml::to_string(&workflows).context("error marshaling workflows to YAML")?
            ),
        }
        Ok(())
    }
}

/// Sort by `updatedAt`, ties by name. Missing timestamps sort first in
/// ascending order and last in descending order.
pub fn sort_workflows(workflows: &mut [Workflow], order: SortOrder) {
    workflows.sort_by(|a, b| {
        let by_time = match (a.updated_at, b.updated_at) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(left), Some(right)) => left.cmp(&right),
        };
        let by_time = match order {
            SortOrder::Asc => by_time,
            SortOrder::Desc => by_time.reverse(),
        };
        by_time.then_with(|| a.name.cmp(&b.name))
    });
}

#[derive(Tabled)]
struct WorkflowRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "ACTIVE")]
    active: String,
    #[tabled(rename = "LAST_UPDATED")]
    last_updated: String,
}

fn print_table(workflows: &[Workflow]) {
    let rows: Vec<WorkflowRow> = workflows
        .iter()
        .map(|wf| WorkflowRow {
            id: wf
                .resolved_id()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            name: wf.name.clone(),
            active: if wf.active == Some(true) {
                "Yes".green().to_string()
            } else {
                "No".bright_black().to_string()
            },
            last_updated: wf
                .updated_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "N/A".to_string()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn wf(name: &str, day: Option<u32>) -> Workflow {
        Workflow {
            name: name.to_string(),
            updated_at: day.map(|d| Utc.with_ymd_and_hms(2025, 1, d, 0, 0, 0).unwrap()),
            ..Workflow::default()
        }
    }

    fn names(workflows: &[Workflow]) -> Vec<&str> {
        workflows.iter().map(|w| w.name.as_str()).collect()
    }

    #[test]
    fn ascending_puts_missing_timestamps_first() {
        let mut list = vec![wf("c", Some(2)), wf("b", None), wf("a", Some(1)), wf("d", Some(1))];
        sort_workflows(&mut list, SortOrder::Asc);
        assert_eq!(names(&list), ["b", "a", "d", "c"]);
    }

    #[test]
    fn descending_puts_missing_timestamps_last() {
        let mut list = vec![wf("c", Some(2)), wf("b", None), wf("a", Some(1))];
        sort_workflows(&mut list, SortOrder::Desc);
        assert_eq!(names(&list), ["c", "a", "b"]);
    }

    #[test]
    fn unknown_order_is_rejected() {
        assert!("sideways".parse::<SortOrder>().is_err());
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
    }
}
