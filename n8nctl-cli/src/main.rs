//! n8nctl: keep a directory of n8n workflow files in sync with an instance.
//!
//! # Usage
//!
//! ```text
//! n8nctl workflows sync (--directory DIR | --file FILE) [--dry-run] [--prune] [--refresh=false]
//! n8nctl workflows refresh (--directory DIR | --file FILE) [--all] [--overwrite] [--output json|yaml]
//! n8nctl workflows pull [--directory DIR] [--file F] [--id ID | --name NAME]
//! n8nctl workflows push [--directory DIR] [--file F] [--id ID | --name NAME]
//! n8nctl workflows list [--output table|json|yaml] [--order asc|desc]
//! n8nctl workflows activate|deactivate|delete ID
//! ```

mod commands;
mod config;

use std::path::Path;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use commands::WorkflowsCommand;
use config::{FileConfig, Settings};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "n8nctl",
    version,
    about = "Synchronize n8n workflows between local files and an n8n instance",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Connection and logging options accepted by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// n8n API key.
    #[arg(long, short = 'k', global = true, env = "N8N_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// n8n instance URL [default: http://localhost:5678].
    #[arg(long, short = 'u', global = true, env = "N8N_INSTANCE_URL")]
    pub url: Option<String>,

    /// Enable debug logging. `DEBUG` accepts any value but the falsey ones.
    #[arg(
        long,
        global = true,
        env = "DEBUG",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub debug: bool,
}

impl GlobalArgs {
    /// Resolve connection settings, consulting `~/.n8n/config.yaml` last.
    pub fn settings(&self) -> Result<Settings> {
        let file = config::config_path()
            .map(|path| config::load_file_config(&path))
            .unwrap_or_else(FileConfig::default);
        Settings::resolve(self.api_key.clone(), self.url.clone(), file)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage workflows on the n8n instance.
    Workflows {
        #[command(subcommand)]
        command: WorkflowsCommand,
    },
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

fn init_tracing(debug: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    config::load_dotenv(Path::new(".env"));

    let cli = Cli::parse();
    init_tracing(cli.global.debug);

    match cli.command {
        Commands::Workflows { command } => commands::run(command, &cli.global),
    }
}
