//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::config::ConfigCommands;
use crate::cli::commands::delete::DeleteArgs;
use crate::cli::commands::form::{EditArgs, NewArgs};
use crate::cli::commands::list::ListArgs;
use crate::cli::commands::schema::SchemaArgs;
use crate::cli::commands::seed::SeedArgs;
use crate::cli::commands::show::ShowArgs;
use crate::cli::commands::stats::StatsArgs;

#[derive(Parser, Debug)]
#[command(name = "ems")]
#[command(author, version)]
#[command(about = "Manage customers, sites, links and equipment on an EMS backend")]
#[command(
    long_about = "EMS console: list, create, edit and delete the network inventory kept by an \
                  element management backend, with references between records shown by name."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Backend base URL (overrides config and EMS_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "table")]
    pub output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON, as exchanged with the server
    Json,
    /// Comma-separated values with a header row
    Csv,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the records of one entity type
    List(ListArgs),

    /// Show a single record with references resolved
    Show(ShowArgs),

    /// Create a record
    New(NewArgs),

    /// Edit an existing record
    Edit(EditArgs),

    /// Delete a record (asks for confirmation)
    Delete(DeleteArgs),

    /// Record counts per entity type
    Stats(StatsArgs),

    /// Describe the fields of each entity type
    Schema(SchemaArgs),

    /// Load the bundled demo network into the backend
    Seed(SeedArgs),

    /// Show or change console settings
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
