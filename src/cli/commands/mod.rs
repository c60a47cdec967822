//! Command implementations

pub mod completions;
pub mod config;
pub mod delete;
pub mod form;
pub mod list;
pub mod schema;
pub mod seed;
pub mod show;
pub mod stats;

use miette::Result;

use crate::cli::{Cli, Commands};

/// Dispatch a parsed command line
pub async fn dispatch(cli: Cli) -> Result<()> {
    let global = &cli.global;
    match cli.command {
        Commands::List(args) => list::run(args, global).await,
        Commands::Show(args) => show::run(args, global).await,
        Commands::New(args) => form::run_new(args, global).await,
        Commands::Edit(args) => form::run_edit(args, global).await,
        Commands::Delete(args) => delete::run(args, global).await,
        Commands::Stats(args) => stats::run(args, global).await,
        Commands::Schema(args) => schema::run(args, global),
        Commands::Seed(args) => seed::run(args, global).await,
        Commands::Config(cmd) => config::run(cmd, global),
        Commands::Completions(args) => completions::run(args),
    }
}
