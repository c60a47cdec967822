//! `ems stats` command - record counts per entity type

use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::connect;
use crate::cli::output::print_tabular;
use crate::cli::table::TextTable;
use crate::cli::GlobalOpts;
use crate::core::ServerStats;

#[derive(clap::Args, Debug)]
pub struct StatsArgs {
    /// Ask the server for its own counts instead of counting fetched records
    #[arg(long)]
    pub server: bool,
}

pub async fn run(args: StatsArgs, global: &GlobalOpts) -> Result<()> {
    let (_, mut console) = connect(global)?;

    if args.server {
        let stats = console.server_stats().await.into_diagnostic()?;
        return print_server_stats(&stats, global);
    }

    console.refresh_all().await.into_diagnostic()?;
    let statistics = console.statistics();

    let mut table = TextTable::new(["Type", "Total", "Active"]);
    for t in &statistics.types {
        table.push([
            t.entity.plural().to_string(),
            t.total.to_string(),
            t.active.to_string(),
        ]);
    }
    print_tabular(global.output, &table, || table.render(), &statistics)
}

pub fn print_server_stats(stats: &ServerStats, global: &GlobalOpts) -> Result<()> {
    let mut table = TextTable::new(["Key", "Value"]);
    for (key, value) in stats {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        table.push([key.clone(), value]);
    }
    print_tabular(global.output, &table, || table.render(), stats)
}
