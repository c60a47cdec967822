//! `ems seed` command - load the bundled demo network

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::stats::print_server_stats;
use crate::cli::helpers::connect;
use crate::cli::output::print_json;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{seed, DemoSet};

#[derive(clap::Args, Debug)]
pub struct SeedArgs {
    /// Skip the server statistics printed at the end
    #[arg(long)]
    pub no_stats: bool,
}

pub async fn run(args: SeedArgs, global: &GlobalOpts) -> Result<()> {
    let (config, console) = connect(global)?;
    let demo = DemoSet::embedded().into_diagnostic()?;

    eprintln!(
        "Seeding {} demo records into {}",
        demo.len(),
        style(&config.api_url).cyan()
    );
    let report = seed(console.gateway(), &demo).await;

    if global.output == OutputFormat::Json {
        print_json(&report)?;
    } else {
        for count in &report.counts {
            let mark = if count.failed == 0 {
                style("✓").green()
            } else {
                style("✗").red()
            };
            eprintln!(
                "{} {}: {} created, {} failed",
                mark,
                count.entity.plural(),
                count.created,
                count.failed
            );
        }
        for failure in &report.failures {
            eprintln!("   {}", style(failure).dim());
        }
    }

    if !args.no_stats && global.output != OutputFormat::Json {
        match console.server_stats().await {
            Ok(stats) => print_server_stats(&stats, global)?,
            Err(e) => tracing::warn!(error = %e, "could not fetch server statistics"),
        }
    }

    if report.created() == 0 && report.failed() > 0 {
        return Err(miette::miette!("no demo records could be created"));
    }
    Ok(())
}
