//! `ems list` command - one entity type as a table

use miette::{IntoDiagnostic, Result};

use crate::cli::output::print_tabular;
use crate::cli::table::{render_view, TextTable};
use crate::cli::GlobalOpts;
use crate::cli::helpers::connect;
use crate::schema::EntityType;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Entity type (customers, sites, links, equipment)
    pub entity: EntityType,

    /// Print only the number of records
    #[arg(long)]
    pub count: bool,
}

pub async fn run(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_, mut console) = connect(global)?;
    console.select_tab(args.entity);

    // Referenced types are fetched too so ids render as labels
    console
        .refresh_with_references(args.entity)
        .await
        .into_diagnostic()?;

    let records = console.store().snapshot(args.entity);
    if args.count {
        println!("{}", records.len());
        return Ok(());
    }

    let view = console.render(args.entity);
    let table = TextTable::from_view(&view);
    print_tabular(global.output, &table, || render_view(&view), records)
}
