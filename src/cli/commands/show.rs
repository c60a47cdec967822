//! `ems show` command - a single record with references resolved

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::connect;
use crate::cli::output::print_tabular;
use crate::cli::table::TextTable;
use crate::cli::GlobalOpts;
use crate::core::console::capitalize;
use crate::core::{ConsoleError, RecordId};
use crate::schema::EntityType;

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Entity type
    pub entity: EntityType,

    /// Record id
    pub id: RecordId,
}

pub async fn run(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (_, mut console) = connect(global)?;
    console
        .refresh_with_references(args.entity)
        .await
        .into_diagnostic()?;

    let record = console
        .store()
        .get(args.entity, args.id)
        .ok_or(ConsoleError::RecordNotFound {
            entity: args.entity,
            id: args.id,
        })
        .into_diagnostic()?;

    let schema = args.entity.schema();
    let resolver = console.resolver();

    let mut table = TextTable::new(["Field", "Value"]);
    table.push(["ID".to_string(), args.id.to_string()]);
    for field in schema.fields {
        table.push([
            field.label.to_string(),
            resolver.display(field, record.get(field.name)),
        ]);
    }

    let rendered = || {
        let mut out = String::new();
        out.push_str(&format!("{}\n", style("─".repeat(60)).dim()));
        out.push_str(&format!(
            "{}: {}\n",
            style(capitalize(schema.singular)).bold(),
            style(resolver.label(args.entity, args.id)).yellow()
        ));
        out.push_str(&format!("{}\n", style("─".repeat(60)).dim()));
        for row in &table.rows {
            out.push_str(&format!("{}: {}\n", style(&row[0]).bold(), row[1]));
        }
        out.push_str(&style("─".repeat(60)).dim().to_string());
        out
    };

    print_tabular(global.output, &table, rendered, record)
}
