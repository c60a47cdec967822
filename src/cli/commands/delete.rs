//! `ems delete` command

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{connect, is_interactive, report};
use crate::cli::GlobalOpts;
use crate::core::{RecordId, RowAction};
use crate::schema::EntityType;

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Entity type
    pub entity: EntityType,

    /// Record id
    pub id: RecordId,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub async fn run(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let (config, mut console) = connect(global)?;

    // Only needed for the prompt label; a failed list still allows the delete
    if let Err(e) = console.reload(args.entity).await {
        tracing::warn!(entity = %args.entity, error = %e, "could not load the record label");
    }
    let label = console.resolver().label(args.entity, args.id);

    console
        .apply(RowAction::Delete {
            entity: args.entity,
            id: args.id,
        })
        .into_diagnostic()?;

    if config.confirm_delete && !args.yes {
        if !is_interactive() {
            console.dismiss_delete();
            return Err(miette::miette!(
                "refusing to delete without confirmation; pass --yes"
            ));
        }

        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Delete {} {}?",
                args.entity.singular(),
                style(&label).yellow()
            ))
            .default(false)
            .interact()
            .into_diagnostic()?;

        if !confirmed {
            console.dismiss_delete();
            eprintln!("Cancelled.");
            return Ok(());
        }
    }

    let outcome = console.confirm_delete().await;
    report(console.state().notification.as_ref())?;
    outcome.into_diagnostic()
}
