//! `ems new` / `ems edit` commands - the create and edit dialogs

use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{IntoDiagnostic, Result};
use serde_json::Value;

use crate::cli::helpers::{connect, is_interactive, parse_assignment, report};
use crate::cli::output::print_json;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Console, Gateway, RecordId};
use crate::schema::{display_value, EntityType, FieldDescriptor, FieldError, FieldKind};

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Entity type
    pub entity: EntityType,

    /// Field assignment, repeatable (e.g. --set name=Acme)
    #[arg(long = "set", short = 's', value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Prompt for every field (default when no --set is given on a terminal)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Entity type
    pub entity: EntityType,

    /// Record id
    pub id: RecordId,

    /// Field assignment, repeatable (e.g. --set status=inactive)
    #[arg(long = "set", short = 's', value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Prompt for every field, starting from the stored values
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

pub async fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let (_, mut console) = connect(global)?;
    load_reference_targets(&mut console, args.entity).await;

    console.open_create(args.entity);
    fill_draft(&mut console, &args.set, wants_prompts(args.interactive, &args.set))?;
    finish(&mut console, global).await
}

pub async fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let (_, mut console) = connect(global)?;
    console
        .refresh_with_references(args.entity)
        .await
        .into_diagnostic()?;

    console.open_edit(args.entity, args.id).into_diagnostic()?;
    fill_draft(&mut console, &args.set, wants_prompts(args.interactive, &args.set))?;
    finish(&mut console, global).await
}

fn wants_prompts(interactive: bool, set: &[String]) -> bool {
    interactive || (set.is_empty() && is_interactive())
}

/// Fetch the collections that reference fields of `entity` point at
///
/// Selection lists are built from them; a failure only degrades the prompts.
async fn load_reference_targets<G: Gateway>(console: &mut Console<G>, entity: EntityType) {
    let mut targets: Vec<EntityType> = entity.schema().references().map(|(_, t)| t).collect();
    targets.sort();
    targets.dedup();
    for target in targets {
        if let Err(e) = console.reload(target).await {
            tracing::warn!(%target, error = %e, "reference choices unavailable");
        }
    }
}

/// Apply `--set` assignments, then prompt if requested
fn fill_draft<G: Gateway>(console: &mut Console<G>, set: &[String], prompt: bool) -> Result<()> {
    for raw in set {
        let (field, value) = parse_assignment(raw)?;
        console.set_input(field, value).into_diagnostic()?;
    }

    if prompt {
        let entity = console
            .state()
            .dialog
            .open()
            .map(|o| o.entity)
            .ok_or_else(|| miette::miette!("no dialog is open"))?;
        for field in entity.schema().fields {
            let current = console
                .state()
                .dialog
                .draft()
                .and_then(|d| d.get(field.name))
                .cloned()
                .unwrap_or(Value::Null);
            let value = prompt_field(console, field, &current)?;
            console.set_field(field.name, value).into_diagnostic()?;
        }
    }
    Ok(())
}

fn prompt_field<G: Gateway>(
    console: &Console<G>,
    field: &FieldDescriptor,
    current: &Value,
) -> Result<Value> {
    let theme = ColorfulTheme::default();
    let prompt = if field.required {
        format!("{} *", field.label)
    } else {
        field.label.to_string()
    };

    match field.kind {
        FieldKind::Select { options } => {
            let labels: Vec<&str> = options.iter().map(|o| o.label).collect();
            let default = options
                .iter()
                .position(|o| current.as_str() == Some(o.value))
                .unwrap_or(0);
            let index = Select::with_theme(&theme)
                .with_prompt(prompt)
                .items(&labels)
                .default(default)
                .interact()
                .into_diagnostic()?;
            Ok(Value::from(options[index].value))
        }
        FieldKind::Reference { target } => {
            let candidates = console.resolver().candidates(target);
            let mut items = vec!["(none)".to_string()];
            items.extend(candidates.iter().map(|(id, label)| format!("{} ({})", label, id)));
            let default = RecordId::from_value(current)
                .and_then(|id| candidates.iter().position(|(c, _)| *c == id))
                .map(|i| i + 1)
                .unwrap_or(0);
            let index = Select::with_theme(&theme)
                .with_prompt(prompt)
                .items(&items)
                .default(default)
                .interact()
                .into_diagnostic()?;
            Ok(match index {
                0 => Value::Null,
                i => Value::from(candidates[i - 1].0.get()),
            })
        }
        _ => {
            let initial = match current {
                Value::Null => String::new(),
                Value::String(s) => s.clone(),
                other => display_value(Some(other)),
            };
            let raw: String = Input::with_theme(&theme)
                .with_prompt(prompt)
                .with_initial_text(initial.clone())
                .allow_empty(true)
                .validate_with(|input: &String| {
                    field.parse_input(input).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()
                .into_diagnostic()?;
            prompted_value(field, current, &initial, &raw).into_diagnostic()
        }
    }
}

/// Parse prompt input, keeping the stored value when the shown text was left as is
fn prompted_value(
    field: &FieldDescriptor,
    current: &Value,
    initial: &str,
    raw: &str,
) -> Result<Value, FieldError> {
    if raw == initial {
        return Ok(current.clone());
    }
    field.parse_input(raw)
}

/// Save the open dialog and report the outcome
async fn finish<G: Gateway>(console: &mut Console<G>, global: &GlobalOpts) -> Result<()> {
    let saved = console.save().await;
    report(console.state().notification.as_ref())?;
    let saved = saved.into_diagnostic()?;

    match global.output {
        OutputFormat::Json => print_json(&saved),
        _ => {
            if let Some(id) = saved.id() {
                println!("{}", style(id).cyan());
            }
            Ok(())
        }
    }
}
