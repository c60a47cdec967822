//! `ems schema` command - describe entity types and their fields

use miette::Result;

use crate::cli::output::{print_json, print_tabular};
use crate::cli::table::TextTable;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::schema::{EntitySchema, EntityType, FieldDescriptor, FieldKind};

#[derive(clap::Args, Debug)]
pub struct SchemaArgs {
    /// Entity type (all types when omitted)
    pub entity: Option<EntityType>,
}

pub fn run(args: SchemaArgs, global: &GlobalOpts) -> Result<()> {
    let schemas: Vec<&'static EntitySchema> = match args.entity {
        Some(entity) => vec![entity.schema()],
        None => EntityType::all().iter().map(|e| e.schema()).collect(),
    };

    if global.output == OutputFormat::Json {
        return print_json(&schemas);
    }

    let mut table = TextTable::new(["Type", "Field", "Label", "Kind", "Required", "Default"]);
    for schema in &schemas {
        for field in schema.fields {
            table.push([
                schema.path.to_string(),
                field.name.to_string(),
                field.label.to_string(),
                describe_kind(field),
                if field.required { "yes" } else { "" }.to_string(),
                crate::schema::display_value(Some(&field.default.to_value())),
            ]);
        }
    }
    print_tabular(global.output, &table, || table.render(), &schemas)
}

fn describe_kind(field: &FieldDescriptor) -> String {
    match field.kind {
        FieldKind::Text => "text".to_string(),
        FieldKind::Number { integer: true } => "integer".to_string(),
        FieldKind::Number { integer: false } => "number".to_string(),
        FieldKind::Date => "date".to_string(),
        FieldKind::Reference { target } => format!("-> {}", target),
        FieldKind::Select { options } => {
            let values: Vec<&str> = options.iter().map(|o| o.value).collect();
            format!("one of {}", values.join("|"))
        }
    }
}
