//! Output formatting utilities

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::table::TextTable;
use crate::cli::OutputFormat;

/// Pretty-printed JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

/// Print tabular data in the requested format
///
/// `json` is what JSON output should contain, since the raw records are
/// usually more useful to scripts than the display cells.
pub fn print_tabular<T: Serialize + ?Sized>(
    format: OutputFormat,
    table: &TextTable,
    rendered: impl FnOnce() -> String,
    json: &T,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", rendered());
            Ok(())
        }
        OutputFormat::Csv => {
            print!("{}", table.to_csv().into_diagnostic()?);
            Ok(())
        }
        OutputFormat::Json => print_json(json),
    }
}
