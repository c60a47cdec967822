//! Table rendering for list-style output

use tabled::builder::Builder;
use tabled::settings::object::Rows;
use tabled::settings::{Alignment, Style};

use crate::cli::helpers::truncate_str;
use crate::core::presenter::{Row, TableView};

/// Widest a single cell may get in table output
const MAX_CELL_WIDTH: usize = 40;

/// Plain rows of cells, headers first
pub struct TextTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<H: Into<String>>(headers: impl IntoIterator<Item = H>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push<C: Into<String>>(&mut self, cells: impl IntoIterator<Item = C>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Record rows of a presenter view; the placeholder row is dropped
    pub fn from_view(view: &TableView) -> Self {
        let mut table = TextTable::new(view.headers.iter().cloned());
        for row in &view.rows {
            if let Row::Record { cells, .. } = row {
                table.push(cells.iter().cloned());
            }
        }
        table
    }

    /// Boxed table for a terminal
    pub fn render(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.headers.iter().cloned());
        for row in &self.rows {
            builder.push_record(row.iter().map(|c| truncate_str(c, MAX_CELL_WIDTH)));
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .modify(Rows::first(), Alignment::center());
        table.to_string()
    }

    /// CSV with a header row
    pub fn to_csv(&self) -> Result<String, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Render a presenter view, keeping the placeholder row for empty tables
pub fn render_view(view: &TableView) -> String {
    let mut table = TextTable::from_view(view);
    for row in &view.rows {
        if let Row::Placeholder { message } = row {
            let mut cells = vec![message.clone()];
            cells.resize(table.headers.len(), String::new());
            table.push(cells);
        }
    }
    table.render()
}
