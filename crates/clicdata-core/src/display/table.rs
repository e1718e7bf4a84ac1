use crate::error::{AppError, DisplayError, ValidationError};
use crate::utils::text::{format_json_value, truncate_text};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use crossterm::terminal;
use serde_json::{Map, Value};
use std::str::FromStr;

const MAX_CELL_WIDTH: usize = 40;

/// Shape requested for read operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Raw,
}

impl FromStr for OutputFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" | "df" => Ok(OutputFormat::Table),
            "raw" | "dict" | "json" => Ok(OutputFormat::Raw),
            _ => Err(ValidationError::InvalidOutputFormat(s.to_string())),
        }
    }
}

/// Rows and named columns built from JSON records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl DataTable {
    /// One row per record. Columns are the union of keys in first-seen order;
    /// records missing a key get `null` in that column.
    pub fn from_records(records: &[Value]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            match record {
                Value::Object(map) => {
                    for key in map.keys() {
                        if !columns.iter().any(|c| c == key) {
                            columns.push(key.clone());
                        }
                    }
                }
                _ => {
                    if !columns.iter().any(|c| c == "value") {
                        columns.push("value".to_string());
                    }
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| match record {
                        Value::Object(map) => map.get(column).cloned().unwrap_or(Value::Null),
                        other if column == "value" => other.clone(),
                        _ => Value::Null,
                    })
                    .collect()
            })
            .collect();

        DataTable { columns, rows }
    }

    /// Tabulate an arbitrary response body: arrays become one row per element,
    /// an object becomes a single row.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(records) => Self::from_records(records),
            Value::Null => DataTable::default(),
            other => Self::from_records(std::slice::from_ref(other)),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).unwrap_or(&Value::Null))
                .collect(),
        )
    }

    /// Index of the first row whose length differs from the column count.
    pub fn first_misshapen_row(&self) -> Option<usize> {
        self.rows.iter().position(|row| row.len() != self.columns.len())
    }

    /// Back to one JSON object per row.
    pub fn to_records(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let map: Map<String, Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect();
                Value::Object(map)
            })
            .collect()
    }
}

/// Result of a read operation in the shape the caller asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Table(DataTable),
    Raw(Value),
}

impl Output {
    /// Shape records; `raw` is returned as-is when the caller wants raw output.
    pub fn from_records(format: OutputFormat, records: Vec<Value>) -> Self {
        match format {
            OutputFormat::Table => Output::Table(DataTable::from_records(&records)),
            OutputFormat::Raw => Output::Raw(Value::Array(records)),
        }
    }

    pub fn as_table(&self) -> Option<&DataTable> {
        match self {
            Output::Table(table) => Some(table),
            Output::Raw(_) => None,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Output::Table(table) => Value::Array(table.to_records()),
            Output::Raw(value) => value,
        }
    }
}

pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }

    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _)) => Some((cols as usize).clamp(40, 200)),
            Err(_) => Some(80),
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn bold_header(&self, text: &str) -> Cell {
        if self.use_colors {
            Cell::new(text).add_attribute(Attribute::Bold).fg(Color::Cyan)
        } else {
            Cell::new(text).add_attribute(Attribute::Bold)
        }
    }

    pub fn render_table(&self, data: &DataTable) -> Result<String, AppError> {
        if data.columns.is_empty() {
            return Ok("No records.".to_string());
        }

        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        if let Some(width) = self.max_width {
            let width = u16::try_from(width)
                .map_err(|_| DisplayError::TableFormat(format!("width {} too large", width)))?;
            table.set_width(width);
        }

        let headers: Vec<Cell> = data.columns.iter().map(|c| self.bold_header(c)).collect();
        table.set_header(headers);

        for row in &data.rows {
            let cells: Vec<Cell> = row
                .iter()
                .map(|value| {
                    let text = truncate_text(&format_json_value(value), MAX_CELL_WIDTH);
                    if self.use_colors && value.is_null() {
                        Cell::new(text)
                            .fg(Color::DarkGrey)
                            .add_attribute(Attribute::Italic)
                    } else {
                        Cell::new(text)
                    }
                })
                .collect();
            table.add_row(cells);
        }

        let mut output = table.to_string();
        output.push_str(&format!("\n{} rows", data.len()));
        Ok(output)
    }

    pub fn render_output(&self, output: &Output) -> Result<String, AppError> {
        match output {
            Output::Table(table) => self.render_table(table),
            Output::Raw(value) => serde_json::to_string_pretty(value)
                .map_err(|e| DisplayError::TableFormat(e.to_string()).into()),
        }
    }
}
