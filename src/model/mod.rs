use std::fmt;

use crate::error::{PipelineError, Result};

/// A single spreadsheet value.
///
/// Integers, floats and date serials all load as [`Cell::Number`], matching the
/// way spreadsheets store them. [`Cell::Null`] marks an absent value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// No value.
    Null,
    /// String literal.
    Text(String),
    /// Numeric literal.
    Number(f64),
    /// Boolean literal.
    Boolean(bool),
}

impl Cell {
    /// Builds a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Returns the string payload of a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Renders the cell as text. Null renders as `None`.
    pub fn render(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Text(value) => Some(value.clone()),
            Cell::Number(value) => Some(format_number(*value)),
            Cell::Boolean(value) => Some(value.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Some(value) => f.write_str(&value),
            None => f.write_str("<null>"),
        }
    }
}

/// Strings that spreadsheet exports use to spell a missing value.
pub const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// True when `value` is one of [`MISSING_MARKERS`], compared exactly.
pub fn is_missing_marker(value: &str) -> bool {
    MISSING_MARKERS.contains(&value)
}

/// Formats a number the way it reads in a spreadsheet: integral values lose
/// their fractional part.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// An in-memory sheet: a header plus rectangular rows of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Dataset name used in logs and error messages.
    pub name: String,
    pub columns: Vec<String>,
    /// Every row holds exactly `columns.len()` cells.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates an empty table with the provided header.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Null);
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Like [`Table::column_index`], but a missing column is an error.
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| PipelineError::missing_column(&self.name, column))
    }

    /// Returns the cells of one column in row order.
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// A text column holds at least one text cell.
    pub fn is_text_column(&self, index: usize) -> bool {
        self.column_cells(index)
            .any(|cell| matches!(cell, Cell::Text(_)))
    }

    /// Renames the table, consuming it.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Removes a column from the table.
    pub fn drop_column(mut self, column: &str) -> Result<Self> {
        let index = self.require_column(column)?;
        self.columns.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
        Ok(self)
    }

    /// Projects the table onto `columns`, in that order.
    pub fn select(self, columns: &[&str]) -> Result<Self> {
        let indices = columns
            .iter()
            .map(|column| self.require_column(column))
            .collect::<Result<Vec<_>>>()?;

        let rows = self
            .rows
            .into_iter()
            .map(|mut row| {
                indices
                    .iter()
                    .map(|&index| std::mem::replace(&mut row[index], Cell::Null))
                    .collect()
            })
            .collect();

        Ok(Self {
            name: self.name,
            columns: columns.iter().map(|column| column.to_string()).collect(),
            rows,
        })
    }

    /// Renders the first `limit` rows as an aligned plain-text block.
    pub fn preview(&self, limit: usize) -> String {
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .take(limit)
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();

        let mut widths: Vec<usize> = self
            .columns
            .iter()
            .map(|column| column.chars().count())
            .collect();
        for row in &rendered {
            for (index, value) in row.iter().enumerate() {
                widths[index] = widths[index].max(value.chars().count());
            }
        }

        let format_line = |values: &[String]| {
            values
                .iter()
                .zip(&widths)
                .map(|(value, &width)| format!("{value:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut lines = vec![format_line(&self.columns)];
        lines.extend(rendered.iter().map(|row| format_line(row)));
        lines.join("\n")
    }
}

/// The six source tables, in load order.
#[derive(Debug, Clone, PartialEq)]
pub struct Datasets {
    pub materials: Table,
    pub plants: Table,
    pub storage: Table,
    pub suppliers: Table,
    pub supplier_names: Table,
    pub manufacturer_names: Table,
}

impl Datasets {
    /// Iterates over the tables in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Table> + '_ {
        [
            &self.materials,
            &self.plants,
            &self.storage,
            &self.suppliers,
            &self.supplier_names,
            &self.manufacturer_names,
        ]
        .into_iter()
    }

    /// Applies `transform` to every table, consuming the set.
    pub fn try_map(self, mut transform: impl FnMut(Table) -> Result<Table>) -> Result<Self> {
        Ok(Self {
            materials: transform(self.materials)?,
            plants: transform(self.plants)?,
            storage: transform(self.storage)?,
            suppliers: transform(self.suppliers)?,
            supplier_names: transform(self.supplier_names)?,
            manufacturer_names: transform(self.manufacturer_names)?,
        })
    }
}
