use std::collections::HashSet;
use std::fmt;

use tracing::{info, instrument};

use crate::error::Result;
use crate::model::{Cell, Table};

/// Sentinel written in place of every value still missing after the joins.
pub const NOT_AVAILABLE: &str = "N/A";

/// Number of rows shown in the console preview.
pub const PREVIEW_ROWS: usize = 5;

/// Columns of the exported sheet, in output order.
pub const OUTPUT_COLUMNS: [&str; 13] = [
    "MaterialReference",
    "ManufacturerName",
    "ArticleNumber",
    "TypeCode",
    "ShortText",
    "Plant",
    "Disposition",
    "ReporderPoint",
    "SupplierName",
    "SupplierArticleNumber",
    "StorageLocation",
    "StorageBin",
    "DeletedStorageLevel",
];

/// Projects the joined table onto [`OUTPUT_COLUMNS`] and replaces every null
/// with [`NOT_AVAILABLE`].
#[instrument(level = "info", skip_all, fields(rows = table.len()))]
pub fn finalize(table: Table) -> Result<Table> {
    let mut table = table.select(&OUTPUT_COLUMNS)?;
    info!(columns = ?table.columns, "columns formatted");

    for cell in table.rows.iter_mut().flatten() {
        if cell.is_null() {
            *cell = Cell::text(NOT_AVAILABLE);
        }
    }

    let remaining = table.rows.iter().flatten().filter(|cell| cell.is_null()).count();
    info!(remaining, "remaining null values after filling");
    Ok(table)
}

/// Counts of the [`NOT_AVAILABLE`] sentinel in the final table.
#[derive(Debug, Clone, PartialEq)]
pub struct NaSummary {
    pub per_column: Vec<(String, usize)>,
    pub total: usize,
    /// Rows holding at least one sentinel.
    pub rows_with_na: usize,
    pub total_rows: usize,
}

impl NaSummary {
    pub fn from_table(table: &Table) -> Self {
        let is_na = |cell: &Cell| cell.as_text() == Some(NOT_AVAILABLE);

        let per_column: Vec<(String, usize)> = table
            .columns
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let count = table.column_cells(index).filter(|&cell| is_na(cell)).count();
                (name.clone(), count)
            })
            .collect();
        let total: usize = per_column.iter().map(|(_, count)| count).sum();
        let rows_with_na = table
            .rows
            .iter()
            .filter(|row| row.iter().any(is_na))
            .count();

        Self {
            per_column,
            total,
            rows_with_na,
            total_rows: table.len(),
        }
    }

    /// Share of rows holding at least one sentinel, 0 for an empty table.
    pub fn row_percentage(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            self.rows_with_na as f64 / self.total_rows as f64 * 100.0
        }
    }
}

impl fmt::Display for NaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .per_column
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0);

        writeln!(f, "N/A counts per column:")?;
        for (name, count) in &self.per_column {
            writeln!(f, "{name:<width$}  {count}")?;
        }
        writeln!(f)?;
        writeln!(f, "Total N/A values: {}", self.total)?;
        writeln!(f, "Total rows with at least one N/A value: {}", self.rows_with_na)?;
        writeln!(f, "Total rows: {}", self.total_rows)?;
        write!(f, "Percentage of rows with N/A: {:.2}%", self.row_percentage())
    }
}

/// Row, null and distinct-value counts of one source table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableProfile {
    pub name: String,
    pub rows: usize,
    /// Columns with at least one null, with their null count.
    pub null_counts: Vec<(String, usize)>,
    /// Distinct non-null values per column.
    pub unique_counts: Vec<(String, usize)>,
}

impl TableProfile {
    pub fn from_table(table: &Table) -> Self {
        let mut null_counts = Vec::new();
        let mut unique_counts = Vec::with_capacity(table.columns.len());

        for (index, name) in table.columns.iter().enumerate() {
            let nulls = table.column_cells(index).filter(|cell| cell.is_null()).count();
            if nulls > 0 {
                null_counts.push((name.clone(), nulls));
            }

            let distinct: HashSet<String> = table
                .column_cells(index)
                .filter(|cell| !cell.is_null())
                .map(|cell| format!("{cell:?}"))
                .collect();
            unique_counts.push((name.clone(), distinct.len()));
        }

        Self {
            name: table.name.clone(),
            rows: table.len(),
            null_counts,
            unique_counts,
        }
    }

    pub fn total_nulls(&self) -> usize {
        self.null_counts.iter().map(|(_, count)| count).sum()
    }
}

impl fmt::Display for TableProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        writeln!(f, "Dataset: '{}'", self.name)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Number of rows: {}", self.rows)?;

        if !self.null_counts.is_empty() {
            writeln!(f, "\nNull Values:")?;
            for (name, count) in &self.null_counts {
                writeln!(f, "{name}  {count}")?;
            }
            writeln!(f, "Total null values: {}", self.total_nulls())?;
        }

        write!(f, "\nUnique Values:")?;
        for (name, count) in &self.unique_counts {
            write!(f, "\n{name}  {count}")?;
        }
        Ok(())
    }
}
