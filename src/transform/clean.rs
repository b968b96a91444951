use tracing::{info, instrument};

use crate::error::Result;
use crate::model::{Cell, Table, is_missing_marker};

/// Trims every text column and collapses blank values and missing-value
/// spellings such as `nan` or `NULL` to null.
///
/// Every cell of a text column is rendered to text first, so numbers mixed
/// into such a column come out as strings. Columns without any text cell are
/// left untouched.
#[instrument(level = "info", skip_all, fields(table = %table.name))]
pub fn clean_table(mut table: Table) -> Result<Table> {
    let text_columns: Vec<usize> = (0..table.columns.len())
        .filter(|&index| table.is_text_column(index))
        .collect();

    for row in &mut table.rows {
        for &index in &text_columns {
            row[index] = clean_cell(&row[index]);
        }
    }

    info!(
        rows = table.len(),
        text_columns = text_columns.len(),
        "cleaned {}",
        table.name
    );
    Ok(table)
}

/// Normalizes one cell of a text column.
pub fn clean_cell(cell: &Cell) -> Cell {
    match cell.render() {
        Some(value) => {
            let trimmed = value.trim();
            if is_missing_marker(trimmed) {
                Cell::Null
            } else {
                Cell::text(trimmed)
            }
        }
        None => Cell::Null,
    }
}
