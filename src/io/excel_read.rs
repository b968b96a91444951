use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use tracing::{debug, instrument};

use crate::config::{PipelineConfig, SourceSpec};
use crate::error::{PipelineError, Result};
use crate::model::{Cell, Datasets, Table, is_missing_marker};

/// Loads all six source tables. The first failure aborts the whole load.
pub fn read_datasets(config: &PipelineConfig) -> Result<Datasets> {
    let sources = &config.sources;
    let load = |name: &str, source: &SourceSpec| {
        read_table(&config.source_path(source), &source.sheet, name)
    };

    Ok(Datasets {
        materials: load("materials", &sources.materials)?,
        plants: load("plants", &sources.plants)?,
        storage: load("storage", &sources.storage)?,
        suppliers: load("suppliers", &sources.suppliers)?,
        supplier_names: load("supplier_names", &sources.supplier_names)?,
        manufacturer_names: load("manufacturer_names", &sources.manufacturer_names)?,
    })
}

/// Reads one sheet into a [`Table`] named `name`. The first row is the header.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), sheet = %sheet))]
pub fn read_table(path: &Path, sheet: &str, name: &str) -> Result<Table> {
    if !path.exists() {
        return Err(PipelineError::MissingInput(path.to_path_buf()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range(sheet)
        .ok_or_else(|| {
            PipelineError::InvalidWorkbook(format!(
                "missing sheet '{sheet}' in {}",
                path.display()
            ))
        })?
        .map_err(PipelineError::from)?;

    let table = range_to_table(&range, name);
    debug!(rows = table.len(), columns = table.columns.len(), "sheet loaded");
    Ok(table)
}

fn range_to_table(range: &Range<DataType>, name: &str) -> Table {
    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(index, cell)| match cell {
                DataType::Empty => format!("Unnamed: {index}"),
                DataType::String(label) if label.trim().is_empty() => {
                    format!("Unnamed: {index}")
                }
                DataType::String(label) => label.clone(),
                other => other.to_string(),
            })
            .collect(),
        None => Vec::new(),
    };

    let mut table = Table::new(name, columns);
    for row in rows {
        table.push_row(row.iter().map(convert_cell).collect());
    }
    table
}

/// Converts a calamine cell. Missing-value spellings load as null so the field
/// fixes see them as absent.
fn convert_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::String(value) if is_missing_marker(value) => Cell::Null,
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::Bool(value) => Cell::Boolean(*value),
        DataType::DateTime(serial) => Cell::Number(*serial),
        DataType::Empty => Cell::Null,
        other => {
            let value = other.to_string();
            if is_missing_marker(&value) {
                Cell::Null
            } else {
                Cell::Text(value)
            }
        }
    }
}
