use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::model::{Cell, Table};

/// Value that marks a storage level as in use.
pub const ACTIVE_MARKER: &str = "ACTIVE";
/// Fixed prefix of generated type codes.
pub const TYPE_CODE_PREFIX: &str = "TC00000000";
/// Width of a plant code.
pub const PLANT_WIDTH: usize = 4;

pub const DELETED_STORAGE_LEVEL: &str = "DeletedStorageLevel";
pub const MATERIAL_REFERENCE: &str = "MaterialReference";
pub const PLANT: &str = "Plant";
pub const TYPE_CODE: &str = "TypeCode";

/// Replaces single-space `DeletedStorageLevel` values with [`ACTIVE_MARKER`].
///
/// Must run before cleaning, which would otherwise collapse the space to null.
#[instrument(level = "info", skip_all, fields(table = %table.name))]
pub fn mark_active_storage(mut table: Table) -> Result<Table> {
    let index = table.require_column(DELETED_STORAGE_LEVEL)?;
    let mut replaced = 0usize;

    for row in &mut table.rows {
        if row[index].as_text() == Some(" ") {
            row[index] = Cell::text(ACTIVE_MARKER);
            replaced += 1;
        }
    }

    info!(replaced, "replaced blank storage levels with '{ACTIVE_MARKER}'");
    Ok(table)
}

/// Fills null `TypeCode` cells with a code derived from the row's material
/// reference.
#[instrument(level = "info", skip_all, fields(table = %table.name))]
pub fn backfill_type_codes(mut table: Table) -> Result<Table> {
    let type_code = table.require_column(TYPE_CODE)?;
    let reference = table.require_column(MATERIAL_REFERENCE)?;
    let mut filled = 0usize;

    for row in &mut table.rows {
        if row[type_code].is_null() {
            let material = row[reference].render().unwrap_or_default();
            row[type_code] = Cell::Text(generated_type_code(material.trim()));
            filled += 1;
        }
    }

    let remaining = table.column_cells(type_code).filter(|cell| cell.is_null()).count();
    info!(filled, remaining, "filled null TypeCode values");
    Ok(table)
}

/// Builds `TC00000000` plus the last two characters of `material_reference`.
///
/// References shorter than two characters are left-padded with `0`, so every
/// generated code is twelve characters long.
pub fn generated_type_code(material_reference: &str) -> String {
    let chars: Vec<char> = material_reference.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(2)..].iter().collect();
    format!("{TYPE_CODE_PREFIX}{tail:0>2}")
}

/// Rewrites the `Plant` column as zero-padded text.
#[instrument(level = "info", skip_all, fields(table = %table.name))]
pub fn pad_plant_codes(mut table: Table) -> Result<Table> {
    let index = table.require_column(PLANT)?;
    let mut oversized = 0usize;

    for row in &mut table.rows {
        let Some(code) = row[index].render() else {
            continue;
        };
        if code.trim().is_empty() {
            row[index] = Cell::Null;
            continue;
        }
        let padded = pad_plant_code(&code);
        if padded.chars().count() > PLANT_WIDTH {
            oversized += 1;
        }
        row[index] = Cell::Text(padded);
    }

    if oversized > 0 {
        warn!(oversized, "plant codes wider than {PLANT_WIDTH} characters kept as-is");
    }
    info!(rows = table.len(), "converted Plant column to zero-padded text");
    Ok(table)
}

/// Left-pads a plant code with zeros to [`PLANT_WIDTH`]; longer codes are
/// returned trimmed but otherwise unchanged.
pub fn pad_plant_code(code: &str) -> String {
    format!("{:0>width$}", code.trim(), width = PLANT_WIDTH)
}
