use std::collections::HashMap;
use std::time::Instant;

use tracing::{info, instrument};

use crate::error::Result;
use crate::model::{Cell, Datasets, Table};
use crate::transform::normalize::{MATERIAL_REFERENCE, PLANT};

pub const MANUFACTURER_ID: &str = "ManufacturerID";
pub const SUPPLIER_ID: &str = "SupplierID";

/// Suffixes appended to clashing non-key column names.
const LEFT_SUFFIX: &str = "_x";
const RIGHT_SUFFIX: &str = "_y";

/// Left-joins `right` onto `left` on the columns named in `on`.
///
/// Every left row is kept. A left row matching several right rows is repeated
/// once per match, in right-table order; an unmatched left row gets nulls for
/// the right-side columns. Keys compare by their text rendering and a key that
/// contains a null never matches.
pub fn left_join(left: Table, right: &Table, on: &[&str]) -> Result<Table> {
    let left_keys = on
        .iter()
        .map(|column| left.require_column(column))
        .collect::<Result<Vec<_>>>()?;
    let right_keys = on
        .iter()
        .map(|column| right.require_column(column))
        .collect::<Result<Vec<_>>>()?;

    let right_payload: Vec<usize> = (0..right.columns.len())
        .filter(|index| !right_keys.contains(index))
        .collect();

    let columns = joined_columns(&left, right, &left_keys, &right_payload);

    let mut index: HashMap<Vec<String>, Vec<usize>> = HashMap::new();
    for (row_idx, row) in right.rows.iter().enumerate() {
        if let Some(key) = join_key(row, &right_keys) {
            index.entry(key).or_default().push(row_idx);
        }
    }

    let mut joined = Table::new(left.name.clone(), columns);
    for row in left.rows {
        let matches = join_key(&row, &left_keys)
            .and_then(|key| index.get(&key))
            .map(Vec::as_slice)
            .unwrap_or_default();

        if matches.is_empty() {
            let mut cells = row;
            cells.resize(joined.columns.len(), Cell::Null);
            joined.rows.push(cells);
            continue;
        }

        for &right_idx in matches {
            let right_row = &right.rows[right_idx];
            let mut cells = Vec::with_capacity(joined.columns.len());
            cells.extend(row.iter().cloned());
            cells.extend(right_payload.iter().map(|&col| right_row[col].clone()));
            joined.rows.push(cells);
        }
    }

    Ok(joined)
}

fn join_key(row: &[Cell], key_columns: &[usize]) -> Option<Vec<String>> {
    key_columns.iter().map(|&index| row[index].render()).collect()
}

fn joined_columns(
    left: &Table,
    right: &Table,
    left_keys: &[usize],
    right_payload: &[usize],
) -> Vec<String> {
    let right_names: Vec<&str> = right_payload
        .iter()
        .map(|&index| right.columns[index].as_str())
        .collect();

    let mut columns: Vec<String> = left
        .columns
        .iter()
        .enumerate()
        .map(|(index, name)| {
            if !left_keys.contains(&index) && right_names.contains(&name.as_str()) {
                format!("{name}{LEFT_SUFFIX}")
            } else {
                name.clone()
            }
        })
        .collect();

    columns.extend(right_names.iter().map(|name| {
        let clashes = left
            .columns
            .iter()
            .enumerate()
            .any(|(index, left_name)| !left_keys.contains(&index) && left_name == name);
        if clashes {
            format!("{name}{RIGHT_SUFFIX}")
        } else {
            name.to_string()
        }
    }));

    columns
}

/// Chains the five joins that produce the denormalized material table:
/// manufacturer names, plants, suppliers, supplier names and finally storage
/// on material and plant.
#[instrument(level = "info", skip_all)]
pub fn aggregate(data: Datasets) -> Result<Table> {
    let started = Instant::now();
    info!("starting data aggregation");

    let result = join_step(1, "merging materials with manufacturer names", || {
        let joined = left_join(data.materials, &data.manufacturer_names, &[MANUFACTURER_ID])?;
        Ok(joined.drop_column(MANUFACTURER_ID)?.renamed("result"))
    })?;
    let result = join_step(2, "merging with plants data", || {
        left_join(result, &data.plants, &[MATERIAL_REFERENCE])
    })?;
    let result = join_step(3, "merging with suppliers data", || {
        left_join(result, &data.suppliers, &[MATERIAL_REFERENCE])
    })?;
    let result = join_step(4, "adding supplier names", || {
        left_join(result, &data.supplier_names, &[SUPPLIER_ID])?.drop_column(SUPPLIER_ID)
    })?;
    let result = join_step(5, "merging with storage data", || {
        left_join(result, &data.storage, &[MATERIAL_REFERENCE, PLANT])
    })?;

    info!(
        rows = result.len(),
        columns = result.columns.len(),
        elapsed = %format_seconds(started),
        "aggregation completed"
    );
    Ok(result)
}

fn join_step(step: u8, label: &str, run: impl FnOnce() -> Result<Table>) -> Result<Table> {
    info!(step, "step {step}: {label}");
    let started = Instant::now();
    let table = run()?;
    info!(
        step,
        rows = table.len(),
        elapsed = %format_seconds(started),
        "step {step} completed"
    );
    Ok(table)
}

/// Formats the time elapsed since `started` as seconds with two decimals.
pub fn format_seconds(started: Instant) -> String {
    format!("{:.2}s", started.elapsed().as_secs_f64())
}
