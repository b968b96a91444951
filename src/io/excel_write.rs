use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::model::{Cell, Table};

/// Writes `table` as the only sheet of a new workbook at `path`.
#[instrument(level = "debug", skip_all, fields(path = %path.display(), sheet = sheet_name))]
pub fn write_table(path: &Path, sheet_name: &str, table: &Table) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col_idx, header) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col_idx as u16, header, &header_format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let excel_col = col_idx as u16;
            match cell {
                Cell::Text(value) => {
                    worksheet.write_string(excel_row, excel_col, value)?;
                }
                Cell::Number(value) => {
                    worksheet.write_number(excel_row, excel_col, *value)?;
                }
                Cell::Boolean(value) => {
                    worksheet.write_boolean(excel_row, excel_col, *value)?;
                }
                Cell::Null => {}
            }
        }
    }

    workbook.save(path)?;
    debug!(rows = table.len(), "workbook saved");
    Ok(())
}
