#![allow(dead_code)]

use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use material_aggregator::config::PipelineConfig;
use material_aggregator::model::Cell;
use material_aggregator::{logging, pipeline};
use rust_xlsxwriter::Workbook;

/// Cell used when building fixture workbooks.
#[derive(Debug, Clone, Copy)]
pub enum Fx<'a> {
    S(&'a str),
    N(f64),
    Blank,
}

/// Writes a single-sheet workbook with a header row.
pub fn write_sheet(path: &Path, sheet: &str, headers: &[&str], rows: &[Vec<Fx<'_>>]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).expect("sheet name");

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .expect("header written");
    }
    for (row_idx, row) in rows.iter().enumerate() {
        let excel_row = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Fx::S(value) => {
                    worksheet
                        .write_string(excel_row, col as u16, *value)
                        .expect("string written");
                }
                Fx::N(value) => {
                    worksheet
                        .write_number(excel_row, col as u16, *value)
                        .expect("number written");
                }
                Fx::Blank => {}
            }
        }
    }

    workbook.save(path).expect("fixture saved");
}

/// Rows for each of the six source workbooks.
#[derive(Default)]
pub struct Inputs<'a> {
    pub materials: Vec<Vec<Fx<'a>>>,
    pub manufacturer_names: Vec<Vec<Fx<'a>>>,
    pub plants: Vec<Vec<Fx<'a>>>,
    pub suppliers: Vec<Vec<Fx<'a>>>,
    pub supplier_names: Vec<Vec<Fx<'a>>>,
    pub storage: Vec<Vec<Fx<'a>>>,
}

pub const MATERIAL_HEADERS: [&str; 5] = [
    "MaterialReference",
    "ManufacturerID",
    "ArticleNumber",
    "TypeCode",
    "ShortText",
];
pub const MANUFACTURER_HEADERS: [&str; 2] = ["ManufacturerID", "ManufacturerName"];
pub const PLANT_HEADERS: [&str; 4] = ["MaterialReference", "Plant", "Disposition", "ReporderPoint"];
pub const SUPPLIER_HEADERS: [&str; 3] = ["MaterialReference", "SupplierID", "SupplierArticleNumber"];
pub const SUPPLIER_NAME_HEADERS: [&str; 2] = ["SupplierID", "SupplierName"];
pub const STORAGE_HEADERS: [&str; 5] = [
    "MaterialReference",
    "Plant",
    "StorageLocation",
    "StorageBin",
    "DeletedStorageLevel",
];

/// Writes all six workbooks into `dir` using the default file layout.
pub fn write_inputs(dir: &Path, inputs: &Inputs<'_>) {
    write_sheet(&dir.join("materials.xlsx"), "materials", &MATERIAL_HEADERS, &inputs.materials);
    write_sheet(
        &dir.join("manufacturer-names.xlsx"),
        "manufacturer-names",
        &MANUFACTURER_HEADERS,
        &inputs.manufacturer_names,
    );
    write_sheet(&dir.join("plants.xlsx"), "plants", &PLANT_HEADERS, &inputs.plants);
    write_sheet(&dir.join("suppliers.xlsx"), "suppliers", &SUPPLIER_HEADERS, &inputs.suppliers);
    write_sheet(
        &dir.join("supplier-names.xlsx"),
        "supplier-names",
        &SUPPLIER_NAME_HEADERS,
        &inputs.supplier_names,
    );
    write_sheet(&dir.join("storage.xlsx"), "storage", &STORAGE_HEADERS, &inputs.storage);
}

/// Configuration reading from and writing into `dir`.
pub fn config_for(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        input_dir: dir.to_path_buf(),
        output: dir.join("result.xlsx"),
        log_file: dir.join("log.txt"),
        ..PipelineConfig::default()
    }
}

/// Reads a sheet back as rendered strings, header row included.
pub fn read_sheet(path: &Path, sheet: &str) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("result opened");
    let range = workbook
        .worksheet_range(sheet)
        .expect("sheet present")
        .expect("sheet parsed");
    range
        .rows()
        .map(|row| row.iter().map(render).collect())
        .collect()
}

fn render(cell: &DataType) -> String {
    match cell {
        DataType::String(value) => value.clone(),
        DataType::Float(value) => Cell::Number(*value).to_string(),
        DataType::Int(value) => value.to_string(),
        DataType::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Looks up a column of a sheet read with [`read_sheet`].
pub fn column<'a>(sheet: &'a [Vec<String>], name: &str) -> Vec<&'a str> {
    let index = sheet[0]
        .iter()
        .position(|header| header == name)
        .expect("column present");
    sheet[1..].iter().map(|row| row[index].as_str()).collect()
}

/// Runs the pipeline with logging routed to `config.log_file` and returns the
/// outcome together with the log contents.
pub fn run_logged(
    config: &PipelineConfig,
) -> (material_aggregator::Result<pipeline::RunSummary>, String) {
    let dispatch =
        logging::file_dispatch(&config.log_file, &config.log_level).expect("dispatch built");
    let outcome = tracing::dispatcher::with_default(&dispatch, || pipeline::run(config));
    let log = std::fs::read_to_string(&config.log_file).expect("log read");
    (outcome, log)
}
