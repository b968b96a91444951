use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;

/// Location of one source table: a workbook file and the sheet to read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceSpec {
    pub file: String,
    pub sheet: String,
}

impl SourceSpec {
    fn new(file: &str, sheet: &str) -> Self {
        Self {
            file: file.to_string(),
            sheet: sheet.to_string(),
        }
    }
}

/// The six source workbooks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    pub materials: SourceSpec,
    pub plants: SourceSpec,
    pub storage: SourceSpec,
    pub suppliers: SourceSpec,
    pub supplier_names: SourceSpec,
    pub manufacturer_names: SourceSpec,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            materials: SourceSpec::new("materials.xlsx", "materials"),
            plants: SourceSpec::new("plants.xlsx", "plants"),
            storage: SourceSpec::new("storage.xlsx", "storage"),
            suppliers: SourceSpec::new("suppliers.xlsx", "suppliers"),
            supplier_names: SourceSpec::new("supplier-names.xlsx", "supplier-names"),
            manufacturer_names: SourceSpec::new("manufacturer-names.xlsx", "manufacturer-names"),
        }
    }
}

/// Settings for one pipeline run. `Default` reproduces the fixed file layout
/// in the working directory; a JSON file may override any subset of fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory the source workbooks are resolved against.
    pub input_dir: PathBuf,
    pub output: PathBuf,
    /// Sheet title of the exported workbook.
    pub output_sheet: String,
    pub log_file: PathBuf,
    /// `EnvFilter` directive, e.g. `info` or `material_aggregator=debug`.
    pub log_level: String,
    pub sources: SourceFiles,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output: PathBuf::from("result.xlsx"),
            output_sheet: "result-template".to_string(),
            log_file: PathBuf::from("log.txt"),
            log_level: "info".to_string(),
            sources: SourceFiles::default(),
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON configuration file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Resolves a source workbook against the input directory.
    pub fn source_path(&self, source: &SourceSpec) -> PathBuf {
        self.input_dir.join(&source.file)
    }
}
