use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{error, info, instrument};

use crate::aggregate::{aggregate, format_seconds};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::io::{excel_read, excel_write};
use crate::model::{Datasets, Table};
use crate::report::{self, NaSummary, PREVIEW_ROWS, TableProfile};
use crate::transform::normalize::TYPE_CODE;
use crate::transform::{self, backfill_type_codes, mark_active_storage, pad_plant_codes};

const BANNER_WIDTH: usize = 80;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub rows: usize,
    pub output: PathBuf,
    pub aggregation_time: Duration,
    pub export_time: Duration,
    pub na: NaSummary,
}

/// Runs every stage in order: load, field fixes, cleaning, joins, formatting
/// and export. Progress goes to the current tracing dispatcher and to stdout.
#[instrument(level = "info", skip_all, fields(output = %config.output.display()))]
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    let data = load(config)?;
    let (data, _profiles) = normalize(data)?;
    let data = clean(data)?;

    let started = Instant::now();
    let result = aggregate(data)?;
    let aggregation_time = started.elapsed();

    info!("formatting result columns");
    let result = report::finalize(result)?;
    let na = print_summary(&result);

    let export_time = export(config, &result)?;

    let summary = RunSummary {
        rows: result.len(),
        output: config.output.clone(),
        aggregation_time,
        export_time,
        na,
    };
    print_completion(config, &summary);
    Ok(summary)
}

fn load(config: &PipelineConfig) -> Result<Datasets> {
    info!("starting data loading process");
    let started = Instant::now();

    match excel_read::read_datasets(config) {
        Ok(data) => {
            info!(elapsed = %format_seconds(started), "all files loaded successfully");
            Ok(data)
        }
        Err(err @ PipelineError::MissingInput(_)) => {
            error!("File not found: {err}");
            Err(err)
        }
        Err(err) => {
            error!("An unexpected error occurred: {err}");
            Err(err)
        }
    }
}

/// Applies the field fixes. The data-quality profile is taken after the
/// storage levels are marked and before any backfill or padding, so it shows
/// the gaps of the source data.
pub fn normalize(data: Datasets) -> Result<(Datasets, Vec<TableProfile>)> {
    info!("applying transformations");
    let data = Datasets {
        storage: mark_active_storage(data.storage)?,
        ..data
    };

    let profiles: Vec<TableProfile> = data.iter().map(TableProfile::from_table).collect();
    println!("\nData Quality Summary:");
    for profile in &profiles {
        println!("\n{profile}");
    }

    println!("\nHandling null values in TypeCode...");
    let materials = backfill_type_codes(data.materials)?;
    let type_code = materials.require_column(TYPE_CODE)?;
    let remaining = materials
        .column_cells(type_code)
        .filter(|cell| cell.is_null())
        .count();
    println!("Null TypeCode count after filling: {remaining}");

    let data = Datasets {
        materials,
        plants: pad_plant_codes(data.plants)?,
        storage: pad_plant_codes(data.storage)?,
        ..data
    };
    info!("transformations applied successfully");
    Ok((data, profiles))
}

fn clean(data: Datasets) -> Result<Datasets> {
    info!("starting data cleaning process");
    let started = Instant::now();
    let data = data.try_map(transform::clean_table)?;
    let elapsed = format_seconds(started);
    info!(elapsed = %elapsed, "data cleaning completed");
    println!("\nData cleaning completed in {elapsed}");
    Ok(data)
}

fn print_summary(result: &Table) -> NaSummary {
    let na = NaSummary::from_table(result);
    info!(
        total_na = na.total,
        rows_with_na = na.rows_with_na,
        total_rows = na.total_rows,
        "final result summary"
    );

    let rule = "=".repeat(BANNER_WIDTH);
    println!("\n{rule}\nFINAL RESULT SUMMARY\n{rule}");
    println!("\n{na}");
    println!("\nFirst {PREVIEW_ROWS} rows of result:");
    println!("{}", result.preview(PREVIEW_ROWS));
    na
}

fn export(config: &PipelineConfig, result: &Table) -> Result<Duration> {
    info!("starting export to Excel");
    let started = Instant::now();

    if let Err(err) = excel_write::write_table(&config.output, &config.output_sheet, result) {
        error!("Error exporting to Excel: {err}");
        return Err(err);
    }

    info!(
        rows = result.len(),
        output = %config.output.display(),
        elapsed = %format_seconds(started),
        "export completed"
    );
    println!(
        "\nSuccessfully exported {} rows to {}",
        result.len(),
        config.output.display()
    );
    Ok(started.elapsed())
}

fn print_completion(config: &PipelineConfig, summary: &RunSummary) {
    let rule = "=".repeat(BANNER_WIDTH);
    println!("\n{rule}\nProcess completed successfully!\n{rule}");
    println!(
        "  - Total aggregation time: {:.2}s",
        summary.aggregation_time.as_secs_f64()
    );
    println!("  - Export time: {:.2}s", summary.export_time.as_secs_f64());
    println!(
        "  - Result file: {} ({} rows)",
        summary.output.display(),
        summary.rows
    );
    println!("  - Log file: {}", config.log_file.display());
    println!("{rule}");
}
