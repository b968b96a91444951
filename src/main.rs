use std::path::PathBuf;

use clap::Parser;
use material_aggregator::config::PipelineConfig;
use material_aggregator::{Result, logging, pipeline};
use tracing::error;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.into_config()?;
    let dispatch = logging::file_dispatch(&config.log_file, &config.log_level)?;
    println!(
        "Logging configured - output will be written to {}",
        config.log_file.display()
    );

    tracing::dispatcher::with_default(&dispatch, || {
        pipeline::run(&config)
            .inspect_err(|err| error!("pipeline aborted: {err}"))
            .map(|_| ())
    })
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Join the material master workbooks into one denormalized sheet."
)]
struct Cli {
    /// JSON file overriding the default settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the six source workbooks.
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Output workbook path.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Sheet title of the output workbook.
    #[arg(long)]
    sheet: Option<String>,

    /// Log file path; truncated on every run.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter directive such as `info` or `debug`.
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(input_dir) = self.input_dir {
            config.input_dir = input_dir;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(sheet) = self.sheet {
            config.output_sheet = sheet;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = log_file;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        Ok(config)
    }
}
