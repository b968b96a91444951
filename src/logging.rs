use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing::Dispatch;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{PipelineError, Result};

/// Timestamp layout of every log line.
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Builds a dispatcher that writes plain-text log lines to `path`.
///
/// The file is truncated, so each run starts with a fresh log. The returned
/// [`Dispatch`] is meant to be scoped with [`tracing::dispatcher::with_default`]
/// instead of being installed globally.
pub fn file_dispatch(path: &Path, level: &str) -> Result<Dispatch> {
    let filter = EnvFilter::try_new(level)
        .map_err(|error| PipelineError::Logging(format!("invalid log level '{level}': {error}")))?;
    let file = File::create(path)?;

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string())),
    );

    Ok(Dispatch::new(subscriber))
}
