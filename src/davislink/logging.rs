use std::fs;
use std::path::Path;

use davislink::error::{DavisError, DavisResult};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "davislink";
const LOG_FILE_SUFFIX: &str = "log";
const MAX_LOG_FILES: usize = 100;

/// Daily rotated `davislink.<date>.log` files under `dir`, created if missing
pub(crate) fn log_file_appender(dir: &Path) -> DavisResult<RollingFileAppender> {
    fs::create_dir_all(dir).map_err(|e| {
        DavisError::Config(format!("Failed to create log dir {}: {}", dir.display(), e))
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(MAX_LOG_FILES)
        .build(dir)
        .map_err(|e| DavisError::Config(format!("Failed to open log file: {}", e)))
}

/// Log to stderr and to rotating files in `log_dir`
pub(crate) fn init_logger(verbose: bool, log_dir: &Path) -> DavisResult<()> {
    let default_filter = if verbose {
        "davislink=debug,info"
    } else {
        "davislink=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let appender = log_file_appender(log_dir)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_target(false).with_ansi(false).with_writer(appender))
        .init();

    Ok(())
}
