//! File logging. The terminal belongs to the UI, so everything goes to a
//! daily rolling file.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

pub const DEFAULT_FILTER: &str = "info,pokebattle=debug";
const LOG_PREFIX: &str = "pokebattle";
const LOG_SUFFIX: &str = "log";

/// Installs the global subscriber. Keep the guard alive until exit or
/// buffered lines are lost.
///
/// Fails when `log_dir` cannot be created or written, or when a global
/// subscriber is already set.
pub fn init_logging(log_dir: &Path) -> io::Result<WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let file_appender = rolling_appender(log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(io::Error::other)?;

    Ok(guard)
}

fn rolling_appender(log_dir: &Path) -> io::Result<RollingFileAppender> {
    std::fs::create_dir_all(log_dir)?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix(LOG_SUFFIX)
        .build(log_dir)
        .map_err(io::Error::other)
}
