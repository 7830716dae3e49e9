//! Diagnostic log setup.
//!
//! Lifecycle events go to `changelog.log`, failures to `error.log`, and
//! anything `RUST_LOG` selects (warnings by default) to stderr.

use std::error::Error;
use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

pub const CHANGELOG_FILE: &str = "changelog.log";
pub const ERROR_FILE: &str = "error.log";

/// Flush handles for the file writers; logs are lost if these drop early.
pub struct LogGuards {
    _changelog: WorkerGuard,
    _errors: WorkerGuard,
}

/// Install the global subscriber, creating `log_dir` if needed.
pub fn init(log_dir: &Path) -> Result<LogGuards, Box<dyn Error>> {
    fs::create_dir_all(log_dir)?;

    let (changelog, changelog_guard) = tracing_appender::non_blocking(appender(log_dir, CHANGELOG_FILE)?);
    let (errors, errors_guard) = tracing_appender::non_blocking(appender(log_dir, ERROR_FILE)?);

    let changelog_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(changelog)
        .with_filter(LevelFilter::INFO);

    let error_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(errors)
        .with_filter(LevelFilter::ERROR);

    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(changelog_layer)
        .with(error_layer)
        .with(console_layer)
        .try_init()?;

    Ok(LogGuards {
        _changelog: changelog_guard,
        _errors: errors_guard,
    })
}

/// Append-only writer for a single, never-rotated log file.
fn appender(log_dir: &Path, file: &str) -> Result<RollingFileAppender, Box<dyn Error>> {
    Ok(RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file)
        .build(log_dir)?)
}
