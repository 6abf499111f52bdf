//! Logging context: console output plus a size-capped rotating log file.
//!
//! The subscriber is built once at startup from a [`LogConfig`] and the
//! returned [`LogContext`] must be held for the lifetime of the process. Dropping
//! it flushes and stops the background file writer.

use std::path::{Path, PathBuf};

use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::config::LogConfig;
use crate::error::AppError;

/// Handle to the installed logging sinks.
pub struct LogContext {
    file: PathBuf,
    _guard: WorkerGuard,
}

impl LogContext {
    /// Path of the active log file.
    pub fn file(&self) -> &Path {
        &self.file
    }
}

/// Install the global subscriber with a stderr layer and a rotating file layer.
pub fn init(config: &LogConfig) -> Result<LogContext, AppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let (file_writer, guard) = tracing_appender::non_blocking(rotating_file(config)?);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .map_err(|e| AppError::Config(format!("failed to install log subscriber: {e}")))?;

    Ok(LogContext {
        file: config.file.clone(),
        _guard: guard,
    })
}

/// Open the log file, rotating to numbered backups once `max_bytes` is reached.
pub fn rotating_file(config: &LogConfig) -> Result<FileRotate<AppendCount>, AppError> {
    if let Some(parent) = config.file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::Config(format!(
                "cannot create log directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    Ok(FileRotate::new(
        &config.file,
        AppendCount::new(config.backup_count),
        ContentLimit::Bytes(config.max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    ))
}
