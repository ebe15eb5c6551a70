// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Console output is always installed. With the `file-logging` feature a
//! JSON file layer is added in a timestamped run folder with retention.

use anyhow::{Context, Result};
use fp420_config::LoggingConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

#[cfg(feature = "file-logging")]
use std::path::{Path, PathBuf};

use crate::cli::CrateDebugFlags;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logging initialization result
///
/// Keep it alive for the lifetime of the program; file writers flush on drop.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    #[cfg(feature = "file-logging")]
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Get the run folder, when file logging is active
    #[cfg(feature = "file-logging")]
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Build the `EnvFilter` for a config and debug flags
///
/// `RUST_LOG`, when set, takes precedence over both.
pub fn build_env_filter(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(debug_flags.to_filter_string(&config.level)))
}

fn console_layer(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> BoxedLayer {
    let filter = build_env_filter(debug_flags, config);
    if config.is_json() {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(filter)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .with_filter(filter)
            .boxed()
    }
}

/// Initialize console logging
///
/// # Errors
///
/// Fails if a global subscriber has already been installed.
pub fn init_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<LoggingGuard> {
    Registry::default()
        .with(vec![console_layer(debug_flags, config)])
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: Vec::new(),
        #[cfg(feature = "file-logging")]
        log_dir: None,
    })
}

/// Initialize console logging plus a rotated JSON log file
///
/// Creates a timestamped folder structure:
/// ```text
/// ./logs/
///   └── run_20250101_120000/
///       └── fp420.log
/// ```
///
/// Only the `retention_runs` most recent run folders are kept (default 10).
#[cfg(feature = "file-logging")]
pub fn init_file_logging(
    debug_flags: &CrateDebugFlags,
    config: &LoggingConfig,
    log_dir: Option<PathBuf>,
    retention_runs: Option<usize>,
) -> Result<LoggingGuard> {
    use tracing_appender::rolling;

    let base_log_dir = log_dir.unwrap_or_else(|| PathBuf::from("./logs"));
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_folder = base_log_dir.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

    cleanup_old_runs(&base_log_dir, retention_runs.unwrap_or(10))?;

    let file_appender = rolling::daily(&run_folder, "fp420.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .with_filter(build_env_filter(debug_flags, config))
        .boxed();

    Registry::default()
        .with(vec![console_layer(debug_flags, config), file_layer])
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(LoggingGuard {
        _file_guards: vec![guard],
        log_dir: Some(run_folder),
    })
}

/// Remove all but the newest `retention_runs` run folders
#[cfg(feature = "file-logging")]
fn cleanup_old_runs(base_log_dir: &Path, retention_runs: usize) -> Result<()> {
    if !base_log_dir.exists() {
        return Ok(());
    }

    let mut runs: Vec<PathBuf> = std::fs::read_dir(base_log_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with("run_"))
                    .unwrap_or(false)
        })
        .collect();

    // run_YYYYmmdd_HHMMSS sorts chronologically by name
    runs.sort();

    if runs.len() > retention_runs {
        let to_remove = runs.len() - retention_runs;
        for path in runs.iter().take(to_remove) {
            if let Err(e) = std::fs::remove_dir_all(path) {
                eprintln!(
                    "Warning: Failed to remove old log directory {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    Ok(())
}
