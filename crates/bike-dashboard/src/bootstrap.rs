use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use dashboard_core::settings::APP_DIR_NAME;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name used when `--log-file` is not given.
pub const DEFAULT_LOG_FILE: &str = "bike-dashboard.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Ensure `~/.bike-dashboard/` and `~/.bike-dashboard/logs/` exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    let dir = app_dir();
    fs::create_dir_all(dir.join("logs"))
        .with_context(|| format!("creating {}", dir.display()))?;
    Ok(())
}

/// `~/.bike-dashboard/logs/bike-dashboard.log`.
pub fn default_log_path() -> PathBuf {
    app_dir().join("logs").join(DEFAULT_LOG_FILE)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name onto an [`EnvFilter`] directive. Unknown names
/// are passed through so `RUST_LOG`-style directives also work.
pub fn filter_directive(log_level: &str) -> String {
    let upper = log_level.to_uppercase();
    match upper.as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// The dashboard owns the terminal, so records are appended to `log_file`
/// (default [`default_log_path`]) rather than written to stderr. Falls back
/// to `"info"` if the level string is not a valid filter.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let path = log_file.cloned().unwrap_or_else(default_log_path);
    let file = open_log_file(&path)?;

    let filter = EnvFilter::try_new(filter_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(())
}

fn open_log_file(path: &Path) -> anyhow::Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
