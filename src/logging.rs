/// Structured logging for the site map generator
///
/// Installs a `tracing` subscriber with console output on stderr and an
/// optional append-only log file for scheduled runs, and provides the
/// contextual helpers the pipeline logs through (sheet line numbers,
/// source identifiers, run totals).

use crate::model::SiteMapError;
use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as tfmt, EnvFilter, Layer, Registry};

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warning => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Setup
// ---------------------------------------------------------------------------

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the global logger.
///
/// `RUST_LOG`, when set, takes precedence over `min_level`. The log file is
/// opened in append mode and always carries timestamps.
pub fn init_logger(
    min_level: LogLevel,
    log_file: Option<&Path>,
    console_timestamps: bool,
) -> Result<(), SiteMapError> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(min_level).into())
        .from_env_lossy();

    let console = tfmt::layer().with_writer(std::io::stderr).with_target(false);
    let mut layers: Vec<BoxedLayer> = vec![if console_timestamps {
        console.boxed()
    } else {
        console.without_time().boxed()
    }];

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SiteMapError::io(path.display(), e))?;
        layers.push(
            tfmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| SiteMapError::Logging(e.to_string()))
}

// ---------------------------------------------------------------------------
// Contextual helpers
// ---------------------------------------------------------------------------

/// Log a skipped sheet row with its line number and reason.
pub fn log_skipped_row(line: usize, name: &str, reason: &dyn fmt::Display) {
    if name.is_empty() {
        tracing::warn!(line, "skipping row: {}", reason);
    } else {
        tracing::warn!(line, site = name, "skipping row: {}", reason);
    }
}

/// Log the start of a sheet fetch.
pub fn log_fetch(source: &str, remote: bool) {
    let kind = if remote { "url" } else { "file" };
    tracing::info!(kind, "fetching sheet from {}", source);
}

/// Severity for a run summary: info when every row made it (an empty sheet
/// included), error when none did, warning otherwise.
pub fn summary_level(written: usize, skipped: usize) -> Level {
    if skipped == 0 {
        Level::INFO
    } else if written == 0 {
        Level::ERROR
    } else {
        Level::WARN
    }
}

/// Log a summary of a generation run at [`summary_level`].
pub fn log_run_summary(rows_read: usize, written: usize, skipped: usize) {
    let message = format!(
        "generation complete: {}/{} rows rendered, {} skipped",
        written, rows_read, skipped
    );

    let level = summary_level(written, skipped);
    if level == Level::INFO {
        tracing::info!("{}", message);
    } else if level == Level::ERROR {
        tracing::error!("{}", message);
    } else {
        tracing::warn!("{}", message);
    }
}
