//! Rolling File Logger
//!
//! Installs a global `tracing` subscriber that writes through a
//! `tracing_appender` rolling file appender in `<dir>`, keeping at most
//! `max_files` rotated files. Records emitted through the `log` facade are
//! bridged into the same subscriber. The most recent lines are also kept in
//! an in-memory circular buffer so they can be surfaced without touching the
//! filesystem.

mod buffer;
mod writer;

use std::path::PathBuf;
use std::sync::OnceLock;

use thiserror::Error;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::EnvFilter;

pub use buffer::LineBuffer;
pub use writer::{parse_rotation, BufferedAppender, RollingConfig, Tee, DEFAULT_MAX_FILES};

/// Lines retained in memory by default
pub const DEFAULT_BUFFER_LINES: usize = 500;

static RECENT: OnceLock<LineBuffer> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("log file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("log appender error: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    #[error("logger already initialized: {0}")]
    AlreadyInitialized(String),

    #[error("logger not initialized")]
    NotInitialized,
}

/// Local wall-clock timestamps for each line
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Initialize the global logger with daily rotation
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), LoggerError> {
    init_with_config(RollingConfig::new(log_dir, app_name))
}

/// Initialize the global logger
///
/// Fails with [`LoggerError::AlreadyInitialized`] if a global subscriber is
/// already installed.
pub fn init_with_config(config: RollingConfig) -> Result<(), LoggerError> {
    std::fs::create_dir_all(&config.dir)?;

    let buffer = RECENT
        .get_or_init(|| LineBuffer::new(DEFAULT_BUFFER_LINES))
        .clone();
    let writer = BufferedAppender::open(&config, buffer)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_timer(LocalTime)
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))
}

/// Log an info line through the installed logger
pub fn info(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::info!("{}", msg);
    Ok(())
}

/// Log an error line through the installed logger
pub fn error(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::error!("{}", msg);
    Ok(())
}

/// Last `n` lines written since initialization, oldest first
pub fn recent_lines(n: usize) -> Vec<String> {
    match RECENT.get() {
        Some(buffer) => buffer.tail(n),
        None => Vec::new(),
    }
}

fn ensure_initialized() -> Result<(), LoggerError> {
    RECENT.get().map(|_| ()).ok_or(LoggerError::NotInitialized)
}
