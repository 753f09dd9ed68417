use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable selecting the stderr log level.
pub const LOG_LEVEL_ENV: &str = "PHOTO_STUDIO_LOG";
const LOG_FILE: &str = "photo-studio.log";

/// Keeps the file writer flushing until dropped.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

fn parse_log_level(value: &str) -> LevelFilter {
    match value.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" | "warning" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::WARN,
    }
}

fn targets(level: LevelFilter) -> Targets {
    Targets::new()
        .with_default(level)
        .with_target("hyper", LevelFilter::WARN)
        .with_target("hyper_util", LevelFilter::WARN)
        .with_target("reqwest", LevelFilter::WARN)
}

/// Install the file and stderr layers.
///
/// Returns `None` when the log directory cannot be created or a subscriber is
/// already installed; generation proceeds without file logging in that case.
pub fn init_logging(logs_dir: &Path) -> Option<LoggingGuard> {
    if let Err(err) = fs::create_dir_all(logs_dir) {
        eprintln!("Failed to create logs directory {}: {}", logs_dir.display(), err);
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_level =
        std::env::var(LOG_LEVEL_ENV).map(|v| parse_log_level(&v)).unwrap_or(LevelFilter::WARN);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_filter(targets(LevelFilter::INFO));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(targets(stderr_level));

    tracing_subscriber::registry().with(file_layer).with(stderr_layer).try_init().ok()?;
    Some(LoggingGuard { _file_guard: file_guard })
}
