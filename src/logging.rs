//! Logging functionality for nanobrush
//!
//! Sets up a `tracing` subscriber so the client's request and extraction
//! traces become visible.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log levels supported by nanobrush.
///
/// These map to the tracing level hierarchy: ERROR, WARN, INFO, DEBUG, TRACE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    /// Includes one event per extraction strategy
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Default directives for `level`.
///
/// Extraction strategy events are kept at `debug` or finer so a failed edit
/// always shows which strategies were tried.
fn default_filter(level: LogLevel) -> String {
    let extraction = match level {
        LogLevel::Trace => Level::TRACE,
        _ => Level::DEBUG,
    };
    format!(
        "nanobrush={},nanobrush::backend::observer={}",
        level.to_tracing_level(),
        extraction
    )
}

/// Initialize logging with a specific log level.
///
/// Call once at application start. The `NANOBRUSH_LOG` environment variable, when
/// set, takes precedence over `level`:
///
/// ```bash
/// NANOBRUSH_LOG=nanobrush=debug cargo run --example edit_image
/// ```
///
/// ```no_run
/// use nanobrush::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Info);
/// tracing::info!("Application starting");
/// ```
pub fn init_logging(level: LogLevel) {
    let env_filter = EnvFilter::try_from_env("NANOBRUSH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(default_filter(level))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .init();

    tracing::info!("nanobrush logging initialized at level: {:?}", level);
}

/// Initialize logging with a custom filter directive string.
///
/// ```no_run
/// use nanobrush::logging::init_logging_with_filter;
///
/// init_logging_with_filter("nanobrush=info,nanobrush::backend::response=trace");
/// ```
pub fn init_logging_with_filter(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| {
        tracing::warn!("Invalid filter string: {}, using default (info)", filter);
        EnvFilter::new("nanobrush=info")
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .init();

    tracing::info!("nanobrush logging initialized with custom filter: {}", filter);
}
