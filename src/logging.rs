// src/logging.rs
// =============================================================================
// Logger setup for the binary (and for embedders who want the same output).
//
// The engine itself only uses the `log` macros; nothing is printed unless a
// logger is installed. env_logger reads RUST_LOG first and the level given
// here overrides it, so `--log-level debug` always wins.
// =============================================================================

use std::io::Write;

use clap::ValueEnum;
use log::{LevelFilter, SetLoggerError};

/// Minimum level of messages to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// How log lines are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Plain,
    /// One JSON object per line
    Json,
}

// Installs env_logger with our level and format
//
// Returns an error if a logger is already installed (tests, embedders).
pub fn init_logger(level: LevelFilter, format: LogFormat) -> Result<(), SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    // html5ever reports every recovered markup error; keep that quiet
    builder.filter_module("html5ever", LevelFilter::Error);
    builder.filter_module("selectors", LevelFilter::Warn);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("url_analyzer", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                let ts = buf.timestamp_millis();
                writeln!(
                    buf,
                    "{{\"ts\":\"{}\",\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                    ts,
                    record.level(),
                    record.target(),
                    serde_json::to_string(&record.args().to_string())
                        .unwrap_or_else(|_| "\"\"".into())
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let emoji = match record.level() {
                    log::Level::Error => "❌",
                    log::Level::Warn => "⚠️ ",
                    log::Level::Info => "✔️ ",
                    log::Level::Debug => "🔍",
                    log::Level::Trace => "🔬",
                };
                writeln!(
                    buf,
                    "{} {} [{}] {}",
                    emoji,
                    record.target(),
                    record.level(),
                    record.args()
                )
            });
        }
    }

    builder.try_init()
}
