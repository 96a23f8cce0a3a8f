#![expect(clippy::print_stderr, reason = "Tracing not initialized yet")]

//! Log output for the harness.
//!
//! Stdout belongs to reports, exports and the `serve-stub` protocol stream,
//! so log records only ever go to stderr or to `REGISTRY_E2E_LOG`.

use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub const ENV_LOG_FILE: &str = "REGISTRY_E2E_LOG";
pub const ENV_LOG_FORMAT: &str = "REGISTRY_E2E_LOG_FORMAT";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<LogFormat> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    File(PathBuf),
}

/// Resolved logging settings; `verbose` lowers the default filter to `debug`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogSettings {
    pub default_level: &'static str,
    pub format: LogFormat,
    pub sink: LogSink,
    /// Environment values that were ignored, reported once the subscriber is up.
    pub rejected: Vec<String>,
}

impl LogSettings {
    pub fn from_env(verbose: bool) -> Self {
        Self::resolve(
            verbose,
            std::env::var(ENV_LOG_FORMAT).ok().as_deref(),
            std::env::var(ENV_LOG_FILE).ok().as_deref(),
        )
    }

    fn resolve(verbose: bool, format: Option<&str>, file: Option<&str>) -> Self {
        let mut rejected = Vec::new();
        let format = match format {
            None => LogFormat::default(),
            Some(raw) => LogFormat::parse(raw).unwrap_or_else(|| {
                rejected.push(format!("{}={}", ENV_LOG_FORMAT, raw));
                LogFormat::default()
            }),
        };
        let sink = match file.map(str::trim) {
            Some(path) if !path.is_empty() => LogSink::File(PathBuf::from(path)),
            _ => LogSink::Stderr,
        };
        Self {
            default_level: if verbose { "debug" } else { "warn" },
            format,
            sink,
            rejected,
        }
    }
}

/// Keeps the non-blocking file writer alive until the process exits.
#[derive(Debug)]
pub struct TelemetryGuard {
    _guard: Option<WorkerGuard>,
}

pub fn init_tracing(settings: &LogSettings) -> TelemetryGuard {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.default_level));

    let (writer, guard, ansi) = match &settings.sink {
        LogSink::File(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                (BoxMakeWriter::new(non_blocking), Some(guard), false)
            }
            Err(err) => {
                eprintln!("Warning: failed to open log file {}: {}", path.display(), err);
                stderr_writer()
            }
        },
        LogSink::Stderr => stderr_writer(),
    };

    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = match settings.format {
        LogFormat::Json => Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .json()
                .with_writer(writer)
                .finish(),
        ),
        LogFormat::Text => Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_thread_names(true)
                .with_ansi(ansi)
                .with_writer(writer)
                .finish(),
        ),
    };

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return TelemetryGuard { _guard: None };
    }
    for value in &settings.rejected {
        tracing::warn!(value = %value, "Invalid log config; using default");
    }

    TelemetryGuard { _guard: guard }
}

fn stderr_writer() -> (BoxMakeWriter, Option<WorkerGuard>, bool) {
    (
        BoxMakeWriter::new(std::io::stderr),
        None,
        std::io::stderr().is_terminal(),
    )
}
