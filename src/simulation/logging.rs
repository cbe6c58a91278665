//! Logging and tracing configuration
//!
//! Console output always goes to stderr so stdout carries only the report.

use std::io;
use tracing::{debug, Level};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level for the library and the binary
    pub level: Level,
    /// Whether to enable JSON formatting on the console
    pub json_format: bool,
    /// Daily rolling log file directory, if any
    pub log_directory: Option<String>,
    /// Log file prefix
    pub log_file_prefix: String,
    /// Whether to log span open/close events
    pub enable_span_events: bool,
    /// Whether to enable ansi colors in console output
    pub enable_ansi: bool,
    /// Custom environment filter, overriding `level`
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            json_format: false,
            log_directory: None,
            log_file_prefix: "cafe-sim".to_string(),
            enable_span_events: false,
            enable_ansi: true,
            env_filter: None,
        }
    }
}

/// Keeps the background log writer alive; dropping it flushes pending lines
#[derive(Debug, Default)]
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Enable JSON formatting
    pub fn with_json_format(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Also write JSON logs to a daily rolling file in `directory`
    pub fn with_file_logging(mut self, directory: impl Into<String>) -> Self {
        self.log_directory = Some(directory.into());
        self
    }

    /// Enable span events
    pub fn with_span_events(mut self) -> Self {
        self.enable_span_events = true;
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Set custom environment filter
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Filter directives used when neither a custom filter nor `RUST_LOG` is set
    pub fn default_directives(&self) -> String {
        format!(
            "{}={level},cafe_sim={level}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
            level = self.level
        )
    }

    fn span_events(&self) -> FmtSpan {
        if self.enable_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    /// Install the global tracing subscriber
    ///
    /// Fails if a subscriber is already installed.
    pub fn init(self) -> Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>> {
        let env_filter = match &self.env_filter {
            Some(filter) => EnvFilter::try_new(filter)?,
            None => EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(self.default_directives()))?,
        };

        let (json_console, pretty_console) = if self.json_format {
            let layer = fmt::layer().json().with_writer(io::stderr).with_span_events(self.span_events());
            (Some(layer), None)
        } else {
            let layer = fmt::layer()
                .pretty()
                .with_writer(io::stderr)
                .with_ansi(self.enable_ansi)
                .with_span_events(self.span_events());
            (None, Some(layer))
        };

        let (file_layer, file_guard) = match self.log_directory.as_deref() {
            Some(dir) => {
                let (writer, guard) = non_blocking(rolling::daily(dir, &self.log_file_prefix));
                let layer = fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_span_events(self.span_events());
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        Registry::default()
            .with(env_filter)
            .with(json_console)
            .with(pretty_console)
            .with(file_layer)
            .try_init()?;

        debug!(level = %self.level, json = self.json_format, file = ?self.log_directory, "Logging initialized");
        Ok(LoggingGuard { _file: file_guard })
    }
}
