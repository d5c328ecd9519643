//! Structured logging for the analysis pipeline
//!
//! This module provides:
//! - Structured entries with levels, a logger name and a session id
//! - Console, JSON and compact renderings
//! - A probe logger that records each pipeline step with its outcome
//!
//! Every [`Logger`] writes to an explicit sink. Nothing is global; the
//! binary builds one [`LoggerFactory`] and hands loggers to whoever
//! needs them.

use crate::error::{AppError, ProbeError, Result};
use crate::models::Config;
use crate::types::StepStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - raw tool invocations and parse details
    Debug = 1,
    /// Info level - one line per pipeline step
    Info = 2,
    /// Warning level - a probe failed and was skipped
    Warn = 3,
    /// Error level - the run cannot produce a report
    Error = 4,
    /// Fatal level - process is about to exit
    Fatal = 5,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m", // White
            LogLevel::Debug => "\x1b[36m", // Cyan
            LogLevel::Info => "\x1b[32m",  // Green
            LogLevel::Warn => "\x1b[33m",  // Yellow
            LogLevel::Error => "\x1b[31m", // Red
            LogLevel::Fatal => "\x1b[35m", // Magenta
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Run this entry belongs to
    pub session_id: Option<String>,
    /// Additional structured fields
    pub fields: HashMap<String, serde_json::Value>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

/// Destination shared by every logger of one run
pub type LogSink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Sink writing to stderr, so stdout stays clean for the report
pub fn stderr_sink() -> LogSink {
    Arc::new(Mutex::new(Box::new(io::stderr())))
}

/// Shared logging context for session tracking
#[derive(Debug, Default)]
struct LogContext {
    session_id: Option<String>,
    context_fields: HashMap<String, serde_json::Value>,
}

/// Logger implementation with multiple output formats
#[derive(Clone)]
pub struct Logger {
    /// Minimum log level to output
    min_level: LogLevel,
    use_color: bool,
    format: LogFormat,
    name: String,
    sink: LogSink,
    context: Arc<RwLock<LogContext>>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl Logger {
    /// Create a logger writing to `sink`
    pub fn new(name: impl Into<String>, sink: LogSink) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: false,
            format: LogFormat::Console,
            name: name.into(),
            sink,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger with level and format derived from the configuration.
    ///
    /// `--debug` gives Debug + JSON, `--verbose` gives Info, otherwise
    /// Warn. An explicit `log_level` wins over both flags.
    pub fn with_config(name: impl Into<String>, config: &Config, sink: LogSink) -> Self {
        let mut min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };
        if let Some(level) = config.log_level.as_deref().and_then(|l| l.parse().ok()) {
            min_level = level;
        }

        Self {
            min_level,
            use_color: config.enable_color,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name: name.into(),
            sink,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Set minimum log level
    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Set output format
    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set session correlation ID
    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    /// Add context field for all subsequent log entries
    pub async fn add_context_field<T: Serialize>(&self, key: &str, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            let mut context = self.context.write().await;
            context.context_fields.insert(key.to_string(), json_value);
        }
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn trace(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    pub fn fatal(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Fatal, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    async fn write_entry(&self, mut entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }

        let context = self.context.read().await;
        entry.session_id = context.session_id.clone();
        for (key, value) in &context.context_fields {
            entry.fields.entry(key.clone()).or_insert_with(|| value.clone());
        }
        drop(context);

        let output = match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
            LogFormat::Compact => self.format_compact(&entry),
        };

        // a poisoned sink still accepts writes
        let mut sink = match self.sink.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(sink, "{}", output);
        let _ = sink.flush();
    }

    /// Format log entry for console output
    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        if !entry.fields.is_empty() {
            let mut fields: Vec<String> = entry.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            fields.sort();
            output.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        output
    }

    /// Format log entry as JSON
    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!(
                "{{\"error\": \"Failed to serialize log entry\", \"message\": {:?}}}",
                entry.message
            ),
        }
    }

    /// Format log entry in compact format
    fn format_compact(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%H:%M:%S");
        format!(
            "{} {} {}: {}",
            timestamp,
            entry.level.as_str().chars().next().unwrap_or('?'),
            entry.logger,
            entry.message
        )
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                session_id: None,
                fields: HashMap::new(),
            },
        }
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add elapsed time in milliseconds
    pub fn duration(self, elapsed: Duration) -> Self {
        self.field("duration_ms", elapsed.as_millis() as u64)
    }

    /// Add probe failure details
    pub fn probe_error(self, error: &ProbeError) -> Self {
        self.field("kind", error.kind()).field("tool", error.tool())
    }

    /// Add application error details
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Records the outcome of each pipeline step
#[derive(Debug, Clone)]
pub struct ProbeLogger {
    logger: Logger,
}

impl ProbeLogger {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Log a step that produced a result
    pub async fn completed(&self, step: &str, elapsed: Duration) {
        self.logger
            .info(&format!("{} completed", step))
            .field("probe", step)
            .field("status", StepStatus::Completed)
            .duration(elapsed)
            .log()
            .await;
    }

    /// Log a failed step; unavailable tools log at Info, real failures at Warn
    pub async fn failed(&self, step: &str, error: &ProbeError, elapsed: Duration) {
        let (level, status) = if error.is_unavailable() {
            (LogLevel::Info, StepStatus::Unavailable)
        } else {
            (LogLevel::Warn, StepStatus::Failed)
        };

        self.logger
            .log(level, &format!("{} {}: {}", step, status_label(status), error))
            .field("probe", step)
            .field("status", status)
            .probe_error(error)
            .duration(elapsed)
            .log()
            .await;
    }

    /// Log a step that was not attempted
    pub async fn skipped(&self, step: &str, reason: &str) {
        self.logger
            .debug(&format!("{} skipped: {}", step, reason))
            .field("probe", step)
            .field("status", StepStatus::Skipped)
            .field("reason", reason)
            .log()
            .await;
    }
}

fn status_label(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Completed => "completed",
        StepStatus::Unavailable => "unavailable",
        StepStatus::Failed => "failed",
        StepStatus::Skipped => "skipped",
    }
}

/// Builds loggers that share one sink and one session id
pub struct LoggerFactory {
    config: Config,
    session_id: String,
    sink: LogSink,
}

impl LoggerFactory {
    /// Create a factory writing to stderr
    pub fn new(config: Config) -> Self {
        Self::with_sink(config, stderr_sink())
    }

    pub fn with_sink(config: Config, sink: LogSink) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
            sink,
        }
    }

    /// Create a logger with a specific name
    pub async fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name, &self.config, self.sink.clone());
        logger.set_session_id(self.session_id.clone()).await;
        logger
    }

    pub async fn create_probe_logger(&self) -> ProbeLogger {
        ProbeLogger::new(self.create_logger("PROBE").await)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    /// In-memory sink that can be read back after logging
    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn sink(&self) -> LogSink {
            Arc::new(Mutex::new(Box::new(self.clone())))
        }

        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
    }

    #[test]
    fn test_logger_with_config() {
        let buffer = Buffer::default();
        let config = Config {
            debug: true,
            enable_color: false,
            ..Default::default()
        };
        let logger = Logger::with_config("TEST", &config, buffer.sink());
        assert_eq!(logger.min_level, LogLevel::Debug);
        assert_eq!(logger.format, LogFormat::Json);

        let quiet = Logger::with_config("TEST", &Config::default(), buffer.sink());
        assert_eq!(quiet.min_level, LogLevel::Warn);

        let overridden = Config {
            log_level: Some("trace".to_string()),
            ..Default::default()
        };
        let logger = Logger::with_config("TEST", &overridden, buffer.sink());
        assert_eq!(logger.min_level, LogLevel::Trace);
    }

    #[tokio::test]
    async fn test_level_filtering() {
        let buffer = Buffer::default();
        let mut logger = Logger::new("TEST", buffer.sink());
        logger.set_level(LogLevel::Warn);

        logger.info("hidden").log().await;
        logger.warn("shown").log().await;

        let output = buffer.contents();
        assert!(!output.contains("hidden"));
        assert!(output.contains("shown"));
        assert!(!logger.would_log(LogLevel::Debug));
        assert!(logger.would_log(LogLevel::Fatal));
    }

    #[tokio::test]
    async fn test_json_entry_carries_session_and_fields() {
        let buffer = Buffer::default();
        let mut logger = Logger::new("PROBE", buffer.sink());
        logger.set_format(LogFormat::Json);
        logger.set_session_id("session-1".to_string()).await;
        logger.add_context_field("interface", "en0").await;

        logger.info("ping completed").field("host", "8.8.8.8").log().await;

        let entry: LogEntry = serde_json::from_str(buffer.contents().trim()).unwrap();
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.session_id.as_deref(), Some("session-1"));
        assert_eq!(entry.fields["host"], "8.8.8.8");
        assert_eq!(entry.fields["interface"], "en0");
    }

    #[tokio::test]
    async fn test_console_and_compact_formats() {
        let buffer = Buffer::default();
        let mut logger = Logger::new("TEST", buffer.sink());
        logger.info("console line").field("b", 2).field("a", 1).log().await;
        logger.set_format(LogFormat::Compact);
        logger.info("compact line").log().await;

        let output = buffer.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains(" INFO [TEST] console line {a=1, b=2}"));
        assert!(lines[1].ends_with("I TEST: compact line"));
    }

    #[tokio::test]
    async fn test_probe_logger_statuses() {
        let buffer = Buffer::default();
        let mut logger = Logger::new("PROBE", buffer.sink());
        logger.set_level(LogLevel::Debug);
        logger.set_format(LogFormat::Json);
        let probes = ProbeLogger::new(logger);

        probes.completed("gateway_ping", Duration::from_millis(1200)).await;
        probes
            .failed(
                "speed_test",
                &ProbeError::ToolUnavailable {
                    tool: "networkQuality".to_string(),
                },
                Duration::from_millis(2),
            )
            .await;
        probes
            .failed("iperf3", &ProbeError::failure("iperf3", Some(1), "refused"), Duration::ZERO)
            .await;
        probes.skipped("wifi_scan", "disabled").await;

        let entries: Vec<LogEntry> = buffer
            .contents()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].fields["duration_ms"], 1200);
        assert_eq!(entries[1].level, LogLevel::Info);
        assert_eq!(entries[1].fields["status"], "unavailable");
        assert_eq!(entries[1].fields["kind"], "tool_unavailable");
        assert_eq!(entries[2].level, LogLevel::Warn);
        assert_eq!(entries[2].fields["tool"], "iperf3");
        assert_eq!(entries[3].fields["status"], "skipped");
    }

    #[test]
    fn test_factory_shares_session() {
        let buffer = Buffer::default();
        let config = Config {
            debug: true,
            ..Default::default()
        };
        let factory = LoggerFactory::with_sink(config, buffer.sink());
        tokio_test::block_on(async {
            let app = factory.create_logger("APP").await;
            let probes = factory.create_probe_logger().await;

            app.info("start").log().await;
            probes.completed("routing", Duration::ZERO).await;
        });

        let entries: Vec<LogEntry> = buffer
            .contents()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].logger, "APP");
        assert_eq!(entries[1].logger, "PROBE");
        for entry in &entries {
            assert_eq!(entry.session_id.as_deref(), Some(factory.session_id()));
        }
    }

    #[test]
    fn test_error_info_fields() {
        let buffer = Buffer::default();
        let logger = Logger::new("TEST", buffer.sink());
        let builder = logger.error("boom").error_info(&AppError::network("down"));
        assert_eq!(builder.entry.fields["error_category"], "NETWORK");
        assert_eq!(builder.entry.fields["error_exit_code"], 2);
    }
}
