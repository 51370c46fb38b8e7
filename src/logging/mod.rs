// Logging module - tracing setup and in-memory capture for the TUI
//
// When the terminal front-end owns the screen, log events are captured into
// a bounded buffer and shown in the logs panel instead of being written to
// stdout (which would garble the alternate screen). Headless runs log to
// stdout. File logging (JSON, rotating) can be layered on top of either.

use crate::config::{LogFileConfig, LoggingConfig};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::Context;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// Maximum number of log entries to keep in memory
const MAX_LOG_ENTRIES: usize = 1000;

/// A single log entry captured from tracing
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub target: String,
    /// Message followed by any structured fields as `key=value`
    pub message: String,
}

/// Log level for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<&Level> for LogLevel {
    fn from(level: &Level) -> Self {
        match *level {
            Level::ERROR => LogLevel::Error,
            Level::WARN => LogLevel::Warn,
            Level::INFO => LogLevel::Info,
            Level::DEBUG => LogLevel::Debug,
            Level::TRACE => LogLevel::Trace,
        }
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

/// In-memory log buffer with bounded size (ring buffer)
#[derive(Clone, Default)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_LOG_ENTRIES))),
        }
    }

    // A panic while holding the lock leaves the entries intact, so keep using them
    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a log entry, evicting the oldest when full
    pub fn add(&self, entry: LogEntry) {
        let mut entries = self.lock();
        if entries.len() >= MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// The last `limit` entries at or above `min_level` (most recent last)
    pub fn recent(&self, limit: usize, min_level: LogLevel) -> Vec<LogEntry> {
        let entries = self.lock();
        let mut picked: Vec<LogEntry> = entries
            .iter()
            .rev()
            .filter(|e| e.level <= min_level)
            .take(limit)
            .cloned()
            .collect();
        picked.reverse();
        picked
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// Tracing layer that captures events into a [`LogBuffer`]
pub struct TuiLogLayer {
    buffer: LogBuffer,
}

impl TuiLogLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl<S> Layer<S> for TuiLogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);

        self.buffer.add(LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::from(metadata.level()),
            target: metadata.target().to_string(),
            message: visitor.finish(),
        });
    }
}

/// Collects the message and the remaining fields of an event
#[derive(Default)]
struct EntryVisitor {
    message: String,
    fields: String,
}

impl EntryVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }

    fn push_field(&mut self, name: &str, value: &dyn std::fmt::Display) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }
}

impl tracing::field::Visit for EntryVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), &value);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.push_field(field.name(), &format_args!("{:?}", value));
        }
    }
}

/// Install the global subscriber
///
/// TUI mode captures to `buffer`; headless mode writes to stdout. Returns the
/// file writer guard, which must stay alive for buffered lines to flush.
///
/// Precedence for the filter: RUST_LOG > config level > "info".
pub fn init(config: &LoggingConfig, tui: bool, buffer: &LogBuffer) -> Option<WorkerGuard> {
    let default_filter = format!(
        "marquee={},tower_http=debug,axum=info",
        config.level
    );
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let console: Box<dyn Layer<Registry> + Send + Sync> = if tui {
        Box::new(TuiLogLayer::new(buffer.clone()))
    } else {
        Box::new(tracing_subscriber::fmt::layer())
    };

    let (file_layer, guard) = match file_writer(&config.file) {
        Some((writer, guard)) => (
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false),
            ),
            Some(guard),
        ),
        None => (None, None),
    };

    // The filter is global, so it can sit on top of the output layers
    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn file_writer(
    config: &LogFileConfig,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    if !config.enabled {
        return None;
    }

    if let Err(e) = std::fs::create_dir_all(&config.dir) {
        eprintln!(
            "Warning: Could not create log directory {:?}: {}",
            config.dir, e
        );
        return None;
    }

    let appender = RollingFileAppender::new(config.rotation.into(), &config.dir, &config.prefix);
    Some(tracing_appender::non_blocking(appender))
}
