//! # Logging
//!
//! `tracing` setup shared by every bridge crate.
//!
//! [`init_logging`] installs three layers on one registry:
//!
//! 1. an [`EnvFilter`] built from [`LoggingConfig`],
//! 2. a `fmt` layer writing pretty, compact or JSON lines to stdout,
//! 3. an optional forwarder that mirrors events into a host [`LoggerSink`]
//!    (Logcat, `os_log`, a desktop console).
//!
//! ```ignore
//! use bridge_traits::log::{ConsoleLogger, LogLevel};
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//! use std::sync::Arc;
//!
//! init_logging(
//!     LoggingConfig::default()
//!         .with_format(LogFormat::Compact)
//!         .with_level(LogLevel::Debug)
//!         .with_logger_sink(Arc::new(ConsoleLogger::default())),
//! )?;
//! ```
//!
//! ## Privacy
//!
//! Operations record file paths through [`strip_path`], so only basenames
//! reach any output. Entries bound for the sink are additionally passed
//! through [`redact_if_sensitive`] field by field unless redaction is
//! switched off.

use crate::error::{Error, Result};

use bridge_traits::log::{LogEntry, LogLevel, LoggerSink};

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    filter::EnvFilter,
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer,
};

/// Crates shown at the configured level when no custom filter is given.
const WORKSPACE_TARGETS: &[&str] = &[
    "core_runtime",
    "core_documents",
    "core_service",
    "bridge_desktop",
    "bridge_traits",
];

const REDACTED: &str = "[REDACTED]";

/// Field names whose values never leave the process.
const SECRET_MARKERS: &[&str] = &[
    "token",
    "secret",
    "password",
    "api_key",
    "authorization",
    "cookie",
];

/// Field names that carry local file paths.
const PATH_FIELDS: &[&str] = &["path", "file", "source", "file_path", "source_path"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, colored; the debug-build default
    #[cfg_attr(debug_assertions, default)]
    Pretty,
    /// One JSON object per line; the release-build default
    #[cfg_attr(not(debug_assertions), default)]
    Json,
    Compact,
}

#[derive(Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Level for the workspace crates; other crates log at `warn`
    pub level: LogLevel,
    /// Redact sink-bound fields
    pub redact_pii: bool,
    /// Raw `EnvFilter` directives, replacing the level-based filter
    pub filter: Option<String>,
    pub logger_sink: Option<Arc<dyn LoggerSink>>,
    pub display_target: bool,
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            redact_pii: true,
            filter: None,
            logger_sink: None,
            display_target: true,
            display_thread_info: false,
        }
    }
}

impl fmt::Debug for LoggingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConfig")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("redact_pii", &self.redact_pii)
            .field("filter", &self.filter)
            .field("logger_sink", &self.logger_sink.is_some())
            .field("display_target", &self.display_target)
            .field("display_thread_info", &self.display_thread_info)
            .finish()
    }
}

impl LoggingConfig {
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_pii_redaction(mut self, enabled: bool) -> Self {
        self.redact_pii = enabled;
        self
    }

    /// e.g. `"core_documents=trace,warn"`
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.display_target = enabled;
        self
    }

    pub fn with_thread_info(mut self, enabled: bool) -> Self {
        self.display_thread_info = enabled;
        self
    }
}

/// Install the global subscriber.
///
/// Fails with [`Error::Config`] for unparsable filter directives and with
/// [`Error::Internal`] when a global subscriber is already set or the sink
/// forwarder cannot start.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;
    let forwarder = LoggerSinkLayer::new(config.logger_sink.clone(), config.redact_pii)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(&config))
        .with(forwarder)
        .try_init()
        .map_err(|e| Error::Internal(format!("Logging already initialized: {}", e)))
}

fn fmt_layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_target(config.display_target)
        .with_thread_ids(config.display_thread_info)
        .with_thread_names(config.display_thread_info);

    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Json => layer.json().flatten_event(true).boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let directives = match &config.filter {
        Some(custom) => custom.clone(),
        None => {
            let level = config.level.as_filter_str();
            std::iter::once("warn".to_string())
                .chain(
                    WORKSPACE_TARGETS
                        .iter()
                        .map(|target| format!("{}={}", target, level)),
                )
                .collect::<Vec<_>>()
                .join(",")
        }
    };

    EnvFilter::try_new(&directives)
        .map_err(|e| Error::Config(format!("Invalid log filter '{}': {}", directives, e)))
}

/// Mirrors events into a [`LoggerSink`].
///
/// Entries are queued to a dedicated thread so the emitting thread never
/// waits on the host logger. The thread flushes the sink and exits once the
/// layer is dropped.
pub struct LoggerSinkLayer {
    forward: Option<(UnboundedSender<LogEntry>, LogLevel)>,
    redact: bool,
}

impl LoggerSinkLayer {
    pub fn new(sink: Option<Arc<dyn LoggerSink>>, redact: bool) -> Result<Self> {
        let forward = match sink {
            Some(sink) => {
                let min_level = sink.min_level();
                Some((spawn_forwarder(sink)?, min_level))
            }
            None => None,
        };
        Ok(Self { forward, redact })
    }
}

fn spawn_forwarder(sink: Arc<dyn LoggerSink>) -> Result<UnboundedSender<LogEntry>> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<LogEntry>();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|e| Error::Internal(format!("Log forwarder runtime: {}", e)))?;

    std::thread::Builder::new()
        .name("bridge-log-sink".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                while let Some(entry) = receiver.recv().await {
                    if let Err(e) = sink.log(entry).await {
                        eprintln!("LoggerSink rejected entry: {}", e);
                    }
                }
                if let Err(e) = sink.flush().await {
                    eprintln!("LoggerSink flush failed: {}", e);
                }
            })
        })
        .map_err(|e| Error::Internal(format!("Log forwarder thread: {}", e)))?;

    Ok(sender)
}

impl<S> Layer<S> for LoggerSinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some((sender, min_level)) = &self.forward else {
            return;
        };

        let metadata = event.metadata();
        let level = level_of(metadata.level());
        if level < *min_level {
            return;
        }

        let mut visitor = EntryVisitor {
            redact: self.redact,
            message: None,
            fields: BTreeMap::new(),
        };
        event.record(&mut visitor);

        let message = visitor
            .message
            .unwrap_or_else(|| metadata.name().to_string());
        let mut entry = LogEntry::new(level, metadata.target(), message);
        entry.fields = visitor.fields;
        entry.span = ctx.event_span(event).map(|span| span.name().to_string());

        // Receiver only goes away with the forwarder thread
        let _ = sender.send(entry);
    }
}

fn level_of(level: &Level) -> LogLevel {
    match *level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warn,
        Level::ERROR => LogLevel::Error,
    }
}

struct EntryVisitor {
    redact: bool,
    message: Option<String>,
    fields: BTreeMap<String, String>,
}

impl EntryVisitor {
    fn record(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
            return;
        }

        let value = if self.redact {
            redact_if_sensitive(field.name(), &value)
        } else {
            value
        };
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for EntryVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field, format!("{:?}", value));
    }
}

/// Value as it may appear in a sink-bound entry.
///
/// Secrets are replaced, path fields reduced to their basename and email
/// addresses masked. Content URIs and error codes pass through.
///
/// ```
/// use core_runtime::logging::redact_if_sensitive;
///
/// assert_eq!(redact_if_sensitive("api_key", "k-123"), "[REDACTED]");
/// assert_eq!(redact_if_sensitive("path", "/sdcard/notes.json"), "notes.json");
/// ```
pub fn redact_if_sensitive(field_name: &str, value: &str) -> String {
    let name = field_name.to_ascii_lowercase();

    if SECRET_MARKERS.iter().any(|marker| name.contains(marker)) {
        return REDACTED.to_string();
    }
    if PATH_FIELDS.contains(&name.as_str()) || name.ends_with("_path") {
        return strip_path(value).to_string();
    }
    if looks_like_email(value) {
        let first = value.chars().next().map(String::from).unwrap_or_default();
        return format!("{}***@{}", first, REDACTED);
    }

    value.to_string()
}

fn looks_like_email(value: &str) -> bool {
    if value.contains("://") || value.contains(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}

/// Basename of `path`, accepting either separator.
///
/// ```
/// use core_runtime::logging::strip_path;
///
/// assert_eq!(strip_path("/data/user/0/app/files/notes.json"), "notes.json");
/// ```
pub fn strip_path(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
