//! Logging for the texture render crates
//!
//! Every message goes through one process-wide `Logger`. The default one
//! prints colored lines to the console; hosts install their own with
//! `set_logger` to route messages elsewhere. Error messages carry the
//! file and line they were raised from.

use colored::*;
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Installed logger, created on first use
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Destination for log entries
///
/// # Example
///
/// ```no_run
/// use texture_render::rtt::log::{Logger, LogEntry, LogSeverity};
///
/// struct WarningsOnly;
///
/// impl Logger for WarningsOnly {
///     fn log(&self, entry: &LogEntry) {
///         if entry.severity >= LogSeverity::Warn {
///             eprintln!("{}: {}", entry.source, entry.message);
///         }
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// One log message and where it came from
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Emitting component, e.g. "rtt::OffscreenRenderTarget" or "rtt::cpu"
    pub source: String,
    pub message: String,
    /// Source file, set for entries logged with `log_detailed`
    pub file: Option<&'static str>,
    /// Source line, set for entries logged with `log_detailed`
    pub line: Option<u32>,
}

impl LogEntry {
    fn new(severity: LogSeverity, source: &str, message: String) -> Self {
        Self {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        }
    }

    /// `file:line` when the entry carries a location
    pub fn location(&self) -> Option<String> {
        match (self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            _ => None,
        }
    }
}

/// Log severity, ordered from most verbose to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-pass state switches and resource traffic
    Trace,
    Debug,
    Info,
    /// Protocol misuse that was recovered from
    Warn,
    Error,
}

impl LogSeverity {
    /// Fixed-width label used by the console logger
    pub fn label(&self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

/// Console logger
///
/// Prints `[YYYY-MM-DD HH:MM:SS.mmm] [SEVERITY] [source] message`, followed by
/// `(file:line)` when the entry has a location. Warnings and errors go to
/// stderr, everything else to stdout.
pub struct DefaultLogger;

impl DefaultLogger {
    fn format_timestamp(timestamp: SystemTime) -> String {
        let local: DateTime<Local> = timestamp.into();
        local.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let label = entry.severity.label();
        let severity = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        };

        let mut line = format!(
            "[{}] [{}] [{}] {}",
            Self::format_timestamp(entry.timestamp),
            severity,
            entry.source.bright_blue(),
            entry.message,
        );
        if let Some(location) = entry.location() {
            line.push_str(&format!(" ({})", location));
        }

        if entry.severity >= LogSeverity::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

fn logger_slot() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

fn dispatch(entry: LogEntry) {
    if let Ok(logger) = logger_slot().read() {
        logger.log(&entry);
    }
}

/// Install `logger` in place of the current one
pub fn set_logger<L: Logger + 'static>(logger: L) {
    if let Ok(mut slot) = logger_slot().write() {
        *slot = Box::new(logger);
    }
}

/// Go back to the console logger
pub fn reset_logger() {
    set_logger(DefaultLogger);
}

/// Log a message without location (used by all macros except rtt_error!)
pub fn log(severity: LogSeverity, source: &str, message: String) {
    dispatch(LogEntry::new(severity, source, message));
}

/// Log a message tagged with the file and line it was raised from
pub fn log_detailed(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: &'static str,
    line: u32,
) {
    dispatch(LogEntry {
        file: Some(file),
        line: Some(line),
        ..LogEntry::new(severity, source, message)
    });
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
///
/// # Example
///
/// ```no_run
/// # use texture_render::rtt_trace;
/// rtt_trace!("rtt::OffscreenRenderTarget", "Binding offscreen target");
/// ```
#[macro_export]
macro_rules! rtt_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::rtt::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! rtt_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::rtt::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! rtt_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::rtt::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
///
/// # Example
///
/// ```no_run
/// # use texture_render::rtt_warn;
/// rtt_warn!("rtt::OffscreenRenderTarget", "end() called without begin()");
/// ```
#[macro_export]
macro_rules! rtt_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log(
            $crate::rtt::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! rtt_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::log::log_detailed(
            $crate::rtt::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
