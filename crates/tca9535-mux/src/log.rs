//! Device-scoped logging.
//!
//! A small pluggable sink behind the [`dev_info!`] and [`dev_warn!`]
//! macros. Every record carries the name of the device it concerns, so
//! output from several attached expanders stays attributable. The default
//! sink writes to standard error; embedders replace it via [`set_sink`].

use core::fmt;
use std::io::Write as _;
use std::sync::{Mutex, PoisonError};

/// Severity of a device log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Something failed; the operation reported an error.
    Error,
    /// Unexpected condition, not necessarily an error.
    Warn,
    /// Lifecycle and progress messages.
    Info,
}

impl LogLevel {
    /// Fixed-width level name for aligned output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN ",
            Self::Info => "INFO ",
        }
    }
}

/// Receives formatted device log records.
pub trait LogSink: Send + Sync {
    /// Handles one record for the device named `device`.
    fn log(&self, level: LogLevel, device: &str, args: fmt::Arguments<'_>);
}

/// Default sink: one line per record on standard error.
struct StderrSink;

impl LogSink for StderrSink {
    fn log(&self, level: LogLevel, device: &str, args: fmt::Arguments<'_>) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "[{}] {}: {}", level.name(), device, args);
    }
}

static SINK: Mutex<Option<Box<dyn LogSink>>> = Mutex::new(None);

/// Replaces the process-wide log sink.
pub fn set_sink(sink: Box<dyn LogSink>) {
    let mut guard = SINK.lock().unwrap_or_else(PoisonError::into_inner);
    *guard = Some(sink);
}

/// Routes one record to the current sink. Backing function for the logging
/// macros; call those instead.
#[doc(hidden)]
pub fn dispatch(level: LogLevel, device: &str, args: fmt::Arguments<'_>) {
    let guard = SINK.lock().unwrap_or_else(PoisonError::into_inner);
    match guard.as_deref() {
        Some(sink) => sink.log(level, device, args),
        None => StderrSink.log(level, device, args),
    }
}

/// Logs an informational record for a device.
#[macro_export]
macro_rules! dev_info {
    ($device:expr, $($arg:tt)*) => {
        $crate::log::dispatch(
            $crate::log::LogLevel::Info,
            $device,
            core::format_args!($($arg)*),
        )
    };
}

/// Logs a warning record for a device.
#[macro_export]
macro_rules! dev_warn {
    ($device:expr, $($arg:tt)*) => {
        $crate::log::dispatch(
            $crate::log::LogLevel::Warn,
            $device,
            core::format_args!($($arg)*),
        )
    };
}
