//! Custom logging module.
//!
//! This module provides a custom logger implementation that writes formatted
//! log entries to stderr and optionally forwards them to a capture callback.

use crate::error::{AppError, AppResult};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::io::Write;
use std::sync::{Arc, Mutex};

type LogCallback = Box<dyn Fn(String) + Send + Sync>;

/// Format a log record into a string for display
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!("{} {} {}", timestamp, level_str, record.args())
}

/// Parse a configured level name, e.g. `info` or `DEBUG`.
///
pub fn parse_level(name: &str) -> AppResult<LevelFilter> {
    name.trim()
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("Unknown log level '{}'", name)))
}

/// Logger writing to stderr, with an optional capture callback
///
pub struct CustomLogger {
    level: LevelFilter,
    to_stderr: bool,
    log_callback: Arc<Mutex<Option<LogCallback>>>,
}

impl CustomLogger {
    pub fn new(level: LevelFilter) -> Self {
        CustomLogger {
            level,
            to_stderr: true,
            log_callback: Arc::new(Mutex::new(None)),
        }
    }

    /// Stop writing to stderr. Records still reach the callback.
    ///
    pub fn quiet(mut self) -> Self {
        self.to_stderr = false;
        self
    }

    pub fn set_log_callback(&self, callback: LogCallback) {
        if let Ok(mut guard) = self.log_callback.lock() {
            *guard = Some(callback);
        }
    }

    /// Install as the global logger.
    ///
    pub fn init(self) -> AppResult<()> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self)).map_err(|e| AppError::Logger(e.to_string()))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let formatted = format_log(record);
        if self.to_stderr {
            let _ = writeln!(std::io::stderr(), "{}", formatted);
        }
        if let Ok(callback) = self.log_callback.lock() {
            if let Some(ref cb) = *callback {
                cb(formatted);
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(logger: &CustomLogger) -> Arc<Mutex<Vec<String>>> {
        let lines = Arc::new(Mutex::new(vec![]));
        let sink = lines.clone();
        logger.set_log_callback(Box::new(move |line| sink.lock().unwrap().push(line)));
        lines
    }

    #[test]
    fn test_format_log() {
        let line = format_log(
            &Record::builder()
                .args(format_args!("Fetching tasks"))
                .level(Level::Info)
                .build(),
        );
        assert!(line.ends_with("INFO Fetching tasks"));
    }

    #[test]
    fn test_level_filter() {
        let logger = CustomLogger::new(LevelFilter::Warn).quiet();
        let lines = captured(&logger);
        logger.log(
            &Record::builder()
                .args(format_args!("hidden"))
                .level(Level::Debug)
                .build(),
        );
        logger.log(
            &Record::builder()
                .args(format_args!("shown"))
                .level(Level::Error)
                .build(),
        );
        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("ERROR shown"));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level(" INFO ").unwrap(), LevelFilter::Info);
        assert!(matches!(parse_level("loud"), Err(AppError::Logger(_))));
    }
}
