// src/util/log.rs

//! File logger for the dashboard. The terminal belongs to the UI, so every
//! severity gets its own file under the log directory. The `log_*!` macros
//! also emit a `tracing` event for whatever subscriber `main` installed.
use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use chrono::Local;

pub static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// Unset until [`init`] runs; writes before that are dropped.
static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    fn as_str(&self) -> &str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    fn filename(&self) -> &str {
        match self {
            LogLevel::Error => "error.log",
            LogLevel::Warn => "warn.log",
            LogLevel::Info => "info.log",
            LogLevel::Debug => "debug.log",
        }
    }
}

/// Logger that writes to separate files by severity
pub struct Logger {
    log_dir: PathBuf,
    error_file: Mutex<File>,
    warn_file: Mutex<File>,
    info_file: Mutex<File>,
    debug_file: Mutex<File>,
}

impl Logger {
    /// Create a new logger with the specified directory. Existing files are
    /// truncated so each run starts fresh.
    pub fn new(log_dir: &Path) -> std::io::Result<Self> {
        create_dir_all(log_dir)?;

        let open = |level: LogLevel| File::create(log_dir.join(level.filename()));

        Ok(Self {
            log_dir: log_dir.to_path_buf(),
            error_file: Mutex::new(open(LogLevel::Error)?),
            warn_file: Mutex::new(open(LogLevel::Warn)?),
            info_file: Mutex::new(open(LogLevel::Info)?),
            debug_file: Mutex::new(open(LogLevel::Debug)?),
        })
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Write a log entry to the appropriate file
    pub fn write_log(&self, level: LogLevel, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let formatted = format!("[{}] [{}] {}\n", timestamp, level.as_str(), message);

        let file = match level {
            LogLevel::Error => &self.error_file,
            LogLevel::Warn => &self.warn_file,
            LogLevel::Info => &self.info_file,
            LogLevel::Debug => &self.debug_file,
        };

        if let Ok(mut file) = file.lock() {
            let _ = file.write_all(formatted.as_bytes());
            let _ = file.flush();
        }
    }
}

/// Sets up the global logger. `debug` or `DEBUG=true` in the environment
/// turns on `log_debug!`. Only the first call has any effect.
pub fn init(log_dir: &Path, debug: bool) -> std::io::Result<()> {
    DEBUG_ENABLED.get_or_init(|| {
        debug || std::env::var("DEBUG").unwrap_or_default() == "true"
    });

    if LOGGER.get().is_none() {
        let logger = Logger::new(log_dir)?;
        let _ = LOGGER.set(logger);
    }
    Ok(())
}

pub fn debug_enabled() -> bool {
    *DEBUG_ENABLED.get().unwrap_or(&false)
}

#[doc(hidden)]
pub fn write(level: LogLevel, message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.write_log(level, message);
    }
}

/// Convenience macro for error logging with formatting
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        ::tracing::error!("{}", message);
        $crate::util::log::write($crate::util::log::LogLevel::Error, &message);
    }};
}

/// Convenience macro for warning logging with formatting
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        ::tracing::warn!("{}", message);
        $crate::util::log::write($crate::util::log::LogLevel::Warn, &message);
    }};
}

/// Convenience macro for info logging with formatting
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        let message = format!($($arg)*);
        ::tracing::info!("{}", message);
        $crate::util::log::write($crate::util::log::LogLevel::Info, &message);
    }};
}

/// Convenience macro for debug logging with formatting
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        if $crate::util::log::debug_enabled() {
            let message = format!($($arg)*);
            ::tracing::debug!("{}", message);
            $crate::util::log::write($crate::util::log::LogLevel::Debug, &message);
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_logger_creation() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::new(temp_dir.path()).expect("Failed to create logger");

        logger.write_log(LogLevel::Error, "Test error");
        logger.write_log(LogLevel::Warn, "Test warning");
        logger.write_log(LogLevel::Info, "Test info");
        logger.write_log(LogLevel::Debug, "Test debug");

        for name in ["error.log", "warn.log", "info.log", "debug.log"] {
            assert!(temp_dir.path().join(name).exists());
        }

        let info = fs::read_to_string(temp_dir.path().join("info.log")).unwrap();
        assert!(info.contains("[INFO] Test info"));
        assert!(!info.contains("Test error"));
    }

    #[test]
    fn test_logger_creates_nested_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let logger = Logger::new(&nested).unwrap();
        assert_eq!(logger.log_dir(), nested.as_path());
        assert!(nested.join("warn.log").exists());
    }
}
