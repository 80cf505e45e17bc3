//! Structured logging for the flood alerting service.
//!
//! Provides context-rich logging with basin identifiers, timestamps, and
//! severity levels. Supports both console output and an append-only log
//! file for scheduled runs.
//!
//! Only the service layer logs. The `hydrology` functions return results
//! and errors and leave reporting to their callers.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::model::HydroError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// The part of the service a log line comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Config,
    Rainfall,
    Forecast,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Config => write!(f, "CFG"),
            Component::Rainfall => write!(f, "RAIN"),
            Component::Forecast => write!(f, "FCST"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Known, recoverable condition; the run can carry on with other basins
    Expected,
    /// Indicates bad configuration or a bug
    Unexpected,
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    fn format_entry(level: LogLevel, component: Component, basin: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let basin_part = basin.map(|b| format!(" [{}]", b)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, component, basin_part, message)
    }

    fn log(&self, level: LogLevel, component: Component, basin: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, component, basin, message);
        let basin_part = basin.map(|b| format!(" [{}]", b)).unwrap_or_default();

        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => eprintln!("   {}", message),
                LogLevel::Debug => eprintln!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", component, basin_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", component, basin_part, message),
                LogLevel::Info => eprintln!("   {}", message),
                LogLevel::Debug => {}
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn emit(level: LogLevel, component: Component, basin: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, component, basin, message);
        }
    }
}

pub fn info(component: Component, basin: Option<&str>, message: &str) {
    emit(LogLevel::Info, component, basin, message);
}

pub fn warn(component: Component, basin: Option<&str>, message: &str) {
    emit(LogLevel::Warning, component, basin, message);
}

pub fn error(component: Component, basin: Option<&str>, message: &str) {
    emit(LogLevel::Error, component, basin, message);
}

pub fn debug(component: Component, basin: Option<&str>, message: &str) {
    emit(LogLevel::Debug, component, basin, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a hydrology error.
///
/// Unstable routing is a known consequence of a reach/timestep pairing and
/// has a documented remedy. An out-of-domain parameter means the basin
/// configuration or the upstream data is wrong.
pub fn classify_hydro_error(err: &HydroError) -> FailureType {
    match err {
        HydroError::UnstableRoutingParameters { .. } => FailureType::Expected,
        HydroError::InvalidParameter { .. } => FailureType::Unexpected,
    }
}

/// Classify a failure to load configuration or rainfall input.
pub fn classify_load_failure(error_message: &str) -> FailureType {
    if error_message.contains("No such file") || error_message.contains("not found") {
        FailureType::Expected
    } else if error_message.contains("parse") || error_message.contains("expected") {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

fn log_classified(component: Component, basin: Option<&str>, failure_type: FailureType, message: &str) {
    match failure_type {
        FailureType::Expected => warn(component, basin, message),
        FailureType::Unexpected => error(component, basin, message),
        FailureType::Unknown => warn(component, basin, message),
    }
}

/// Log a hydrology failure for one basin with automatic classification
pub fn log_hydro_failure(basin: &str, operation: &str, err: &HydroError) {
    let failure_type = classify_hydro_error(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);
    log_classified(Component::Forecast, Some(basin), failure_type, &message);
}

/// Log a configuration or input loading failure
pub fn log_load_failure(component: Component, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_load_failure(&error_msg);
    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);
    log_classified(component, None, failure_type, &message);
}

// ---------------------------------------------------------------------------
// Run Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a forecast run over several basins
pub fn log_run_summary(total: usize, successful: usize, failed: usize) {
    let message = format!(
        "Forecast run complete: {}/{} basins successful, {} failed",
        successful, total, failed
    );

    if failed == 0 {
        info(Component::System, None, &message);
    } else if successful == 0 {
        error(Component::System, None, &message);
    } else {
        warn(Component::System, None, &message);
    }
}
