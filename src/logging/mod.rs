//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output on stderr
//! - Configurable log levels, overridable with `RUST_LOG`
//! - Local JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use folio::logging::init_logging;
//! use folio::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export job
///
/// # Example
///
/// ```no_run
/// use folio::log_job_start;
///
/// log_job_start!(0, "Sales", "Overview");
/// ```
#[macro_export]
macro_rules! log_job_start {
    ($index:expr, $workbook:expr, $view:expr) => {
        tracing::info!(
            job = $index,
            workbook = %$workbook,
            view = %$view,
            "Starting job"
        );
    };
}

/// Log the completion of an export job
///
/// # Example
///
/// ```no_run
/// use folio::log_job_complete;
/// use std::time::Duration;
///
/// log_job_complete!(0, 3, Duration::from_secs(10));
/// ```
#[macro_export]
macro_rules! log_job_complete {
    ($index:expr, $documents:expr, $duration:expr) => {
        tracing::info!(
            job = $index,
            documents = $documents,
            duration_ms = $duration.as_millis() as u64,
            "Job staged"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use folio::log_error_with_context;
/// use folio::domain::FolioError;
///
/// let error = FolioError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = %$context,
            "Error occurred"
        );
    };
}
