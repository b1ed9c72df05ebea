//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output
//! - JSON log files with daily/hourly rotation
//! - Levels from the CLI, the configuration file or `RUST_LOG`
//!
//! Per-server work runs inside a `server` span carrying the host name, so
//! every line logged while exporting a server is tagged with it.
//!
//! # Example
//!
//! ```no_run
//! use vsweep::logging::init_logging;
//! use vsweep::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use vsweep::log_error_with_context;
/// use vsweep::domain::VsweepError;
///
/// let error = VsweepError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
