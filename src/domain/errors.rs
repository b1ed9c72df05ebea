//! Domain error types
//!
//! This module defines the error hierarchy for vsweep. Expected export failures
//! (timeouts, crashes, missing artifacts) are never errors: they are captured as
//! [`crate::domain::outcome::UnitOutcome`] values. The types here cover setup
//! faults and the internal plumbing beneath the unit boundary.

use thiserror::Error;

/// Main vsweep error type
#[derive(Debug, Error)]
pub enum VsweepError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Credential vault errors
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    /// Failure to launch or supervise the external exporter
    #[error("Process error: {0}")]
    Process(String),

    /// Workbook read/write errors
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// Result reporting errors
    #[error("Reporting error: {0}")]
    Reporting(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Credential vault errors
///
/// Vault backends translate their own failures into these variants so callers
/// never see backend-specific types.
#[derive(Debug, Error)]
pub enum VaultError {
    /// No credential stored for the host/username pair
    #[error("No credential found for {username}@{host}")]
    NotFound { host: String, username: String },

    /// The vault source could not be opened
    #[error("Vault unavailable: {0}")]
    Unavailable(String),

    /// The vault source exists but could not be parsed
    #[error("Invalid vault format: {0}")]
    InvalidFormat(String),
}

impl VaultError {
    /// Returns true when the failure is a plain lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, VaultError::NotFound { .. })
    }
}

impl From<std::io::Error> for VsweepError {
    fn from(err: std::io::Error) -> Self {
        VsweepError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VsweepError {
    fn from(err: serde_json::Error) -> Self {
        VsweepError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for VsweepError {
    fn from(err: toml::de::Error) -> Self {
        VsweepError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<calamine::Error> for VsweepError {
    fn from(err: calamine::Error) -> Self {
        VsweepError::Workbook(format!("read failed: {err}"))
    }
}

impl From<rust_xlsxwriter::XlsxError> for VsweepError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        VsweepError::Workbook(format!("write failed: {err}"))
    }
}
