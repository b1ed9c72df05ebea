//! Configuration schema types
//!
//! This module defines the configuration structure for vsweep. The host list
//! accepts both bare host names and detailed tables; [`HostEntry`] captures that
//! shape and [`VsweepConfig::server_targets`] normalizes it once.

use crate::core::catalog::UnitCatalog;
use crate::core::export::policy::{ExitCodePolicy, TimeoutPolicy};
use crate::domain::{HostName, ServerTarget, UnitMode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

/// Main vsweep configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VsweepConfig {
    /// Host list (top-level `servers = [...]`)
    #[serde(default)]
    pub servers: Vec<HostEntry>,

    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// External exporter settings
    pub exporter: ExporterConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Credential vault settings
    #[serde(default)]
    pub vault: VaultConfig,

    /// Result reporting settings
    #[serde(default)]
    pub reporting: ReportingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VsweepConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.exporter.validate()?;
        self.export.validate()?;
        self.vault.validate()?;
        self.logging.validate()?;

        if self.servers.is_empty() {
            return Err("servers cannot be empty".to_string());
        }
        // Resolving also rejects unknown units and duplicate hosts
        self.server_targets()?;
        Ok(())
    }

    /// Resolves the host list into normalized server targets
    ///
    /// # Errors
    ///
    /// Returns an error for empty host names, unknown unit names, a missing
    /// username with no default, or duplicate hosts.
    pub fn server_targets(&self) -> Result<Vec<ServerTarget>, String> {
        let mut seen = HashSet::new();
        let mut stems: HashMap<String, String> = HashMap::new();
        let mut targets = Vec::with_capacity(self.servers.len());

        for entry in &self.servers {
            let target = entry.resolve(&self.export)?;
            let host = target.host_name.as_str();
            if !seen.insert(host.to_ascii_lowercase()) {
                return Err(format!("duplicate host '{host}' in servers"));
            }
            // Output files are named after the stem
            let stem = target.host_name.file_stem().to_ascii_lowercase();
            if let Some(other) = stems.insert(stem.clone(), host.to_string()) {
                return Err(format!(
                    "hosts '{other}' and '{host}' map to the same file name '{stem}'"
                ));
            }
            targets.push(target);
        }

        Ok(targets)
    }
}

/// One host-list entry as written in the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostEntry {
    /// Bare host name, all settings defaulted
    Simple(String),
    /// Host with per-server overrides
    Detailed(DetailedHost),
}

/// Host-list entry with optional per-server overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetailedHost {
    /// vCenter host name
    pub host: String,

    /// Login account (falls back to `export.default_username`)
    #[serde(default)]
    pub username: Option<String>,

    /// Export mode (falls back to `export.default_mode`)
    #[serde(default)]
    pub mode: Option<ModeSetting>,

    /// Export only this unit
    #[serde(default)]
    pub unit: Option<String>,
}

impl HostEntry {
    /// Normalizes the entry against export defaults
    pub fn resolve(&self, defaults: &ExportConfig) -> Result<ServerTarget, String> {
        let (host, username, mode, unit) = match self {
            HostEntry::Simple(host) => (host.as_str(), None, None, None),
            HostEntry::Detailed(detail) => (
                detail.host.as_str(),
                detail.username.as_deref(),
                detail.mode,
                detail.unit.as_deref(),
            ),
        };

        let host_name = HostName::new(host).map_err(|e| format!("servers: {e}"))?;

        let username = username
            .or(defaults.default_username.as_deref())
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                format!(
                    "server '{}' has no username and export.default_username is not set",
                    host_name
                )
            })?
            .to_string();

        let unit_mode = match (unit, mode) {
            (Some(_), Some(ModeSetting::Normal)) => {
                return Err(format!(
                    "server '{host_name}' sets both unit and mode = \"normal\""
                ));
            }
            (Some(name), _) => {
                let catalog = UnitCatalog::full();
                let unit = catalog.find_unit(name).ok_or_else(|| {
                    format!("server '{host_name}' references unknown unit '{name}'")
                })?;
                UnitMode::SingleUnit(unit.logical_name.to_string())
            }
            (None, Some(setting)) => setting.into(),
            (None, None) => defaults.default_mode.into(),
        };

        Ok(ServerTarget::new(host_name, username, unit_mode))
    }
}

/// Export mode as written in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModeSetting {
    /// One monolithic export
    Normal,
    /// One export per unit, merged
    #[default]
    Chunked,
}

impl From<ModeSetting> for UnitMode {
    fn from(setting: ModeSetting) -> Self {
        match setting {
            ModeSetting::Normal => UnitMode::Normal,
            ModeSetting::Chunked => UnitMode::Chunked,
        }
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (print the plan, never launch the exporter)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// External exporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Path to the exporter executable
    pub executable: String,

    /// Timeout for ordinary units, in seconds
    #[serde(default = "default_standard_timeout_secs")]
    pub standard_timeout_secs: u64,

    /// Timeout for resource-intensive units, in seconds
    #[serde(default = "default_intensive_timeout_secs")]
    pub intensive_timeout_secs: u64,

    /// Per-unit timeout overrides in seconds, keyed by logical unit name
    #[serde(default)]
    pub timeout_overrides: BTreeMap<String, u64>,

    /// Exit codes meaning "could not connect"
    #[serde(default = "default_connection_failed_codes")]
    pub connection_failed_codes: Vec<i32>,

    /// Exit codes meaning the exporter crashed
    #[serde(default = "default_crash_codes")]
    pub crash_codes: Vec<i32>,
}

impl ExporterConfig {
    fn validate(&self) -> Result<(), String> {
        if self.executable.trim().is_empty() {
            return Err("exporter.executable cannot be empty".to_string());
        }
        if self.standard_timeout_secs == 0 || self.intensive_timeout_secs == 0 {
            return Err("exporter timeouts must be > 0".to_string());
        }

        let catalog = UnitCatalog::full();
        for (name, secs) in &self.timeout_overrides {
            if catalog.find_unit(name).is_none() {
                return Err(format!(
                    "exporter.timeout_overrides references unknown unit '{name}'"
                ));
            }
            if *secs == 0 {
                return Err(format!("exporter.timeout_overrides.{name} must be > 0"));
            }
        }

        if self.connection_failed_codes.contains(&0) || self.crash_codes.contains(&0) {
            return Err("exit code 0 cannot be classified as a failure".to_string());
        }
        Ok(())
    }

    /// Path to the exporter executable
    pub fn executable_path(&self) -> PathBuf {
        PathBuf::from(&self.executable)
    }

    /// Builds the timeout policy
    pub fn timeout_policy(&self) -> TimeoutPolicy {
        let mut policy = TimeoutPolicy::new(
            Duration::from_secs(self.standard_timeout_secs),
            Duration::from_secs(self.intensive_timeout_secs),
        );
        let catalog = UnitCatalog::full();
        for (name, secs) in &self.timeout_overrides {
            // Keys are matched case-insensitively; store the canonical name
            if let Some(unit) = catalog.find_unit(name) {
                policy = policy.with_override(unit.logical_name, Duration::from_secs(*secs));
            }
        }
        policy
    }

    /// Builds the exit code classification policy
    pub fn exit_code_policy(&self) -> ExitCodePolicy {
        ExitCodePolicy::new(
            self.connection_failed_codes.clone(),
            self.crash_codes.clone(),
        )
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving the merged workbooks
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Mode for hosts that do not set one
    #[serde(default)]
    pub default_mode: ModeSetting,

    /// Username for hosts that do not set one
    #[serde(default)]
    pub default_username: Option<String>,

    /// Use the reduced three-unit catalog
    #[serde(default)]
    pub fast_mode: bool,

    /// Name of the metadata sheet every unit export repeats
    #[serde(default = "default_metadata_sheet")]
    pub metadata_sheet: String,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }
        if self.metadata_sheet.is_empty() || self.metadata_sheet.chars().count() > 31 {
            return Err(
                "export.metadata_sheet must be between 1 and 31 characters".to_string(),
            );
        }
        Ok(())
    }

    /// Output directory as a path
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output_dir)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_mode: ModeSetting::default(),
            default_username: None,
            fast_mode: false,
            metadata_sheet: default_metadata_sheet(),
        }
    }
}

/// Vault backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VaultBackend {
    /// TOML credential file
    #[default]
    File,
    /// Environment variables
    Env,
}

/// Credential vault configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Backend to read credentials from
    #[serde(default)]
    pub backend: VaultBackend,

    /// Credential file path (file backend)
    #[serde(default = "default_vault_path")]
    pub path: String,

    /// Variable prefix (env backend)
    #[serde(default = "default_vault_env_prefix")]
    pub env_prefix: String,
}

impl VaultConfig {
    fn validate(&self) -> Result<(), String> {
        match self.backend {
            VaultBackend::File if self.path.trim().is_empty() => {
                Err("vault.path cannot be empty when backend = 'file'".to_string())
            }
            VaultBackend::Env if self.env_prefix.trim().is_empty() => {
                Err("vault.env_prefix cannot be empty when backend = 'env'".to_string())
            }
            _ => Ok(()),
        }
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            backend: VaultBackend::default(),
            path: default_vault_path(),
            env_prefix: default_vault_env_prefix(),
        }
    }
}

/// Result reporting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportingConfig {
    /// Print per-server results and the run summary to stdout
    #[serde(default = "default_true")]
    pub console: bool,

    /// Write the run summary as JSON to this path
    #[serde(default)]
    pub summary_json: Option<String>,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            console: true,
            summary_json: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_standard_timeout_secs() -> u64 {
    600
}

fn default_intensive_timeout_secs() -> u64 {
    1200
}

fn default_connection_failed_codes() -> Vec<i32> {
    vec![-1]
}

fn default_crash_codes() -> Vec<i32> {
    // STATUS_ACCESS_VIOLATION (0xC0000005) as a signed exit code
    vec![-1073741819]
}

fn default_output_dir() -> String {
    "exports".to_string()
}

fn default_metadata_sheet() -> String {
    "vMetaData".to_string()
}

fn default_vault_path() -> String {
    "credentials.toml".to_string()
}

fn default_vault_env_prefix() -> String {
    "VSWEEP_PASSWORD_".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
