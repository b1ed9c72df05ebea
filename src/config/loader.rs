//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{ModeSetting, VaultBackend, VsweepConfig};
use crate::domain::errors::VsweepError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into VsweepConfig
/// 4. Applies environment variable overrides (VSWEEP_* prefix)
/// 5. Validates the configuration, including the host list
///
/// # Errors
///
/// Returns [`VsweepError::Configuration`] for every failure. A run must not
/// start without a valid configuration.
///
/// # Examples
///
/// ```no_run
/// use vsweep::config::loader::load_config;
///
/// let config = load_config("vsweep.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<VsweepConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VsweepError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VsweepError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text
///
/// Same pipeline as [`load_config`] minus the file read.
pub fn parse_config(contents: &str) -> Result<VsweepConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: VsweepConfig = toml::from_str(&contents)
        .map_err(|e| VsweepError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        VsweepError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| VsweepError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(VsweepError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using VSWEEP_* prefix
///
/// Environment variables follow the pattern: VSWEEP_<SECTION>_<KEY>
/// For example: VSWEEP_EXPORTER_EXECUTABLE, VSWEEP_EXPORT_FAST_MODE
fn apply_env_overrides(config: &mut VsweepConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("VSWEEP_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("VSWEEP_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Exporter overrides
    if let Ok(val) = std::env::var("VSWEEP_EXPORTER_EXECUTABLE") {
        config.exporter.executable = val;
    }
    if let Ok(val) = std::env::var("VSWEEP_EXPORTER_STANDARD_TIMEOUT_SECS") {
        if let Ok(secs) = val.parse() {
            config.exporter.standard_timeout_secs = secs;
        }
    }
    if let Ok(val) = std::env::var("VSWEEP_EXPORTER_INTENSIVE_TIMEOUT_SECS") {
        if let Ok(secs) = val.parse() {
            config.exporter.intensive_timeout_secs = secs;
        }
    }

    // Export overrides
    if let Ok(val) = std::env::var("VSWEEP_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("VSWEEP_EXPORT_FAST_MODE") {
        config.export.fast_mode = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("VSWEEP_EXPORT_DEFAULT_USERNAME") {
        config.export.default_username = Some(val);
    }
    if let Ok(val) = std::env::var("VSWEEP_EXPORT_DEFAULT_MODE") {
        config.export.default_mode = match val.to_ascii_lowercase().as_str() {
            "normal" => ModeSetting::Normal,
            "chunked" => ModeSetting::Chunked,
            other => {
                return Err(VsweepError::Configuration(format!(
                    "VSWEEP_EXPORT_DEFAULT_MODE must be 'normal' or 'chunked', got '{other}'"
                )))
            }
        };
    }

    // Vault overrides
    if let Ok(val) = std::env::var("VSWEEP_VAULT_BACKEND") {
        config.vault.backend = match val.to_ascii_lowercase().as_str() {
            "file" => VaultBackend::File,
            "env" => VaultBackend::Env,
            other => {
                return Err(VsweepError::Configuration(format!(
                    "VSWEEP_VAULT_BACKEND must be 'file' or 'env', got '{other}'"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("VSWEEP_VAULT_PATH") {
        config.vault.path = val;
    }

    // Reporting overrides
    if let Ok(val) = std::env::var("VSWEEP_REPORTING_SUMMARY_JSON") {
        config.reporting.summary_json = Some(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("VSWEEP_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("VSWEEP_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
