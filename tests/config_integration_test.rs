//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with --test-threads=1
//! to avoid interference between tests.

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
use tempfile::NamedTempFile;
use vsweep::config::{load_config, ModeSetting, VaultBackend};
use vsweep::core::catalog::UnitCatalog;
use vsweep::domain::UnitMode;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("VSWEEP_APPLICATION_LOG_LEVEL");
    std::env::remove_var("VSWEEP_APPLICATION_DRY_RUN");
    std::env::remove_var("VSWEEP_EXPORTER_EXECUTABLE");
    std::env::remove_var("VSWEEP_EXPORTER_STANDARD_TIMEOUT_SECS");
    std::env::remove_var("VSWEEP_EXPORT_FAST_MODE");
    std::env::remove_var("VSWEEP_EXPORT_DEFAULT_MODE");
    std::env::remove_var("VSWEEP_VAULT_BACKEND");
    std::env::remove_var("TEST_VSWEEP_EXPORTER");
    std::env::remove_var("TEST_VSWEEP_USER");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
servers = [
    "vc01.example.com",
    { host = "vc02.example.com", username = "svc-inventory", mode = "normal" },
    { host = "vc03.example.com", unit = "vlicense" },
]

[application]
log_level = "debug"
dry_run = true

[exporter]
executable = "/opt/rvtools/RVTools.exe"
standard_timeout_secs = 300
intensive_timeout_secs = 900
connection_failed_codes = [-1, 1]
crash_codes = [-1073741819]

[exporter.timeout_overrides]
vHealth = 1800

[export]
output_dir = "/tmp/vsweep-exports"
default_mode = "chunked"
default_username = "administrator@vsphere.local"
fast_mode = true
metadata_sheet = "vMetaData"

[vault]
backend = "env"
env_prefix = "VC_PW_"

[reporting]
console = false
summary_json = "/tmp/vsweep-exports/summary.json"

[logging]
local_enabled = false
local_path = "/tmp/vsweep-logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    // Application
    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);

    // Exporter
    assert_eq!(config.exporter.executable, "/opt/rvtools/RVTools.exe");
    let policy = config.exporter.timeout_policy();
    let full = UnitCatalog::full();
    assert_eq!(
        policy.timeout_for(full.find_unit("vCPU").unwrap()),
        Duration::from_secs(300)
    );
    assert_eq!(
        policy.timeout_for(full.find_unit("vInfo").unwrap()),
        Duration::from_secs(900)
    );
    assert_eq!(
        policy.timeout_for(full.find_unit("vHealth").unwrap()),
        Duration::from_secs(1800)
    );

    // Export
    assert_eq!(config.export.output_dir, "/tmp/vsweep-exports");
    assert_eq!(config.export.default_mode, ModeSetting::Chunked);
    assert!(config.export.fast_mode);

    // Vault and reporting
    assert_eq!(config.vault.backend, VaultBackend::Env);
    assert_eq!(config.vault.env_prefix, "VC_PW_");
    assert!(!config.reporting.console);
    assert!(config.reporting.summary_json.is_some());

    // Logging
    assert!(!config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");

    // Servers
    let targets = config.server_targets().unwrap();
    assert_eq!(targets.len(), 3);
    assert_eq!(targets[0].username, "administrator@vsphere.local");
    assert_eq!(targets[0].unit_mode, UnitMode::Chunked);
    assert_eq!(targets[1].username, "svc-inventory");
    assert_eq!(targets[1].unit_mode, UnitMode::Normal);
    assert_eq!(
        targets[2].unit_mode,
        UnitMode::SingleUnit("vLicense".to_string())
    );
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
servers = ["vc01"]

[exporter]
executable = "/opt/rvtools/RVTools.exe"

[export]
default_username = "admin"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert!(!config.application.dry_run);
    assert_eq!(config.exporter.standard_timeout_secs, 600);
    assert_eq!(config.exporter.intensive_timeout_secs, 1200);
    assert_eq!(config.export.default_mode, ModeSetting::Chunked);
    assert_eq!(config.export.metadata_sheet, "vMetaData");
    assert!(!config.export.fast_mode);
    assert_eq!(config.vault.backend, VaultBackend::File);
    assert!(config.reporting.console);
    assert!(config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("TEST_VSWEEP_EXPORTER", "/srv/exporter/export");
    std::env::set_var("TEST_VSWEEP_USER", "svc-readonly");

    let temp_file = write_config(
        r#"
servers = ["vc01"]

[exporter]
executable = "${TEST_VSWEEP_EXPORTER}"

[export]
default_username = "${TEST_VSWEEP_USER}"
"#,
    );

    let config = load_config(temp_file.path());
    cleanup_env_vars();
    let config = config.expect("Failed to load config");

    assert_eq!(config.exporter.executable, "/srv/exporter/export");
    assert_eq!(
        config.export.default_username,
        Some("svc-readonly".to_string())
    );
}

#[test]
fn test_missing_substitution_variable_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
servers = ["vc01"]

[exporter]
executable = "${TEST_VSWEEP_EXPORTER}"

[export]
default_username = "admin"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_VSWEEP_EXPORTER"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("VSWEEP_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("VSWEEP_EXPORTER_STANDARD_TIMEOUT_SECS", "42");
    std::env::set_var("VSWEEP_EXPORT_FAST_MODE", "true");
    std::env::set_var("VSWEEP_EXPORT_DEFAULT_MODE", "normal");

    let temp_file = write_config(
        r#"
servers = ["vc01"]

[application]
log_level = "info"

[exporter]
executable = "/opt/rvtools/RVTools.exe"
standard_timeout_secs = 600

[export]
default_username = "admin"
"#,
    );

    let config = load_config(temp_file.path());
    cleanup_env_vars();
    let config = config.expect("Failed to load config");

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.exporter.standard_timeout_secs, 42);
    assert!(config.export.fast_mode);
    assert_eq!(
        config.server_targets().unwrap()[0].unit_mode,
        UnitMode::Normal
    );
}

#[test]
fn test_invalid_env_override_is_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("VSWEEP_VAULT_BACKEND", "keyring");

    let temp_file = write_config(
        r#"
servers = ["vc01"]

[exporter]
executable = "/opt/rvtools/RVTools.exe"

[export]
default_username = "admin"
"#,
    );

    let result = load_config(temp_file.path());
    cleanup_env_vars();
    assert!(result.is_err());
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        // No servers
        r#"
servers = []

[exporter]
executable = "/opt/rvtools/RVTools.exe"

[export]
default_username = "admin"
"#,
        // Unknown single unit
        r#"
servers = [{ host = "vc01", unit = "vNothing" }]

[exporter]
executable = "/opt/rvtools/RVTools.exe"

[export]
default_username = "admin"
"#,
        // No username anywhere
        r#"
servers = ["vc01"]

[exporter]
executable = "/opt/rvtools/RVTools.exe"
"#,
        // Bad rotation
        r#"
servers = ["vc01"]

[exporter]
executable = "/opt/rvtools/RVTools.exe"

[export]
default_username = "admin"

[logging]
local_rotation = "weekly"
"#,
    ];

    for contents in cases {
        let temp_file = write_config(contents);
        assert!(
            load_config(temp_file.path()).is_err(),
            "expected rejection of:\n{contents}"
        );
    }
}

#[test]
fn test_missing_config_file() {
    let result = load_config("/nonexistent/vsweep.toml");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not found"));
}
