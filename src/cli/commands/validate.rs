//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the vsweep configuration file.

use crate::adapters::vault::create_vault;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let targets = config.server_targets().unwrap_or_default();
        let executable = config.exporter.executable_path();

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Exporter: {}", executable.display());
        println!(
            "  Timeouts: {}s standard, {}s intensive, {} override(s)",
            config.exporter.standard_timeout_secs,
            config.exporter.intensive_timeout_secs,
            config.exporter.timeout_overrides.len()
        );
        println!("  Output Directory: {}", config.export.output_dir);
        println!("  Fast Mode: {}", config.export.fast_mode);
        println!("  Metadata Sheet: {}", config.export.metadata_sheet);
        println!("  Vault Backend: {:?}", config.vault.backend);
        println!("  Servers: {}", targets.len());
        for target in &targets {
            println!(
                "    - {} ({}, user {})",
                target.host_name, target.unit_mode, target.username
            );
        }
        println!();

        // Environment problems are warnings: the file itself is valid
        if !executable.is_file() {
            println!("⚠️  Exporter executable not found: {}", executable.display());
        }
        if let Err(e) = create_vault(&config.vault) {
            println!("⚠️  Credential vault cannot be opened: {e}");
        }

        Ok(0)
    }
}
