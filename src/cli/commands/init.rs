//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file and, optionally, a credential file skeleton.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "vsweep.toml")]
    pub output: String,

    /// Also write a credential file skeleton at this path
    #[arg(long, value_name = "PATH")]
    pub credentials: Option<String>,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing vsweep configuration");
        println!();

        let mut files = vec![(self.output.as_str(), Self::generate_config())];
        if let Some(path) = &self.credentials {
            files.push((path.as_str(), Self::generate_credentials()));
        }

        for (path, _) in &files {
            if Path::new(path).exists() && !self.force {
                println!("❌ File already exists: {path}");
                println!("   Use --force to overwrite");
                return Ok(2);
            }
        }

        for (path, contents) in &files {
            if let Err(e) = fs::write(path, contents) {
                println!("❌ Failed to write {path}");
                println!("   Error: {e}");
                return Ok(5);
            }
            println!("✅ Created: {path}");
        }

        println!();
        println!("Next steps:");
        println!("  1. Edit {} with your servers and exporter path", self.output);
        println!("  2. Store passwords in the credential file or VSWEEP_PASSWORD_<HOST>");
        println!("  3. Validate configuration: vsweep validate-config");
        println!("  4. Try one server quickly: vsweep export --fast --server <host>");
        println!();
        Ok(0)
    }

    /// Generate the sample configuration
    fn generate_config() -> String {
        r#"# vsweep Configuration File
# Chunked vCenter inventory export

# Hosts to export. Bare names use the [export] defaults; tables may set
# username, mode ("normal" | "chunked") or a single unit.
# Top-level keys must precede the first table.
servers = [
    "vc01.example.com",
    { host = "vc02.example.com", username = "svc-inventory", mode = "normal" },
    { host = "vc03.example.com", unit = "vLicense" },
]

[application]
log_level = "info"
dry_run = false

[exporter]
executable = "C:/Program Files (x86)/Robware/RVTools/RVTools.exe"
standard_timeout_secs = 600
intensive_timeout_secs = 1200
# Exit codes are specific to the exporter version
connection_failed_codes = [-1]
crash_codes = [-1073741819]

[exporter.timeout_overrides]
# vHealth = 1800

[export]
output_dir = "exports"
default_mode = "chunked"
default_username = "administrator@vsphere.local"
fast_mode = false
metadata_sheet = "vMetaData"

[vault]
backend = "file"  # file | env
path = "credentials.toml"
env_prefix = "VSWEEP_PASSWORD_"

[reporting]
console = true
# summary_json = "exports/summary.json"

[logging]
local_enabled = true
local_path = "logs"
local_rotation = "daily"  # daily | hourly | never
"#
        .to_string()
    }

    /// Generate the credential file skeleton
    fn generate_credentials() -> String {
        r#"# vsweep credentials
# One entry per host/username pair. Set either password or
# encrypted_password (a blob already encrypted for the exporter).

[[credentials]]
host = "vc01.example.com"
username = "administrator@vsphere.local"
password = "change-me"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::vault::FileVault;
    use crate::config::parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_generated_config_parses() {
        let config = parse_config(&InitArgs::generate_config()).unwrap();
        let targets = config.server_targets().unwrap();
        assert_eq!(targets.len(), 3);
        assert_eq!(config.export.metadata_sheet, "vMetaData");
    }

    #[test]
    fn test_generated_credentials_parse() {
        assert!(FileVault::from_toml(&InitArgs::generate_credentials()).is_ok());
    }

    #[tokio::test]
    async fn test_init_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("vsweep.toml");
        fs::write(&output, "existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            credentials: None,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");
    }

    #[tokio::test]
    async fn test_init_writes_both_files() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("vsweep.toml");
        let credentials = temp.path().join("credentials.toml");

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            credentials: Some(credentials.to_string_lossy().to_string()),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(output.exists());
        assert!(credentials.exists());
    }
}
