//! Configuration management for vsweep.
//!
//! vsweep uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VSWEEP_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - A host list mixing bare names and detailed entries
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use vsweep::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("vsweep.toml")?;
//! for target in config.server_targets()? {
//!     println!("{} ({})", target.host_name, target.unit_mode);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! servers = ["vc01.example.com", { host = "vc02.example.com", mode = "normal" }]
//!
//! [exporter]
//! executable = "C:/Program Files (x86)/Robware/RVTools/RVTools.exe"
//!
//! [export]
//! output_dir = "exports"
//! default_username = "administrator@vsphere.local"
//!
//! [vault]
//! backend = "file"
//! path = "credentials.toml"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, DetailedHost, ExportConfig, ExporterConfig, HostEntry, LoggingConfig,
    ModeSetting, ReportingConfig, VaultBackend, VaultConfig, VsweepConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
