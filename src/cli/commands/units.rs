//! Units command implementation
//!
//! Prints the unit catalog with the timeout each unit would get.

use crate::config::load_config;
use crate::core::catalog::UnitCatalog;
use crate::core::export::TimeoutPolicy;
use clap::Args;

/// Arguments for the units command
#[derive(Args, Debug)]
pub struct UnitsArgs {
    /// Show the reduced fast-mode catalog
    #[arg(long)]
    pub fast: bool,
}

impl UnitsArgs {
    /// Execute the units command
    ///
    /// Timeouts come from the configuration file when it loads, otherwise the
    /// built-in defaults are shown.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let policy = match load_config(config_path) {
            Ok(config) => config.exporter.timeout_policy(),
            Err(e) => {
                tracing::debug!(error = %e, "Using default timeouts");
                TimeoutPolicy::default()
            }
        };

        let catalog = UnitCatalog::for_mode(self.fast);
        println!("{}", render_catalog(&catalog, &policy));
        Ok(0)
    }
}

fn render_catalog(catalog: &UnitCatalog, policy: &TimeoutPolicy) -> String {
    let mut out = format!(
        "{:<4} {:<12} {:<26} {:<10} {:>8}\n",
        "#", "Unit", "Selector", "Class", "Timeout"
    );
    for (index, unit) in catalog.units().iter().enumerate() {
        let class = if unit.is_intensive() {
            "intensive"
        } else {
            "standard"
        };
        out.push_str(&format!(
            "{:<4} {:<12} {:<26} {:<10} {:>7}s\n",
            index + 1,
            unit.logical_name,
            unit.selector,
            class,
            policy.timeout_for(unit).as_secs()
        ));
    }
    out.push_str(&format!("{} unit(s)", catalog.len()));
    out
}
