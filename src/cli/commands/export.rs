//! Export command implementation
//!
//! This module implements the `export` command, which runs every configured
//! server through the chunked export pipeline.

use crate::adapters::process::TokioProcessRunner;
use crate::adapters::reporting::create_reporter;
use crate::adapters::vault::create_vault;
use crate::config::load_config;
use crate::core::catalog::UnitCatalog;
use crate::core::export::RunCoordinator;
use crate::domain::{ServerTarget, UnitMode};
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Use the reduced three-unit catalog
    #[arg(long)]
    pub fast: bool,

    /// Only export these hosts (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub server: Vec<String>,

    /// Export a single unit from every selected server
    #[arg(long, conflicts_with = "mode")]
    pub unit: Option<String>,

    /// Override the export mode (normal or chunked)
    #[arg(long, value_parser = ["normal", "chunked"])]
    pub mode: Option<String>,

    /// Print the plan without launching the exporter
    #[arg(long)]
    pub dry_run: bool,

    /// Write the run summary as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub summary_json: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Configuration loading failed");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if self.fast {
            tracing::info!("Enabling fast mode from CLI");
            config.export.fast_mode = true;
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        if let Some(path) = &self.summary_json {
            config.reporting.summary_json = Some(path.clone());
        }

        let targets = match config
            .server_targets()
            .and_then(|targets| self.select_targets(targets))
        {
            Ok(targets) => targets,
            Err(e) => {
                tracing::error!(error = %e, "Invalid server selection");
                eprintln!("Configuration validation failed: {e}");
                return Ok(2);
            }
        };

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - the exporter will not be launched");
            println!();
            self.print_plan(&targets, config.export.fast_mode, &config.export.output_dir);
            return Ok(0);
        }

        let executable = config.exporter.executable_path();
        if !executable.is_file() {
            tracing::error!(path = %executable.display(), "Exporter executable not found");
            eprintln!("Exporter executable not found: {}", executable.display());
            return Ok(2);
        }

        let vault = match create_vault(&config.vault) {
            Ok(v) => v,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to open credential vault");
                eprintln!("Failed to open credential vault: {e}");
                return Ok(2);
            }
        };
        let reporter = create_reporter(&config.reporting);

        let coordinator = RunCoordinator::new(
            &config,
            Arc::from(vault),
            Arc::new(TokioProcessRunner::new()),
            Arc::new(reporter),
            shutdown_signal,
        )?
        .with_targets(targets);

        println!(
            "🚀 Exporting {} server(s) into {}",
            coordinator.targets().len(),
            config.export.output_dir
        );
        println!();

        let summary = match coordinator.run().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Export run failed");
                eprintln!("Export failed: {e}");
                return Ok(5);
            }
        };

        let exit_code = if summary.interrupted {
            println!("⚠️  Export interrupted. Servers not reached were skipped.");
            tracing::info!("Export interrupted by user signal");
            130
        } else if summary.is_successful() {
            println!("✅ Export completed successfully!");
            0
        } else {
            println!("⚠️  Export completed with failures");
            1
        };

        Ok(exit_code)
    }

    /// Applies `--server`, `--unit` and `--mode` to the configured targets
    fn select_targets(&self, targets: Vec<ServerTarget>) -> Result<Vec<ServerTarget>, String> {
        for wanted in &self.server {
            if !targets
                .iter()
                .any(|t| t.host_name.as_str().eq_ignore_ascii_case(wanted))
            {
                return Err(format!("--server {wanted} is not in the configured servers"));
            }
        }

        let mode = match (&self.unit, self.mode.as_deref()) {
            (Some(name), _) => {
                let unit = UnitCatalog::full()
                    .find_unit(name)
                    .copied()
                    .ok_or_else(|| format!("unknown unit: {name}"))?;
                Some(UnitMode::SingleUnit(unit.logical_name.to_string()))
            }
            (None, Some("normal")) => Some(UnitMode::Normal),
            (None, Some("chunked")) => Some(UnitMode::Chunked),
            (None, Some(other)) => return Err(format!("invalid mode: {other}")),
            (None, None) => None,
        };

        Ok(targets
            .into_iter()
            .filter(|t| {
                self.server.is_empty()
                    || self
                        .server
                        .iter()
                        .any(|s| t.host_name.as_str().eq_ignore_ascii_case(s))
            })
            .map(|mut t| {
                if let Some(mode) = &mode {
                    t.unit_mode = mode.clone();
                }
                t
            })
            .collect())
    }

    fn print_plan(&self, targets: &[ServerTarget], fast_mode: bool, output_dir: &str) {
        println!("Export Plan:");
        println!("  Output directory: {output_dir}");
        println!(
            "  Catalog: {}",
            if fast_mode { "fast (3 units)" } else { "full" }
        );
        println!();
        for target in targets {
            let units = match &target.unit_mode {
                UnitMode::Normal => 1,
                UnitMode::Chunked => UnitCatalog::for_mode(fast_mode).len(),
                UnitMode::SingleUnit(_) => 1,
            };
            println!(
                "  {} as {} - {} ({} export(s))",
                target.host_name, target.username, target.unit_mode, units
            );
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HostName;

    fn targets() -> Vec<ServerTarget> {
        ["vc01", "vc02", "vc03"]
            .iter()
            .map(|h| ServerTarget::new(HostName::new(*h).unwrap(), "admin", UnitMode::Chunked))
            .collect()
    }

    #[test]
    fn test_export_args_defaults() {
        let args = ExportArgs::default();
        assert!(!args.fast);
        assert!(!args.dry_run);
        assert!(args.server.is_empty());
        assert_eq!(args.select_targets(targets()).unwrap().len(), 3);
    }

    #[test]
    fn test_select_targets_filters_servers() {
        let args = ExportArgs {
            server: vec!["VC02".to_string()],
            ..Default::default()
        };
        let selected = args.select_targets(targets()).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].host_name.as_str(), "vc02");
    }

    #[test]
    fn test_select_targets_unknown_server() {
        let args = ExportArgs {
            server: vec!["vc99".to_string()],
            ..Default::default()
        };
        assert!(args.select_targets(targets()).is_err());
    }

    #[test]
    fn test_select_targets_single_unit_canonical_name() {
        let args = ExportArgs {
            unit: Some("vlicense".to_string()),
            ..Default::default()
        };
        let selected = args.select_targets(targets()).unwrap();
        assert!(selected
            .iter()
            .all(|t| t.unit_mode == UnitMode::SingleUnit("vLicense".to_string())));
    }

    #[test]
    fn test_select_targets_mode_override() {
        let args = ExportArgs {
            mode: Some("normal".to_string()),
            ..Default::default()
        };
        let selected = args.select_targets(targets()).unwrap();
        assert!(selected.iter().all(|t| t.unit_mode == UnitMode::Normal));
    }
}
