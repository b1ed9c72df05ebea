//! Run coordinator - main orchestrator for a whole export run
//!
//! This module walks the configured servers in order, resolves each server's
//! credential, hands the server to the [`ChunkedExportOrchestrator`] and feeds
//! results to the reporter.

use super::naming;
use super::orchestrator::ChunkedExportOrchestrator;
use super::stage::UnitExportStage;
use super::summary::{RunSummary, ServerExportResult};
use crate::adapters::process::ProcessRunner;
use crate::adapters::reporting::ResultReporter;
use crate::adapters::vault::CredentialVault;
use crate::config::VsweepConfig;
use crate::core::merge::ArtifactMerger;
use crate::domain::{Result, ServerTarget, VsweepError};
use chrono::{DateTime, Local, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::Instrument;

/// Run coordinator
pub struct RunCoordinator {
    targets: Vec<ServerTarget>,
    output_dir: PathBuf,
    fast_mode: bool,
    vault: Arc<dyn CredentialVault>,
    reporter: Arc<dyn ResultReporter>,
    orchestrator: ChunkedExportOrchestrator,
    shutdown: watch::Receiver<bool>,
}

impl RunCoordinator {
    /// Create a coordinator for every server in `config`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the host list does not resolve.
    pub fn new(
        config: &VsweepConfig,
        vault: Arc<dyn CredentialVault>,
        runner: Arc<dyn ProcessRunner>,
        reporter: Arc<dyn ResultReporter>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        let targets = config
            .server_targets()
            .map_err(VsweepError::Configuration)?;

        let stage = UnitExportStage::new(
            runner,
            config.exporter.executable_path(),
            config.exporter.timeout_policy(),
            config.exporter.exit_code_policy(),
        );
        // Unit files are checked here and written by a child in another directory
        let output_dir = std::path::absolute(config.export.output_path()).map_err(|e| {
            VsweepError::Configuration(format!("cannot resolve output directory: {e}"))
        })?;
        let merger = ArtifactMerger::new(config.export.metadata_sheet.clone());
        let orchestrator =
            ChunkedExportOrchestrator::new(stage, merger).with_shutdown(shutdown.clone());

        Ok(Self {
            targets,
            output_dir,
            fast_mode: config.export.fast_mode,
            vault,
            reporter,
            orchestrator,
            shutdown,
        })
    }

    /// Replace the server list (CLI filters and overrides)
    pub fn with_targets(mut self, targets: Vec<ServerTarget>) -> Self {
        self.targets = targets;
        self
    }

    /// Servers this run will export, in order
    pub fn targets(&self) -> &[ServerTarget] {
        &self.targets
    }

    fn is_shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Execute the run
    ///
    /// Servers are processed sequentially. A server that fails, including a
    /// missing credential, is recorded and the run moves on.
    ///
    /// # Errors
    ///
    /// Only fails if the output directory cannot be created.
    pub async fn run(&self) -> Result<RunSummary> {
        let started_at = Utc::now();
        let run_local = started_at.with_timezone(&Local);

        tokio::fs::create_dir_all(&self.output_dir).await.map_err(|e| {
            VsweepError::Io(format!(
                "cannot create output directory {}: {e}",
                self.output_dir.display()
            ))
        })?;

        let mut summary = RunSummary::new(started_at);
        tracing::info!(
            run_id = %summary.run_id,
            servers = self.targets.len(),
            output_dir = %self.output_dir.display(),
            fast_mode = self.fast_mode,
            "Starting export run"
        );

        let mut interrupted = false;
        for target in &self.targets {
            if self.is_shutdown_requested() {
                tracing::warn!(
                    remaining = self.targets.len() - summary.results.len(),
                    "Shutdown requested, skipping remaining servers"
                );
                interrupted = true;
                break;
            }

            let span = tracing::info_span!(
                "server",
                host = %target.host_name,
                mode = %target.unit_mode
            );
            let result = self
                .export_target(target, &self.output_dir, &run_local)
                .instrument(span)
                .await;

            if let Err(e) = self.reporter.report_server(&result).await {
                tracing::warn!(host = %result.host_name, error = %e, "Reporter failed");
            }
            interrupted |= result.interrupted;
            summary.push(result);
        }

        let summary = summary.finish(Utc::now(), interrupted);
        if let Err(e) = self.reporter.report_run(&summary).await {
            tracing::warn!(error = %e, "Reporter failed on run summary");
        }
        Ok(summary)
    }

    async fn export_target(
        &self,
        target: &ServerTarget,
        output_dir: &Path,
        run_started: &DateTime<Local>,
    ) -> ServerExportResult {
        let base_name = naming::base_name(&target.host_name, run_started);

        let credential = match self
            .vault
            .get_credential(&target.host_name, &target.username)
            .await
        {
            Ok(credential) => credential,
            Err(e) => {
                tracing::error!(username = %target.username, error = %e, "Credential lookup failed");
                return ServerExportResult::failed(
                    target.host_name.clone(),
                    target.unit_mode.clone(),
                    format!("credential lookup failed: {e}"),
                );
            }
        };

        self.orchestrator
            .export_server(target, &credential, output_dir, &base_name, self.fast_mode)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::process::{ProcessExit, ProcessInvocation};
    use crate::adapters::vault::MemoryVault;
    use crate::config::parse_config;
    use crate::core::export::summary::ServerStatus;
    use crate::domain::Credential;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Always exits 0 without writing anything
    struct SilentRunner;

    #[async_trait]
    impl ProcessRunner for SilentRunner {
        async fn run(&self, _invocation: &ProcessInvocation, _timeout: Duration) -> Result<ProcessExit> {
            Ok(ProcessExit::exited(0, Duration::from_millis(1)))
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        servers: Mutex<Vec<String>>,
        runs: Mutex<usize>,
    }

    #[async_trait]
    impl ResultReporter for RecordingReporter {
        async fn report_server(&self, result: &ServerExportResult) -> Result<()> {
            self.servers.lock().unwrap().push(result.host_name.to_string());
            Ok(())
        }

        async fn report_run(&self, _summary: &RunSummary) -> Result<()> {
            *self.runs.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn config(output_dir: &Path) -> VsweepConfig {
        parse_config(&format!(
            r#"
servers = ["vc01", "vc02"]

[exporter]
executable = "/opt/exporter/export"

[export]
output_dir = "{}"
default_username = "admin"
fast_mode = true
"#,
            output_dir.display()
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_credential_does_not_stop_run() {
        let temp = TempDir::new().unwrap();
        let vault = MemoryVault::new().with_credential("vc02", Credential::plain("admin", "pw"));
        let reporter = Arc::new(RecordingReporter::default());
        let (_tx, rx) = watch::channel(false);

        let coordinator = RunCoordinator::new(
            &config(temp.path()),
            Arc::new(vault),
            Arc::new(SilentRunner),
            reporter.clone(),
            rx,
        )
        .unwrap();
        let summary = coordinator.run().await.unwrap();

        assert_eq!(summary.results.len(), 2);
        assert!(summary.results[0]
            .message
            .starts_with("credential lookup failed"));
        assert_eq!(summary.results[1].message, "no files exported");
        assert_eq!(summary.results[1].failed_unit_count, 3);
        assert_eq!(*reporter.servers.lock().unwrap(), vec!["vc01", "vc02"]);
        assert_eq!(*reporter.runs.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_before_first_server() {
        let temp = TempDir::new().unwrap();
        let (_tx, rx) = watch::channel(true);

        let coordinator = RunCoordinator::new(
            &config(temp.path()),
            Arc::new(MemoryVault::new()),
            Arc::new(SilentRunner),
            Arc::new(RecordingReporter::default()),
            rx,
        )
        .unwrap();
        let summary = coordinator.run().await.unwrap();

        assert!(summary.interrupted);
        assert!(summary.results.is_empty());
        assert_eq!(summary.count(ServerStatus::Failed), 0);
    }
}
