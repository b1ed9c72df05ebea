//! Single-unit export stage
//!
//! Turns one (server, unit) pair into one [`UnitOutcome`]. Nothing here returns
//! an error: every failure, including faults in the stage itself, is folded
//! into the outcome so the per-unit loop keeps going.

use super::naming;
use super::policy::{ExitCodePolicy, TimeoutPolicy};
use crate::adapters::exporter::{build_invocation, ExportRequest};
use crate::adapters::process::ProcessRunner;
use crate::domain::{Credential, ExportUnit, FailureCategory, HostName, UnitOutcome};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Runs the exporter for one unit and classifies the result
#[derive(Clone)]
pub struct UnitExportStage {
    runner: Arc<dyn ProcessRunner>,
    executable: PathBuf,
    timeouts: TimeoutPolicy,
    exit_codes: ExitCodePolicy,
}

impl UnitExportStage {
    /// Creates a stage bound to an exporter executable
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        executable: impl Into<PathBuf>,
        timeouts: TimeoutPolicy,
        exit_codes: ExitCodePolicy,
    ) -> Self {
        Self {
            runner,
            executable: executable.into(),
            timeouts,
            exit_codes,
        }
    }

    /// Timeout policy applied to units
    pub fn timeouts(&self) -> &TimeoutPolicy {
        &self.timeouts
    }

    /// Exports one unit into `<output_dir>/<base_name>__<unit>.xlsx`
    pub async fn export_unit(
        &self,
        server: &HostName,
        credential: &Credential,
        unit: &ExportUnit,
        output_dir: &Path,
        base_name: &str,
    ) -> UnitOutcome {
        let file_name = naming::unit_file_name(base_name, unit);
        self.export_to(server, credential, unit, output_dir, &file_name)
            .await
    }

    /// Exports one unit into an explicit file name
    pub async fn export_to(
        &self,
        server: &HostName,
        credential: &Credential,
        unit: &ExportUnit,
        output_dir: &Path,
        file_name: &str,
    ) -> UnitOutcome {
        let started = Instant::now();

        // The exporter runs from its own directory, so `-d` must not be relative
        let output_dir = match std::path::absolute(output_dir) {
            Ok(dir) => dir,
            Err(e) => {
                return UnitOutcome::failed(
                    *unit,
                    server.clone(),
                    FailureCategory::Exception,
                    None,
                    started.elapsed(),
                )
                .with_detail(format!("cannot resolve {}: {e}", output_dir.display()));
            }
        };
        let artifact = output_dir.join(file_name);

        // A leftover file from an earlier attempt would fake a success
        match tokio::fs::remove_file(&artifact).await {
            Ok(()) => tracing::debug!(path = %artifact.display(), "Removed stale artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(
                    unit = unit.logical_name,
                    path = %artifact.display(),
                    error = %e,
                    "Failed to remove stale artifact"
                );
                return UnitOutcome::failed(
                    *unit,
                    server.clone(),
                    FailureCategory::Exception,
                    None,
                    started.elapsed(),
                )
                .with_detail(format!("cannot remove stale artifact: {e}"));
            }
        }

        let request = ExportRequest {
            server,
            credential,
            selector: unit.selector,
            output_dir: &output_dir,
            file_name,
        };
        let invocation = build_invocation(&self.executable, &request);
        let timeout = self.timeouts.timeout_for(unit);

        tracing::info!(
            unit = unit.logical_name,
            selector = unit.selector,
            timeout_secs = timeout.as_secs(),
            encrypted_password = credential.encrypted,
            "Exporting unit"
        );

        let exit = match self.runner.run(&invocation, timeout).await {
            Ok(exit) => exit,
            Err(e) => {
                tracing::error!(unit = unit.logical_name, error = %e, "Exporter could not be run");
                return UnitOutcome::failed(
                    *unit,
                    server.clone(),
                    FailureCategory::Exception,
                    None,
                    started.elapsed(),
                )
                .with_detail(e.to_string());
            }
        };

        let category = self.exit_codes.classify(&exit);
        let elapsed = started.elapsed();

        match category {
            FailureCategory::None if artifact.is_file() => {
                tracing::info!(
                    unit = unit.logical_name,
                    elapsed_secs = elapsed.as_secs(),
                    "Unit exported"
                );
                UnitOutcome::succeeded(*unit, server.clone(), artifact, elapsed)
            }
            FailureCategory::None => {
                tracing::warn!(
                    unit = unit.logical_name,
                    expected = %artifact.display(),
                    "Exporter reported success but wrote no file"
                );
                UnitOutcome::failed(
                    *unit,
                    server.clone(),
                    FailureCategory::ArtifactMissing,
                    exit.exit_code,
                    elapsed,
                )
            }
            category => {
                tracing::warn!(
                    unit = unit.logical_name,
                    category = category.label(),
                    exit_code = ?exit.exit_code,
                    elapsed_secs = elapsed.as_secs(),
                    "Unit export failed"
                );
                UnitOutcome::failed(*unit, server.clone(), category, exit.exit_code, elapsed)
            }
        }
    }
}
