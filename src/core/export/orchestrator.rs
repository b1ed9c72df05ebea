//! Per-server export orchestration
//!
//! Chunked mode runs every catalog unit into an isolated parts directory,
//! merges whatever succeeded into the final workbook and removes the
//! intermediates. Normal mode runs one monolithic export straight to the final
//! file.

use super::naming;
use super::stage::UnitExportStage;
use super::summary::{ServerExportResult, ServerStatus};
use crate::core::catalog::UnitCatalog;
use crate::core::merge::ArtifactMerger;
use crate::domain::{Credential, HostName, ServerTarget, UnitMode, UnitOutcome};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::watch;

/// Drives one server's export from units to final workbook
#[derive(Clone)]
pub struct ChunkedExportOrchestrator {
    stage: UnitExportStage,
    merger: ArtifactMerger,
    shutdown: Option<watch::Receiver<bool>>,
}

impl ChunkedExportOrchestrator {
    /// Creates an orchestrator without a shutdown signal
    pub fn new(stage: UnitExportStage, merger: ArtifactMerger) -> Self {
        Self {
            stage,
            merger,
            shutdown: None,
        }
    }

    /// Stops the unit loop once the receiver reads `true`
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Exports one server according to its unit mode
    pub async fn export_server(
        &self,
        target: &ServerTarget,
        credential: &Credential,
        output_dir: &Path,
        base_name: &str,
        fast_mode: bool,
    ) -> ServerExportResult {
        let server = &target.host_name;
        match &target.unit_mode {
            UnitMode::Normal => {
                self.export_server_normal(server, credential, output_dir, base_name)
                    .await
            }
            UnitMode::Chunked => {
                let catalog = UnitCatalog::for_mode(fast_mode);
                self.export_server_chunked(server, credential, &catalog, output_dir, base_name)
                    .await
            }
            UnitMode::SingleUnit(name) => match UnitCatalog::full().find_unit(name) {
                Some(unit) => {
                    let catalog = UnitCatalog::single(*unit);
                    let mut result = self
                        .export_server_chunked(server, credential, &catalog, output_dir, base_name)
                        .await;
                    result.unit_mode = target.unit_mode.clone();
                    result
                }
                None => ServerExportResult::failed(
                    server.clone(),
                    target.unit_mode.clone(),
                    format!("unknown unit: {name}"),
                ),
            },
        }
    }

    /// Exports every unit of `catalog` and merges the successes
    pub async fn export_server_chunked(
        &self,
        server: &HostName,
        credential: &Credential,
        catalog: &UnitCatalog,
        output_dir: &Path,
        base_name: &str,
    ) -> ServerExportResult {
        let started = Instant::now();
        let total = catalog.len();
        let parts = naming::parts_dir(output_dir, base_name);
        let final_path = naming::final_artifact_path(output_dir, base_name);

        tracing::info!(
            units = total,
            parts_dir = %parts.display(),
            "Starting chunked export"
        );

        if let Err(e) = tokio::fs::create_dir_all(&parts).await {
            tracing::error!(path = %parts.display(), error = %e, "Cannot create parts directory");
            let mut result = ServerExportResult::failed(
                server.clone(),
                UnitMode::Chunked,
                format!("cannot create {}: {e}", parts.display()),
            );
            result.duration = started.elapsed();
            return result;
        }

        let mut outcomes: Vec<UnitOutcome> = Vec::with_capacity(total);
        let mut interrupted = false;
        for (index, unit) in catalog.units().iter().enumerate() {
            if self.is_shutdown_requested() {
                tracing::warn!(
                    completed = index,
                    remaining = total - index,
                    "Shutdown requested, skipping remaining units"
                );
                interrupted = true;
                break;
            }
            tracing::debug!(position = index + 1, total, unit = unit.logical_name, "Next unit");
            let outcome = self
                .stage
                .export_unit(server, credential, unit, &parts, base_name)
                .await;
            outcomes.push(outcome);
        }

        let artifacts: Vec<PathBuf> = outcomes
            .iter()
            .filter(|o| o.success)
            .filter_map(|o| o.artifact_path.clone())
            .collect();
        let succeeded = artifacts.len();

        let mut result = ServerExportResult {
            host_name: server.clone(),
            unit_mode: UnitMode::Chunked,
            status: ServerStatus::Failed,
            overall_success: false,
            final_artifact_path: None,
            successful_unit_count: succeeded,
            failed_unit_count: outcomes.len() - succeeded,
            failed_unit_details: outcomes
                .iter()
                .filter(|o| !o.success)
                .map(UnitOutcome::failure_line)
                .collect(),
            message: String::new(),
            duration: started.elapsed(),
            interrupted,
            unit_outcomes: outcomes,
        };

        if succeeded == 0 {
            // Only succeeds when nothing was left behind
            let _ = tokio::fs::remove_dir(&parts).await;
            result.message = "no files exported".to_string();
            result.duration = started.elapsed();
            return result;
        }

        tracing::info!(artifacts = succeeded, destination = %final_path.display(), "Merging");
        if !self
            .merger
            .merge_blocking(artifacts, final_path.clone())
            .await
        {
            result.message = format!(
                "merge failed; {succeeded} unit artifacts kept in {}",
                parts.display()
            );
            result.duration = started.elapsed();
            return result;
        }

        cleanup_intermediates(&parts, output_dir, base_name, &final_path).await;

        result.overall_success = true;
        result.final_artifact_path = Some(final_path);
        if succeeded == total && !interrupted {
            result.status = ServerStatus::Succeeded;
            result.message = format!("complete: {succeeded}/{total} units");
        } else {
            result.status = ServerStatus::PartialSucceeded;
            result.message = format!("partial success ({succeeded}/{total} units)");
            if interrupted {
                result.message.push_str("; interrupted");
            }
        }
        result.duration = started.elapsed();
        result
    }

    /// Runs one monolithic export straight to `<output_dir>/<base_name>.xlsx`
    pub async fn export_server_normal(
        &self,
        server: &HostName,
        credential: &Credential,
        output_dir: &Path,
        base_name: &str,
    ) -> ServerExportResult {
        let started = Instant::now();

        if self.is_shutdown_requested() {
            let mut result = ServerExportResult::failed(
                server.clone(),
                UnitMode::Normal,
                "interrupted before export",
            );
            result.interrupted = true;
            return result;
        }

        let unit = UnitCatalog::full_export_unit();
        let file_name = naming::final_file_name(base_name);
        tracing::info!(selector = unit.selector, "Starting normal export");

        let outcome = self
            .stage
            .export_to(server, credential, &unit, output_dir, &file_name)
            .await;

        let mut result = ServerExportResult::failed(server.clone(), UnitMode::Normal, "");
        if outcome.success {
            result.status = ServerStatus::Succeeded;
            result.overall_success = true;
            result.final_artifact_path = outcome.artifact_path.clone();
            result.successful_unit_count = 1;
            result.message = "complete: full export".to_string();
        } else {
            result.failed_unit_count = 1;
            result.failed_unit_details = vec![outcome.failure_line()];
            result.message = format!("export failed ({})", outcome.failure_category.label());
        }
        result.unit_outcomes = vec![outcome];
        result.duration = started.elapsed();
        result
    }
}

/// Removes every intermediate of `base_name` and then the parts directory
///
/// Failures are logged; the merged workbook is already in place.
async fn cleanup_intermediates(parts: &Path, output_dir: &Path, base_name: &str, keep: &Path) {
    let dirs = [parts.to_path_buf(), output_dir.to_path_buf()];
    let base_name = base_name.to_string();
    let keep = keep.to_path_buf();
    let removal = tokio::task::spawn_blocking(move || {
        naming::remove_intermediates(&[dirs[0].as_path(), dirs[1].as_path()], &base_name, &keep)
    })
    .await;
    match removal {
        Ok(Ok(removed)) => tracing::debug!(removed, "Removed intermediate artifacts"),
        Ok(Err(e)) => tracing::warn!(error = %e, "Failed to remove intermediate artifacts"),
        Err(e) => tracing::warn!(error = %e, "Intermediate cleanup task failed"),
    }
    match tokio::fs::remove_dir_all(parts).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %parts.display(), error = %e, "Failed to remove parts directory")
        }
    }
}
