//! Export results and run summary
//!
//! This module defines the per-server result record and the summary of a whole
//! run, which is what reporters render.

use crate::domain::{HostName, UnitMode, UnitOutcome};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Terminal state of one server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerStatus {
    /// Every unit exported and merged
    Succeeded,
    /// A merged workbook exists but some units are missing from it
    PartialSucceeded,
    /// No usable workbook was produced
    Failed,
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerStatus::Succeeded => f.write_str("succeeded"),
            ServerStatus::PartialSucceeded => f.write_str("partial"),
            ServerStatus::Failed => f.write_str("failed"),
        }
    }
}

/// Result of exporting one server
#[derive(Debug, Clone, Serialize)]
pub struct ServerExportResult {
    /// Exported server
    pub host_name: HostName,

    /// Strategy that was used
    pub unit_mode: UnitMode,

    /// Terminal state
    pub status: ServerStatus,

    /// True when a usable workbook was produced
    pub overall_success: bool,

    /// Final workbook, set when `overall_success`
    pub final_artifact_path: Option<PathBuf>,

    /// Units that produced an artifact
    pub successful_unit_count: usize,

    /// Units attempted without an artifact
    pub failed_unit_count: usize,

    /// One line per failed unit, e.g. `vHealth (timeout)`
    pub failed_unit_details: Vec<String>,

    /// Human-readable status message
    pub message: String,

    /// Wall-clock time for the server
    #[serde(rename = "duration_secs", serialize_with = "as_secs_f64")]
    pub duration: Duration,

    /// True if a shutdown request cut the unit loop short
    pub interrupted: bool,

    /// Per-unit outcomes in catalog order
    pub unit_outcomes: Vec<UnitOutcome>,
}

impl ServerExportResult {
    /// A failed result with no units attempted (e.g. missing credential)
    pub fn failed(host_name: HostName, unit_mode: UnitMode, message: impl Into<String>) -> Self {
        Self {
            host_name,
            unit_mode,
            status: ServerStatus::Failed,
            overall_success: false,
            final_artifact_path: None,
            successful_unit_count: 0,
            failed_unit_count: 0,
            failed_unit_details: Vec::new(),
            message: message.into(),
            duration: Duration::ZERO,
            interrupted: false,
            unit_outcomes: Vec::new(),
        }
    }

    /// Units attempted
    pub fn attempted_unit_count(&self) -> usize {
        self.successful_unit_count + self.failed_unit_count
    }

    /// One-line rendering for logs and the console
    pub fn summary_line(&self) -> String {
        format!("{}: {} - {}", self.host_name, self.status, self.message)
    }

    /// Log the result
    pub fn log_result(&self) {
        match self.status {
            ServerStatus::Succeeded => tracing::info!(
                host = %self.host_name,
                status = %self.status,
                units = self.successful_unit_count,
                duration_secs = self.duration.as_secs(),
                path = ?self.final_artifact_path,
                "Server export completed"
            ),
            ServerStatus::PartialSucceeded => tracing::warn!(
                host = %self.host_name,
                status = %self.status,
                successful = self.successful_unit_count,
                failed = self.failed_unit_count,
                failed_units = ?self.failed_unit_details,
                duration_secs = self.duration.as_secs(),
                "Server export partially succeeded"
            ),
            ServerStatus::Failed => tracing::error!(
                host = %self.host_name,
                status = %self.status,
                message = %self.message,
                failed_units = ?self.failed_unit_details,
                duration_secs = self.duration.as_secs(),
                "Server export failed"
            ),
        }
    }
}

/// Summary of one run across all servers
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Unique run identifier
    pub run_id: Uuid,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished
    pub finished_at: DateTime<Utc>,

    /// Per-server results in configuration order
    pub results: Vec<ServerExportResult>,

    /// True if the run stopped early on a shutdown request
    pub interrupted: bool,
}

impl RunSummary {
    /// Starts an empty summary
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: started_at,
            results: Vec::new(),
            interrupted: false,
        }
    }

    /// Records a server result
    pub fn push(&mut self, result: ServerExportResult) {
        self.results.push(result);
    }

    /// Closes the summary
    pub fn finish(mut self, finished_at: DateTime<Utc>, interrupted: bool) -> Self {
        self.finished_at = finished_at;
        self.interrupted = interrupted;
        self
    }

    /// Number of servers with the given status
    pub fn count(&self, status: ServerStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// True if every server fully succeeded and nothing was cut short
    pub fn is_successful(&self) -> bool {
        !self.interrupted && self.results.iter().all(|r| r.status == ServerStatus::Succeeded)
    }

    /// Run wall-clock time
    pub fn duration(&self) -> Duration {
        (self.finished_at - self.started_at)
            .to_std()
            .unwrap_or_default()
    }

    /// Plain-text body used by the console and the summary file
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("vsweep run {}\n", self.run_id));
        out.push_str(&format!(
            "Started:  {}\nFinished: {}\nDuration: {}s\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.duration().as_secs()
        ));
        out.push_str(&format!(
            "Servers:  {} total, {} succeeded, {} partial, {} failed\n",
            self.results.len(),
            self.count(ServerStatus::Succeeded),
            self.count(ServerStatus::PartialSucceeded),
            self.count(ServerStatus::Failed)
        ));
        if self.interrupted {
            out.push_str("Run was interrupted before all servers were processed\n");
        }

        for result in &self.results {
            out.push('\n');
            out.push_str(&result.summary_line());
            out.push('\n');
            if let Some(path) = &result.final_artifact_path {
                out.push_str(&format!("  output: {}\n", path.display()));
            }
            for line in &result.failed_unit_details {
                out.push_str(&format!("  failed: {line}\n"));
            }
        }
        out
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            servers = self.results.len(),
            succeeded = self.count(ServerStatus::Succeeded),
            partial = self.count(ServerStatus::PartialSucceeded),
            failed = self.count(ServerStatus::Failed),
            interrupted = self.interrupted,
            duration_secs = self.duration().as_secs(),
            "Run completed"
        );
    }
}

fn as_secs_f64<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
