//! Per-unit export outcomes
//!
//! Every attempt to export one unit ends in exactly one [`UnitOutcome`]. Failures
//! of the external tool are values here, never errors.

use super::ids::HostName;
use super::unit::ExportUnit;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Why a unit export failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// The unit succeeded
    None,
    /// The exporter reported it could not connect to vCenter
    ConnectionFailed,
    /// The exporter terminated abnormally
    ProcessCrashed,
    /// The exporter exceeded its wall-clock budget and was killed
    Timeout,
    /// Any other non-zero exit code
    OtherExitCode,
    /// Exit code 0 but no output file
    ArtifactMissing,
    /// Fault inside vsweep itself (e.g. the exporter could not be spawned)
    Exception,
}

impl FailureCategory {
    /// Human-readable label used in run reports
    pub fn label(&self) -> &'static str {
        match self {
            FailureCategory::None => "ok",
            FailureCategory::ConnectionFailed => "connection failed",
            FailureCategory::ProcessCrashed => "process crashed",
            FailureCategory::Timeout => "timeout",
            FailureCategory::OtherExitCode => "exit code",
            FailureCategory::ArtifactMissing => "artifact missing",
            FailureCategory::Exception => "exception",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of exporting one unit for one server
#[derive(Debug, Clone, Serialize)]
pub struct UnitOutcome {
    /// The unit that was exported
    pub unit: ExportUnit,

    /// Server the unit was exported from
    pub server_host_name: HostName,

    /// True only if the exporter exited 0 AND the artifact exists
    pub success: bool,

    /// Exit code, `None` if the process was killed or died from a signal
    pub exit_code: Option<i32>,

    /// Artifact location, set on success
    pub artifact_path: Option<PathBuf>,

    /// Failure classification
    pub failure_category: FailureCategory,

    /// Wall-clock time spent on the unit
    pub elapsed: Duration,

    /// Extra diagnostic text for exceptions
    pub detail: Option<String>,
}

impl UnitOutcome {
    /// Builds a successful outcome
    pub fn succeeded(
        unit: ExportUnit,
        server_host_name: HostName,
        artifact_path: PathBuf,
        elapsed: Duration,
    ) -> Self {
        Self {
            unit,
            server_host_name,
            success: true,
            exit_code: Some(0),
            artifact_path: Some(artifact_path),
            failure_category: FailureCategory::None,
            elapsed,
            detail: None,
        }
    }

    /// Builds a failed outcome
    pub fn failed(
        unit: ExportUnit,
        server_host_name: HostName,
        failure_category: FailureCategory,
        exit_code: Option<i32>,
        elapsed: Duration,
    ) -> Self {
        Self {
            unit,
            server_host_name,
            success: false,
            exit_code,
            artifact_path: None,
            failure_category,
            elapsed,
            detail: None,
        }
    }

    /// Attaches diagnostic text
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// One report line, e.g. `vHealth (timeout)` or `vCPU (exit code 3)`
    pub fn failure_line(&self) -> String {
        match (self.failure_category, self.exit_code) {
            (FailureCategory::OtherExitCode, Some(code)) => {
                format!("{} (exit code {code})", self.unit.logical_name)
            }
            (category, _) => format!("{} ({})", self.unit.logical_name, category.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn unit() -> ExportUnit {
        ExportUnit::standard("vCPU", "ExportvCPU2xlsx")
    }

    fn host() -> HostName {
        HostName::new("vc01").unwrap()
    }

    #[test]
    fn test_succeeded_sets_artifact() {
        let outcome = UnitOutcome::succeeded(
            unit(),
            host(),
            PathBuf::from("/tmp/a.xlsx"),
            Duration::from_secs(1),
        );
        assert!(outcome.success);
        assert_eq!(outcome.exit_code, Some(0));
        assert!(outcome.artifact_path.is_some());
        assert_eq!(outcome.failure_category, FailureCategory::None);
    }

    #[test_case(FailureCategory::Timeout, None, "vCPU (timeout)")]
    #[test_case(FailureCategory::ConnectionFailed, Some(-1), "vCPU (connection failed)")]
    #[test_case(FailureCategory::ProcessCrashed, Some(-1073741819), "vCPU (process crashed)")]
    #[test_case(FailureCategory::OtherExitCode, Some(3), "vCPU (exit code 3)")]
    #[test_case(FailureCategory::ArtifactMissing, Some(0), "vCPU (artifact missing)")]
    #[test_case(FailureCategory::Exception, None, "vCPU (exception)")]
    fn test_failure_line(category: FailureCategory, code: Option<i32>, expected: &str) {
        let outcome = UnitOutcome::failed(unit(), host(), category, code, Duration::ZERO);
        assert!(!outcome.success);
        assert!(outcome.artifact_path.is_none());
        assert_eq!(outcome.failure_line(), expected);
    }

    #[test]
    fn test_with_detail() {
        let outcome = UnitOutcome::failed(
            unit(),
            host(),
            FailureCategory::Exception,
            None,
            Duration::ZERO,
        )
        .with_detail("spawn failed");
        assert_eq!(outcome.detail.as_deref(), Some("spawn failed"));
    }
}
