//! Timeout and exit-code policies
//!
//! The numeric exit codes are specific to one exporter version. They live in
//! configuration and are only interpreted here.

use crate::adapters::process::ProcessExit;
use crate::domain::{ExportUnit, FailureCategory, TimeoutClass};
use std::collections::BTreeMap;
use std::time::Duration;

/// Wall-clock budget per unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutPolicy {
    standard: Duration,
    intensive: Duration,
    overrides: BTreeMap<String, Duration>,
}

impl TimeoutPolicy {
    /// Creates a policy with class budgets and no overrides
    pub fn new(standard: Duration, intensive: Duration) -> Self {
        Self {
            standard,
            intensive,
            overrides: BTreeMap::new(),
        }
    }

    /// Sets a per-unit override keyed by logical name
    pub fn with_override(mut self, logical_name: impl Into<String>, timeout: Duration) -> Self {
        self.overrides.insert(logical_name.into(), timeout);
        self
    }

    /// Budget for one unit: override first, then the unit's class
    pub fn timeout_for(&self, unit: &ExportUnit) -> Duration {
        if let Some(timeout) = self.overrides.get(unit.logical_name) {
            return *timeout;
        }
        match unit.timeout_class {
            TimeoutClass::Standard => self.standard,
            TimeoutClass::Intensive => self.intensive,
        }
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(10 * 60), Duration::from_secs(20 * 60))
    }
}

/// Maps exporter exit status to a failure category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitCodePolicy {
    connection_failed_codes: Vec<i32>,
    crash_codes: Vec<i32>,
}

impl ExitCodePolicy {
    /// Creates a policy from explicit code lists
    pub fn new(connection_failed_codes: Vec<i32>, crash_codes: Vec<i32>) -> Self {
        Self {
            connection_failed_codes,
            crash_codes,
        }
    }

    /// Classifies a finished process
    ///
    /// Returns [`FailureCategory::None`] for exit code 0. The caller still has
    /// to confirm the artifact exists before calling the unit a success.
    pub fn classify(&self, exit: &ProcessExit) -> FailureCategory {
        if exit.timed_out {
            return FailureCategory::Timeout;
        }
        match exit.exit_code {
            // Terminated by a signal
            None => FailureCategory::ProcessCrashed,
            Some(0) => FailureCategory::None,
            Some(code) if self.connection_failed_codes.contains(&code) => {
                FailureCategory::ConnectionFailed
            }
            Some(code) if self.crash_codes.contains(&code) => FailureCategory::ProcessCrashed,
            Some(_) => FailureCategory::OtherExitCode,
        }
    }
}

impl Default for ExitCodePolicy {
    fn default() -> Self {
        Self::new(vec![-1], vec![-1073741819])
    }
}
