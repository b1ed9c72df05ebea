//! Result reporters
//!
//! The coordinator hands every [`ServerExportResult`] and the final
//! [`RunSummary`] to a [`ResultReporter`]. Reporter failures are logged by the
//! caller and never abort a run.

use crate::config::ReportingConfig;
use crate::core::export::summary::{RunSummary, ServerExportResult, ServerStatus};
use crate::domain::{Result, VsweepError};
use async_trait::async_trait;
use std::path::PathBuf;

/// Receives export results
#[async_trait]
pub trait ResultReporter: Send + Sync {
    /// Called once per server, right after it finishes
    async fn report_server(&self, result: &ServerExportResult) -> Result<()>;

    /// Called once at the end of the run
    async fn report_run(&self, summary: &RunSummary) -> Result<()>;
}

/// Writes results to the structured log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

#[async_trait]
impl ResultReporter for LogReporter {
    async fn report_server(&self, result: &ServerExportResult) -> Result<()> {
        result.log_result();
        Ok(())
    }

    async fn report_run(&self, summary: &RunSummary) -> Result<()> {
        summary.log_summary();
        Ok(())
    }
}

/// Prints results for an operator watching the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

#[async_trait]
impl ResultReporter for ConsoleReporter {
    async fn report_server(&self, result: &ServerExportResult) -> Result<()> {
        let marker = match result.status {
            ServerStatus::Succeeded => "✅",
            ServerStatus::PartialSucceeded => "⚠️ ",
            ServerStatus::Failed => "❌",
        };
        println!("{marker} {}", result.summary_line());
        if let Some(path) = &result.final_artifact_path {
            println!("   Output: {}", path.display());
        }
        for line in &result.failed_unit_details {
            println!("   - {line}");
        }
        Ok(())
    }

    async fn report_run(&self, summary: &RunSummary) -> Result<()> {
        println!();
        println!("📊 Run Summary:");
        for line in summary.render_text().lines() {
            println!("  {line}");
        }
        println!();
        Ok(())
    }
}

/// Writes the run summary as JSON
#[derive(Debug, Clone)]
pub struct JsonFileReporter {
    path: PathBuf,
}

impl JsonFileReporter {
    /// Creates a reporter writing to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ResultReporter for JsonFileReporter {
    async fn report_server(&self, _result: &ServerExportResult) -> Result<()> {
        Ok(())
    }

    async fn report_run(&self, summary: &RunSummary) -> Result<()> {
        let json = serde_json::to_string_pretty(summary)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            VsweepError::Reporting(format!("cannot write {}: {e}", self.path.display()))
        })?;
        tracing::info!(path = %self.path.display(), "Run summary written");
        Ok(())
    }
}

/// Fans results out to several reporters
///
/// Every reporter is called even if an earlier one fails; the first error is
/// returned.
#[derive(Default)]
pub struct CompositeReporter {
    reporters: Vec<Box<dyn ResultReporter>>,
}

impl CompositeReporter {
    /// Creates an empty composite
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reporter (builder style)
    pub fn with(mut self, reporter: impl ResultReporter + 'static) -> Self {
        self.reporters.push(Box::new(reporter));
        self
    }

    /// Number of reporters
    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    /// True if there are no reporters
    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

#[async_trait]
impl ResultReporter for CompositeReporter {
    async fn report_server(&self, result: &ServerExportResult) -> Result<()> {
        let mut first_error = None;
        for reporter in &self.reporters {
            if let Err(e) = reporter.report_server(result).await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    async fn report_run(&self, summary: &RunSummary) -> Result<()> {
        let mut first_error = None;
        for reporter in &self.reporters {
            if let Err(e) = reporter.report_run(summary).await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Builds the reporter chain selected by configuration
///
/// The log reporter is always present.
pub fn create_reporter(config: &ReportingConfig) -> CompositeReporter {
    let mut reporter = CompositeReporter::new().with(LogReporter);
    if config.console {
        reporter = reporter.with(ConsoleReporter);
    }
    if let Some(path) = &config.summary_json {
        reporter = reporter.with(JsonFileReporter::new(path));
    }
    reporter
}
