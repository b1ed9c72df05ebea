//! Shared fixtures for integration tests
//!
//! [`ScriptedRunner`] stands in for the exporter: for every selector it either
//! writes a workbook with one data sheet plus the metadata sheet, or returns
//! the scripted failure.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use vsweep::adapters::process::{ProcessExit, ProcessInvocation, ProcessRunner};
use vsweep::core::catalog::UnitCatalog;
use vsweep::core::export::{
    ChunkedExportOrchestrator, ExitCodePolicy, TimeoutPolicy, UnitExportStage,
};
use vsweep::core::merge::{write_workbook, ArtifactMerger, Cell, Sheet};
use vsweep::domain::{Credential, HostName, Result};

pub const METADATA_SHEET: &str = "vMetaData";

/// What the fake exporter does for one selector
#[derive(Debug, Clone)]
pub enum Script {
    /// Exit with this code without writing anything
    Exit(i32),
    /// Report a timeout kill
    Timeout,
    /// Exit 0 without writing the file
    NoArtifact,
    /// Exit 0 after writing bytes that are not a workbook
    Garbage,
}

#[derive(Default)]
pub struct ScriptedRunner {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
    shutdown_after: Option<(usize, watch::Sender<bool>)>,
    completed: AtomicUsize,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the unit with this logical name
    pub fn with(mut self, logical_name: &str, script: Script) -> Self {
        let unit = UnitCatalog::full()
            .find_unit(logical_name)
            .copied()
            .or_else(|| {
                let all = UnitCatalog::full_export_unit();
                (all.logical_name == logical_name).then_some(all)
            })
            .unwrap_or_else(|| panic!("unknown unit {logical_name}"));
        self.scripts.insert(unit.selector.to_string(), script);
        self
    }

    /// Scripts every unit of the full catalog
    pub fn all(mut self, script: Script) -> Self {
        for unit in UnitCatalog::full().units() {
            self.scripts.insert(unit.selector.to_string(), script.clone());
        }
        self
    }

    /// Flips the shutdown flag once `count` invocations have finished
    pub fn shutdown_after(mut self, count: usize, sender: watch::Sender<bool>) -> Self {
        self.shutdown_after = Some((count, sender));
        self
    }

    /// Selectors in invocation order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn finish(&self) {
        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((count, sender)) = &self.shutdown_after {
            if done >= *count {
                let _ = sender.send(true);
            }
        }
    }
}

/// Data sheet name the fake exporter writes for a selector
pub fn sheet_for_selector(selector: &str) -> String {
    selector
        .trim_start_matches("Export")
        .trim_end_matches("2xlsx")
        .to_string()
}

/// Writes a unit-shaped workbook: one data sheet plus metadata
pub fn write_unit_workbook(path: &Path, data_sheet: &str) {
    write_workbook(
        path,
        &[
            Sheet::new(
                data_sheet,
                vec![
                    vec![Cell::Text("Name".into()), Cell::Text("Value".into())],
                    vec![Cell::Text("row".into()), Cell::Number(1.0)],
                ],
            ),
            Sheet::new(
                METADATA_SHEET,
                vec![
                    vec![Cell::Text("Version".into())],
                    vec![Cell::Text("4.4".into())],
                ],
            ),
        ],
    )
    .unwrap();
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, invocation: &ProcessInvocation, _timeout: Duration) -> Result<ProcessExit> {
        // -s host -u user -p pw -c selector -d dir -f file
        let selector = invocation.args[7].clone();
        let artifact = PathBuf::from(&invocation.args[9]).join(&invocation.args[11]);
        self.calls.lock().unwrap().push(selector.clone());

        let exit = match self.scripts.get(&selector) {
            Some(Script::Exit(code)) => ProcessExit::exited(*code, Duration::from_millis(1)),
            Some(Script::Timeout) => ProcessExit::timed_out(Duration::from_millis(1)),
            Some(Script::NoArtifact) => ProcessExit::exited(0, Duration::from_millis(1)),
            Some(Script::Garbage) => {
                std::fs::write(&artifact, b"not a workbook")?;
                ProcessExit::exited(0, Duration::from_millis(1))
            }
            None => {
                write_unit_workbook(&artifact, &sheet_for_selector(&selector));
                ProcessExit::exited(0, Duration::from_millis(1))
            }
        };
        self.finish();
        Ok(exit)
    }
}

pub fn host() -> HostName {
    HostName::new("vc01.example.com").unwrap()
}

pub fn credential() -> Credential {
    Credential::plain("administrator@vsphere.local", "secret")
}

pub fn orchestrator(runner: Arc<ScriptedRunner>) -> ChunkedExportOrchestrator {
    let stage = UnitExportStage::new(
        runner,
        "/opt/exporter/export",
        TimeoutPolicy::default(),
        ExitCodePolicy::default(),
    );
    ChunkedExportOrchestrator::new(stage, ArtifactMerger::new(METADATA_SHEET))
}

/// Files directly inside `dir`, sorted by name
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
