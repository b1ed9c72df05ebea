//! Unit artifact merger
//!
//! Combines per-unit workbooks into one. The first source is the base; sheets
//! of later sources are appended in order. The metadata sheet every export
//! carries is kept only the first time it is seen.

use super::workbook::{read_workbook, write_workbook, Sheet, MAX_SHEET_NAME_LEN};
use crate::domain::{Result, VsweepError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// What a successful merge produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Sheet names in the destination, in order
    pub sheets: Vec<String>,
    /// Metadata sheets dropped as duplicates
    pub metadata_skipped: usize,
    /// Sheets written without data rows
    pub empty_sheets: Vec<String>,
    /// Sheets renamed to avoid a clash, as (original, new)
    pub renamed: Vec<(String, String)>,
}

/// Merges unit workbooks into one destination workbook
#[derive(Debug, Clone)]
pub struct ArtifactMerger {
    metadata_sheet: String,
}

impl ArtifactMerger {
    /// Creates a merger that deduplicates `metadata_sheet`
    pub fn new(metadata_sheet: impl Into<String>) -> Self {
        Self {
            metadata_sheet: metadata_sheet.into(),
        }
    }

    /// Name of the deduplicated sheet
    pub fn metadata_sheet(&self) -> &str {
        &self.metadata_sheet
    }

    /// Merges `sources` into `destination`
    ///
    /// Returns true only if the destination exists and reads back afterwards.
    /// Failures are logged, never returned.
    pub fn merge(&self, sources: &[PathBuf], destination: &Path) -> bool {
        match self.try_merge(sources, destination) {
            Ok(report) => {
                tracing::info!(
                    destination = %destination.display(),
                    sources = sources.len(),
                    sheets = report.sheets.len(),
                    metadata_skipped = report.metadata_skipped,
                    "Merged unit artifacts"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    destination = %destination.display(),
                    sources = sources.len(),
                    error = %e,
                    "Merge failed"
                );
                false
            }
        }
    }

    /// Runs [`merge`](Self::merge) on the blocking thread pool
    pub async fn merge_blocking(&self, sources: Vec<PathBuf>, destination: PathBuf) -> bool {
        let merger = self.clone();
        match tokio::task::spawn_blocking(move || merger.merge(&sources, &destination)).await {
            Ok(merged) => merged,
            Err(e) => {
                tracing::error!(error = %e, "Merge task failed");
                false
            }
        }
    }

    /// Merges and reports what was written
    ///
    /// # Errors
    ///
    /// Fails on empty `sources`, on any read or write error, and when the
    /// written destination cannot be read back. A partially written
    /// destination is removed.
    pub fn try_merge(&self, sources: &[PathBuf], destination: &Path) -> Result<MergeReport> {
        if sources.is_empty() {
            return Err(VsweepError::Workbook("no source artifacts to merge".to_string()));
        }

        let mut report = MergeReport::default();
        let mut merged: Vec<Sheet> = Vec::new();
        let mut taken: HashSet<String> = HashSet::new();
        let mut metadata_seen = false;

        for source in sources {
            let sheets = read_workbook(source).map_err(|e| {
                VsweepError::Workbook(format!("cannot read {}: {e}", source.display()))
            })?;

            for mut sheet in sheets {
                if sheet.name.eq_ignore_ascii_case(&self.metadata_sheet) {
                    if metadata_seen {
                        report.metadata_skipped += 1;
                        continue;
                    }
                    metadata_seen = true;
                } else if sheet.is_empty() {
                    tracing::warn!(
                        sheet = %sheet.name,
                        source = %source.display(),
                        "Sheet has no data rows"
                    );
                    report.empty_sheets.push(sheet.name.clone());
                }

                let name = unique_sheet_name(&sheet.name, &taken);
                if name != sheet.name {
                    tracing::warn!(
                        sheet = %sheet.name,
                        renamed = %name,
                        source = %source.display(),
                        "Duplicate sheet name renamed"
                    );
                    report.renamed.push((sheet.name.clone(), name.clone()));
                    sheet.name = name;
                }

                taken.insert(sheet.name.to_lowercase());
                report.sheets.push(sheet.name.clone());
                merged.push(sheet);
            }
        }

        if let Err(e) = write_workbook(destination, &merged) {
            let _ = std::fs::remove_file(destination);
            return Err(e);
        }

        // The destination must be readable before intermediates are dropped
        super::workbook::list_sheets(destination).map_err(|e| {
            VsweepError::Workbook(format!(
                "merged workbook {} cannot be read back: {e}",
                destination.display()
            ))
        })?;

        Ok(report)
    }
}

/// First free variant of `name`: `name`, `name (2)`, `name (3)`, ...
///
/// Worksheet names compare case-insensitively and are capped at 31 chars, so
/// the base is shortened to make room for the suffix.
fn unique_sheet_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(&name.to_lowercase()) {
        return name.to_string();
    }
    let mut n = 2;
    loop {
        let suffix = format!(" ({n})");
        let room = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
        let base: String = name.chars().take(room).collect();
        let candidate = format!("{base}{suffix}");
        if !taken.contains(&candidate.to_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}
