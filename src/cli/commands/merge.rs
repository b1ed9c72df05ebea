//! Merge command implementation
//!
//! Runs the artifact merger on files given on the command line. Used to finish
//! a server by hand after a failed merge left its parts behind.

use crate::core::merge::ArtifactMerger;
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the merge command
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Destination workbook
    #[arg(short, long)]
    pub output: String,

    /// Name of the sheet kept only once
    #[arg(long, default_value = "vMetaData")]
    pub metadata_sheet: String,

    /// Source workbooks, merged in the order given
    #[arg(required = true)]
    pub sources: Vec<String>,
}

impl MergeArgs {
    /// Execute the merge command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let sources: Vec<PathBuf> = self.sources.iter().map(PathBuf::from).collect();
        let destination = Path::new(&self.output);

        tracing::info!(
            sources = sources.len(),
            destination = %destination.display(),
            "Merging workbooks"
        );

        let merger = ArtifactMerger::new(self.metadata_sheet.clone());
        match merger.try_merge(&sources, destination) {
            Ok(report) => {
                println!("✅ Merged {} file(s) into {}", sources.len(), self.output);
                println!("  Sheets: {}", report.sheets.join(", "));
                if report.metadata_skipped > 0 {
                    println!(
                        "  Duplicate {} sheets skipped: {}",
                        merger.metadata_sheet(),
                        report.metadata_skipped
                    );
                }
                for sheet in &report.empty_sheets {
                    println!("  ⚠️  {sheet} has no data rows");
                }
                for (from, to) in &report.renamed {
                    println!("  ⚠️  {from} renamed to {to}");
                }
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Merge failed");
                println!("❌ Merge failed");
                println!("   Error: {e}");
                Ok(1)
            }
        }
    }
}
