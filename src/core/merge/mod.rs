//! Workbook merging
//!
//! - [`workbook`] - read, write and list spreadsheet files
//! - [`merger`] - merge unit artifacts with metadata deduplication

pub mod merger;
pub mod workbook;

pub use merger::{ArtifactMerger, MergeReport};
pub use workbook::{list_sheets, read_workbook, write_workbook, Cell, Sheet};
