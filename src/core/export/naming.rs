//! Artifact naming and intermediate cleanup
//!
//! Every on-disk name is derived from the server's base name, so the merger and
//! the cleanup pass can find files without remembering what was written:
//!
//! - intermediate: `<dir>/<base_name>__<logical_name>.xlsx`
//! - temp dir:     `<output_dir>/.<base_name>.parts`
//! - final:        `<output_dir>/<base_name>.xlsx`

use crate::domain::{ExportUnit, HostName, Result, VsweepError};
use chrono::{DateTime, TimeZone};
use regex::Regex;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Spreadsheet extension written by the exporter
pub const ARTIFACT_EXTENSION: &str = "xlsx";

/// Separator between base name and unit name in intermediate files
pub const UNIT_SEPARATOR: &str = "__";

/// Base name for one server in one run: `<host stem>_<YYYYMMDD-HHMMSS>`
pub fn base_name<Tz>(host: &HostName, run_started: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{}_{}",
        host.file_stem(),
        run_started.format("%Y%m%d-%H%M%S")
    )
}

/// File name of one unit's intermediate artifact
pub fn unit_file_name(base_name: &str, unit: &ExportUnit) -> String {
    format!(
        "{base_name}{UNIT_SEPARATOR}{}.{ARTIFACT_EXTENSION}",
        unit.logical_name
    )
}

/// Full path of one unit's intermediate artifact
pub fn unit_artifact_path(dir: &Path, base_name: &str, unit: &ExportUnit) -> PathBuf {
    dir.join(unit_file_name(base_name, unit))
}

/// File name of the server's final workbook
pub fn final_file_name(base_name: &str) -> String {
    format!("{base_name}.{ARTIFACT_EXTENSION}")
}

/// Full path of the server's final workbook
pub fn final_artifact_path(output_dir: &Path, base_name: &str) -> PathBuf {
    output_dir.join(final_file_name(base_name))
}

/// Isolated directory holding one server's intermediates
pub fn parts_dir(output_dir: &Path, base_name: &str) -> PathBuf {
    output_dir.join(format!(".{base_name}.parts"))
}

/// Pattern matching every intermediate artifact of a base name
pub fn intermediate_pattern(base_name: &str) -> Result<Regex> {
    let pattern = format!(
        r"^{}{}.+\.{}$",
        regex::escape(base_name),
        UNIT_SEPARATOR,
        ARTIFACT_EXTENSION
    );
    Regex::new(&pattern)
        .map_err(|e| VsweepError::Other(format!("invalid cleanup pattern {pattern}: {e}")))
}

/// Deletes intermediates of `base_name` found in `dirs`, never touching `keep`
///
/// Missing directories are skipped. Returns the number of files removed.
pub fn remove_intermediates(dirs: &[&Path], base_name: &str, keep: &Path) -> Result<usize> {
    let pattern = intermediate_pattern(base_name)?;
    let mut removed = 0;

    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || path == keep {
                continue;
            }
            let matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| pattern.is_match(n));
            if matches {
                std::fs::remove_file(&path)?;
                tracing::debug!(path = %path.display(), "Removed intermediate artifact");
                removed += 1;
            }
        }
    }

    Ok(removed)
}
