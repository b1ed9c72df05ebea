//! Exportable inventory units
//!
//! A unit is one independently exportable slice of vCenter inventory (one tab of
//! the exporter's workbook). Units are statically enumerated by
//! [`crate::core::catalog::UnitCatalog`].

use serde::Serialize;
use std::fmt;

/// Timeout class of a unit
///
/// Intensive units walk every VM or every datastore file and routinely need
/// twice the wall-clock budget of ordinary tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeoutClass {
    /// Ordinary unit
    Standard,
    /// Resource-intensive unit
    Intensive,
}

/// One exportable unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ExportUnit {
    /// Logical name, also the worksheet name the exporter writes (e.g. `vInfo`)
    pub logical_name: &'static str,

    /// Command selector passed to the exporter (e.g. `ExportvInfo2xlsx`)
    pub selector: &'static str,

    /// Which timeout budget applies
    pub timeout_class: TimeoutClass,
}

impl ExportUnit {
    /// Creates a standard unit
    pub const fn standard(logical_name: &'static str, selector: &'static str) -> Self {
        Self {
            logical_name,
            selector,
            timeout_class: TimeoutClass::Standard,
        }
    }

    /// Creates a resource-intensive unit
    pub const fn intensive(logical_name: &'static str, selector: &'static str) -> Self {
        Self {
            logical_name,
            selector,
            timeout_class: TimeoutClass::Intensive,
        }
    }

    /// Returns true if the unit uses the intensive timeout budget
    pub fn is_intensive(&self) -> bool {
        self.timeout_class == TimeoutClass::Intensive
    }
}

impl fmt::Display for ExportUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.logical_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_timeout_class() {
        let unit = ExportUnit::standard("vCPU", "ExportvCPU2xlsx");
        assert_eq!(unit.timeout_class, TimeoutClass::Standard);
        assert!(!unit.is_intensive());

        let heavy = ExportUnit::intensive("vFileInfo", "ExportvFileInfo2xlsx");
        assert!(heavy.is_intensive());
    }

    #[test]
    fn test_display_uses_logical_name() {
        let unit = ExportUnit::standard("vHost", "ExportvHost2xlsx");
        assert_eq!(unit.to_string(), "vHost");
    }
}
