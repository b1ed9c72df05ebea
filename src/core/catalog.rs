//! Unit catalog
//!
//! Static registry of every inventory unit the exporter can produce on its own.
//! The order here is the processing order and the merge order, so it is also
//! the tab order of the merged workbook.

use crate::domain::ExportUnit;

const FULL_UNITS: [ExportUnit; 26] = [
    ExportUnit::intensive("vInfo", "ExportvInfo2xlsx"),
    ExportUnit::standard("vCPU", "ExportvCPU2xlsx"),
    ExportUnit::standard("vMemory", "ExportvMemory2xlsx"),
    ExportUnit::standard("vDisk", "ExportvDisk2xlsx"),
    ExportUnit::standard("vPartition", "ExportvPartition2xlsx"),
    ExportUnit::standard("vNetwork", "ExportvNetwork2xlsx"),
    ExportUnit::standard("vCD", "ExportvCD2xlsx"),
    ExportUnit::standard("vUSB", "ExportvUSB2xlsx"),
    ExportUnit::standard("vSnapshot", "ExportvSnapshot2xlsx"),
    ExportUnit::standard("vTools", "ExportvTools2xlsx"),
    ExportUnit::standard("vSource", "ExportvSource2xlsx"),
    ExportUnit::standard("vRP", "ExportvRP2xlsx"),
    ExportUnit::standard("vCluster", "ExportvCluster2xlsx"),
    ExportUnit::standard("vHost", "ExportvHost2xlsx"),
    ExportUnit::standard("vHBA", "ExportvHBA2xlsx"),
    ExportUnit::standard("vNIC", "ExportvNIC2xlsx"),
    ExportUnit::standard("vSwitch", "ExportvSwitch2xlsx"),
    ExportUnit::standard("vPort", "ExportvPort2xlsx"),
    ExportUnit::standard("dvSwitch", "ExportdvSwitch2xlsx"),
    ExportUnit::standard("dvPort", "ExportdvPort2xlsx"),
    ExportUnit::standard("vSC_VMK", "ExportvSC+VMK2xlsx"),
    ExportUnit::standard("vDatastore", "ExportvDatastore2xlsx"),
    ExportUnit::standard("vMultiPath", "ExportvMultiPath2xlsx"),
    ExportUnit::standard("vLicense", "ExportvLicense2xlsx"),
    ExportUnit::intensive("vFileInfo", "ExportvFileInfo2xlsx"),
    ExportUnit::intensive("vHealth", "ExportvHealth2xlsx"),
];

/// Units kept in fast/test mode
const FAST_UNIT_NAMES: [&str; 3] = ["vInfo", "vHost", "vLicense"];

/// Monolithic "every tab" export used by normal mode
const FULL_EXPORT_UNIT: ExportUnit = ExportUnit::intensive("all", "ExportAll2xlsx");

/// Ordered set of units for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitCatalog {
    units: Vec<ExportUnit>,
}

impl UnitCatalog {
    /// The complete 26-unit catalog
    pub fn full() -> Self {
        Self {
            units: FULL_UNITS.to_vec(),
        }
    }

    /// The reduced catalog for development runs
    pub fn fast() -> Self {
        Self {
            units: FULL_UNITS
                .iter()
                .filter(|u| FAST_UNIT_NAMES.contains(&u.logical_name))
                .copied()
                .collect(),
        }
    }

    /// Full or fast catalog
    pub fn for_mode(fast: bool) -> Self {
        if fast {
            Self::fast()
        } else {
            Self::full()
        }
    }

    /// Catalog holding exactly one unit
    pub fn single(unit: ExportUnit) -> Self {
        Self { units: vec![unit] }
    }

    /// The monolithic export unit
    pub fn full_export_unit() -> ExportUnit {
        FULL_EXPORT_UNIT
    }

    /// Units in processing order
    pub fn units(&self) -> &[ExportUnit] {
        &self.units
    }

    /// Looks a unit up by logical name, ignoring ASCII case
    pub fn find_unit(&self, logical_name: &str) -> Option<&ExportUnit> {
        self.units
            .iter()
            .find(|u| u.logical_name.eq_ignore_ascii_case(logical_name))
    }

    /// Number of units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True if the catalog holds no units
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
