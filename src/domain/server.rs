//! Export targets
//!
//! A [`ServerTarget`] is the normalized form of one host-list entry. It is built
//! once when configuration is loaded and never mutated afterwards.

use super::ids::HostName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a server is exported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitMode {
    /// One monolithic export of every tab
    Normal,
    /// One export per catalog unit, merged afterwards
    Chunked,
    /// A single named unit only
    SingleUnit(String),
}

impl fmt::Display for UnitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitMode::Normal => f.write_str("normal"),
            UnitMode::Chunked => f.write_str("chunked"),
            UnitMode::SingleUnit(unit) => write!(f, "single unit ({unit})"),
        }
    }
}

/// One server to export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerTarget {
    /// vCenter host name
    pub host_name: HostName,

    /// Account used to log in and to look the credential up in the vault
    pub username: String,

    /// Export strategy
    pub unit_mode: UnitMode,
}

impl ServerTarget {
    /// Creates a new server target
    pub fn new(host_name: HostName, username: impl Into<String>, unit_mode: UnitMode) -> Self {
        Self {
            host_name,
            username: username.into(),
            unit_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_mode_display() {
        assert_eq!(UnitMode::Normal.to_string(), "normal");
        assert_eq!(UnitMode::Chunked.to_string(), "chunked");
        assert_eq!(
            UnitMode::SingleUnit("vLicense".to_string()).to_string(),
            "single unit (vLicense)"
        );
    }

    #[test]
    fn test_server_target_new() {
        let target = ServerTarget::new(
            HostName::new("vc01").unwrap(),
            "administrator@vsphere.local",
            UnitMode::Chunked,
        );
        assert_eq!(target.host_name.as_str(), "vc01");
        assert_eq!(target.username, "administrator@vsphere.local");
        assert_eq!(target.unit_mode, UnitMode::Chunked);
    }
}
