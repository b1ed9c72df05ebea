//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// vCenter host name newtype wrapper
///
/// # Examples
///
/// ```
/// use vsweep::domain::ids::HostName;
/// use std::str::FromStr;
///
/// let host = HostName::from_str("vc01.example.com").unwrap();
/// assert_eq!(host.as_str(), "vc01.example.com");
/// assert_eq!(host.file_stem(), "vc01.example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HostName(String);

impl HostName {
    /// Creates a new HostName, trimming surrounding whitespace
    pub fn new(host: impl Into<String>) -> Result<Self, String> {
        let host = host.into();
        let host = host.trim();
        if host.is_empty() {
            return Err("Host name cannot be empty".to_string());
        }
        if host.chars().any(char::is_whitespace) {
            return Err(format!("Host name cannot contain whitespace: '{host}'"));
        }
        Ok(Self(host.to_string()))
    }

    /// Returns the host name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Host name reduced to characters safe in file names
    ///
    /// Anything other than ASCII alphanumerics, `.`, `-` and `_` becomes `_`.
    pub fn file_stem(&self) -> String {
        self.0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HostName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for HostName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HostName> for String {
    fn from(host: HostName) -> Self {
        host.0
    }
}

impl AsRef<str> for HostName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
