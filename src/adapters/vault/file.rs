//! TOML credential file vault
//!
//! ```toml
//! [[credentials]]
//! host = "vc01.example.com"
//! username = "administrator@vsphere.local"
//! password = "secret"
//!
//! [[credentials]]
//! host = "vc02.example.com"
//! username = "svc-inventory"
//! encrypted_password = "_RVToolsV3PWD..."
//! ```

use super::CredentialVault;
use crate::config::SecretString;
use crate::domain::{Credential, HostName, VaultError};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CredentialFile {
    #[serde(default)]
    credentials: Vec<CredentialEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CredentialEntry {
    host: String,
    username: String,
    #[serde(default)]
    password: Option<SecretString>,
    #[serde(default)]
    encrypted_password: Option<SecretString>,
}

/// Vault backed by a TOML file loaded once at startup
#[derive(Debug)]
pub struct FileVault {
    entries: Vec<CredentialEntry>,
}

impl FileVault {
    /// Loads and validates the credential file
    ///
    /// # Errors
    ///
    /// [`VaultError::Unavailable`] if the file cannot be read,
    /// [`VaultError::InvalidFormat`] if it does not parse or an entry carries
    /// neither or both of `password` / `encrypted_password`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VaultError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            VaultError::Unavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        let vault = Self::from_toml(&contents)?;
        tracing::debug!(
            path = %path.display(),
            entries = vault.entries.len(),
            "Loaded credential file"
        );
        Ok(vault)
    }

    /// Parses credentials from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, VaultError> {
        let file: CredentialFile =
            toml::from_str(contents).map_err(|e| VaultError::InvalidFormat(e.to_string()))?;

        for entry in &file.credentials {
            match (&entry.password, &entry.encrypted_password) {
                (Some(_), None) | (None, Some(_)) => {}
                _ => {
                    return Err(VaultError::InvalidFormat(format!(
                        "entry for {}@{} must set exactly one of password or encrypted_password",
                        entry.username, entry.host
                    )))
                }
            }
        }

        Ok(Self {
            entries: file.credentials,
        })
    }
}

#[async_trait]
impl CredentialVault for FileVault {
    async fn get_credential(
        &self,
        host: &HostName,
        username: &str,
    ) -> Result<Credential, VaultError> {
        let entry = self
            .entries
            .iter()
            .find(|e| {
                e.host.eq_ignore_ascii_case(host.as_str())
                    && e.username.eq_ignore_ascii_case(username)
            })
            .ok_or_else(|| VaultError::NotFound {
                host: host.to_string(),
                username: username.to_string(),
            })?;

        let credential = match (&entry.password, &entry.encrypted_password) {
            (Some(password), _) => {
                Credential::plain(&entry.username, password.expose_secret().as_str())
            }
            (None, Some(blob)) => {
                Credential::encrypted(&entry.username, blob.expose_secret().as_str())
            }
            (None, None) => {
                return Err(VaultError::InvalidFormat(format!(
                    "entry for {}@{} has no password",
                    entry.username, entry.host
                )))
            }
        };
        Ok(credential)
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
