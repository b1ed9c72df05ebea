//! Environment variable vault
//!
//! Looks up `<prefix><HOST>` where HOST is the host name upper-cased with every
//! non-alphanumeric character replaced by `_`, e.g.
//! `VSWEEP_PASSWORD_VC01_EXAMPLE_COM`. A companion `<prefix><HOST>_ENCRYPTED`
//! set to `true` marks the value as an encrypted blob.

use super::CredentialVault;
use crate::domain::{Credential, HostName, VaultError};
use async_trait::async_trait;

/// Vault reading passwords from environment variables
#[derive(Debug, Clone)]
pub struct EnvVault {
    prefix: String,
}

impl EnvVault {
    /// Creates a vault with the given variable prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Variable holding the password for a host
    pub fn variable_name(&self, host: &HostName) -> String {
        let suffix: String = host
            .as_str()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{}", self.prefix, suffix)
    }
}

#[async_trait]
impl CredentialVault for EnvVault {
    async fn get_credential(
        &self,
        host: &HostName,
        username: &str,
    ) -> Result<Credential, VaultError> {
        let name = self.variable_name(host);
        let secret = std::env::var(&name)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| VaultError::NotFound {
                host: host.to_string(),
                username: username.to_string(),
            })?;

        let encrypted = std::env::var(format!("{name}_ENCRYPTED"))
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(if encrypted {
            Credential::encrypted(username, secret)
        } else {
            Credential::plain(username, secret)
        })
    }

    fn backend_name(&self) -> &'static str {
        "env"
    }
}
