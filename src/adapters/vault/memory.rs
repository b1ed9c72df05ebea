//! In-memory vault

use super::CredentialVault;
use crate::domain::{Credential, HostName, VaultError};
use async_trait::async_trait;
use std::collections::HashMap;

/// Vault holding credentials in a map, keyed by lower-cased host and username
#[derive(Debug, Default, Clone)]
pub struct MemoryVault {
    entries: HashMap<(String, String), Credential>,
}

impl MemoryVault {
    /// Creates an empty vault
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a credential for a host (builder style)
    pub fn with_credential(mut self, host: &str, credential: Credential) -> Self {
        let key = (
            host.to_ascii_lowercase(),
            credential.username.to_ascii_lowercase(),
        );
        self.entries.insert(key, credential);
        self
    }
}

#[async_trait]
impl CredentialVault for MemoryVault {
    async fn get_credential(
        &self,
        host: &HostName,
        username: &str,
    ) -> Result<Credential, VaultError> {
        let key = (
            host.as_str().to_ascii_lowercase(),
            username.to_ascii_lowercase(),
        );
        self.entries
            .get(&key)
            .cloned()
            .ok_or_else(|| VaultError::NotFound {
                host: host.to_string(),
                username: username.to_string(),
            })
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
