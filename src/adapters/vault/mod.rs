//! Credential vault adapters
//!
//! The export engine only ever reads credentials. Rotation and storage are
//! handled by separate tooling, so the trait exposes lookups and nothing else.

pub mod env;
pub mod file;
pub mod memory;

use crate::config::{VaultBackend, VaultConfig};
use crate::domain::{Credential, HostName, VaultError};
use async_trait::async_trait;

pub use env::EnvVault;
pub use file::FileVault;
pub use memory::MemoryVault;

/// Read-only credential source
#[async_trait]
pub trait CredentialVault: Send + Sync {
    /// Fetches the credential for a host/username pair
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::NotFound`] when nothing is stored for the pair.
    async fn get_credential(
        &self,
        host: &HostName,
        username: &str,
    ) -> Result<Credential, VaultError>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Creates the vault selected by configuration
///
/// # Errors
///
/// Returns an error if the backend cannot be opened. Callers treat this as a
/// setup failure and abort the run before any server is processed.
pub fn create_vault(config: &VaultConfig) -> Result<Box<dyn CredentialVault>, VaultError> {
    let vault: Box<dyn CredentialVault> = match config.backend {
        VaultBackend::File => Box::new(FileVault::open(&config.path)?),
        VaultBackend::Env => Box::new(EnvVault::new(config.env_prefix.clone())),
    };
    tracing::info!(backend = vault.backend_name(), "Credential vault opened");
    Ok(vault)
}
