//! vCenter login credentials

use crate::config::secret::{secret_string, SecretString};
use secrecy::ExposeSecret;

/// Login credential for one vCenter account
///
/// The secret is either a plaintext password or a blob already encrypted for
/// the exporter. Either way it is handed to the exporter untouched; the flag
/// only changes how it is described in logs.
#[derive(Debug, Clone)]
pub struct Credential {
    /// Account name
    pub username: String,

    /// Password or encrypted password blob
    pub secret: SecretString,

    /// Whether `secret` is an encrypted blob
    pub encrypted: bool,
}

impl Credential {
    /// Creates a plaintext credential
    pub fn plain(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret_string(password.into()),
            encrypted: false,
        }
    }

    /// Creates a credential carrying an encrypted password blob
    pub fn encrypted(username: impl Into<String>, blob: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret_string(blob.into()),
            encrypted: true,
        }
    }

    /// Exposes the secret for the command line of the exporter
    pub fn expose(&self) -> &str {
        self.secret.expose_secret().as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::plain("admin", "hunter2");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("admin"));
    }

    #[test]
    fn test_encrypted_flag() {
        assert!(!Credential::plain("a", "b").encrypted);
        let credential = Credential::encrypted("a", "_Enc:abc");
        assert!(credential.encrypted);
        assert_eq!(credential.expose(), "_Enc:abc");
    }
}
