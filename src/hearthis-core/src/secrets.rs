//! Secure credential storage using the OS keyring.
//!
//! The hearthis backend needs exactly one long-lived secret: the account
//! password used for the startup login. Storing it in the keyring keeps
//! it out of the config file.

use thiserror::Error;

/// Service name used for all hearthis credentials in the OS keyring.
const SERVICE_NAME: &str = "hearthis";

/// Errors that can occur when accessing the credential store.
#[derive(Debug, Error)]
pub enum SecretsError {
    #[error("credential not found: {key}")]
    NotFound { key: String },

    #[error("keyring access denied: {0}")]
    AccessDenied(String),

    #[error("keyring unavailable: {0}")]
    Unavailable(String),

    #[error("keyring error: {0}")]
    Other(String),
}

impl From<keyring::Error> for SecretsError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::NoEntry => SecretsError::NotFound {
                key: "unknown".into(),
            },
            keyring::Error::NoStorageAccess(e) => SecretsError::AccessDenied(e.to_string()),
            keyring::Error::PlatformFailure(e) => SecretsError::Unavailable(e.to_string()),
            other => SecretsError::Other(other.to_string()),
        }
    }
}

pub type SecretsResult<T> = Result<T, SecretsError>;

/// Credential store backed by the OS keyring, keyed per account.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    service: String,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.into(),
        }
    }

    /// Build the keyring user key for an account name.
    fn build_key(username: &str) -> String {
        format!("{}/password", username)
    }

    /// Store the account password in the keyring.
    pub fn store_password(&self, username: &str, password: &str) -> SecretsResult<()> {
        let key = Self::build_key(username);
        let entry = keyring::Entry::new(&self.service, &key)?;
        entry.set_password(password)?;
        tracing::debug!(username, "stored password in keyring");
        Ok(())
    }

    /// Retrieve the account password.
    ///
    /// Returns `SecretsError::NotFound` if no password was stored.
    pub fn get_password(&self, username: &str) -> SecretsResult<String> {
        let key = Self::build_key(username);
        let entry = keyring::Entry::new(&self.service, &key)?;
        match entry.get_password() {
            Ok(secret) => Ok(secret),
            Err(keyring::Error::NoEntry) => Err(SecretsError::NotFound { key }),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the stored password. Returns `Ok(())` even if none existed.
    pub fn delete_password(&self, username: &str) -> SecretsResult<()> {
        let key = Self::build_key(username);
        let entry = keyring::Entry::new(&self.service, &key)?;
        match entry.delete_credential() {
            Ok(()) => {
                tracing::debug!(username, "deleted password from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()), // Already gone, not an error
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: live store/get tests require an actual keyring, which is not
    // available on CI or headless systems; only the pure parts are
    // covered here.

    #[test]
    fn key_building() {
        assert_eq!(
            CredentialStore::build_key("alice@example.com"),
            "alice@example.com/password"
        );
    }
}
