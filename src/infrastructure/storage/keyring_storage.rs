//! Keyring-based refresh token storage.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::entities::Token;
use crate::domain::errors::{AuthError, SecretError};
use crate::domain::ports::SessionStoragePort;

const KEYRING_SERVICE: &str = "backdesk";
const KEYRING_USER: &str = "refresh-token";

/// System keyring session storage adapter.
pub struct KeyringSessionStorage {
    service: String,
    user: String,
}

impl KeyringSessionStorage {
    /// Creates new storage with default names.
    #[must_use]
    pub fn new() -> Self {
        Self::with_names(KEYRING_SERVICE, KEYRING_USER)
    }

    /// Creates storage with custom names.
    #[must_use]
    pub fn with_names(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }

    fn entry(&self) -> Result<Entry, SecretError> {
        Entry::new(&self.service, &self.user).map_err(|e| match e {
            keyring::Error::NoStorageAccess(_) | keyring::Error::PlatformFailure(_) => {
                SecretError::NotAvailable(e.to_string())
            }
            other => SecretError::AccessFailed(other.to_string()),
        })
    }
}

impl Default for KeyringSessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStoragePort for KeyringSessionStorage {
    async fn get_refresh_token(&self) -> Result<Option<Token>, AuthError> {
        debug!(service = %self.service, "Retrieving refresh token from keyring");

        let entry = self.entry()?;

        match entry.get_password() {
            Ok(secret) => {
                debug!("Refresh token found in keyring");
                Ok(Token::new(secret))
            }
            Err(keyring::Error::NoEntry) => {
                debug!("No refresh token stored in keyring");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Failed to retrieve refresh token from keyring");
                Err(SecretError::RetrievalFailed(e.to_string()).into())
            }
        }
    }

    async fn store_refresh_token(&self, token: &Token) -> Result<(), AuthError> {
        debug!(service = %self.service, "Storing refresh token in keyring");

        let entry = self.entry()?;

        entry.set_password(token.as_str()).map_err(|e| {
            warn!(error = %e, "Failed to store refresh token in keyring");
            SecretError::StorageFailed(e.to_string())
        })?;

        debug!("Refresh token stored successfully");
        Ok(())
    }

    async fn delete_refresh_token(&self) -> Result<(), AuthError> {
        debug!(service = %self.service, "Deleting refresh token from keyring");

        let entry = self.entry()?;

        match entry.delete_credential() {
            Ok(()) => {
                debug!("Refresh token deleted from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => {
                debug!("No refresh token to delete");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to delete refresh token from keyring");
                Err(SecretError::DeletionFailed(e.to_string()).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires system keyring"]
    async fn test_store_and_retrieve_refresh_token() {
        let storage = KeyringSessionStorage::with_names("backdesk-test", "test-refresh");
        let token = Token::new_unchecked("v1.refresh-token-for-tests");

        storage.store_refresh_token(&token).await.unwrap();

        let retrieved = storage.get_refresh_token().await.unwrap();
        assert_eq!(retrieved.unwrap().as_str(), token.as_str());

        storage.delete_refresh_token().await.unwrap();
        assert!(!storage.has_refresh_token().await.unwrap());
    }
}
