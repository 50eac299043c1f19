//! Stored session resolution use case.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::login_use_case::load_profile;
use super::records::RecordStore;
use crate::application::services::SessionHub;
use crate::domain::entities::{Session, UserProfile};
use crate::domain::errors::AuthError;
use crate::domain::ports::{AuthPort, SessionStoragePort};

/// Session restored from the keyring with its profile.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    /// The renewed session.
    pub session: Session,
    /// Caller's profile row, if one exists.
    pub profile: Option<UserProfile>,
}

/// Restores a remembered session at startup.
pub struct ResolveSessionUseCase {
    auth_port: Arc<dyn AuthPort>,
    storage_port: Arc<dyn SessionStoragePort>,
    hub: Arc<SessionHub>,
    store: RecordStore,
}

impl ResolveSessionUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(
        auth_port: Arc<dyn AuthPort>,
        storage_port: Arc<dyn SessionStoragePort>,
        hub: Arc<SessionHub>,
        store: RecordStore,
    ) -> Self {
        Self {
            auth_port,
            storage_port,
            hub,
            store,
        }
    }

    /// Exchanges the stored refresh token for a session.
    ///
    /// The platform is checked first so an outage keeps the token untouched.
    /// A rejected token is deleted so the next start goes straight to login.
    ///
    /// # Errors
    /// Returns error if the platform cannot be reached.
    pub async fn execute(&self) -> Result<Option<ResolvedSession>, AuthError> {
        debug!("Checking keyring for stored session");
        let token = match self.storage_port.get_refresh_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No stored session");
                return Ok(None);
            }
            Err(e) => {
                debug!(error = %e, "Failed to check keyring");
                return Ok(None);
            }
        };

        if let Err(e) = self.auth_port.health_check().await {
            warn!(error = %e, "Platform unavailable, keeping stored session");
            return Err(e);
        }

        let session = match self.auth_port.refresh(&token).await {
            Ok(session) => session,
            Err(e) if e.is_network_error() => return Err(e),
            Err(e) => {
                warn!(error = %e, "Stored session rejected");
                if let Err(e) = self.storage_port.delete_refresh_token().await {
                    warn!(error = %e, "Failed to delete rejected refresh token");
                }
                return Ok(None);
            }
        };

        if let Err(e) = self
            .storage_port
            .store_refresh_token(session.refresh_token())
            .await
        {
            warn!(error = %e, "Failed to persist rotated refresh token");
        }

        info!(user_id = %session.user_id(), "Restored stored session");
        self.hub.sign_in(session.clone(), true);
        let profile = load_profile(&self.store, session.user_id()).await;

        Ok(Some(ResolvedSession { session, profile }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::records::fixtures::session;
    use crate::domain::entities::Token;
    use crate::domain::ports::mocks::{InMemoryDataPort, MockAuthPort, MockSessionStorage};

    fn use_case(auth: MockAuthPort, storage: Arc<MockSessionStorage>) -> ResolveSessionUseCase {
        let auth: Arc<dyn AuthPort> = Arc::new(auth);
        let hub = Arc::new(SessionHub::new(auth.clone(), storage.clone()));
        let store = RecordStore::new(Arc::new(InMemoryDataPort::new()), hub.clone());
        ResolveSessionUseCase::new(auth, storage, hub, store)
    }

    #[tokio::test]
    async fn test_nothing_stored() {
        let storage = Arc::new(MockSessionStorage::new());
        let result = use_case(MockAuthPort::new(), storage).execute().await;

        assert!(result.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stored_token_is_exchanged_and_rotated() {
        let mut auth = MockAuthPort::new();
        auth.expect_health_check().returning(|| Ok(()));
        auth.expect_refresh()
            .withf(|token| token.as_str() == "stored-refresh")
            .returning(|_| Ok(session()));
        let storage = Arc::new(MockSessionStorage::with_token(Token::new_unchecked(
            "stored-refresh",
        )));

        let resolved = use_case(auth, storage.clone())
            .execute()
            .await
            .unwrap()
            .unwrap();

        assert_eq!(resolved.session.user_id(), "auth-1");
        assert!(resolved.profile.is_none());
        assert_eq!(
            storage.get_refresh_token().await.unwrap().unwrap().as_str(),
            "refresh-token-value"
        );
    }

    #[tokio::test]
    async fn test_rejected_token_is_forgotten() {
        let mut auth = MockAuthPort::new();
        auth.expect_health_check().returning(|| Ok(()));
        auth.expect_refresh()
            .returning(|_| Err(AuthError::rejected("Invalid Refresh Token")));
        let storage = Arc::new(MockSessionStorage::with_token(Token::new_unchecked(
            "stored-refresh",
        )));

        let result = use_case(auth, storage.clone()).execute().await;

        assert!(result.unwrap().is_none());
        assert!(!storage.has_refresh_token().await.unwrap());
    }

    #[tokio::test]
    async fn test_unhealthy_platform_skips_refresh() {
        let mut auth = MockAuthPort::new();
        auth.expect_health_check()
            .returning(|| Err(AuthError::network("platform returned 503 Service Unavailable")));
        auth.expect_refresh().never();
        let storage = Arc::new(MockSessionStorage::with_token(Token::new_unchecked(
            "stored-refresh",
        )));

        let result = use_case(auth, storage.clone()).execute().await;

        assert!(result.unwrap_err().is_network_error());
        assert!(storage.has_refresh_token().await.unwrap());
    }

    #[tokio::test]
    async fn test_offline_keeps_token() {
        let mut auth = MockAuthPort::new();
        auth.expect_health_check().returning(|| Ok(()));
        auth.expect_refresh()
            .returning(|_| Err(AuthError::network("connection refused")));
        let storage = Arc::new(MockSessionStorage::with_token(Token::new_unchecked(
            "stored-refresh",
        )));

        let result = use_case(auth, storage.clone()).execute().await;

        assert!(result.is_err());
        assert!(storage.has_refresh_token().await.unwrap());
    }
}
