//! Login use case implementation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::records::RecordStore;
use crate::application::dto::{LoginRequest, LoginResponse};
use crate::application::services::SessionHub;
use crate::domain::entities::UserProfile;
use crate::domain::errors::{AuthError, ValidationError, require_email};
use crate::domain::ports::{AuthPort, Record, SessionStoragePort};

/// Handles the sign-in and sign-out workflow.
#[derive(Clone)]
pub struct LoginUseCase {
    auth_port: Arc<dyn AuthPort>,
    storage_port: Arc<dyn SessionStoragePort>,
    hub: Arc<SessionHub>,
    store: RecordStore,
}

impl LoginUseCase {
    /// Creates new login use case.
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

    /// Executes login with provided request.
    ///
    /// # Errors
    /// Returns error if the input is malformed or the credentials are rejected.
    pub async fn execute(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        debug!(email = %request.email, "Attempting login");

        require_email(&request.email).map_err(|e| AuthError::invalid_input(e.to_string()))?;
        if request.password.is_empty() {
            return Err(AuthError::invalid_input(
                ValidationError::required("password").to_string(),
            ));
        }

        let session = self
            .auth_port
            .sign_in(&request.email, &request.password)
            .await
            .map_err(|e| {
                warn!(error = %e, "Sign-in failed");
                e
            })?;

        info!(user_id = %session.user_id(), "Successfully authenticated");

        let session_persisted = if request.remember {
            match self
                .storage_port
                .store_refresh_token(session.refresh_token())
                .await
            {
                Ok(()) => {
                    info!("Refresh token persisted to secure storage");
                    true
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to persist refresh token");
                    false
                }
            }
        } else {
            debug!("Session persistence disabled, skipping storage");
            false
        };

        self.hub.sign_in(session.clone(), request.remember);
        let profile = load_profile(&self.store, session.user_id()).await;

        Ok(LoginResponse::new(session, profile, session_persisted))
    }

    /// Revokes the session, forgets the stored token and clears the hub.
    ///
    /// Remote failures are logged; the local sign-out always happens.
    pub async fn sign_out(&self) {
        if let Some(session) = self.hub.current() {
            if let Err(e) = self.auth_port.sign_out(&session).await {
                warn!(error = %e, "Remote sign-out failed");
            }
        }

        if let Err(e) = self.storage_port.delete_refresh_token().await {
            tracing::error!(error = %e, "Failed to delete refresh token from secure storage");
        }

        self.hub.clear();
        info!("Signed out");
    }
}

/// Profile of the signed-in auth user; `None` when missing or unreadable.
pub(super) async fn load_profile(store: &RecordStore, auth_id: &str) -> Option<UserProfile> {
    let query = UserProfile::query().eq("auth_id", auth_id).limit(1);
    match store.fetch::<UserProfile>(&query).await {
        Ok(rows) => {
            let profile = rows.into_iter().next();
            if profile.is_none() {
                warn!(auth_id = %auth_id, "Signed-in user has no profile");
            }
            profile
        }
        Err(e) => {
            warn!(error = %e, "Failed to load profile");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::records::fixtures::session;
    use crate::domain::entities::Token;
    use crate::domain::ports::mocks::{InMemoryDataPort, MockAuthPort, MockSessionStorage};
    use crate::domain::ports::Table;
    use serde_json::json;

    struct Harness {
        use_case: LoginUseCase,
        storage: Arc<MockSessionStorage>,
        hub: Arc<SessionHub>,
    }

    fn harness(auth: MockAuthPort) -> Harness {
        let auth: Arc<dyn AuthPort> = Arc::new(auth);
        let storage = Arc::new(MockSessionStorage::new());
        let hub = Arc::new(SessionHub::new(auth.clone(), storage.clone()));
        let port = Arc::new(InMemoryDataPort::new().with_rows(
            Table::Users,
            vec![json!({"id": "u1", "auth_id": "auth-1", "name": "Ana", "role": "master", "active": true})],
        ));
        let store = RecordStore::new(port, hub.clone());

        Harness {
            use_case: LoginUseCase::new(auth, storage.clone(), hub.clone(), store),
            storage,
            hub,
        }
    }

    fn accepting_auth() -> MockAuthPort {
        let mut auth = MockAuthPort::new();
        auth.expect_sign_in()
            .withf(|email, password| email == "ana@example.com" && password == "secret")
            .returning(|_, _| Ok(session()));
        auth
    }

    #[tokio::test]
    async fn test_successful_login_loads_profile_and_persists() {
        let h = harness(accepting_auth());

        let response = h
            .use_case
            .execute(LoginRequest::new("ana@example.com", "secret"))
            .await
            .unwrap();

        assert!(response.session_persisted);
        assert_eq!(response.profile.unwrap().name, "Ana");
        assert!(h.hub.is_signed_in());
        assert!(h.storage.has_refresh_token().await.unwrap());
    }

    #[tokio::test]
    async fn test_login_without_persistence() {
        let h = harness(accepting_auth());

        let response = h
            .use_case
            .execute(LoginRequest::new("ana@example.com", "secret").without_persistence())
            .await
            .unwrap();

        assert!(!response.session_persisted);
        assert!(!h.storage.has_refresh_token().await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_email_never_reaches_platform() {
        let h = harness(MockAuthPort::new());

        let result = h
            .use_case
            .execute(LoginRequest::new("not-an-email", "secret"))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let mut auth = MockAuthPort::new();
        auth.expect_sign_in()
            .returning(|_, _| Err(AuthError::InvalidCredentials));
        let h = harness(auth);

        let result = h
            .use_case
            .execute(LoginRequest::new("ana@example.com", "wrong"))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert!(!h.hub.is_signed_in());
    }

    #[tokio::test]
    async fn test_sign_out_clears_even_when_remote_fails() {
        let mut auth = accepting_auth();
        auth.expect_sign_out()
            .returning(|_| Err(AuthError::network("offline")));
        let h = harness(auth);
        h.storage
            .store_refresh_token(&Token::new_unchecked("refresh-token-value"))
            .await
            .unwrap();
        h.hub.sign_in(session(), true);

        h.use_case.sign_out().await;

        assert!(!h.hub.is_signed_in());
        assert!(!h.storage.has_refresh_token().await.unwrap());
    }
}
