//! Current session holder with change notifications.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::domain::entities::Session;
use crate::domain::errors::AuthError;
use crate::domain::ports::{AuthPort, SessionStoragePort};

const EVENT_CAPACITY: usize = 16;

/// Session change published to subscribers.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut,
    Refreshed(Session),
}

#[derive(Default)]
struct SessionSlot {
    session: Option<Session>,
    remember: bool,
}

/// Owns the signed-in session and renews it before it expires.
pub struct SessionHub {
    auth_port: Arc<dyn AuthPort>,
    storage_port: Arc<dyn SessionStoragePort>,
    slot: RwLock<SessionSlot>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHub {
    #[must_use]
    pub fn new(auth_port: Arc<dyn AuthPort>, storage_port: Arc<dyn SessionStoragePort>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            auth_port,
            storage_port,
            slot: RwLock::new(SessionSlot::default()),
            events,
        }
    }

    /// Subscribes to session changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Current session without renewal.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.slot.read().session.clone()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.slot.read().session.is_some()
    }

    /// Installs a new session; `remember` keeps rotated refresh tokens in storage.
    pub fn sign_in(&self, session: Session, remember: bool) {
        info!(user_id = %session.user_id(), remember, "Session started");
        {
            let mut slot = self.slot.write();
            slot.session = Some(session.clone());
            slot.remember = remember;
        }
        self.publish(SessionEvent::SignedIn(session));
    }

    /// Drops the session and notifies subscribers.
    pub fn clear(&self) -> Option<Session> {
        let previous = {
            let mut slot = self.slot.write();
            slot.remember = false;
            slot.session.take()
        };
        if previous.is_some() {
            info!("Session cleared");
            self.publish(SessionEvent::SignedOut);
        }
        previous
    }

    /// Returns a usable session, refreshing it first when it is about to expire.
    ///
    /// # Errors
    /// Returns `NoSession` when signed out and `SessionExpired` when the
    /// refresh is rejected (the session is cleared in that case).
    pub async fn session(&self) -> Result<Session, AuthError> {
        let (session, remember) = {
            let slot = self.slot.read();
            (slot.session.clone(), slot.remember)
        };
        let session = session.ok_or(AuthError::NoSession)?;

        if !session.is_expired(Utc::now()) {
            return Ok(session);
        }

        debug!("Access token expired, refreshing");
        let renewed = match self.auth_port.refresh(session.refresh_token()).await {
            Ok(renewed) => renewed,
            Err(e) if e.is_network_error() => return Err(e),
            Err(e) => {
                warn!(error = %e, "Session refresh rejected");
                if let Err(e) = self.storage_port.delete_refresh_token().await {
                    warn!(error = %e, "Failed to delete rejected refresh token");
                }
                self.clear();
                return Err(AuthError::SessionExpired);
            }
        };

        if remember {
            if let Err(e) = self
                .storage_port
                .store_refresh_token(renewed.refresh_token())
                .await
            {
                warn!(error = %e, "Failed to persist rotated refresh token");
            }
        }

        self.slot.write().session = Some(renewed.clone());
        info!("Session refreshed");
        self.publish(SessionEvent::Refreshed(renewed.clone()));
        Ok(renewed)
    }

    fn publish(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            debug!("No session subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Token;
    use crate::domain::ports::mocks::{MockAuthPort, MockSessionStorage};
    use chrono::{DateTime, Duration};

    fn session_with(access: &str, refresh: &str, expires_at: DateTime<Utc>) -> Session {
        Session::new(
            Token::new_unchecked(access),
            Token::new_unchecked(refresh),
            expires_at,
            "auth-1",
            "ana@example.com",
        )
    }

    #[tokio::test]
    async fn test_no_session() {
        let hub = SessionHub::new(
            Arc::new(MockAuthPort::new()),
            Arc::new(MockSessionStorage::new()),
        );
        assert!(matches!(hub.session().await, Err(AuthError::NoSession)));
    }

    #[tokio::test]
    async fn test_fresh_session_is_returned_without_refresh() {
        let hub = SessionHub::new(
            Arc::new(MockAuthPort::new()),
            Arc::new(MockSessionStorage::new()),
        );
        hub.sign_in(
            session_with("access-one", "refresh-one", Utc::now() + Duration::hours(1)),
            false,
        );

        assert_eq!(hub.session().await.unwrap().bearer(), "access-one");
    }

    #[tokio::test]
    async fn test_expired_session_is_refreshed_and_rotated_token_stored() {
        let mut auth = MockAuthPort::new();
        auth.expect_refresh().times(1).returning(|_| {
            Ok(session_with(
                "access-two",
                "refresh-two",
                Utc::now() + Duration::hours(1),
            ))
        });
        let storage = Arc::new(MockSessionStorage::new());
        let hub = SessionHub::new(Arc::new(auth), storage.clone());
        let mut events = hub.subscribe();

        hub.sign_in(session_with("access-one", "refresh-one", Utc::now()), true);
        let session = hub.session().await.unwrap();

        assert_eq!(session.bearer(), "access-two");
        assert_eq!(
            storage.get_refresh_token().await.unwrap().unwrap().as_str(),
            "refresh-two"
        );
        assert!(matches!(events.recv().await, Ok(SessionEvent::SignedIn(_))));
        assert!(matches!(events.recv().await, Ok(SessionEvent::Refreshed(_))));
    }

    #[tokio::test]
    async fn test_rejected_refresh_signs_out() {
        let mut auth = MockAuthPort::new();
        auth.expect_refresh()
            .returning(|_| Err(AuthError::rejected("invalid refresh token")));
        let storage = Arc::new(MockSessionStorage::with_token(Token::new_unchecked(
            "refresh-one",
        )));
        let hub = SessionHub::new(Arc::new(auth), storage.clone());

        hub.sign_in(session_with("access-one", "refresh-one", Utc::now()), true);

        assert!(matches!(hub.session().await, Err(AuthError::SessionExpired)));
        assert!(!hub.is_signed_in());
        assert!(!storage.has_refresh_token().await.unwrap());
    }
}
