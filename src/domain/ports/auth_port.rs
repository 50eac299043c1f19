//! Authentication port definition.

use async_trait::async_trait;

use crate::domain::entities::{AuthUser, DirectoryUser, Session, Token};
use crate::domain::errors::AuthError;

/// Port for the platform's auth API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Exchanges email and password for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Exchanges a refresh token for a new session.
    async fn refresh(&self, refresh_token: &Token) -> Result<Session, AuthError>;

    /// Revokes the session remotely.
    async fn sign_out(&self, session: &Session) -> Result<(), AuthError>;

    /// Creates an auth account; the caller's session is left untouched.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// Lists accounts through the directory function.
    async fn list_directory_users(&self, session: &Session)
    -> Result<Vec<DirectoryUser>, AuthError>;

    /// Checks platform availability.
    async fn health_check(&self) -> Result<(), AuthError>;
}
