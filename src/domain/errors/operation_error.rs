//! Error returned by use cases to the UI.

use thiserror::Error;

use super::{AuthError, DataError, ValidationError};

/// Union of everything a screen action can fail with.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl OperationError {
    /// Inline text for the banner of the originating modal.
    #[must_use]
    pub fn banner(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Data(DataError::Rejected { message, .. }) => message.clone(),
            Self::Data(DataError::NotFound) => "The record no longer exists.".to_string(),
            Self::Data(e) if e.is_network_error() => {
                "Could not reach the server. Check your connection.".to_string()
            }
            Self::Data(e) if e.is_unauthorized() => {
                "Your session is not allowed to do this.".to_string()
            }
            Self::Data(_) => "The server returned an unexpected answer.".to_string(),
            Self::Auth(e) => e.to_string(),
        }
    }

    /// Returns whether the user has to sign in again.
    #[must_use]
    pub const fn requires_sign_in(&self) -> bool {
        match self {
            Self::Auth(e) => e.requires_sign_in(),
            _ => false,
        }
    }
}
