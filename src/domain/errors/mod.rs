//! Domain error types.

mod auth_error;
mod data_error;
mod operation_error;
mod secret_error;
mod validation_error;

pub use auth_error::AuthError;
pub use data_error::DataError;
pub use operation_error::OperationError;
pub use secret_error::SecretError;
pub use validation_error::{ValidationError, require, require_email};
