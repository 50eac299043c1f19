//! Domain layer with core business entities and port definitions.

/// Sequential record codes.
pub mod code;
/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Client-side list filtering.
pub mod filter;
/// Keybinding definitions.
pub mod keybinding;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;
/// Toast notifications.
pub mod toast;

pub use code::{CodeError, CodeSequence};
pub use entities::{Session, Token, UserProfile};
pub use errors::{AuthError, DataError, OperationError, ValidationError};
pub use filter::{KindFilter, Searchable, StatusFilter};
pub use ports::{AuthPort, DataPort, SessionStoragePort};
pub use toast::{Toast, ToastLevel};
