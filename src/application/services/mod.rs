//! Application services shared by the use cases and the UI.

mod session_hub;
mod toast_queue;

pub use session_hub::{SessionEvent, SessionHub};
pub use toast_queue::ToastQueue;
