//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Hosted platform client.
pub mod platform;
/// Session storage adapters.
pub mod storage;

pub use config::{AppConfig, CliArgs, LogLevel, StateConfig, StorageManager};
pub use platform::{PlatformAuthClient, PlatformClient, PlatformRestClient};
pub use storage::KeyringSessionStorage;
