//! Hosted platform adapters (auth, tables, functions).

mod auth;
mod client;
mod dto;
mod rest;

pub use auth::PlatformAuthClient;
pub use client::PlatformClient;
pub use rest::PlatformRestClient;
