//! Domain entity definitions.

mod category;
mod client;
mod company;
mod documents;
mod person;
mod service;
mod session;
mod user;

pub use category::{Category, CategoryGroup, CategoryKind, CategoryLink, CategoryOption};
pub use client::Client;
pub use company::{Company, CompanyOption, CompanyRef};
pub use documents::{format_cnpj, format_cpf, format_tax_id};
pub use person::{Person, PersonRole};
pub use service::Service;
pub use session::{Session, Token};
pub use user::{AuthUser, DirectoryMetadata, DirectoryUser, UserProfile, UserRole};
