//! Use case implementations.

mod categories;
mod clients;
mod companies;
mod login_use_case;
mod people;
mod records;
mod resolve_session_use_case;
mod services;
mod users;

pub use categories::{CategoriesUseCase, CategoryTree, GroupNode, LinkOption, LinkSplit};
pub use clients::ClientsUseCase;
pub use companies::CompaniesUseCase;
pub use login_use_case::LoginUseCase;
pub use people::PeopleUseCase;
pub use records::{RecordStore, now};
pub use resolve_session_use_case::{ResolveSessionUseCase, ResolvedSession};
pub use services::ServicesUseCase;
pub use users::UsersUseCase;

#[cfg(test)]
pub use records::fixtures;
