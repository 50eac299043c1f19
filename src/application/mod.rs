//! Application layer with use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Session lifetime services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{LoginRequest, LoginResponse};
pub use services::{SessionEvent, SessionHub, ToastQueue};
pub use use_cases::{
    CategoriesUseCase, ClientsUseCase, CompaniesUseCase, LoginUseCase, PeopleUseCase,
    RecordStore, ResolveSessionUseCase, ServicesUseCase, UsersUseCase,
};
