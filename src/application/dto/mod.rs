//! Data transfer objects for the application layer.

mod auth_dto;
mod forms;

pub use auth_dto::{LoginRequest, LoginResponse};
pub use forms::{
    CategoryForm, ClientForm, CompanyForm, GroupForm, PersonForm, ProfileForm, ServiceForm,
    UserForm, id_or_null, text_or_null,
};
