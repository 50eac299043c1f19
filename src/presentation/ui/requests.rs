//! Platform calls requested by the screens and their results.
//!
//! Screens never await the platform. They hand a [`Request`] to the app,
//! which spawns [`Dispatcher::perform`] and feeds the resulting
//! [`AppEvent`] back through the action channel.

use std::sync::Arc;

use tracing::debug;

use crate::application::dto::{
    CategoryForm, ClientForm, CompanyForm, GroupForm, LoginResponse, PersonForm, ProfileForm,
    ServiceForm, UserForm,
};
use crate::application::services::SessionHub;
use crate::application::use_cases::{
    CategoriesUseCase, ClientsUseCase, CompaniesUseCase, LinkSplit, PeopleUseCase, RecordStore,
    ResolvedSession, ServicesUseCase, UsersUseCase,
};
use crate::domain::entities::{
    Category, CategoryGroup, CategoryOption, Client, Company, CompanyOption, DirectoryUser,
    Person, Service, UserProfile,
};
use crate::domain::errors::{AuthError, OperationError};
use crate::domain::filter::{KindFilter, StatusFilter};
use crate::domain::ports::AuthPort;
use crate::presentation::ui::tabs::{RowRef, Tab, TabData};

/// Record a row action applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    User(UserProfile),
    Company(Company),
    Client(Client),
    Person(Person),
    Service(Service),
    Category(Category),
    Group(CategoryGroup),
}

impl Target {
    /// Owned copy of a visible row; the ungrouped heading has no record.
    #[must_use]
    pub fn from_row(row: RowRef<'_>) -> Option<Self> {
        Some(match row {
            RowRef::User(u) => Self::User(u.clone()),
            RowRef::Company(c) => Self::Company(c.clone()),
            RowRef::Client(c) => Self::Client(c.clone()),
            RowRef::Person(p) => Self::Person(p.clone()),
            RowRef::Service(s) => Self::Service(s.clone()),
            RowRef::Category(c) => Self::Category(c.clone()),
            RowRef::Group(g) => Self::Group(g.clone()),
            RowRef::Ungrouped => return None,
        })
    }

    const fn noun(&self) -> &'static str {
        match self {
            Self::User(_) => "User",
            Self::Company(_) => "Company",
            Self::Client(_) => "Client",
            Self::Person(_) => "Person",
            Self::Service(_) => "Service",
            Self::Category(_) => "Category",
            Self::Group(_) => "Group",
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::User(u) => u.display_name().to_string(),
            Self::Company(c) => c.legal_name.clone(),
            Self::Client(c) => c.legal_name.clone(),
            Self::Person(p) => p.name.clone(),
            Self::Service(s) => s.name.clone(),
            Self::Category(c) => format!("{} {}", c.code, c.name),
            Self::Group(g) => g.name.clone(),
        }
    }

    /// Active flag as loaded, `None` for groups.
    const fn active(&self) -> Option<bool> {
        match self {
            Self::User(u) => Some(u.active),
            Self::Company(c) => Some(c.active),
            Self::Client(c) => Some(c.active),
            Self::Person(p) => Some(p.active),
            Self::Service(s) => Some(s.active),
            Self::Category(c) => Some(c.active),
            Self::Group(_) => None,
        }
    }
}

/// Form whose create mode needs the next sequential code first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeTarget {
    Client,
    Category,
}

#[derive(Debug, Clone)]
pub enum Request {
    Load {
        tab: Tab,
        company: Option<String>,
        status: StatusFilter,
        kind: KindFilter,
    },
    CompanyOptions,
    NextCode(CodeTarget),
    SaveCompany {
        id: Option<String>,
        form: CompanyForm,
    },
    SaveClient {
        existing: Option<Client>,
        form: ClientForm,
    },
    SavePerson {
        existing: Option<Person>,
        form: PersonForm,
        company: Option<String>,
    },
    SaveService {
        existing: Option<Service>,
        form: ServiceForm,
        company: Option<String>,
    },
    SaveUser {
        existing: Option<UserProfile>,
        form: UserForm,
    },
    SaveProfile(ProfileForm),
    SaveCategory {
        existing: Option<Category>,
        form: CategoryForm,
    },
    SaveGroup {
        id: Option<String>,
        form: GroupForm,
    },
    ToggleActive(Target),
    Delete(Target),
    CompanyLinks {
        category_id: String,
        label: String,
    },
    CategoryLinks {
        company_id: String,
        label: String,
    },
    SaveCategoryLinks {
        category_id: String,
        company_ids: Vec<String>,
    },
    SaveCompanyLinks {
        company_id: String,
        category_ids: Vec<String>,
    },
    Importable,
    Import {
        users: Vec<DirectoryUser>,
        company: Option<String>,
    },
}

#[derive(Debug)]
pub enum AppEvent {
    Loaded {
        tab: Tab,
        result: Result<TabData, OperationError>,
    },
    CompanyOptions(Result<Vec<CompanyOption>, OperationError>),
    NextCode {
        target: CodeTarget,
        result: Result<String, OperationError>,
    },
    CompanyLinks {
        category_id: String,
        label: String,
        result: Result<LinkSplit<CompanyOption>, OperationError>,
    },
    CategoryLinks {
        company_id: String,
        label: String,
        result: Result<LinkSplit<CategoryOption>, OperationError>,
    },
    Importable(Result<Vec<DirectoryUser>, OperationError>),
    /// A mutation finished; the text is the success toast.
    Saved(Result<String, OperationError>),
    ProfileSaved(Result<UserProfile, OperationError>),
    LoginFinished(Result<LoginResponse, AuthError>),
    SessionResolved(Result<Option<ResolvedSession>, AuthError>),
    SignedOut,
}

/// Runs requests against the use cases.
#[derive(Clone)]
pub struct Dispatcher {
    companies: CompaniesUseCase,
    clients: ClientsUseCase,
    people: PeopleUseCase,
    services: ServicesUseCase,
    users: UsersUseCase,
    categories: CategoriesUseCase,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        store: RecordStore,
        auth_port: Arc<dyn AuthPort>,
        hub: Arc<SessionHub>,
        temporary_password: impl Into<String>,
    ) -> Self {
        Self {
            companies: CompaniesUseCase::new(store.clone()),
            clients: ClientsUseCase::new(store.clone()),
            people: PeopleUseCase::new(store.clone()),
            services: ServicesUseCase::new(store.clone()),
            users: UsersUseCase::new(store.clone(), auth_port, hub, temporary_password),
            categories: CategoriesUseCase::new(store),
        }
    }

    pub async fn perform(&self, request: Request) -> AppEvent {
        debug!(request = ?request_name(&request), "Performing request");

        match request {
            Request::Load {
                tab,
                company,
                status,
                kind,
            } => AppEvent::Loaded {
                tab,
                result: self.load(tab, company.as_deref(), status, kind).await,
            },
            Request::CompanyOptions => AppEvent::CompanyOptions(self.companies.options().await),
            Request::NextCode(target) => AppEvent::NextCode {
                target,
                result: match target {
                    CodeTarget::Client => self.clients.next_code().await,
                    CodeTarget::Category => self.categories.next_code().await,
                },
            },
            Request::CompanyLinks { category_id, label } => {
                let result = self.categories.links_for_category(&category_id).await;
                AppEvent::CompanyLinks {
                    category_id,
                    label,
                    result,
                }
            }
            Request::CategoryLinks { company_id, label } => {
                let result = self.categories.links_for_company(&company_id).await;
                AppEvent::CategoryLinks {
                    company_id,
                    label,
                    result,
                }
            }
            Request::Importable => AppEvent::Importable(self.users.importable().await),
            Request::SaveProfile(form) => {
                AppEvent::ProfileSaved(self.users.update_own_profile(form).await)
            }
            other => AppEvent::Saved(self.mutate(other).await),
        }
    }

    async fn load(
        &self,
        tab: Tab,
        company: Option<&str>,
        status: StatusFilter,
        kind: KindFilter,
    ) -> Result<TabData, OperationError> {
        Ok(match tab {
            Tab::Users => TabData::Users(self.users.list(company, status).await?),
            Tab::Companies => TabData::Companies(self.companies.list(status).await?),
            Tab::Clients => TabData::Clients(self.clients.list(company, status).await?),
            Tab::People => TabData::People(self.people.list(company, status).await?),
            Tab::Services => TabData::Services(self.services.list(company, status).await?),
            Tab::Categories => {
                TabData::Categories(self.categories.load_tree(kind, status).await?)
            }
        })
    }

    async fn mutate(&self, request: Request) -> Result<String, OperationError> {
        match request {
            Request::SaveCompany { id: None, form } => {
                self.companies.create(form).await?;
                Ok("Company created".to_string())
            }
            Request::SaveCompany { id: Some(id), form } => {
                self.companies.update(&id, form).await?;
                Ok("Company updated".to_string())
            }
            Request::SaveClient {
                existing: None,
                form,
            } => {
                let code = form.code.clone();
                self.clients.create(form).await?;
                Ok(format!("Client {code} created"))
            }
            Request::SaveClient {
                existing: Some(client),
                form,
            } => {
                self.clients.update(&client, form).await?;
                Ok(format!("Client {} updated", client.code))
            }
            Request::SavePerson {
                existing: None,
                form,
                company,
            } => {
                let code = self.people.create(form, company.as_deref()).await?;
                Ok(format!("Person {code} created"))
            }
            Request::SavePerson {
                existing: Some(person),
                form,
                ..
            } => {
                self.people.update(&person, form).await?;
                Ok(format!("Person {} updated", person.code))
            }
            Request::SaveService {
                existing: None,
                form,
                company,
            } => {
                let code = self.services.create(form, company.as_deref()).await?;
                Ok(format!("Service {code} created"))
            }
            Request::SaveService {
                existing: Some(service),
                form,
                ..
            } => {
                self.services.update(&service, form).await?;
                Ok(format!("Service {} updated", service.code))
            }
            Request::SaveUser {
                existing: None,
                form,
            } => {
                let email = form.email.clone();
                self.users.create(form).await?;
                Ok(format!("User {email} created"))
            }
            Request::SaveUser {
                existing: Some(user),
                form,
            } => {
                self.users.update(&user, form).await?;
                Ok(format!("User {} updated", user.display_name()))
            }
            Request::SaveCategory {
                existing: None,
                form,
            } => {
                let code = form.code.clone();
                self.categories.create(form).await?;
                Ok(format!("Category {code} created"))
            }
            Request::SaveCategory {
                existing: Some(category),
                form,
            } => {
                self.categories.update(&category, form).await?;
                Ok(format!("Category {} updated", category.code))
            }
            Request::SaveGroup { id: None, form } => {
                self.categories.create_group(form).await?;
                Ok("Group created".to_string())
            }
            Request::SaveGroup { id: Some(id), form } => {
                self.categories.update_group(&id, form).await?;
                Ok("Group updated".to_string())
            }
            Request::ToggleActive(target) => self.toggle(target).await,
            Request::Delete(target) => self.delete(target).await,
            Request::SaveCategoryLinks {
                category_id,
                company_ids,
            } => {
                self.categories
                    .save_category_links(&category_id, &company_ids)
                    .await?;
                Ok(format!("{} companies linked", company_ids.len()))
            }
            Request::SaveCompanyLinks {
                company_id,
                category_ids,
            } => {
                self.categories
                    .save_company_links(&company_id, &category_ids)
                    .await?;
                Ok(format!("{} categories linked", category_ids.len()))
            }
            Request::Import { users, company } => {
                let count = self.users.import(&users, company.as_deref()).await?;
                Ok(format!("{count} users imported"))
            }
            Request::Load { .. }
            | Request::CompanyOptions
            | Request::NextCode(_)
            | Request::CompanyLinks { .. }
            | Request::CategoryLinks { .. }
            | Request::Importable
            | Request::SaveProfile(_) => Ok(String::new()),
        }
    }

    async fn toggle(&self, target: Target) -> Result<String, OperationError> {
        let active = match &target {
            Target::User(u) => self.users.toggle_active(u).await.map(|()| !u.active)?,
            Target::Company(c) => self.companies.toggle_active(c).await.map(|()| !c.active)?,
            Target::Client(c) => self.clients.toggle_active(c).await.map(|()| !c.active)?,
            Target::Person(p) => self.people.toggle_active(p).await.map(|()| !p.active)?,
            Target::Service(s) => self.services.toggle_active(s).await.map(|()| !s.active)?,
            Target::Category(c) => self.categories.toggle_active(&c.id).await?,
            Target::Group(_) => return Ok(String::new()),
        };
        let verb = if active { "activated" } else { "deactivated" };
        Ok(format!("{} {verb}", target.noun()))
    }

    async fn delete(&self, target: Target) -> Result<String, OperationError> {
        match &target {
            Target::User(u) => self.users.delete(&u.id).await?,
            Target::Company(c) => self.companies.delete(&c.id).await?,
            Target::Client(c) => self.clients.delete(&c.id).await?,
            Target::Person(p) => self.people.delete(&p.id).await?,
            Target::Service(s) => self.services.delete(&s.id).await?,
            Target::Category(c) => self.categories.delete(&c.id).await?,
            Target::Group(g) => self.categories.delete_group(&g.id).await?,
        }
        Ok(format!("{} \"{}\" deleted", target.noun(), target.label()))
    }
}

fn request_name(request: &Request) -> &'static str {
    match request {
        Request::Load { .. } => "load",
        Request::CompanyOptions => "company_options",
        Request::NextCode(_) => "next_code",
        Request::SaveCompany { .. } => "save_company",
        Request::SaveClient { .. } => "save_client",
        Request::SavePerson { .. } => "save_person",
        Request::SaveService { .. } => "save_service",
        Request::SaveUser { .. } => "save_user",
        Request::SaveProfile(_) => "save_profile",
        Request::SaveCategory { .. } => "save_category",
        Request::SaveGroup { .. } => "save_group",
        Request::ToggleActive(_) => "toggle_active",
        Request::Delete(_) => "delete",
        Request::CompanyLinks { .. } => "company_links",
        Request::CategoryLinks { .. } => "category_links",
        Request::SaveCategoryLinks { .. } => "save_category_links",
        Request::SaveCompanyLinks { .. } => "save_company_links",
        Request::Importable => "importable",
        Request::Import { .. } => "import",
    }
}

impl Target {
    /// Whether the row can be switched between active and inactive.
    #[must_use]
    pub const fn has_status(&self) -> bool {
        self.active().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::fixtures::{signed_in_hub, store};
    use crate::domain::ports::Table;
    use crate::domain::ports::mocks::{InMemoryDataPort, MockAuthPort, Operation};
    use serde_json::json;

    fn seeded() -> Arc<InMemoryDataPort> {
        Arc::new(
            InMemoryDataPort::new()
                .with_rows(
                    Table::Companies,
                    vec![
                        json!({"id": "co1", "legal_name": "Acme", "active": true}),
                        json!({"id": "co2", "legal_name": "Beta", "active": false}),
                    ],
                )
                .with_rows(
                    Table::Clients,
                    vec![
                        json!({"id": "c1", "code": "C0001", "legal_name": "Joao", "company_id": "co1", "active": true}),
                        json!({"id": "c2", "code": "C0009", "legal_name": "Maria", "company_id": "co2", "active": true}),
                    ],
                ),
        )
    }

    fn dispatcher(port: &Arc<InMemoryDataPort>) -> Dispatcher {
        Dispatcher::new(store(port), Arc::new(MockAuthPort::new()), signed_in_hub(), "Temp@1234")
    }

    fn load(tab: Tab, company: Option<&str>) -> Request {
        Request::Load {
            tab,
            company: company.map(str::to_string),
            status: StatusFilter::All,
            kind: KindFilter::All,
        }
    }

    #[tokio::test]
    async fn test_load_scopes_by_company() {
        let port = seeded();
        let event = dispatcher(&port).perform(load(Tab::Clients, Some("co2"))).await;

        let AppEvent::Loaded {
            tab: Tab::Clients,
            result: Ok(TabData::Clients(clients)),
        } = event
        else {
            panic!("unexpected event: {event:?}");
        };
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].code, "C0009");
    }

    #[tokio::test]
    async fn test_next_client_code() {
        let port = seeded();
        let event = dispatcher(&port)
            .perform(Request::NextCode(CodeTarget::Client))
            .await;

        let AppEvent::NextCode {
            target: CodeTarget::Client,
            result: Ok(code),
        } = event
        else {
            panic!("unexpected event: {event:?}");
        };
        assert_eq!(code, "C0010");
    }

    #[tokio::test]
    async fn test_toggle_reports_new_state() {
        let port = seeded();
        let dispatcher = dispatcher(&port);
        let AppEvent::Loaded {
            result: Ok(TabData::Companies(companies)),
            ..
        } = dispatcher.perform(load(Tab::Companies, None)).await
        else {
            panic!("companies not loaded");
        };
        let beta = companies.into_iter().find(|c| c.id == "co2").unwrap();

        let event = dispatcher
            .perform(Request::ToggleActive(Target::Company(beta)))
            .await;

        let AppEvent::Saved(Ok(message)) = event else {
            panic!("unexpected event: {event:?}");
        };
        assert_eq!(message, "Company activated");
        assert_eq!(port.row(Table::Companies, "co2").unwrap()["active"], true);
    }

    #[tokio::test]
    async fn test_delete_then_reload_drops_row() {
        let port = seeded();
        let dispatcher = dispatcher(&port);
        let AppEvent::Loaded {
            result: Ok(TabData::Clients(clients)),
            ..
        } = dispatcher.perform(load(Tab::Clients, None)).await
        else {
            panic!("clients not loaded");
        };

        let event = dispatcher
            .perform(Request::Delete(Target::Client(clients[0].clone())))
            .await;
        assert!(matches!(event, AppEvent::Saved(Ok(_))));

        let AppEvent::Loaded {
            result: Ok(TabData::Clients(clients)),
            ..
        } = dispatcher.perform(load(Tab::Clients, None)).await
        else {
            panic!("clients not reloaded");
        };
        assert_eq!(clients.len(), 1);
    }

    #[tokio::test]
    async fn test_person_without_company_fails_with_banner() {
        let port = seeded();
        let event = dispatcher(&port)
            .perform(Request::SavePerson {
                existing: None,
                form: PersonForm {
                    name: "Ana".to_string(),
                    ..PersonForm::default()
                },
                company: None,
            })
            .await;

        let AppEvent::Saved(Err(error)) = event else {
            panic!("unexpected event: {event:?}");
        };
        assert_eq!(error.banner(), "select a company in the global filter first");
        assert!(!port.calls().iter().any(|(op, _)| *op == Operation::Insert));
    }

    #[tokio::test]
    async fn test_create_client_message_has_code() {
        let port = seeded();
        let event = dispatcher(&port)
            .perform(Request::SaveClient {
                existing: None,
                form: ClientForm {
                    code: "C0010".to_string(),
                    legal_name: "Novo".to_string(),
                    tax_id: "11222333000181".to_string(),
                    company_id: Some("co1".to_string()),
                    ..ClientForm::default()
                },
            })
            .await;

        let AppEvent::Saved(Ok(message)) = event else {
            panic!("unexpected event: {event:?}");
        };
        assert_eq!(message, "Client C0010 created");
        assert_eq!(port.rows(Table::Clients).len(), 3);
    }

    #[test]
    fn test_ungrouped_heading_has_no_target() {
        assert_eq!(Target::from_row(RowRef::Ungrouped), None);
    }
}
