//! Edit modals for each record type.

use crate::application::dto::{
    CategoryForm, ClientForm, CompanyForm, GroupForm, PersonForm, ProfileForm, ServiceForm,
    UserForm,
};
use crate::domain::entities::{
    Category, CategoryGroup, CategoryKind, Client, Company, CompanyOption, Person, PersonRole,
    Service, UserProfile, UserRole,
};
use crate::presentation::ui::requests::{CodeTarget, Request};
use crate::presentation::widgets::{FormField, FormModal, SelectOption};

/// Lookups the builders need besides the record itself.
#[derive(Debug, Clone, Copy)]
pub struct FormContext<'a> {
    pub companies: &'a [CompanyOption],
    pub groups: &'a [CategoryGroup],
    pub company_filter: Option<&'a str>,
}

/// Record a modal edits; `None` means create.
#[derive(Debug, Clone)]
pub enum FormTarget {
    Company(Option<Company>),
    Client(Option<Client>),
    Person(Option<Person>),
    Service(Option<Service>),
    User(Option<UserProfile>),
    Profile(UserProfile),
    Category(Option<Category>),
    Group(Option<CategoryGroup>),
}

impl FormTarget {
    /// Code to fetch before a create form can open.
    #[must_use]
    pub const fn needs_code(&self) -> Option<CodeTarget> {
        match self {
            Self::Client(None) => Some(CodeTarget::Client),
            Self::Category(None) => Some(CodeTarget::Category),
            _ => None,
        }
    }

    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::Company(None) => "New company".to_string(),
            Self::Company(Some(c)) => format!("Edit company {}", c.legal_name),
            Self::Client(None) => "New client".to_string(),
            Self::Client(Some(c)) => format!("Edit client {}", c.code),
            Self::Person(None) => "New person".to_string(),
            Self::Person(Some(p)) => format!("Edit person {}", p.code),
            Self::Service(None) => "New service".to_string(),
            Self::Service(Some(s)) => format!("Edit service {}", s.code),
            Self::User(None) => "New user".to_string(),
            Self::User(Some(u)) => format!("Edit user {}", u.display_name()),
            Self::Profile(_) => "My profile".to_string(),
            Self::Category(None) => "New category".to_string(),
            Self::Category(Some(c)) => format!("Edit category {}", c.code),
            Self::Group(None) => "New group".to_string(),
            Self::Group(Some(g)) => format!("Edit group {}", g.name),
        }
    }

    /// Builds the modal; `code` is the pre-fetched code for create forms.
    #[must_use]
    pub fn build(&self, ctx: FormContext<'_>, code: Option<&str>) -> FormModal {
        let fields = match self {
            Self::Company(existing) => company_fields(&existing.as_ref().map(CompanyForm::from).unwrap_or_default()),
            Self::Client(existing) => {
                let form = existing.as_ref().map_or_else(
                    || ClientForm {
                        code: code.unwrap_or_default().to_string(),
                        company_id: ctx.company_filter.map(str::to_string),
                        ..ClientForm::default()
                    },
                    ClientForm::from,
                );
                vec![
                    FormField::text("code", "Code", form.code).disabled(),
                    FormField::text("legal_name", "Legal name", form.legal_name),
                    FormField::text("trade_name", "Trade name", form.trade_name),
                    FormField::text("tax_id", "Tax id", form.tax_id),
                    company_select(ctx.companies, form.company_id.as_deref()),
                ]
            }
            Self::Person(existing) => {
                let form = existing.as_ref().map(PersonForm::from).unwrap_or_default();
                let mut fields = Vec::new();
                if let Some(person) = existing {
                    fields.push(FormField::text("code", "Code", person.code.clone()).disabled());
                }
                fields.extend([
                    FormField::text("name", "Name", form.name),
                    FormField::text("individual_tax_id", "CPF", form.individual_tax_id),
                    FormField::text("company_tax_id", "CNPJ", form.company_tax_id),
                    FormField::text("email", "Email", form.email),
                    FormField::text("phone", "Phone", form.phone),
                    FormField::select(
                        "role",
                        "Role",
                        PersonRole::ALL
                            .iter()
                            .map(|r| SelectOption::new(r.as_str(), r.label()))
                            .collect(),
                        Some(form.role.as_str()),
                    ),
                ]);
                fields
            }
            Self::Service(existing) => match existing {
                Some(service) => {
                    let form = ServiceForm::from(service);
                    vec![
                        FormField::text("code", "Code", form.code),
                        FormField::text("name", "Name", form.name),
                        FormField::text("description", "Description", form.description),
                        company_select(ctx.companies, form.company_id.as_deref()),
                    ]
                }
                None => vec![
                    FormField::text("name", "Name", ""),
                    FormField::text("description", "Description", ""),
                ],
            },
            Self::User(existing) => {
                let form = existing.as_ref().map_or_else(
                    || UserForm {
                        company_id: ctx.company_filter.map(str::to_string),
                        ..UserForm::default()
                    },
                    UserForm::from,
                );
                let mut company =
                    company_select(ctx.companies, form.effective_company().as_deref());
                let mut email = FormField::text("email", "Email", form.email);
                if existing.is_some() {
                    email = email.disabled();
                }
                if form.role.is_master() {
                    company = company.disabled();
                }
                vec![
                    FormField::text("name", "Name", form.name),
                    email,
                    FormField::text("phone", "Phone", form.phone),
                    FormField::text("job_title", "Job title", form.job_title),
                    FormField::select(
                        "role",
                        "Role",
                        UserRole::ALL
                            .iter()
                            .map(|r| SelectOption::new(r.as_str(), r.label()))
                            .collect(),
                        Some(form.role.as_str()),
                    ),
                    company,
                ]
            }
            Self::Profile(profile) => {
                let form = ProfileForm::from(profile);
                vec![
                    FormField::text("email", "Email", profile.email.clone()).disabled(),
                    FormField::text("name", "Name", form.name),
                    FormField::text("phone", "Phone", form.phone),
                    FormField::text("job_title", "Job title", form.job_title),
                    FormField::text("avatar_url", "Avatar URL", form.avatar_url),
                ]
            }
            Self::Category(existing) => {
                let form = existing.as_ref().map_or_else(
                    || CategoryForm {
                        code: code.unwrap_or_default().to_string(),
                        ..CategoryForm::default()
                    },
                    CategoryForm::from,
                );
                let mut code_field = FormField::text("code", "Code", form.code);
                if existing.is_none() {
                    code_field = code_field.disabled();
                }
                let mut kinds = vec![SelectOption::none("Choose a kind")];
                kinds.extend(
                    CategoryKind::ALL
                        .iter()
                        .map(|k| SelectOption::new(k.as_str(), k.label())),
                );
                let mut groups = vec![SelectOption::none("No group")];
                groups.extend(
                    ctx.groups
                        .iter()
                        .map(|g| SelectOption::new(g.id.clone(), g.name.clone())),
                );
                vec![
                    code_field,
                    FormField::text("name", "Name", form.name),
                    FormField::text("description", "Description", form.description),
                    FormField::select("kind", "Kind", kinds, form.kind.map(CategoryKind::as_str)),
                    FormField::select("group", "Group", groups, form.group_id.as_deref()),
                ]
            }
            Self::Group(existing) => {
                let form = existing.as_ref().map(GroupForm::from).unwrap_or_default();
                vec![
                    FormField::text("name", "Name", form.name),
                    FormField::text("description", "Description", form.description),
                ]
            }
        };

        FormModal::new(self.title(), fields)
    }

    /// Keeps dependent fields consistent after `key` changed.
    pub fn on_change(&self, modal: &mut FormModal, key: &str) {
        if matches!(self, Self::User(_)) && key == "role" {
            let master = user_role(modal).is_master();
            if master {
                modal.set_select("company", None);
            }
            modal.set_disabled("company", master);
        }
    }

    /// Request saving the modal's current values.
    #[must_use]
    pub fn request(&self, modal: &FormModal, company_filter: Option<&str>) -> Request {
        let company = company_filter.map(str::to_string);
        match self {
            Self::Company(existing) => Request::SaveCompany {
                id: existing.as_ref().map(|c| c.id.clone()),
                form: CompanyForm {
                    legal_name: modal.text("legal_name"),
                    trade_name: modal.text("trade_name"),
                    tax_id: modal.text("tax_id"),
                    email: modal.text("email"),
                    phone: modal.text("phone"),
                },
            },
            Self::Client(existing) => Request::SaveClient {
                existing: existing.clone(),
                form: ClientForm {
                    code: modal.text("code"),
                    legal_name: modal.text("legal_name"),
                    trade_name: modal.text("trade_name"),
                    tax_id: modal.text("tax_id"),
                    company_id: modal.select_value("company"),
                },
            },
            Self::Person(existing) => Request::SavePerson {
                existing: existing.clone(),
                form: PersonForm {
                    name: modal.text("name"),
                    individual_tax_id: modal.text("individual_tax_id"),
                    company_tax_id: modal.text("company_tax_id"),
                    email: modal.text("email"),
                    phone: modal.text("phone"),
                    role: modal
                        .select_value("role")
                        .and_then(|v| PersonRole::ALL.into_iter().find(|r| r.as_str() == v))
                        .unwrap_or_default(),
                },
                company,
            },
            Self::Service(existing) => Request::SaveService {
                existing: existing.clone(),
                form: ServiceForm {
                    code: modal.text("code"),
                    name: modal.text("name"),
                    description: modal.text("description"),
                    company_id: if existing.is_some() {
                        modal.select_value("company")
                    } else {
                        company.clone()
                    },
                },
                company,
            },
            Self::User(existing) => Request::SaveUser {
                existing: existing.clone(),
                form: UserForm {
                    name: modal.text("name"),
                    email: modal.text("email"),
                    phone: modal.text("phone"),
                    job_title: modal.text("job_title"),
                    role: user_role(modal),
                    company_id: modal.select_value("company"),
                },
            },
            Self::Profile(_) => Request::SaveProfile(ProfileForm {
                name: modal.text("name"),
                phone: modal.text("phone"),
                job_title: modal.text("job_title"),
                avatar_url: modal.text("avatar_url"),
            }),
            Self::Category(existing) => Request::SaveCategory {
                existing: existing.clone(),
                form: CategoryForm {
                    code: modal.text("code"),
                    name: modal.text("name"),
                    description: modal.text("description"),
                    kind: modal
                        .select_value("kind")
                        .and_then(|v| CategoryKind::ALL.into_iter().find(|k| k.as_str() == v)),
                    group_id: modal.select_value("group"),
                },
            },
            Self::Group(existing) => Request::SaveGroup {
                id: existing.as_ref().map(|g| g.id.clone()),
                form: GroupForm {
                    name: modal.text("name"),
                    description: modal.text("description"),
                },
            },
        }
    }
}

fn company_fields(form: &CompanyForm) -> Vec<FormField> {
    vec![
        FormField::text("legal_name", "Legal name", form.legal_name.clone()),
        FormField::text("trade_name", "Trade name", form.trade_name.clone()),
        FormField::text("tax_id", "CNPJ", form.tax_id.clone()),
        FormField::text("email", "Email", form.email.clone()),
        FormField::text("phone", "Phone", form.phone.clone()),
    ]
}

fn company_select(companies: &[CompanyOption], current: Option<&str>) -> FormField {
    let mut options = vec![SelectOption::none("No company")];
    options.extend(
        companies
            .iter()
            .map(|c| SelectOption::new(c.id.clone(), c.legal_name.clone())),
    );
    FormField::select("company", "Company", options, current)
}

fn user_role(modal: &FormModal) -> UserRole {
    modal
        .select_value("role")
        .and_then(|v| UserRole::ALL.into_iter().find(|r| r.as_str() == v))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn companies() -> Vec<CompanyOption> {
        vec![
            CompanyOption {
                id: "co1".to_string(),
                legal_name: "Acme".to_string(),
            },
            CompanyOption {
                id: "co2".to_string(),
                legal_name: "Beta".to_string(),
            },
        ]
    }

    fn ctx<'a>(companies: &'a [CompanyOption], filter: Option<&'a str>) -> FormContext<'a> {
        FormContext {
            companies,
            groups: &[],
            company_filter: filter,
        }
    }

    #[test]
    fn test_new_client_prefills_code_and_company() {
        let companies = companies();
        let target = FormTarget::Client(None);
        let modal = target.build(ctx(&companies, Some("co2")), Some("C0010"));

        assert!(modal.is_disabled("code"));
        assert_eq!(modal.text("code"), "C0010");
        assert_eq!(modal.select_value("company").as_deref(), Some("co2"));

        let Request::SaveClient { existing, form } = target.request(&modal, Some("co2")) else {
            panic!("expected client request");
        };
        assert!(existing.is_none());
        assert_eq!(form.code, "C0010");
        assert_eq!(form.company_id.as_deref(), Some("co2"));
    }

    #[test]
    fn test_master_role_locks_company() {
        let companies = companies();
        let target = FormTarget::User(None);
        let mut modal = target.build(ctx(&companies, Some("co1")), None);
        assert!(!modal.is_disabled("company"));

        modal.set_select("role", Some(UserRole::Master.as_str()));
        target.on_change(&mut modal, "role");
        assert!(modal.is_disabled("company"));
        assert_eq!(modal.select_value("company"), None);

        modal.set_select("role", Some(UserRole::Client.as_str()));
        target.on_change(&mut modal, "role");
        assert!(!modal.is_disabled("company"));
    }

    fn profile(role: UserRole, company_id: Option<&str>) -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            auth_id: Some("a1".to_string()),
            name: "Ana".to_string(),
            email: "ana@acme.test".to_string(),
            phone: String::new(),
            job_title: String::new(),
            avatar_url: String::new(),
            role,
            company_id: company_id.map(str::to_string),
            active: true,
            updated_at: None,
            company: None,
        }
    }

    #[test]
    fn test_edit_user_keeps_email_and_company() {
        let companies = companies();
        let target = FormTarget::User(Some(profile(UserRole::Consultant, Some("co2"))));
        let modal = target.build(ctx(&companies, None), None);

        assert_eq!(modal.text("email"), "ana@acme.test");
        assert!(modal.is_disabled("email"));
        assert_eq!(modal.select_value("company").as_deref(), Some("co2"));
        assert!(!modal.is_disabled("company"));
    }

    #[test]
    fn test_edit_master_user_hides_stored_company() {
        let companies = companies();
        let target = FormTarget::User(Some(profile(UserRole::Master, Some("co1"))));
        let modal = target.build(ctx(&companies, None), None);

        assert_eq!(modal.text("email"), "ana@acme.test");
        assert!(modal.is_disabled("company"));
        assert_eq!(modal.select_value("company"), None);
    }

    #[test]
    fn test_new_service_takes_company_from_filter() {
        let target = FormTarget::Service(None);
        let modal = target.build(ctx(&[], Some("co1")), None);

        let Request::SaveService { form, company, .. } = target.request(&modal, Some("co1")) else {
            panic!("expected service request");
        };
        assert_eq!(form.company_id.as_deref(), Some("co1"));
        assert_eq!(company.as_deref(), Some("co1"));
    }

    #[test]
    fn test_new_category_needs_code_and_locks_it() {
        let target = FormTarget::Category(None);
        assert_eq!(target.needs_code(), Some(CodeTarget::Category));

        let modal = target.build(ctx(&[], None), Some("CAT004"));
        assert!(modal.is_disabled("code"));

        let Request::SaveCategory { form, .. } = target.request(&modal, None) else {
            panic!("expected category request");
        };
        assert_eq!(form.code, "CAT004");
        assert_eq!(form.kind, None);
    }

    #[test]
    fn test_edit_forms_need_no_code() {
        assert_eq!(FormTarget::Company(None).needs_code(), None);
        assert_eq!(FormTarget::Group(None).needs_code(), None);
    }
}
