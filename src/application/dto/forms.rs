//! Form payloads submitted by the edit modals.

use crate::domain::entities::{
    Category, CategoryGroup, CategoryKind, Client, Company, Person, PersonRole, Service,
    UserProfile, UserRole,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyForm {
    pub legal_name: String,
    pub trade_name: String,
    pub tax_id: String,
    pub email: String,
    pub phone: String,
}

impl From<&Company> for CompanyForm {
    fn from(company: &Company) -> Self {
        Self {
            legal_name: company.legal_name.clone(),
            trade_name: company.trade_name.clone(),
            tax_id: company.tax_id.clone(),
            email: company.email.clone(),
            phone: company.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientForm {
    pub code: String,
    pub legal_name: String,
    pub trade_name: String,
    pub tax_id: String,
    pub company_id: Option<String>,
}

impl From<&Client> for ClientForm {
    fn from(client: &Client) -> Self {
        Self {
            code: client.code.clone(),
            legal_name: client.legal_name.clone(),
            trade_name: client.trade_name.clone(),
            tax_id: client.tax_id.clone(),
            company_id: client.company_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonForm {
    pub name: String,
    pub individual_tax_id: String,
    pub company_tax_id: String,
    pub email: String,
    pub phone: String,
    pub role: PersonRole,
}

impl From<&Person> for PersonForm {
    fn from(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            individual_tax_id: person.individual_tax_id.clone(),
            company_tax_id: person.company_tax_id.clone(),
            email: person.email.clone(),
            phone: person.phone.clone(),
            role: person.role,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceForm {
    /// Only read on update; new services get the next code.
    pub code: String,
    pub name: String,
    pub description: String,
    pub company_id: Option<String>,
}

impl From<&Service> for ServiceForm {
    fn from(service: &Service) -> Self {
        Self {
            code: service.code.clone(),
            name: service.name.clone(),
            description: service.description.clone(),
            company_id: service.company_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    /// Only read on create.
    pub email: String,
    pub phone: String,
    pub job_title: String,
    pub role: UserRole,
    pub company_id: Option<String>,
}

impl UserForm {
    /// Company to store: none for masters.
    #[must_use]
    pub fn effective_company(&self) -> Option<String> {
        if self.role.is_master() {
            None
        } else {
            self.company_id.clone()
        }
    }
}

impl From<&UserProfile> for UserForm {
    fn from(user: &UserProfile) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            job_title: user.job_title.clone(),
            role: user.role,
            company_id: user.company_id.clone(),
        }
    }
}

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub phone: String,
    pub job_title: String,
    pub avatar_url: String,
}

impl From<&UserProfile> for ProfileForm {
    fn from(user: &UserProfile) -> Self {
        Self {
            name: user.name.clone(),
            phone: user.phone.clone(),
            job_title: user.job_title.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub code: String,
    pub name: String,
    pub description: String,
    pub kind: Option<CategoryKind>,
    pub group_id: Option<String>,
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self {
            code: category.code.clone(),
            name: category.name.clone(),
            description: category.description.clone(),
            kind: Some(category.kind),
            group_id: category.group_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupForm {
    pub name: String,
    pub description: String,
}

impl From<&CategoryGroup> for GroupForm {
    fn from(group: &CategoryGroup) -> Self {
        Self {
            name: group.name.clone(),
            description: group.description.clone(),
        }
    }
}

/// Blank text as JSON null, otherwise the trimmed text.
#[must_use]
pub fn text_or_null(value: &str) -> serde_json::Value {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::Value::String(trimmed.to_string())
    }
}

/// Empty or missing id as JSON null.
#[must_use]
pub fn id_or_null(value: Option<&str>) -> serde_json::Value {
    value
        .filter(|id| !id.trim().is_empty())
        .map_or(serde_json::Value::Null, |id| {
            serde_json::Value::String(id.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_has_no_company() {
        let form = UserForm {
            role: UserRole::Master,
            company_id: Some("co1".to_string()),
            ..UserForm::default()
        };
        assert_eq!(form.effective_company(), None);

        let form = UserForm {
            role: UserRole::Consultant,
            ..form
        };
        assert_eq!(form.effective_company(), Some("co1".to_string()));
    }

    #[test]
    fn test_null_helpers() {
        assert!(text_or_null("  ").is_null());
        assert_eq!(text_or_null(" Ana "), "Ana");
        assert!(id_or_null(Some("")).is_null());
        assert!(id_or_null(None).is_null());
        assert_eq!(id_or_null(Some("g1")), "g1");
    }
}
