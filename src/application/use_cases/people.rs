//! People (sellers and SDRs) use cases.

use serde_json::json;
use tracing::{info, warn};

use super::records::{RecordStore, now};
use crate::application::dto::{PersonForm, text_or_null};
use crate::domain::code::CodeSequence;
use crate::domain::entities::Person;
use crate::domain::errors::{OperationError, ValidationError, require};
use crate::domain::filter::StatusFilter;
use crate::domain::ports::{Record, Table};

/// Lists and edits people.
#[derive(Clone)]
pub struct PeopleUseCase {
    store: RecordStore,
}

impl PeopleUseCase {
    #[must_use]
    pub const fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// # Errors
    /// Returns error if the fetch fails.
    pub async fn list(
        &self,
        company_filter: Option<&str>,
        status: StatusFilter,
    ) -> Result<Vec<Person>, OperationError> {
        let query = Person::query()
            .eq_opt("company_id", company_filter)
            .active(status.as_active_flag());
        self.store.fetch(&query).await
    }

    /// Creates a person under the globally selected company.
    ///
    /// The code is generated here, at submit time.
    ///
    /// # Errors
    /// Returns `CompanyRequired` without a selected company, or the
    /// validation/insert failure.
    pub async fn create(
        &self,
        form: PersonForm,
        company_filter: Option<&str>,
    ) -> Result<String, OperationError> {
        let Some(company_id) = company_filter else {
            warn!("Person creation attempted without a selected company");
            return Err(ValidationError::CompanyRequired.into());
        };
        require("name", &form.name)?;

        let code = self
            .store
            .next_code(Table::People, CodeSequence::PERSON)
            .await?;

        self.store
            .insert(
                Table::People,
                vec![json!({
                    "code": code,
                    "name": form.name.trim(),
                    "individual_tax_id": text_or_null(&form.individual_tax_id),
                    "company_tax_id": text_or_null(&form.company_tax_id),
                    "email": text_or_null(&form.email),
                    "phone": text_or_null(&form.phone),
                    "role": form.role.as_str(),
                    "company_id": company_id,
                    "active": true,
                    "updated_at": now(),
                })],
            )
            .await?;

        info!(code = %code, company_id = %company_id, "Person created");
        Ok(code)
    }

    /// # Errors
    /// Returns error if validation or the update fails.
    pub async fn update(&self, person: &Person, form: PersonForm) -> Result<(), OperationError> {
        require("name", &form.name)?;

        self.store
            .update(
                Table::People,
                &person.id,
                json!({
                    "name": form.name.trim(),
                    "individual_tax_id": text_or_null(&form.individual_tax_id),
                    "company_tax_id": text_or_null(&form.company_tax_id),
                    "email": text_or_null(&form.email),
                    "phone": text_or_null(&form.phone),
                    "role": form.role.as_str(),
                    "updated_at": now(),
                }),
            )
            .await?;

        info!(person_id = %person.id, "Person updated");
        Ok(())
    }

    /// # Errors
    /// Returns error if the update fails.
    pub async fn toggle_active(&self, person: &Person) -> Result<(), OperationError> {
        self.store
            .set_active(Table::People, &person.id, !person.active)
            .await?;
        info!(person_id = %person.id, active = !person.active, "Person status toggled");
        Ok(())
    }

    /// # Errors
    /// Returns error if the delete fails.
    pub async fn delete(&self, id: &str) -> Result<(), OperationError> {
        self.store.delete(Table::People, id).await?;
        info!(person_id = %id, "Person deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::use_cases::records::fixtures::store;
    use crate::domain::entities::PersonRole;
    use crate::domain::ports::mocks::{InMemoryDataPort, Operation};

    fn form() -> PersonForm {
        PersonForm {
            name: "Ana Lima".to_string(),
            individual_tax_id: "12345678901".to_string(),
            role: PersonRole::Sdr,
            ..PersonForm::default()
        }
    }

    #[tokio::test]
    async fn test_create_requires_company_and_touches_nothing() {
        let port = Arc::new(InMemoryDataPort::new());
        let use_case = PeopleUseCase::new(store(&port));

        let result = use_case.create(form(), None).await;

        assert!(matches!(
            result,
            Err(OperationError::Validation(ValidationError::CompanyRequired))
        ));
        assert!(port.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_generates_code_at_submit() {
        let port = Arc::new(InMemoryDataPort::new().with_rows(
            Table::People,
            vec![json!({"id": "p1", "code": "P0041", "name": "Old", "active": true})],
        ));
        let use_case = PeopleUseCase::new(store(&port));

        let code = use_case.create(form(), Some("co1")).await.unwrap();

        assert_eq!(code, "P0042");
        assert_eq!(
            port.calls(),
            [
                (Operation::Select, Table::People),
                (Operation::Insert, Table::People)
            ]
        );
        let people = use_case.list(Some("co1"), StatusFilter::Active).await.unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].role, PersonRole::Sdr);
    }

    #[tokio::test]
    async fn test_empty_registry_starts_at_first_code() {
        let port = Arc::new(InMemoryDataPort::new());
        let use_case = PeopleUseCase::new(store(&port));

        assert_eq!(use_case.create(form(), Some("co1")).await.unwrap(), "P0001");
    }
}
