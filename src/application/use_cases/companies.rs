//! Company registry use cases.

use serde_json::json;
use tracing::info;

use super::records::{RecordStore, now};
use crate::application::dto::{CompanyForm, text_or_null};
use crate::domain::entities::{Company, CompanyOption};
use crate::domain::errors::{OperationError, require};
use crate::domain::filter::StatusFilter;
use crate::domain::ports::{Record, Table};

/// Lists and edits companies.
#[derive(Clone)]
pub struct CompaniesUseCase {
    store: RecordStore,
}

impl CompaniesUseCase {
    #[must_use]
    pub const fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Companies with the given status, ordered by legal name.
    ///
    /// # Errors
    /// Returns error if the fetch fails.
    pub async fn list(&self, status: StatusFilter) -> Result<Vec<Company>, OperationError> {
        let query = Company::query().active(status.as_active_flag());
        self.store.fetch(&query).await
    }

    /// Id and legal name of every company, for selectors.
    ///
    /// # Errors
    /// Returns error if the fetch fails.
    pub async fn options(&self) -> Result<Vec<CompanyOption>, OperationError> {
        let query = Company::query().columns("id,legal_name");
        self.store.fetch_as(&query).await
    }

    /// # Errors
    /// Returns error if validation or the insert fails.
    pub async fn create(&self, form: CompanyForm) -> Result<(), OperationError> {
        validate(&form)?;

        self.store
            .insert(
                Table::Companies,
                vec![json!({
                    "legal_name": form.legal_name.trim(),
                    "trade_name": text_or_null(&form.trade_name),
                    "tax_id": form.tax_id.trim(),
                    "email": text_or_null(&form.email),
                    "phone": text_or_null(&form.phone),
                    "active": true,
                    "updated_at": now(),
                })],
            )
            .await?;

        info!(legal_name = %form.legal_name, "Company created");
        Ok(())
    }

    /// # Errors
    /// Returns error if validation or the update fails.
    pub async fn update(&self, id: &str, form: CompanyForm) -> Result<(), OperationError> {
        validate(&form)?;

        self.store
            .update(
                Table::Companies,
                id,
                json!({
                    "legal_name": form.legal_name.trim(),
                    "trade_name": text_or_null(&form.trade_name),
                    "tax_id": form.tax_id.trim(),
                    "email": text_or_null(&form.email),
                    "phone": text_or_null(&form.phone),
                    "updated_at": now(),
                }),
            )
            .await?;

        info!(company_id = %id, "Company updated");
        Ok(())
    }

    /// # Errors
    /// Returns error if the update fails.
    pub async fn toggle_active(&self, company: &Company) -> Result<(), OperationError> {
        self.store
            .set_active(Table::Companies, &company.id, !company.active)
            .await?;
        info!(company_id = %company.id, active = !company.active, "Company status toggled");
        Ok(())
    }

    /// # Errors
    /// Returns error if the delete fails.
    pub async fn delete(&self, id: &str) -> Result<(), OperationError> {
        self.store.delete(Table::Companies, id).await?;
        info!(company_id = %id, "Company deleted");
        Ok(())
    }
}

fn validate(form: &CompanyForm) -> Result<(), OperationError> {
    require("legal name", &form.legal_name)?;
    require("tax id", &form.tax_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::use_cases::records::fixtures::store;
    use crate::domain::errors::ValidationError;
    use crate::domain::ports::mocks::InMemoryDataPort;

    fn seeded() -> Arc<InMemoryDataPort> {
        Arc::new(InMemoryDataPort::new().with_rows(
            Table::Companies,
            vec![
                json!({"id": "b", "legal_name": "Beta SA", "tax_id": "2", "active": true}),
                json!({"id": "a", "legal_name": "Acme Ltda", "tax_id": "1", "active": true}),
                json!({"id": "z", "legal_name": "Zeta ME", "tax_id": "3", "active": false}),
            ],
        ))
    }

    #[tokio::test]
    async fn test_list_applies_status_and_order() {
        let port = seeded();
        let use_case = CompaniesUseCase::new(store(&port));

        let active = use_case.list(StatusFilter::Active).await.unwrap();
        let names: Vec<_> = active.iter().map(|c| c.legal_name.as_str()).collect();
        assert_eq!(names, ["Acme Ltda", "Beta SA"]);

        let all = use_case.list(StatusFilter::All).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_create_sets_active_and_requires_fields() {
        let port = seeded();
        let use_case = CompaniesUseCase::new(store(&port));

        let missing = use_case.create(CompanyForm::default()).await;
        assert!(matches!(
            missing,
            Err(OperationError::Validation(ValidationError::Required { .. }))
        ));

        use_case
            .create(CompanyForm {
                legal_name: "Nova Ltda".to_string(),
                tax_id: "12345678000199".to_string(),
                ..CompanyForm::default()
            })
            .await
            .unwrap();

        let created = use_case
            .list(StatusFilter::Active)
            .await
            .unwrap()
            .into_iter()
            .find(|c| c.legal_name == "Nova Ltda")
            .unwrap();
        assert!(created.active);
        assert_eq!(created.trade_name, "");
    }

    #[tokio::test]
    async fn test_toggle_flips_flag_and_stamps_time() {
        let port = seeded();
        let use_case = CompaniesUseCase::new(store(&port));
        let company = use_case.list(StatusFilter::Active).await.unwrap().remove(0);

        use_case.toggle_active(&company).await.unwrap();

        let row = port.row(Table::Companies, &company.id).unwrap();
        assert_eq!(row["active"], false);
        assert!(row["updated_at"].is_string());
    }

    #[tokio::test]
    async fn test_delete_removes_row_from_next_fetch() {
        let port = seeded();
        let use_case = CompaniesUseCase::new(store(&port));

        use_case.delete("a").await.unwrap();

        let all = use_case.list(StatusFilter::All).await.unwrap();
        assert!(all.iter().all(|c| c.id != "a"));
    }

    #[tokio::test]
    async fn test_options_are_sorted_by_legal_name() {
        let port = seeded();
        let use_case = CompaniesUseCase::new(store(&port));

        let options = use_case.options().await.unwrap();
        assert_eq!(options[0].legal_name, "Acme Ltda");
        assert_eq!(options.len(), 3);
    }
}
